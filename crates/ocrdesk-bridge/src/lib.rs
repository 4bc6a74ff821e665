// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR desk: platform bridge abstractions.
//
// The pipeline talks to the host system (currently only the clipboard)
// through the traits in `traits`. Builds with the `system-clipboard` feature
// get a working desktop clipboard; everything else gets the stub, which
// reports every capability as unavailable.

pub mod traits;

#[cfg(feature = "system-clipboard")]
pub mod desktop;

#[cfg(not(feature = "system-clipboard"))]
pub mod stub;

pub use traits::{NativeClipboard, PlatformBridge};

/// The bridge implementation for this build.
pub fn platform_bridge() -> Box<dyn PlatformBridge> {
    #[cfg(feature = "system-clipboard")]
    {
        Box::new(desktop::DesktopBridge)
    }
    #[cfg(not(feature = "system-clipboard"))]
    {
        Box::new(stub::StubBridge)
    }
}
