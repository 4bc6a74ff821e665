// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for native capabilities.

use ocrdesk_core::error::Result;

/// Unified bridge that groups all native capabilities.
pub trait PlatformBridge: NativeClipboard {
    /// Human-readable platform name (e.g. "Desktop (copypasta)").
    fn platform_name(&self) -> &str;

    /// This bridge's clipboard.
    fn clipboard(&self) -> &dyn NativeClipboard;
}

/// Write text to the system clipboard.
pub trait NativeClipboard {
    /// Replace the clipboard contents with `text`.
    ///
    /// Fails with `OcrdeskError::ClipboardUnavailable` when there is no
    /// clipboard to talk to, and `OcrdeskError::ClipboardDenied` when the
    /// write itself is refused.
    fn write_text(&self, text: &str) -> Result<()>;
}
