// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Desktop bridge: system clipboard via `copypasta` (X11/Wayland, macOS,
// Windows).

use copypasta::{ClipboardContext, ClipboardProvider};
use ocrdesk_core::error::{OcrdeskError, Result};
use tracing::{debug, warn};

use crate::traits::*;

/// Bridge backed by the desktop clipboard.
pub struct DesktopBridge;

impl PlatformBridge for DesktopBridge {
    fn platform_name(&self) -> &str {
        "Desktop (copypasta)"
    }

    fn clipboard(&self) -> &dyn NativeClipboard {
        self
    }
}

impl NativeClipboard for DesktopBridge {
    fn write_text(&self, text: &str) -> Result<()> {
        // A context is opened per write; there is no long-lived clipboard
        // owner to keep alive between copies.
        let mut ctx = ClipboardContext::new().map_err(|err| {
            warn!(error = %err, "no system clipboard");
            OcrdeskError::ClipboardUnavailable
        })?;
        ctx.set_contents(text.to_owned())
            .map_err(|err| OcrdeskError::ClipboardDenied(err.to_string()))?;
        debug!(chars = text.len(), "text copied to clipboard");
        Ok(())
    }
}
