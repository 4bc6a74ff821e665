// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub bridge for headless and CI builds without a system clipboard.

use ocrdesk_core::error::{OcrdeskError, Result};

use crate::traits::*;

/// Bridge whose every capability is unavailable.
pub struct StubBridge;

impl PlatformBridge for StubBridge {
    fn platform_name(&self) -> &str {
        "Headless (stub)"
    }

    fn clipboard(&self) -> &dyn NativeClipboard {
        self
    }
}

impl NativeClipboard for StubBridge {
    fn write_text(&self, _text: &str) -> Result<()> {
        tracing::warn!("NativeClipboard::write_text called on stub bridge");
        Err(OcrdeskError::ClipboardUnavailable)
    }
}
