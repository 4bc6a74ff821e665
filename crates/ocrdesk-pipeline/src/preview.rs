// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Preview handles: a temporary on-disk copy of the submitted image that the
// shell can open or render while the result is on screen.

use std::io::Write;
use std::path::Path;

use ocrdesk_core::error::Result;
use ocrdesk_core::types::CandidateFile;
use tempfile::NamedTempFile;
use tracing::debug;

/// Temporary copy of a candidate image. The file is removed exactly once,
/// when the handle is dropped.
pub struct PreviewHandle {
    file: NamedTempFile,
}

impl PreviewHandle {
    /// Write `candidate`'s bytes to a fresh temporary file.
    ///
    /// The file keeps the extension matching the candidate's media type so
    /// viewers pick the right decoder.
    pub fn create(candidate: &CandidateFile) -> Result<Self> {
        let suffix = candidate
            .kind()
            .map(|kind| format!(".{}", kind.extension()))
            .unwrap_or_default();
        let mut file = tempfile::Builder::new()
            .prefix("ocrdesk-preview-")
            .suffix(&suffix)
            .tempfile()?;
        file.write_all(&candidate.data)?;
        file.flush()?;
        debug!(path = %file.path().display(), "preview created");
        Ok(Self { file })
    }

    /// Location of the preview file.
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        debug!(path = %self.file.path().display(), "preview released");
    }
}

impl std::fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewHandle")
            .field("path", &self.file.path())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_holds_bytes_until_dropped() {
        let candidate = CandidateFile::new("page.png", "image/png", b"pixels".to_vec());
        let preview = PreviewHandle::create(&candidate).unwrap();
        let path = preview.path().to_path_buf();

        assert_eq!(std::fs::read(&path).unwrap(), b"pixels");
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));

        drop(preview);
        assert!(!path.exists());
    }
}
