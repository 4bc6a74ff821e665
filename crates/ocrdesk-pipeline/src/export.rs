// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Result exporter: clipboard copy, plain-text download, JSON download.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ocrdesk_bridge::NativeClipboard;
use ocrdesk_core::error::{OcrdeskError, Result};
use ocrdesk_core::types::ExtractionResult;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Prefix shared by every exported file name.
const EXPORT_PREFIX: &str = "ocr-result";

/// Upper bound on `-N` suffixes tried when a target name already exists.
const MAX_NAME_ATTEMPTS: u32 = 1000;

pub const TEXT_MEDIA_TYPE: &str = "text/plain";
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// A file ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    /// Save into `dir` without overwriting anything.
    ///
    /// If `file_name` is taken, `-1`, `-2`, ... is inserted before the
    /// extension. Returns the path written.
    pub fn write_into(&self, dir: &Path) -> Result<PathBuf> {
        let (stem, ext) = match self.file_name.rsplit_once('.') {
            Some((stem, ext)) => (stem, format!(".{ext}")),
            None => (self.file_name.as_str(), String::new()),
        };

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let name = if attempt == 0 {
                self.file_name.clone()
            } else {
                format!("{stem}-{attempt}{ext}")
            };
            let path = dir.join(name);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(&self.bytes)?;
                    info!(path = %path.display(), bytes = self.bytes.len(), "export written");
                    return Ok(path);
                }
                Err(err) if err.kind() == std::io::ErrorKind::AlreadyExists => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Err(OcrdeskError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("no free file name for {} in {}", self.file_name, dir.display()),
        )))
    }
}

/// JSON export document: the result's own fields plus the export time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonExport {
    #[serde(flatten)]
    pub result: ExtractionResult,
    pub timestamp: DateTime<Utc>,
}

/// `ocr-result-<unix millis>.<ext>`.
pub fn export_file_name(extension: &str, at: DateTime<Utc>) -> String {
    format!("{EXPORT_PREFIX}-{}.{extension}", at.timestamp_millis())
}

/// Put the result text on the clipboard, unchanged.
pub fn copy_text(result: &ExtractionResult, clipboard: &dyn NativeClipboard) -> Result<()> {
    clipboard.write_text(&result.text)?;
    debug!(chars = result.char_count(), "result text copied");
    Ok(())
}

/// The result text as a plain-text file, byte-for-byte.
pub fn export_text(result: &ExtractionResult, at: DateTime<Utc>) -> ExportedFile {
    ExportedFile {
        file_name: export_file_name("txt", at),
        media_type: TEXT_MEDIA_TYPE,
        bytes: result.text.as_bytes().to_vec(),
    }
}

/// The full result plus an ISO-8601 `timestamp`, pretty-printed JSON.
pub fn export_json(result: &ExtractionResult, at: DateTime<Utc>) -> Result<ExportedFile> {
    let document = JsonExport {
        result: result.clone(),
        timestamp: at,
    };
    Ok(ExportedFile {
        file_name: export_file_name("json", at),
        media_type: JSON_MEDIA_TYPE,
        bytes: serde_json::to_vec_pretty(&document)?,
    })
}
