// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::types::{DEFAULT_LANGUAGE, ImageKind, Language, builtin_languages};

/// Upper bound on accepted file size: 10 MiB.
pub const DEFAULT_MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// Which files the intake validator accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakePolicy {
    /// Allowed media types, compared case-insensitively.
    pub accepted_media_types: Vec<String>,
    /// Largest accepted size in bytes (inclusive).
    pub max_file_bytes: u64,
}

impl Default for IntakePolicy {
    fn default() -> Self {
        Self {
            accepted_media_types: ImageKind::ALL
                .iter()
                .map(|kind| kind.mime_type().to_owned())
                .collect(),
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
        }
    }
}

impl IntakePolicy {
    /// Whether `media_type` is on the allow-list.
    pub fn accepts_media_type(&self, media_type: &str) -> bool {
        self.accepted_media_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(media_type))
    }
}

/// OCR backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineBackend {
    /// The `tesseract` command-line program.
    Tesseract,
    /// Pure-Rust `ocrs` engine (requires the `ocr` feature).
    Ocrs,
}

/// Settings for constructing the OCR engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub backend: EngineBackend,
    /// Program invoked for the Tesseract backend.
    pub tesseract_command: String,
    /// Directory holding `ocrs` models. `None` uses the default cache dir.
    pub model_dir: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            backend: EngineBackend::Tesseract,
            tesseract_command: "tesseract".into(),
            model_dir: None,
        }
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// File intake policy.
    pub intake: IntakePolicy,
    /// Language preselected for new extractions.
    pub default_language: String,
    /// Languages offered to the user.
    pub languages: Vec<Language>,
    /// Whether to create a preview handle for the selected image.
    pub show_preview: bool,
    /// Where exported files are written. `None` means the current directory.
    pub export_dir: Option<PathBuf>,
    /// OCR engine settings.
    pub engine: EngineConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            intake: IntakePolicy::default(),
            default_language: DEFAULT_LANGUAGE.into(),
            languages: builtin_languages(),
            show_preview: true,
            export_dir: None,
            engine: EngineConfig::default(),
        }
    }
}
