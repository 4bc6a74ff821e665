// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the OCR desk extraction pipeline.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// Identifies one extraction request. Strictly increasing per orchestrator;
/// only the newest generation is allowed to reach the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Raster image formats the intake policy knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageKind {
    Jpeg,
    Png,
    Bmp,
    Gif,
    Tiff,
    WebP,
}

impl ImageKind {
    /// Every known kind, in the order they are listed to users.
    pub const ALL: [ImageKind; 6] = [
        Self::Png,
        Self::Jpeg,
        Self::Bmp,
        Self::Gif,
        Self::Tiff,
        Self::WebP,
    ];

    /// MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Bmp => "image/bmp",
            Self::Gif => "image/gif",
            Self::Tiff => "image/tiff",
            Self::WebP => "image/webp",
        }
    }

    /// Short badge shown next to a selected file (e.g. "PNG").
    pub fn label(&self) -> &'static str {
        match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Bmp => "BMP",
            Self::Gif => "GIF",
            Self::Tiff => "TIFF",
            Self::WebP => "WEBP",
        }
    }

    /// Preferred file extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Bmp => "bmp",
            Self::Gif => "gif",
            Self::Tiff => "tiff",
            Self::WebP => "webp",
        }
    }

    /// Infer image kind from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" | "jpe" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            "bmp" | "dib" => Some(Self::Bmp),
            "gif" => Some(Self::Gif),
            "tif" | "tiff" => Some(Self::Tiff),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Reverse lookup from a MIME type string.
    pub fn from_mime_type(media_type: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.mime_type().eq_ignore_ascii_case(media_type))
    }
}

/// A recognition language: Tesseract-style code plus display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    pub code: String,
    pub name: String,
}

impl Language {
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
        }
    }
}

/// Language code used when nothing else is configured.
pub const DEFAULT_LANGUAGE: &str = "eng";

/// Built-in language catalogue as `(code, display name)` pairs.
pub const BUILTIN_LANGUAGES: [(&str, &str); 20] = [
    ("eng", "English"),
    ("spa", "Spanish"),
    ("fra", "French"),
    ("deu", "German"),
    ("chi_sim", "Chinese (Simplified)"),
    ("chi_tra", "Chinese (Traditional)"),
    ("jpn", "Japanese"),
    ("kor", "Korean"),
    ("rus", "Russian"),
    ("ara", "Arabic"),
    ("hin", "Hindi"),
    ("ita", "Italian"),
    ("por", "Portuguese"),
    ("nld", "Dutch"),
    ("pol", "Polish"),
    ("tur", "Turkish"),
    ("vie", "Vietnamese"),
    ("tha", "Thai"),
    ("swe", "Swedish"),
    ("nor", "Norwegian"),
];

/// The built-in catalogue as owned [`Language`] values.
pub fn builtin_languages() -> Vec<Language> {
    BUILTIN_LANGUAGES
        .iter()
        .map(|(code, name)| Language::new(*code, *name))
        .collect()
}

/// Display name for `code` within `languages`, or the code itself when unknown.
pub fn language_name<'a>(languages: &'a [Language], code: &'a str) -> &'a str {
    languages
        .iter()
        .find(|lang| lang.code == code)
        .map(|lang| lang.name.as_str())
        .unwrap_or(code)
}

/// A file offered by the shell for extraction.
///
/// `size_bytes` is the size the shell declared; validation runs on it without
/// touching `data`.
#[derive(Debug, Clone)]
pub struct CandidateFile {
    pub filename: String,
    pub media_type: String,
    pub size_bytes: u64,
    pub data: Arc<[u8]>,
}

impl CandidateFile {
    /// Build a candidate whose declared size is the length of `data`.
    pub fn new(filename: impl Into<String>, media_type: impl Into<String>, data: Vec<u8>) -> Self {
        let size_bytes = data.len() as u64;
        Self {
            filename: filename.into(),
            media_type: media_type.into(),
            size_bytes,
            data: Arc::from(data),
        }
    }

    /// The known image kind for this file's media type, if any.
    pub fn kind(&self) -> Option<ImageKind> {
        ImageKind::from_mime_type(&self.media_type)
    }
}

/// One submission to the orchestrator. Consumed exactly once.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    pub file: CandidateFile,
    pub language: String,
}

impl ExtractionRequest {
    pub fn new(file: CandidateFile, language: impl Into<String>) -> Self {
        Self {
            file,
            language: language.into(),
        }
    }
}

/// Canonical extraction phases reported to the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Engine start-up: loading models, language data, decoding the image.
    Loading,
    /// The engine is recognising text.
    Recognizing,
    /// Recognition finished; a terminal event follows.
    Done,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Recognizing => "recognizing",
            Self::Done => "done",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A progress snapshot for the in-flight extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionProgress {
    pub stage: Stage,
    /// Whole-number percentage, 0–100.
    pub percent: u8,
}

impl ExtractionProgress {
    pub fn new(stage: Stage, percent: u8) -> Self {
        Self {
            stage,
            percent: percent.min(100),
        }
    }

    /// Progress as a ratio in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        f64::from(self.percent) / 100.0
    }
}

/// A successful extraction. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub text: String,
    /// Engine confidence rounded to a whole number, 0–100.
    pub confidence: u8,
    /// Wall-clock seconds from submission to completion. Displayed with one
    /// decimal place.
    pub processing_time_seconds: f64,
    pub filename: String,
    pub file_size_label: String,
    pub language: String,
}

impl ExtractionResult {
    /// Number of characters (Unicode scalar values) in the text.
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Number of lines, counting an empty text as one line.
    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Processing time formatted for display, e.g. `"2.4s"`. Ties round up.
    pub fn processing_time_label(&self) -> String {
        format!("{}s", crate::size_label::fixed(self.processing_time_seconds, 1))
    }
}

/// Message carried by every failed extraction.
pub const EXTRACTION_FAILED_MESSAGE: &str =
    "Error processing image. Please try again with a different image or settings.";

/// Terminal failure of one extraction. The engine's own error detail is logged,
/// not carried here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionError {
    pub message: String,
}

impl ExtractionError {
    /// The generic retry-oriented failure.
    pub fn engine_failure() -> Self {
        Self {
            message: EXTRACTION_FAILED_MESSAGE.to_owned(),
        }
    }
}

impl std::fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ExtractionError {}
