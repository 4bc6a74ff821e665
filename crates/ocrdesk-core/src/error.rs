// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for OCR desk.

use thiserror::Error;

use crate::intake::RejectReason;

/// Top-level error type for all OCR desk operations.
#[derive(Debug, Error)]
pub enum OcrdeskError {
    // -- Intake errors --
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("file too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("no file selected")]
    NoFileSelected,

    // -- Recognition errors --
    #[error("OCR engine failed: {0}")]
    EngineFailure(String),

    #[error("OCR engine unavailable: {0}")]
    EngineUnavailable(String),

    // -- Export errors --
    #[error("no extraction result to export")]
    NoResult,

    #[error("clipboard is not available on this platform")]
    ClipboardUnavailable,

    #[error("clipboard write was denied: {0}")]
    ClipboardDenied(String),

    // -- Configuration / persistence --
    #[error("configuration error: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<RejectReason> for OcrdeskError {
    fn from(reason: RejectReason) -> Self {
        match reason {
            RejectReason::UnsupportedFormat { media_type } => Self::UnsupportedFormat(media_type),
            RejectReason::FileTooLarge { size, limit } => Self::FileTooLarge { size, limit },
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, OcrdeskError>;
