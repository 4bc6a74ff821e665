// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Short user-facing notices for every error the pipeline can raise.
//
// None of these are fatal: the user can always pick another file.

use crate::error::OcrdeskError;
use crate::size_label::size_label_bytes;
use crate::types::ExtractionError;

/// How the shell should present a notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Informational (e.g. "Workspace cleared").
    Info,
    /// The user must pick a different file or change a setting.
    ActionRequired,
    /// Something failed; trying again may help.
    Failure,
}

/// A toast-style notice: a heading plus one line of guidance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(title: &str, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.to_owned(),
            description: description.into(),
            severity,
        }
    }
}

/// Convert an [`OcrdeskError`] into the notice shown to the user.
pub fn humanize_error(err: &OcrdeskError) -> Notice {
    match err {
        OcrdeskError::UnsupportedFormat(_) => Notice::new(
            "Unsupported file format",
            "Please upload an image file (PNG, JPEG, BMP, GIF, TIFF, WebP)",
            Severity::ActionRequired,
        ),

        OcrdeskError::FileTooLarge { limit, .. } => Notice::new(
            "File too large",
            format!(
                "Please upload an image smaller than {}",
                size_label_bytes(*limit)
            ),
            Severity::ActionRequired,
        ),

        OcrdeskError::NoFileSelected => Notice::new(
            "No image selected",
            "Drop an image or choose a file first.",
            Severity::ActionRequired,
        ),

        OcrdeskError::EngineFailure(_) => Notice::new(
            "Error processing image",
            "Please try again with a different image or settings",
            Severity::Failure,
        ),

        OcrdeskError::EngineUnavailable(detail) => Notice::new(
            "Text recognition is not available",
            format!("The OCR engine could not be started. ({detail})"),
            Severity::Failure,
        ),

        OcrdeskError::NoResult => Notice::new(
            "Nothing to export yet",
            "Extract text from an image first.",
            Severity::ActionRequired,
        ),

        OcrdeskError::ClipboardUnavailable | OcrdeskError::ClipboardDenied(_) => Notice::new(
            "Failed to copy text to clipboard",
            "Try downloading the text as a file instead.",
            Severity::Failure,
        ),

        OcrdeskError::Config(detail) => Notice::new(
            "Settings could not be loaded",
            format!("Default settings are in use. ({detail})"),
            Severity::Failure,
        ),

        OcrdeskError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                Notice::new(
                    "The file couldn't be found",
                    "It may have been moved or deleted. Try choosing the file again.",
                    Severity::ActionRequired,
                )
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                Notice::new(
                    "Permission denied",
                    "Check the file permissions, or pick a different location.",
                    Severity::ActionRequired,
                )
            } else {
                Notice::new(
                    "A file operation failed",
                    format!("Please try again. ({io_err})"),
                    Severity::Failure,
                )
            }
        }

        OcrdeskError::Serialization(_) => Notice::new(
            "The result could not be saved",
            "Please try again.",
            Severity::Failure,
        ),
    }
}

/// Notice for a terminal extraction failure.
pub fn humanize_extraction_error(err: &ExtractionError) -> Notice {
    Notice::new("Error processing image", err.message.clone(), Severity::Failure)
}
