// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Intake validation: the format and size gate in front of the OCR engine.

use serde::{Deserialize, Serialize};

use crate::config::IntakePolicy;
use crate::types::CandidateFile;

/// Why a candidate file was turned away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    /// Media type is not on the allow-list.
    UnsupportedFormat { media_type: String },
    /// Size is strictly over the policy ceiling.
    FileTooLarge { size: u64, limit: u64 },
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedFormat { media_type } => {
                write!(f, "unsupported file format: {media_type}")
            }
            Self::FileTooLarge { size, limit } => {
                write!(f, "file too large: {size} bytes (limit {limit})")
            }
        }
    }
}

/// Check a media type and declared size against `policy`.
///
/// The format check runs first, so a file that fails both is reported as
/// [`RejectReason::UnsupportedFormat`]. A size equal to the ceiling passes.
pub fn validate(
    policy: &IntakePolicy,
    media_type: &str,
    size_bytes: u64,
) -> Result<(), RejectReason> {
    if !policy.accepts_media_type(media_type) {
        return Err(RejectReason::UnsupportedFormat {
            media_type: media_type.to_owned(),
        });
    }
    if size_bytes > policy.max_file_bytes {
        return Err(RejectReason::FileTooLarge {
            size: size_bytes,
            limit: policy.max_file_bytes,
        });
    }
    Ok(())
}

/// [`validate`] applied to a candidate's declared media type and size.
pub fn validate_file(policy: &IntakePolicy, file: &CandidateFile) -> Result<(), RejectReason> {
    validate(policy, &file.media_type, file.size_bytes)
}
