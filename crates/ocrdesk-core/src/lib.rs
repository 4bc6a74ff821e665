// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR desk: Core types, errors, configuration, and intake policy shared
// across all crates.

pub mod config;
pub mod error;
pub mod human_errors;
pub mod intake;
pub mod size_label;
pub mod types;

pub use config::{AppConfig, IntakePolicy};
pub use error::OcrdeskError;
pub use intake::{RejectReason, validate};
pub use size_label::{size_label, size_label_bytes};
pub use types::*;
