// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR desk pipeline: runs extractions against a recognition engine, keeps
// only the latest request's events, and turns finished results into
// clipboard text and downloadable files.

pub mod export;
pub mod orchestrator;
pub mod preview;
pub mod progress;
pub mod session;

pub use export::{ExportedFile, JsonExport};
pub use orchestrator::{EventKind, ExtractionEvent, ExtractionEvents, Extractor, extract};
pub use preview::PreviewHandle;
pub use session::ExtractionSession;
