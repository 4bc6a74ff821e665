// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Mapping from engine-native log lines to canonical progress.

use ocrdesk_core::types::{ExtractionProgress, Stage};
use ocrdesk_engine::EngineLog;

/// Canonical stage for an engine status label.
///
/// Anything mentioning recognition ("recognizing text", "Recognising") is
/// [`Stage::Recognizing`]; every other label (core loading, language data,
/// API initialisation, image decoding) is [`Stage::Loading`]. [`Stage::Done`]
/// is never derived from a label; the orchestrator emits it itself.
pub fn map_stage(status: &str) -> Stage {
    let status = status.to_ascii_lowercase();
    if status.contains("recogniz") || status.contains("recognis") {
        Stage::Recognizing
    } else {
        Stage::Loading
    }
}

/// Whole percentage for a progress ratio, rounding half away from zero and
/// clamping to 0–100. Non-finite ratios count as 0.
pub fn percent_of(ratio: f64) -> u8 {
    if !ratio.is_finite() {
        return 0;
    }
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

/// Normalise one engine log line.
pub fn normalize(log: &EngineLog) -> ExtractionProgress {
    ExtractionProgress::new(map_stage(&log.status), percent_of(log.progress))
}

/// Engine confidence rounded to a whole number in 0–100.
pub fn round_confidence(confidence: f64) -> u8 {
    if !confidence.is_finite() {
        return 0;
    }
    confidence.round().clamp(0.0, 100.0) as u8
}
