// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ocrdesk-engine: the OCR engine boundary.
//
// The pipeline treats recognition as a black box: it hands over encoded image
// bytes and a language code, receives status/progress log lines while the
// engine works, and finally gets back text plus a confidence score. This crate
// defines that boundary and ships two backends: the `tesseract` command-line
// program, and the pure-Rust `ocrs` engine behind the `ocr` feature.

use std::sync::Arc;

use async_trait::async_trait;
use ocrdesk_core::config::{EngineBackend, EngineConfig};
use ocrdesk_core::error::{OcrdeskError, Result};

pub mod sniff;
pub mod tesseract;

#[cfg(feature = "ocr")]
pub mod ocr;

pub use sniff::sniff_media_type;
pub use tesseract::TesseractEngine;

#[cfg(feature = "ocr")]
pub use ocr::OcrsEngine;

/// One status line from the engine's own logging channel.
///
/// `status` is engine-native (e.g. `"loading tesseract core"`,
/// `"recognizing text"`); `progress` is the engine's ratio for that status,
/// nominally in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineLog {
    pub status: String,
    pub progress: f64,
}

impl EngineLog {
    pub fn new(status: impl Into<String>, progress: f64) -> Self {
        Self {
            status: status.into(),
            progress,
        }
    }
}

/// Callback the engine reports [`EngineLog`] lines through. May be invoked
/// from any thread.
pub type EngineLogger = Arc<dyn Fn(EngineLog) + Send + Sync>;

/// Raw engine output before the pipeline normalises it.
#[derive(Debug, Clone, PartialEq)]
pub struct Recognition {
    pub text: String,
    /// Engine-reported confidence, nominally 0–100 (unrounded).
    pub confidence: f64,
}

/// An OCR engine: encoded image plus language in, text plus confidence out.
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Short identifier for logs (e.g. `"tesseract"`).
    fn name(&self) -> &'static str;

    /// Recognise the text in `image` (encoded PNG/JPEG/... bytes).
    ///
    /// Errors of any kind mean "recognition failed"; callers do not inspect
    /// them beyond logging.
    async fn recognize(
        &self,
        image: Arc<[u8]>,
        language: &str,
        logger: EngineLogger,
    ) -> Result<Recognition>;
}

/// Build the engine selected by `config`.
pub fn build_engine(config: &EngineConfig) -> Result<Arc<dyn RecognitionEngine>> {
    match config.backend {
        EngineBackend::Tesseract => Ok(Arc::new(TesseractEngine::new(
            config.tesseract_command.clone(),
        ))),
        #[cfg(feature = "ocr")]
        EngineBackend::Ocrs => {
            let models = match &config.model_dir {
                Some(dir) => ocr::OcrsModels::from_dir(dir),
                None => ocr::OcrsModels::default(),
            };
            Ok(Arc::new(OcrsEngine::new(models)?))
        }
        #[cfg(not(feature = "ocr"))]
        EngineBackend::Ocrs => Err(OcrdeskError::EngineUnavailable(
            "this build does not include the `ocr` feature".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tesseract_backend_builds_without_probing() {
        let engine = build_engine(&EngineConfig::default()).unwrap();
        assert_eq!(engine.name(), "tesseract");
    }

    #[cfg(not(feature = "ocr"))]
    #[test]
    fn ocrs_backend_requires_feature() {
        let config = EngineConfig {
            backend: EngineBackend::Ocrs,
            ..EngineConfig::default()
        };
        assert!(matches!(
            build_engine(&config),
            Err(OcrdeskError::EngineUnavailable(_))
        ));
    }
}
