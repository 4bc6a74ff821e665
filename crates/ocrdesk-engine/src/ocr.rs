// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ocrs backend: pure-Rust OCR using neural network models executed via
// `rten`.
//
// # Feature Gate
//
// Only compiled with the `ocr` feature:
//
// ```toml
// ocrdesk-engine = { path = "crates/ocrdesk-engine", features = ["ocr"] }
// ```
//
// # Model Setup
//
// Two model files are required:
//
// - **Detection model** (`text-detection.rten`): locates text regions.
// - **Recognition model** (`text-recognition.rten`): decodes characters.
//
// Running `ocrs-cli` once downloads both into `$XDG_CACHE_HOME/ocrs`
// (typically `~/.cache/ocrs`), which is the default lookup directory.
//
// The models are trained on Latin script; other language codes are accepted
// but logged as a warning. ocrs reports no per-character scores, so
// confidence is the share of detected text lines that produced text.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use image::DynamicImage;
use ocrdesk_core::error::{OcrdeskError, Result};
use ocrs::{ImageSource, OcrEngine as OcrsInner, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument, warn};

use crate::{EngineLog, EngineLogger, Recognition, RecognitionEngine};

/// Well-known filenames for the detection and recognition models.
const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// Default directory for cached model files: `$XDG_CACHE_HOME/ocrs`, else
/// `~/.cache/ocrs`.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Locations of the two model files.
#[derive(Debug, Clone)]
pub struct OcrsModels {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrsModels {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrsModels {
    /// Models named `text-detection.rten` and `text-recognition.rten` in `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Check that both model files exist.
    pub fn validate(&self) -> Result<()> {
        for path in [&self.detection_model_path, &self.recognition_model_path] {
            if !path.exists() {
                return Err(OcrdeskError::EngineUnavailable(format!(
                    "model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// OCR engine backed by `ocrs`. Load once, reuse for many images.
pub struct OcrsEngine {
    engine: Arc<OcrsInner>,
}

impl OcrsEngine {
    /// Load both models and initialise the engine.
    ///
    /// # Errors
    ///
    /// Returns [`OcrdeskError::EngineUnavailable`] if a model is missing or
    /// cannot be loaded.
    #[instrument(skip_all, fields(
        detection = %models.detection_model_path.display(),
        recognition = %models.recognition_model_path.display(),
    ))]
    pub fn new(models: OcrsModels) -> Result<Self> {
        models.validate()?;

        info!("Loading OCR detection model");
        let detection_model = Model::load_file(&models.detection_model_path).map_err(|err| {
            OcrdeskError::EngineUnavailable(format!(
                "failed to load detection model from {}: {err}",
                models.detection_model_path.display()
            ))
        })?;

        info!("Loading OCR recognition model");
        let recognition_model =
            Model::load_file(&models.recognition_model_path).map_err(|err| {
                OcrdeskError::EngineUnavailable(format!(
                    "failed to load recognition model from {}: {err}",
                    models.recognition_model_path.display()
                ))
            })?;

        let engine = OcrsInner::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| {
            OcrdeskError::EngineUnavailable(format!("failed to initialise OCR engine: {err}"))
        })?;

        info!("OCR engine initialised");
        Ok(Self {
            engine: Arc::new(engine),
        })
    }
}

#[async_trait]
impl RecognitionEngine for OcrsEngine {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    async fn recognize(
        &self,
        image: Arc<[u8]>,
        language: &str,
        logger: EngineLogger,
    ) -> Result<Recognition> {
        if language != "eng" {
            warn!(language, "ocrs models are Latin-only; recognising anyway");
        }
        let engine = Arc::clone(&self.engine);
        tokio::task::spawn_blocking(move || recognize_blocking(&engine, &image, &logger))
            .await
            .map_err(|err| OcrdeskError::EngineFailure(format!("recognition task failed: {err}")))?
    }
}

/// Decode, detect, and recognise on the current (blocking) thread.
fn recognize_blocking(
    engine: &OcrsInner,
    encoded: &[u8],
    logger: &EngineLogger,
) -> Result<Recognition> {
    logger(EngineLog::new("loading image", 0.0));
    let image: DynamicImage = image::load_from_memory(encoded)
        .map_err(|err| OcrdeskError::EngineFailure(format!("failed to decode image: {err}")))?;
    logger(EngineLog::new("loading image", 1.0));

    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    debug!(width, height, "image decoded");

    let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
        OcrdeskError::EngineFailure(format!(
            "failed to create image source ({width}x{height}): {err}"
        ))
    })?;
    let input = engine
        .prepare_input(source)
        .map_err(|err| OcrdeskError::EngineFailure(format!("OCR preprocessing failed: {err}")))?;

    logger(EngineLog::new("recognizing text", 0.0));
    let word_rects = engine
        .detect_words(&input)
        .map_err(|err| OcrdeskError::EngineFailure(format!("word detection failed: {err}")))?;
    logger(EngineLog::new("recognizing text", 0.4));

    let line_rects = engine.find_text_lines(&input, &word_rects);
    logger(EngineLog::new("recognizing text", 0.5));

    let line_texts = engine
        .recognize_text(&input, &line_rects)
        .map_err(|err| OcrdeskError::EngineFailure(format!("line recognition failed: {err}")))?;
    logger(EngineLog::new("recognizing text", 1.0));

    let detected = line_texts.len();
    let lines: Vec<String> = line_texts
        .iter()
        .flatten()
        .map(|line| line.to_string())
        .filter(|line| !line.trim().is_empty())
        .collect();

    let confidence = if detected == 0 {
        0.0
    } else {
        100.0 * lines.len() as f64 / detected as f64
    };
    let mut text = lines.join("\n");
    if !text.is_empty() {
        text.push('\n');
    }

    info!(
        words = word_rects.len(),
        lines = lines.len(),
        "ocrs recognition complete"
    );
    Ok(Recognition { text, confidence })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn models_from_dir() {
        let models = OcrsModels::from_dir("/tmp/my-models");
        assert_eq!(
            models.detection_model_path,
            PathBuf::from("/tmp/my-models/text-detection.rten")
        );
        assert_eq!(
            models.recognition_model_path,
            PathBuf::from("/tmp/my-models/text-recognition.rten")
        );
    }

    #[test]
    fn default_models_use_well_known_names() {
        let models = OcrsModels::default();
        assert!(
            models
                .detection_model_path
                .to_string_lossy()
                .ends_with(DETECTION_MODEL_FILENAME)
        );
        assert!(
            models
                .recognition_model_path
                .to_string_lossy()
                .ends_with(RECOGNITION_MODEL_FILENAME)
        );
    }

    #[test]
    fn missing_models_are_unavailable() {
        let result = OcrsEngine::new(OcrsModels::from_dir("/nonexistent/ocrs-models"));
        assert!(matches!(result, Err(OcrdeskError::EngineUnavailable(_))));
    }
}
