// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer: loads settings, builds the OCR engine, and turns
// paths on disk into candidate files for the pipeline.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ocrdesk_core::{AppConfig, IntakePolicy};
use ocrdesk_core::error::{OcrdeskError, Result};
use ocrdesk_core::intake::validate;
use ocrdesk_core::types::{CandidateFile, ImageKind};
use ocrdesk_engine::{RecognitionEngine, build_engine, sniff_media_type};
use tracing::{debug, info, warn};

use super::config_dir;

const CONFIG_FILE: &str = "config.json";

/// Media type given to files that are neither named nor shaped like an image.
const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Bytes read from an extensionless file to guess its format.
const SNIFF_BYTES: u64 = 64;

/// Settings plus the operations every command needs.
pub struct AppServices {
    config_dir: PathBuf,
    config: AppConfig,
}

impl AppServices {
    /// Load settings from the user's config directory.
    ///
    /// A missing file means defaults; an unreadable one is logged and also
    /// falls back to defaults.
    pub fn init() -> Self {
        Self::with_dir(config_dir::config_dir())
    }

    /// Load settings from `dir` instead of the user's config directory.
    pub fn with_dir(dir: PathBuf) -> Self {
        let config = match load_config(&dir) {
            Ok(config) => config,
            Err(err) => {
                warn!(error = %err, "settings unreadable; using defaults");
                AppConfig::default()
            }
        };
        debug!(path = %dir.display(), "settings loaded");
        Self {
            config_dir: dir,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    /// Replace the settings and write them to disk.
    pub fn save_config(&mut self, config: AppConfig) -> Result<PathBuf> {
        self.config = config;
        persist_config(&self.config_dir, &self.config)
    }

    /// The OCR engine selected in settings.
    pub fn engine(&self) -> Result<Arc<dyn RecognitionEngine>> {
        let engine = build_engine(&self.config.engine)?;
        info!(engine = engine.name(), "OCR engine ready");
        Ok(engine)
    }

    /// Where exports go: `requested`, else the configured directory, else
    /// the current directory.
    pub fn export_dir(&self, requested: Option<PathBuf>) -> PathBuf {
        requested
            .or_else(|| self.config.export_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Read `path` as a candidate file.
    ///
    /// The media type comes from the extension, or from the file's leading
    /// bytes when the extension says nothing. Format and size are checked
    /// before the whole file is read.
    pub fn load_candidate(&self, path: &Path) -> Result<CandidateFile> {
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let size_bytes = std::fs::metadata(path)?.len();
        let media_type = detect_media_type(path)?;
        validate(&self.config.intake, &media_type, size_bytes)?;

        let data = read_within_limit(path, &self.config.intake, &media_type)?;
        Ok(CandidateFile::new(filename, media_type, data))
    }
}

/// Read at most one byte past the policy ceiling and validate what was
/// actually read. The file may have grown since its metadata was checked.
fn read_within_limit(path: &Path, policy: &IntakePolicy, media_type: &str) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    File::open(path)?
        .take(policy.max_file_bytes.saturating_add(1))
        .read_to_end(&mut data)?;
    validate(policy, media_type, data.len() as u64)?;
    Ok(data)
}

fn detect_media_type(path: &Path) -> Result<String> {
    let by_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(ImageKind::from_extension);
    if let Some(kind) = by_extension {
        return Ok(kind.mime_type().to_owned());
    }

    let mut header = Vec::new();
    File::open(path)?.take(SNIFF_BYTES).read_to_end(&mut header)?;
    let media_type = sniff_media_type(&header).unwrap_or(UNKNOWN_MEDIA_TYPE);
    debug!(path = %path.display(), media_type, "media type sniffed");
    Ok(media_type.to_owned())
}

fn load_config(dir: &Path) -> Result<AppConfig> {
    let path = dir.join(CONFIG_FILE);
    let data = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AppConfig::default());
        }
        Err(err) => return Err(err.into()),
    };
    serde_json::from_str(&data)
        .map_err(|err| OcrdeskError::Config(format!("{}: {err}", path.display())))
}

fn persist_config(dir: &Path, config: &AppConfig) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    info!(path = %path.display(), "settings saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    #[test]
    fn missing_config_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_dir(dir.path().to_path_buf());
        assert_eq!(svc.config(), &AppConfig::default());
    }

    #[test]
    fn corrupt_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{ not json").unwrap();
        let svc = AppServices::with_dir(dir.path().to_path_buf());
        assert_eq!(svc.config(), &AppConfig::default());
    }

    #[test]
    fn saved_config_is_reloaded() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("ocrdesk");
        let mut svc = AppServices::with_dir(nested.clone());

        let config = AppConfig {
            default_language: "spa".into(),
            ..AppConfig::default()
        };
        let path = svc.save_config(config).unwrap();
        assert_eq!(path, nested.join(CONFIG_FILE));

        let reloaded = AppServices::with_dir(nested);
        assert_eq!(reloaded.config().default_language, "spa");
    }

    #[test]
    fn candidate_type_from_extension_then_content() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_dir(dir.path().to_path_buf());

        let named = dir.path().join("scan.JPG");
        std::fs::write(&named, b"whatever").unwrap();
        let candidate = svc.load_candidate(&named).unwrap();
        assert_eq!(candidate.media_type, "image/jpeg");
        assert_eq!(candidate.filename, "scan.JPG");
        assert_eq!(candidate.size_bytes, 8);

        let bare = dir.path().join("scan");
        std::fs::write(&bare, PNG_HEADER).unwrap();
        assert_eq!(svc.load_candidate(&bare).unwrap().media_type, "image/png");
    }

    #[test]
    fn unknown_content_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let svc = AppServices::with_dir(dir.path().to_path_buf());

        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, b"plain text").unwrap();
        assert!(matches!(
            svc.load_candidate(&notes),
            Err(OcrdeskError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn oversized_file_is_rejected_before_reading() {
        let dir = tempfile::tempdir().unwrap();
        let mut svc = AppServices::with_dir(dir.path().to_path_buf());
        let mut config = AppConfig::default();
        config.intake.max_file_bytes = 4;
        svc.config = config;

        let path = dir.path().join("big.png");
        std::fs::write(&path, PNG_HEADER).unwrap();
        assert!(matches!(
            svc.load_candidate(&path),
            Err(OcrdeskError::FileTooLarge { limit: 4, .. })
        ));
    }

    #[test]
    fn bytes_read_are_revalidated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("growing.png");
        std::fs::write(&path, vec![0u8; 64]).unwrap();
        let policy = IntakePolicy {
            max_file_bytes: 16,
            ..IntakePolicy::default()
        };

        assert!(matches!(
            read_within_limit(&path, &policy, "image/png"),
            Err(OcrdeskError::FileTooLarge { size: 17, limit: 16 })
        ));

        std::fs::write(&path, vec![7u8; 16]).unwrap();
        assert_eq!(
            read_within_limit(&path, &policy, "image/png").unwrap(),
            vec![7u8; 16]
        );
    }

    #[test]
    fn export_dir_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let mut svc = AppServices::with_dir(dir.path().to_path_buf());
        assert_eq!(svc.export_dir(None), PathBuf::from("."));

        svc.config.export_dir = Some("/exports".into());
        assert_eq!(svc.export_dir(None), PathBuf::from("/exports"));
        assert_eq!(svc.export_dir(Some("/tmp".into())), PathBuf::from("/tmp"));
    }
}
