// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command handlers. Extracted text goes to stdout; progress, summaries, and
// notices go to stderr so the text can be piped.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use ocrdesk_bridge::platform_bridge;
use ocrdesk_core::AppConfig;
use ocrdesk_core::config::EngineBackend;
use ocrdesk_core::error::Result;
use ocrdesk_core::human_errors::{Notice, Severity, humanize_error, humanize_extraction_error};
use ocrdesk_core::size_label::size_label_bytes;
use ocrdesk_core::types::{ExtractionProgress, language_name};
use ocrdesk_engine::TesseractEngine;
use ocrdesk_pipeline::{ExportedFile, ExtractionSession};
use tracing::{debug, warn};

use crate::services::app_services::AppServices;

/// Conventional exit status after an interrupt.
const EXIT_INTERRUPTED: u8 = 130;

/// Arguments of `ocrdesk extract`.
#[derive(Debug)]
pub struct ExtractOptions {
    pub file: PathBuf,
    pub lang: Option<String>,
    pub copy: bool,
    pub txt: bool,
    pub json: bool,
    pub out_dir: Option<PathBuf>,
}

/// Print a notice to stderr.
pub fn report(notice: &Notice) {
    let marker = match notice.severity {
        Severity::Info => "✓",
        Severity::ActionRequired => "!",
        Severity::Failure => "✗",
    };
    eprintln!("{marker} {}: {}", notice.title, notice.description);
}

pub async fn extract(svc: &AppServices, opts: ExtractOptions) -> Result<ExitCode> {
    let config = svc.config();
    let language = opts
        .lang
        .unwrap_or_else(|| config.default_language.clone());
    if !config.languages.iter().any(|lang| lang.code == language) {
        warn!(%language, "language is not in the configured list; passing it through");
    }

    let candidate = svc.load_candidate(&opts.file)?;
    eprintln!(
        "{} [{}] {} · {}",
        candidate.filename,
        candidate.kind().map(|kind| kind.label()).unwrap_or("?"),
        size_label_bytes(candidate.size_bytes),
        language_name(&config.languages, &language),
    );

    let mut session = ExtractionSession::new(svc.engine()?, config);
    session.submit(candidate, language)?;
    if let Some(path) = session.preview_path() {
        debug!(path = %path.display(), "preview available");
    }

    let finished = tokio::select! {
        outcome = session.finish(render_progress) => outcome,
        _ = tokio::signal::ctrl_c() => None,
    };
    eprintln!();

    let Some(outcome) = finished else {
        session.cancel();
        report(&Notice::new(
            "Extraction cancelled",
            "Nothing was saved.",
            Severity::Info,
        ));
        return Ok(ExitCode::from(EXIT_INTERRUPTED));
    };
    let result = match outcome {
        Ok(result) => result,
        Err(err) => {
            report(&humanize_extraction_error(&err));
            return Ok(ExitCode::FAILURE);
        }
    };

    print!("{}", result.text);
    std::io::stdout().flush()?;
    eprintln!(
        "confidence {}% · {} · {} chars, {} lines",
        result.confidence,
        result.processing_time_label(),
        result.char_count(),
        result.line_count(),
    );

    let mut status = ExitCode::SUCCESS;
    if opts.copy {
        let bridge = platform_bridge();
        debug!(platform = bridge.platform_name(), "copying to clipboard");
        match session.copy_text(bridge.clipboard()) {
            Ok(()) => report(&Notice::new(
                "Text copied",
                "The extracted text is on the clipboard.",
                Severity::Info,
            )),
            Err(err) => {
                report(&humanize_error(&err));
                status = ExitCode::FAILURE;
            }
        }
    }

    let dir = svc.export_dir(opts.out_dir);
    if opts.txt && save(session.export_text(), &dir).is_err() {
        status = ExitCode::FAILURE;
    }
    if opts.json && save(session.export_json(), &dir).is_err() {
        status = ExitCode::FAILURE;
    }
    Ok(status)
}

fn render_progress(progress: &ExtractionProgress) {
    eprint!("\r{:<12} {:>3}%", progress.stage.as_str(), progress.percent);
}

/// Write an export into `dir`, reporting the outcome either way.
fn save(export: Result<ExportedFile>, dir: &Path) -> Result<PathBuf> {
    let outcome = export.and_then(|file| file.write_into(dir));
    match &outcome {
        Ok(path) => report(&Notice::new(
            "Saved",
            path.display().to_string(),
            Severity::Info,
        )),
        Err(err) => report(&humanize_error(err)),
    }
    outcome
}

pub async fn languages(svc: &AppServices) -> Result<ExitCode> {
    let config = svc.config();

    let installed = match config.engine.backend {
        EngineBackend::Tesseract => {
            let engine = TesseractEngine::new(config.engine.tesseract_command.clone());
            if let Ok(version) = engine.version().await {
                eprintln!("{version}");
            }
            match engine.installed_languages().await {
                Ok(codes) => Some(codes),
                Err(err) => {
                    warn!(error = %err, "could not list installed Tesseract languages");
                    None
                }
            }
        }
        EngineBackend::Ocrs => None,
    };

    for lang in &config.languages {
        let default = if lang.code == config.default_language {
            " (default)"
        } else {
            ""
        };
        let missing = match &installed {
            Some(codes) if !codes.contains(&lang.code) => " [not installed]",
            _ => "",
        };
        println!("{:<8} {}{default}{missing}", lang.code, lang.name);
    }
    Ok(ExitCode::SUCCESS)
}

pub fn config(svc: &mut AppServices, reset: bool) -> Result<ExitCode> {
    if reset {
        let path = svc.save_config(AppConfig::default())?;
        report(&Notice::new(
            "Settings reset",
            path.display().to_string(),
            Severity::Info,
        ));
    } else {
        eprintln!("{}", svc.config_path().display());
    }
    println!("{}", serde_json::to_string_pretty(svc.config())?);
    Ok(ExitCode::SUCCESS)
}
