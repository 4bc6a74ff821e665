// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction session. Holds the state a UI shell renders (the selected file,
// the chosen language, live progress, the last result or error) plus the
// export actions that operate on that result.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use ocrdesk_bridge::NativeClipboard;
use ocrdesk_core::config::{AppConfig, IntakePolicy};
use ocrdesk_core::error::{OcrdeskError, Result};
use ocrdesk_core::intake::validate_file;
use ocrdesk_core::types::{
    CandidateFile, ExtractionError, ExtractionProgress, ExtractionRequest, ExtractionResult,
    Generation,
};
use ocrdesk_engine::RecognitionEngine;
use tracing::{info, warn};

use crate::export::{self, ExportedFile};
use crate::orchestrator::{EventKind, ExtractionEvent, ExtractionEvents, Extractor};
use crate::preview::PreviewHandle;

/// Shell-facing pipeline state for one user.
pub struct ExtractionSession<E: ?Sized> {
    policy: IntakePolicy,
    show_preview: bool,
    extractor: Extractor<E>,
    events: ExtractionEvents,
    language: String,
    selected: Option<CandidateFile>,
    preview: Option<PreviewHandle>,
    in_flight: Option<Generation>,
    progress: Option<ExtractionProgress>,
    result: Option<ExtractionResult>,
    error: Option<ExtractionError>,
}

impl<E> ExtractionSession<E>
where
    E: RecognitionEngine + ?Sized + 'static,
{
    /// New idle session using the intake policy, default language, and
    /// preview setting from `config`.
    pub fn new(engine: Arc<E>, config: &AppConfig) -> Self {
        let (extractor, events) = Extractor::new(engine);
        Self {
            policy: config.intake.clone(),
            show_preview: config.show_preview,
            extractor,
            events,
            language: config.default_language.clone(),
            selected: None,
            preview: None,
            in_flight: None,
            progress: None,
            result: None,
            error: None,
        }
    }

    // -- Selection -----------------------------------------------------------

    /// Offer a file. Rejected files leave the session untouched.
    ///
    /// An accepted file replaces the previous selection, cancels any running
    /// extraction, and clears the previous outcome.
    pub fn select(&mut self, file: CandidateFile) -> Result<()> {
        if let Err(reason) = validate_file(&self.policy, &file) {
            warn!(filename = %file.filename, %reason, "file rejected");
            return Err(reason.into());
        }
        if self.in_flight.is_some() {
            self.cancel();
        }
        self.clear_outcome();
        info!(filename = %file.filename, size_bytes = file.size_bytes, "file selected");
        self.selected = Some(file);
        Ok(())
    }

    pub fn selected(&self) -> Option<&CandidateFile> {
        self.selected.as_ref()
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    /// Language for the next extraction; does not affect one in flight.
    pub fn set_language(&mut self, code: impl Into<String>) {
        self.language = code.into();
    }

    // -- Extraction ----------------------------------------------------------

    /// Extract text from the selected file with the current language.
    ///
    /// Any previous result or error is cleared first, whatever the outcome of
    /// this run. Fails only if no file is selected.
    pub fn start(&mut self) -> Result<Generation> {
        let file = self.selected.clone().ok_or(OcrdeskError::NoFileSelected)?;

        self.clear_outcome();
        if self.show_preview {
            match PreviewHandle::create(&file) {
                Ok(preview) => self.preview = Some(preview),
                Err(err) => warn!(error = %err, "preview unavailable"),
            }
        }

        let generation = self
            .extractor
            .submit(ExtractionRequest::new(file, self.language.clone()));
        self.in_flight = Some(generation);
        Ok(generation)
    }

    /// Validate `file` and extract it in `language`, in one step.
    pub fn submit(&mut self, file: CandidateFile, language: impl Into<String>) -> Result<Generation> {
        self.select(file)?;
        self.set_language(language);
        self.start()
    }

    /// Wait for the next event of the current extraction and apply it.
    ///
    /// Returns `None` immediately when nothing is in flight.
    pub async fn next_event(&mut self) -> Option<ExtractionEvent> {
        self.in_flight?;
        let event = self.events.recv().await?;
        self.apply(&event);
        Some(event)
    }

    /// Drive the current extraction to its terminal event, reporting each
    /// progress update. Returns `None` if nothing was in flight.
    pub async fn finish(
        &mut self,
        mut on_progress: impl FnMut(&ExtractionProgress),
    ) -> Option<std::result::Result<ExtractionResult, ExtractionError>> {
        while let Some(event) = self.next_event().await {
            match event.kind {
                EventKind::Progress(progress) => on_progress(&progress),
                EventKind::Completed(result) => return Some(Ok(result)),
                EventKind::Failed(err) => return Some(Err(err)),
            }
        }
        None
    }

    /// Stop the running extraction; its remaining events are discarded.
    pub fn cancel(&mut self) {
        if let Some(generation) = self.in_flight.take() {
            info!(%generation, "extraction cancelled");
        }
        self.extractor.cancel();
        self.progress = None;
    }

    fn apply(&mut self, event: &ExtractionEvent) {
        match &event.kind {
            EventKind::Progress(progress) => self.progress = Some(*progress),
            EventKind::Completed(result) => {
                self.in_flight = None;
                self.progress = None;
                self.result = Some(result.clone());
            }
            EventKind::Failed(err) => {
                self.in_flight = None;
                self.progress = None;
                self.error = Some(err.clone());
            }
        }
    }

    pub fn is_processing(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn progress(&self) -> Option<&ExtractionProgress> {
        self.progress.as_ref()
    }

    pub fn result(&self) -> Option<&ExtractionResult> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&ExtractionError> {
        self.error.as_ref()
    }

    /// Path of the current preview copy, if one exists.
    pub fn preview_path(&self) -> Option<&Path> {
        self.preview.as_ref().map(PreviewHandle::path)
    }

    // -- Dismissal -----------------------------------------------------------

    /// Close the result: drops the result or error and releases the preview.
    /// The selected file stays selected.
    pub fn dismiss(&mut self) {
        self.clear_outcome();
    }

    /// Reset to a fresh session: cancels, deselects, and releases everything.
    pub fn clear(&mut self) {
        self.cancel();
        self.clear_outcome();
        self.selected = None;
        info!("workspace cleared");
    }

    fn clear_outcome(&mut self) {
        self.result = None;
        self.error = None;
        self.progress = None;
        self.preview = None;
    }

    // -- Export --------------------------------------------------------------

    /// Copy the result text to `clipboard`. [`OcrdeskError::NoResult`] without
    /// touching the clipboard if there is no result.
    pub fn copy_text(&self, clipboard: &dyn NativeClipboard) -> Result<()> {
        let result = self.result.as_ref().ok_or(OcrdeskError::NoResult)?;
        export::copy_text(result, clipboard)
    }

    /// The result text as a `.txt` file.
    pub fn export_text(&self) -> Result<ExportedFile> {
        let result = self.result.as_ref().ok_or(OcrdeskError::NoResult)?;
        Ok(export::export_text(result, Utc::now()))
    }

    /// The result as a timestamped `.json` file.
    pub fn export_json(&self) -> Result<ExportedFile> {
        let result = self.result.as_ref().ok_or(OcrdeskError::NoResult)?;
        export::export_json(result, Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use async_trait::async_trait;
    use ocrdesk_core::types::Stage;
    use ocrdesk_engine::{EngineLog, EngineLogger, Recognition};
    use tokio::sync::Notify;

    use super::*;

    /// Echoes the image bytes back as text. Images starting with `b"bad"`
    /// fail, `b"crash"` panics, and `b"wait"` blocks until `gate` is
    /// notified.
    struct EchoEngine {
        gate: Arc<Notify>,
    }

    #[async_trait]
    impl RecognitionEngine for EchoEngine {
        fn name(&self) -> &'static str {
            "echo"
        }

        async fn recognize(
            &self,
            image: Arc<[u8]>,
            _language: &str,
            logger: EngineLogger,
        ) -> Result<Recognition> {
            logger(EngineLog::new("recognizing text", 0.5));
            if image.starts_with(b"wait") {
                self.gate.notified().await;
            }
            if image.starts_with(b"crash") {
                panic!("engine crashed");
            }
            if image.starts_with(b"bad") {
                return Err(OcrdeskError::EngineFailure("decode error".into()));
            }
            Ok(Recognition {
                text: String::from_utf8_lossy(&image).into_owned(),
                confidence: 74.4,
            })
        }
    }

    struct MemoryClipboard(RefCell<String>);

    impl NativeClipboard for MemoryClipboard {
        fn write_text(&self, text: &str) -> Result<()> {
            *self.0.borrow_mut() = text.to_owned();
            Ok(())
        }
    }

    fn session() -> (ExtractionSession<EchoEngine>, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let engine = EchoEngine {
            gate: Arc::clone(&gate),
        };
        (ExtractionSession::new(Arc::new(engine), &AppConfig::default()), gate)
    }

    fn png(bytes: &[u8]) -> CandidateFile {
        CandidateFile::new("page.png", "image/png", bytes.to_vec())
    }

    #[tokio::test]
    async fn successful_extraction_populates_result() {
        let (mut session, _gate) = session();
        session.submit(png(b"hello"), "fra").unwrap();
        assert!(session.is_processing());

        let mut stages = Vec::new();
        let outcome = session.finish(|p| stages.push(p.stage)).await.unwrap();
        let result = outcome.unwrap();

        assert_eq!(stages, vec![Stage::Recognizing, Stage::Done]);
        assert_eq!(result.text, "hello");
        assert_eq!(result.confidence, 74);
        assert_eq!(result.language, "fra");
        assert_eq!(session.result(), Some(&result));
        assert!(!session.is_processing());
        assert!(session.progress().is_none());
        assert!(session.next_event().await.is_none());
    }

    #[tokio::test]
    async fn rejected_file_leaves_state_untouched() {
        let (mut session, _gate) = session();
        session.submit(png(b"first"), "eng").unwrap();
        session.finish(|_| {}).await;

        let pdf = CandidateFile::new("doc.pdf", "application/pdf", b"%PDF".to_vec());
        let err = session.select(pdf).unwrap_err();
        assert!(matches!(err, OcrdeskError::UnsupportedFormat(_)));

        let mut huge = png(b"x");
        huge.size_bytes = 10 * 1024 * 1024 + 1;
        assert!(matches!(
            session.select(huge),
            Err(OcrdeskError::FileTooLarge { .. })
        ));

        assert_eq!(session.selected().unwrap().filename, "page.png");
        assert_eq!(session.result().unwrap().text, "first");
    }

    #[tokio::test]
    async fn failure_clears_previous_result() {
        let (mut session, _gate) = session();
        session.submit(png(b"good"), "eng").unwrap();
        session.finish(|_| {}).await;
        assert!(session.result().is_some());

        session.submit(png(b"bad image"), "eng").unwrap();
        assert!(session.result().is_none());
        let outcome = session.finish(|_| {}).await.unwrap();

        assert!(outcome.is_err());
        assert!(session.result().is_none());
        assert_eq!(session.error(), Some(&ExtractionError::engine_failure()));
    }

    #[tokio::test]
    async fn engine_panic_surfaces_as_an_error() {
        let (mut session, _gate) = session();
        session.submit(png(b"crash"), "eng").unwrap();

        let outcome = session.finish(|_| {}).await.unwrap();
        assert_eq!(outcome, Err(ExtractionError::engine_failure()));
        assert!(!session.is_processing());
        assert_eq!(session.error(), Some(&ExtractionError::engine_failure()));
    }

    #[tokio::test]
    async fn resubmitting_supersedes_the_running_extraction() {
        let (mut session, gate) = session();
        session.submit(png(b"wait for me"), "eng").unwrap();
        tokio::task::yield_now().await;

        session.submit(png(b"second"), "eng").unwrap();
        gate.notify_waiters();

        let result = session.finish(|_| {}).await.unwrap().unwrap();
        assert_eq!(result.text, "second");
    }

    #[tokio::test]
    async fn preview_is_released_on_dismiss_and_supersede() {
        let (mut session, _gate) = session();
        session.submit(png(b"one"), "eng").unwrap();
        let first = session.preview_path().unwrap().to_path_buf();
        assert!(first.exists());
        session.finish(|_| {}).await;

        session.start().unwrap();
        let second = session.preview_path().unwrap().to_path_buf();
        assert!(!first.exists());
        assert!(second.exists());
        session.finish(|_| {}).await;

        session.dismiss();
        assert!(session.preview_path().is_none());
        assert!(session.result().is_none());
        assert!(!second.exists());
        assert!(session.selected().is_some());
    }

    #[tokio::test]
    async fn preview_disabled_by_config() {
        let config = AppConfig {
            show_preview: false,
            ..AppConfig::default()
        };
        let engine = EchoEngine {
            gate: Arc::new(Notify::new()),
        };
        let mut session = ExtractionSession::new(Arc::new(engine), &config);
        session.submit(png(b"x"), "eng").unwrap();
        assert!(session.preview_path().is_none());
    }

    #[tokio::test]
    async fn exports_need_a_result() {
        let (mut session, _gate) = session();
        let clipboard = MemoryClipboard(RefCell::new(String::from("untouched")));

        assert!(matches!(
            session.copy_text(&clipboard),
            Err(OcrdeskError::NoResult)
        ));
        assert!(matches!(session.export_text(), Err(OcrdeskError::NoResult)));
        assert!(matches!(session.export_json(), Err(OcrdeskError::NoResult)));
        assert_eq!(*clipboard.0.borrow(), "untouched");

        session.submit(png(b"copy me"), "eng").unwrap();
        session.finish(|_| {}).await;

        session.copy_text(&clipboard).unwrap();
        assert_eq!(*clipboard.0.borrow(), "copy me");
        assert_eq!(session.export_text().unwrap().bytes, b"copy me");
        assert!(session.export_json().unwrap().file_name.ends_with(".json"));
    }

    #[tokio::test]
    async fn clear_resets_everything() {
        let (mut session, _gate) = session();
        session.submit(png(b"wait"), "eng").unwrap();
        session.clear();

        assert!(session.selected().is_none());
        assert!(!session.is_processing());
        assert!(session.preview_path().is_none());
        assert!(matches!(session.start(), Err(OcrdeskError::NoFileSelected)));
        assert!(session.next_event().await.is_none());
    }
}
