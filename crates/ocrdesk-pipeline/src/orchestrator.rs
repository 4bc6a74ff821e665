// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Extraction orchestrator: drives one recognition at a time and streams its
// progress and terminal outcome to the shell.
//
// Every submission gets a new `Generation`. The counter is bumped before the
// previous task is aborted and before the new one is spawned, and it is
// checked twice: when a task emits an event and again when the shell receives
// it. An event whose generation is no longer current is dropped at whichever
// check sees it first, so once `submit` returns the shell cannot observe
// anything from an older request, even if that request's task had already
// queued events.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use ocrdesk_core::size_label::size_label_bytes;
use ocrdesk_core::types::{
    ExtractionError, ExtractionProgress, ExtractionRequest, ExtractionResult, Generation, Stage,
};
use ocrdesk_engine::{EngineLog, EngineLogger, RecognitionEngine};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::progress::{normalize, round_confidence};

/// What happened in an extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Progress(ExtractionProgress),
    Completed(ExtractionResult),
    Failed(ExtractionError),
}

/// An event tagged with the generation of the request that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionEvent {
    pub generation: Generation,
    pub kind: EventKind,
}

impl ExtractionEvent {
    /// Whether this is the last event of its request.
    pub fn is_terminal(&self) -> bool {
        !matches!(self.kind, EventKind::Progress(_))
    }
}

/// The shared "current request" counter.
#[derive(Debug, Clone, Default)]
struct GenerationCounter(Arc<AtomicU64>);

impl GenerationCounter {
    fn current(&self) -> Generation {
        Generation(self.0.load(Ordering::SeqCst))
    }

    /// Invalidate everything issued so far and return the new current value.
    fn advance(&self) -> Generation {
        Generation(self.0.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn is_current(&self, generation: Generation) -> bool {
        self.current() == generation
    }
}

/// Producer half handed to a running extraction task.
#[derive(Clone)]
struct EventSink {
    generation: Generation,
    counter: GenerationCounter,
    tx: mpsc::UnboundedSender<ExtractionEvent>,
}

impl EventSink {
    fn emit(&self, kind: EventKind) {
        if !self.counter.is_current(self.generation) {
            debug!(generation = %self.generation, "superseded extraction event dropped at source");
            return;
        }
        // A closed receiver means the shell is gone; nothing left to notify.
        let _ = self.tx.send(ExtractionEvent {
            generation: self.generation,
            kind,
        });
    }
}

/// Consumer half: yields only events belonging to the current generation.
pub struct ExtractionEvents {
    rx: mpsc::UnboundedReceiver<ExtractionEvent>,
    counter: GenerationCounter,
}

impl ExtractionEvents {
    /// Wait for the next current event.
    ///
    /// Stale events are discarded here. This waits indefinitely while nothing
    /// is in flight; it returns `None` only once the [`Extractor`] is dropped.
    pub async fn recv(&mut self) -> Option<ExtractionEvent> {
        while let Some(event) = self.rx.recv().await {
            if self.counter.is_current(event.generation) {
                return Some(event);
            }
            debug!(generation = %event.generation, "stale extraction event discarded");
        }
        None
    }

    /// Return the next current event if one is already queued.
    pub fn try_recv(&mut self) -> Option<ExtractionEvent> {
        while let Ok(event) = self.rx.try_recv() {
            if self.counter.is_current(event.generation) {
                return Some(event);
            }
            debug!(generation = %event.generation, "stale extraction event discarded");
        }
        None
    }
}

/// Runs extractions against one engine, at most one current at a time.
pub struct Extractor<E: ?Sized> {
    engine: Arc<E>,
    counter: GenerationCounter,
    tx: mpsc::UnboundedSender<ExtractionEvent>,
    in_flight: Option<AbortHandle>,
}

impl<E> Extractor<E>
where
    E: RecognitionEngine + ?Sized + 'static,
{
    /// Create an orchestrator and the event stream the shell listens on.
    pub fn new(engine: Arc<E>) -> (Self, ExtractionEvents) {
        let (tx, rx) = mpsc::unbounded_channel();
        let counter = GenerationCounter::default();
        let events = ExtractionEvents {
            rx,
            counter: counter.clone(),
        };
        let extractor = Self {
            engine,
            counter,
            tx,
            in_flight: None,
        };
        (extractor, events)
    }

    /// Start extracting `request`, superseding any extraction in flight.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn submit(&mut self, request: ExtractionRequest) -> Generation {
        let generation = self.counter.advance();
        self.abort_in_flight();

        info!(
            %generation,
            filename = %request.file.filename,
            language = %request.language,
            "extraction submitted"
        );

        let sink = EventSink {
            generation,
            counter: self.counter.clone(),
            tx: self.tx.clone(),
        };
        let engine = Arc::clone(&self.engine);
        let progress_sink = sink.clone();
        let work = tokio::spawn(async move {
            extract(engine.as_ref(), request, move |progress| {
                progress_sink.emit(EventKind::Progress(progress));
            })
            .await
        });
        self.in_flight = Some(work.abort_handle());

        // The terminal event is sent from outside the work task, so an engine
        // panic still ends the request with a failure.
        tokio::spawn(async move {
            match work.await {
                Ok(Ok(result)) => sink.emit(EventKind::Completed(result)),
                Ok(Err(err)) => sink.emit(EventKind::Failed(err)),
                Err(err) if err.is_panic() => {
                    error!(generation = %sink.generation, "recognition engine panicked");
                    sink.emit(EventKind::Failed(ExtractionError::engine_failure()));
                }
                Err(_) => debug!(generation = %sink.generation, "extraction task aborted"),
            }
        });
        generation
    }

    /// Invalidate the current extraction without starting another.
    pub fn cancel(&mut self) -> Generation {
        let generation = self.counter.advance();
        self.abort_in_flight();
        generation
    }

    /// Generation of the most recent submission or cancellation.
    pub fn current_generation(&self) -> Generation {
        self.counter.current()
    }
}

impl<E: ?Sized> Extractor<E> {
    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!("aborting superseded extraction task");
            }
            handle.abort();
        }
    }
}

impl<E: ?Sized> Drop for Extractor<E> {
    fn drop(&mut self) {
        self.abort_in_flight();
    }
}

/// Run one extraction to completion.
///
/// Engine log lines are normalised and passed to `on_progress`; on success a
/// final `Done` at 100 % is reported before the result is returned. Any engine
/// error becomes the generic [`ExtractionError`]; the detail is only logged.
#[instrument(skip_all, fields(
    engine = engine.name(),
    filename = %request.file.filename,
    size_bytes = request.file.size_bytes,
    language = %request.language,
))]
pub async fn extract<E, F>(
    engine: &E,
    request: ExtractionRequest,
    on_progress: F,
) -> Result<ExtractionResult, ExtractionError>
where
    E: RecognitionEngine + ?Sized,
    F: Fn(ExtractionProgress) + Send + Sync + 'static,
{
    let started = Instant::now();
    let on_progress = Arc::new(on_progress);
    let logger: EngineLogger = {
        let on_progress = Arc::clone(&on_progress);
        Arc::new(move |log: EngineLog| on_progress(normalize(&log)))
    };

    let ExtractionRequest { file, language } = request;
    match engine
        .recognize(Arc::clone(&file.data), &language, logger)
        .await
    {
        Ok(recognition) => {
            on_progress(ExtractionProgress::new(Stage::Done, 100));
            let result = ExtractionResult {
                confidence: round_confidence(recognition.confidence),
                text: recognition.text,
                processing_time_seconds: started.elapsed().as_secs_f64(),
                file_size_label: size_label_bytes(file.size_bytes),
                filename: file.filename,
                language,
            };
            info!(
                confidence = result.confidence,
                chars = result.char_count(),
                seconds = result.processing_time_seconds,
                "extraction complete"
            );
            Ok(result)
        }
        Err(err) => {
            warn!(error = %err, "extraction failed");
            Err(ExtractionError::engine_failure())
        }
    }
}
