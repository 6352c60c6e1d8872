//! KioskRunner - Tick-driven driver for one questionnaire session.
//!
//! The controller is synchronous. This module connects it to the slow,
//! blocking collaborators:
//!
//! - **Gesture**: a capture task reads frames, classifies them and pushes
//!   samples into a bounded queue. The control loop drains whatever is
//!   queued on every tick without waiting, then publishes the vocabulary
//!   the next frames should be classified with.
//! - **Speech**: listen, optionally clean up, feed the transcript, and
//!   listen again after a short delay when nothing was heard.
//!
//! ## Configuration
//!
//! | Setting | Default | Description |
//! |---------|---------|-------------|
//! | `tick_interval` | 33ms | Control loop period in gesture mode |
//! | `retry_delay` | 1000ms | Pause before re-listening after silence |
//! | `sample_queue_capacity` | 64 | Bounded queue between capture and control |
//!
//! ## Graceful Shutdown
//!
//! Both loops watch a shutdown channel. On shutdown the session is aborted
//! and the capture task is dropped without waiting for an in-flight
//! classification.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info, warn};

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::domain::gesture::{DetectionSample, Vocabulary};
use crate::domain::questionnaire::{
    AnswerMap, Modality, QuestionnaireController, QuestionnaireError, RejectReason, SessionPhase,
    StepOutcome,
};
use crate::domain::tax::ExemptionCategory;
use crate::ports::{Classifier, FrameSource, Presenter, TextCleanup, Transcriber};

/// Configuration for the KioskRunner.
#[derive(Debug, Clone)]
pub struct KioskRunnerConfig {
    pub tick_interval: Duration,
    pub retry_delay: Duration,
    pub sample_queue_capacity: usize,
}

impl Default for KioskRunnerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(33),
            retry_delay: Duration::from_millis(1000),
            sample_queue_capacity: 64,
        }
    }
}

impl KioskRunnerConfig {
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_sample_queue_capacity(mut self, capacity: usize) -> Self {
        self.sample_queue_capacity = capacity.max(1);
        self
    }
}

/// Errors that end a run early.
#[derive(Debug, Error)]
pub enum KioskRunError {
    #[error(transparent)]
    Questionnaire(#[from] QuestionnaireError),

    #[error("Frame capture failed: {0}")]
    Capture(#[source] DomainError),
}

/// What happened in one session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub modality: Option<Modality>,
    pub phase: SessionPhase,
    pub answers: AnswerMap,
    pub outcome: Option<ExemptionCategory>,
    pub rejected_attempts: u32,
    pub presentation_failures: u32,
}

impl SessionSummary {
    pub fn is_complete(&self) -> bool {
        self.phase == SessionPhase::Done
    }
}

/// Drives a `QuestionnaireController` against real collaborators.
pub struct KioskRunner {
    controller: QuestionnaireController,
    presenter: Arc<dyn Presenter>,
    config: KioskRunnerConfig,
    rejected_attempts: u32,
    presentation_failures: u32,
}

impl KioskRunner {
    pub fn new(
        controller: QuestionnaireController,
        presenter: Arc<dyn Presenter>,
        config: KioskRunnerConfig,
    ) -> Self {
        Self {
            controller,
            presenter,
            config,
            rejected_attempts: 0,
            presentation_failures: 0,
        }
    }

    pub fn controller(&self) -> &QuestionnaireController {
        &self.controller
    }

    pub fn into_controller(self) -> QuestionnaireController {
        self.controller
    }

    /// Runs a session answered by voice.
    ///
    /// # Errors
    ///
    /// Returns `KioskRunError::Questionnaire` if the controller hits a
    /// non-recoverable error such as an incomplete fact set.
    pub async fn run_speech(
        &mut self,
        transcriber: Arc<dyn Transcriber>,
        cleanup: Option<Arc<dyn TextCleanup>>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<SessionSummary, KioskRunError> {
        self.controller.select_modality(Modality::Speech)?;
        self.flush().await;

        while !self.controller.is_finished() {
            let heard = tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        self.stop("shutdown requested").await?;
                        break;
                    }
                    continue;
                }
                heard = transcriber.listen() => heard,
            };

            let heard = match heard {
                Ok(heard) => heard,
                Err(err) if err.code == ErrorCode::InputClosed => {
                    self.stop("transcript input closed").await?;
                    break;
                }
                Err(err) => {
                    warn!(error = %err, "transcription failed");
                    None
                }
            };

            let text = match (heard, cleanup.as_ref()) {
                (Some(raw), Some(cleanup)) => Some(self.clean(cleanup.as_ref(), raw).await),
                (heard, _) => heard,
            };

            let outcome = self.step(|controller| controller.on_transcript(text.as_deref()))?;
            self.flush().await;

            if outcome == Some(StepOutcome::Rejected(RejectReason::RecognitionMiss))
                && wait_or_shutdown(self.config.retry_delay, &mut shutdown).await
            {
                self.stop("shutdown requested").await?;
                break;
            }
        }

        Ok(self.summary())
    }

    /// Runs a session answered by hand signs.
    ///
    /// # Errors
    ///
    /// Returns `KioskRunError::Capture` if the frame source fails and
    /// `KioskRunError::Questionnaire` on a non-recoverable controller error.
    pub async fn run_gesture(
        &mut self,
        source: Box<dyn FrameSource>,
        classifier: Arc<dyn Classifier>,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<SessionSummary, KioskRunError> {
        self.controller.select_modality(Modality::Gesture)?;
        self.flush().await;

        let (vocabulary_tx, vocabulary_rx) = watch::channel(self.controller.expected_vocabulary());
        let (sample_tx, mut sample_rx) = mpsc::channel(self.config.sample_queue_capacity.max(1));
        let mut capture = spawn_capture(source, classifier, vocabulary_rx, sample_tx);

        let mut ticker = time::interval(self.config.tick_interval);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        let result = loop {
            tokio::select! {
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break self.stop("shutdown requested").await;
                    }
                }
                _ = ticker.tick() => {
                    let closed = match self.drain(&mut sample_rx) {
                        Ok(closed) => closed,
                        Err(err) => break Err(err),
                    };
                    vocabulary_tx.send_replace(self.controller.expected_vocabulary());
                    self.flush().await;

                    if self.controller.is_finished() {
                        break Ok(());
                    }
                    if closed {
                        break self.capture_ended(&mut capture).await;
                    }
                }
            }
        };

        capture.abort();
        result?;
        Ok(self.summary())
    }

    /// Feeds every queued sample; returns true once the capture side is gone.
    fn drain(
        &mut self,
        samples: &mut mpsc::Receiver<DetectionSample>,
    ) -> Result<bool, KioskRunError> {
        loop {
            if self.controller.is_finished() {
                return Ok(false);
            }
            match samples.try_recv() {
                Ok(sample) => {
                    self.step(|controller| controller.on_frame(&sample))?;
                }
                Err(TryRecvError::Empty) => return Ok(false),
                Err(TryRecvError::Disconnected) => return Ok(true),
            }
        }
    }

    /// Applies one controller step, absorbing recoverable protocol errors.
    fn step<F>(&mut self, apply: F) -> Result<Option<StepOutcome>, KioskRunError>
    where
        F: FnOnce(&mut QuestionnaireController) -> Result<StepOutcome, QuestionnaireError>,
    {
        match apply(&mut self.controller) {
            Ok(outcome) => {
                if let StepOutcome::Rejected(reason) = outcome {
                    self.rejected_attempts += 1;
                    debug!(code = %reason.code(), %reason, "answer rejected");
                }
                Ok(Some(outcome))
            }
            Err(err) if err.is_recoverable() => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn clean(&self, cleanup: &dyn TextCleanup, raw: String) -> String {
        let Some(question) = self.controller.current_question() else {
            return raw;
        };
        match cleanup.cleanup(&raw, question.kind).await {
            Ok(cleaned) => {
                debug!(raw = %raw, cleaned = %cleaned, "transcript cleaned");
                cleaned
            }
            Err(err) => {
                warn!(error = %err, "text cleanup failed, using raw transcript");
                raw
            }
        }
    }

    async fn capture_ended(
        &mut self,
        capture: &mut JoinHandle<Result<u64, DomainError>>,
    ) -> Result<(), KioskRunError> {
        let captured = capture.await;
        self.stop("frame source closed").await?;
        match captured {
            Ok(Ok(frames)) => {
                info!(frames, "capture finished before the session completed");
                Ok(())
            }
            Ok(Err(err)) => Err(KioskRunError::Capture(err)),
            Err(join) => Err(KioskRunError::Capture(DomainError::new(
                ErrorCode::InternalError,
                format!("Capture task failed: {}", join),
            ))),
        }
    }

    async fn stop(&mut self, why: &str) -> Result<(), KioskRunError> {
        if !self.controller.is_finished() {
            info!(session_id = %self.controller.session_id(), reason = why, "stopping session");
            self.controller.abort()?;
        }
        self.flush().await;
        Ok(())
    }

    async fn flush(&mut self) {
        for event in self.controller.take_events() {
            if let Err(err) = self.presenter.present(&event).await {
                self.presentation_failures += 1;
                warn!(event_type = event.event_type(), error = %err, "presentation failed");
            }
        }
    }

    fn summary(&self) -> SessionSummary {
        SessionSummary {
            session_id: self.controller.session_id(),
            modality: self.controller.modality(),
            phase: self.controller.phase(),
            answers: self.controller.answers().clone(),
            outcome: self.controller.outcome(),
            rejected_attempts: self.rejected_attempts,
            presentation_failures: self.presentation_failures,
        }
    }
}

/// Starts the capture side of a gesture session.
///
/// Frames are classified on the blocking pool with the most recently
/// published vocabulary. Frames taken while no vocabulary is published are
/// dropped. Returns the number of frames classified once the source closes
/// or the control side hangs up.
pub fn spawn_capture(
    mut source: Box<dyn FrameSource>,
    classifier: Arc<dyn Classifier>,
    vocabulary: watch::Receiver<Option<Vocabulary>>,
    samples: mpsc::Sender<DetectionSample>,
) -> JoinHandle<Result<u64, DomainError>> {
    tokio::spawn(async move {
        let mut classified = 0u64;

        while let Some(frame) = source.next_frame().await? {
            let current = *vocabulary.borrow();
            let Some(vocabulary) = current else {
                continue;
            };

            let captured_at = frame.captured_at;
            let model = Arc::clone(&classifier);
            let sample =
                match tokio::task::spawn_blocking(move || model.classify(&frame, vocabulary)).await
                {
                    Ok(Ok(sample)) => sample,
                    Ok(Err(err)) => {
                        warn!(error = %err, "classification failed");
                        DetectionSample::no_hand().at(captured_at)
                    }
                    Err(join) => {
                        warn!(error = %join, "classifier task failed");
                        DetectionSample::no_hand().at(captured_at)
                    }
                };

            classified += 1;
            if samples.send(sample).await.is_err() {
                debug!("sample queue closed");
                break;
            }
        }

        Ok(classified)
    })
}

/// Sleeps for `delay`; returns true if shutdown was requested meanwhile.
async fn wait_or_shutdown(delay: Duration, shutdown: &mut watch::Receiver<bool>) -> bool {
    let sleep = time::sleep(delay);
    tokio::pin!(sleep);
    loop {
        tokio::select! {
            _ = &mut sleep => return false,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    return true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryPresenter, KeywordTextCleanup, ReplayClassifier};
    use crate::domain::gesture::StabilizerSettings;
    use crate::domain::questionnaire::QuestionSet;
    use crate::ports::Frame;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    struct ScriptedTranscriber {
        lines: Mutex<VecDeque<Option<&'static str>>>,
    }

    impl ScriptedTranscriber {
        fn new(lines: Vec<Option<&'static str>>) -> Self {
            Self {
                lines: Mutex::new(lines.into()),
            }
        }
    }

    #[async_trait]
    impl Transcriber for ScriptedTranscriber {
        async fn listen(&self) -> Result<Option<String>, DomainError> {
            match self.lines.lock().unwrap().pop_front() {
                Some(line) => Ok(line.map(str::to_string)),
                None => Err(DomainError::new(ErrorCode::InputClosed, "done")),
            }
        }
    }

    struct CountedFrames {
        next: u64,
        limit: u64,
    }

    #[async_trait]
    impl FrameSource for CountedFrames {
        async fn next_frame(&mut self) -> Result<Option<Frame>, DomainError> {
            if self.next >= self.limit {
                return Ok(None);
            }
            tokio::task::yield_now().await;
            let frame = Frame::new(self.next, Duration::from_millis(self.next * 33));
            self.next += 1;
            Ok(Some(frame))
        }
    }

    fn runner(presenter: Arc<InMemoryPresenter>) -> KioskRunner {
        let controller =
            QuestionnaireController::new(QuestionSet::standard(), StabilizerSettings::default());
        let config = KioskRunnerConfig::default()
            .with_tick_interval(Duration::from_millis(1))
            .with_retry_delay(Duration::from_millis(1))
            .with_sample_queue_capacity(1);
        KioskRunner::new(controller, presenter, config)
    }

    mod speech {
        use super::*;

        #[tokio::test]
        async fn completes_a_session_with_cleanup() {
            let presenter = Arc::new(InMemoryPresenter::new());
            let mut runner = runner(presenter.clone());
            let transcriber = Arc::new(ScriptedTranscriber::new(vec![
                Some("no I'm not married"),
                None,
                Some("around fifty thousand"),
            ]));
            let (_tx, rx) = watch::channel(false);

            let summary = runner
                .run_speech(transcriber, Some(Arc::new(KeywordTextCleanup::new())), rx)
                .await
                .unwrap();

            assert!(summary.is_complete());
            assert_eq!(summary.outcome, Some(ExemptionCategory::BaseExemption));
            assert_eq!(summary.rejected_attempts, 1);
            assert!(presenter.has_event("kiosk.result_ready.v1"));
            assert!(presenter
                .spoken_lines()
                .contains(&"No speech detected. Please try again.".to_string()));
        }

        #[tokio::test]
        async fn closed_input_aborts_the_session() {
            let presenter = Arc::new(InMemoryPresenter::new());
            let mut runner = runner(presenter);
            let transcriber = Arc::new(ScriptedTranscriber::new(vec![Some("yes")]));
            let (_tx, rx) = watch::channel(false);

            let summary = runner.run_speech(transcriber, None, rx).await.unwrap();
            assert_eq!(summary.phase, SessionPhase::Aborted);
            assert_eq!(summary.outcome, None);
        }

        #[tokio::test]
        async fn presenter_failures_do_not_stop_the_session() {
            let presenter = Arc::new(InMemoryPresenter::new());
            presenter.set_failing(true);
            let mut runner = runner(presenter);
            let transcriber = Arc::new(ScriptedTranscriber::new(vec![Some("no"), Some("100")]));
            let (_tx, rx) = watch::channel(false);

            let summary = runner.run_speech(transcriber, None, rx).await.unwrap();
            assert!(summary.is_complete());
            assert!(summary.presentation_failures > 0);
        }
    }

    mod gesture {
        use super::*;

        const UNMARRIED: &str = r#"
- { label: "N", frames: 8 }
- { frames: 15 }
- { label: "1", frames: 8 }
- { frames: 15 }
- { label: "7", frames: 8 }
- { frames: 15 }
"#;

        #[tokio::test]
        async fn completes_a_session_from_replayed_frames() {
            let presenter = Arc::new(InMemoryPresenter::new());
            let mut runner = runner(presenter.clone());
            let classifier = Arc::new(ReplayClassifier::from_yaml_str(UNMARRIED).unwrap());
            let source = Box::new(CountedFrames { next: 0, limit: 200 });
            let (_tx, rx) = watch::channel(false);

            let summary = runner.run_gesture(source, classifier, rx).await.unwrap();

            assert!(summary.is_complete());
            assert_eq!(summary.outcome, Some(ExemptionCategory::BaseExemption));
            assert_eq!(summary.answers.to_string_map().get(&5).map(String::as_str), Some("7"));
        }

        #[tokio::test]
        async fn exhausted_source_aborts() {
            let presenter = Arc::new(InMemoryPresenter::new());
            let mut runner = runner(presenter);
            let classifier = Arc::new(ReplayClassifier::default());
            let source = Box::new(CountedFrames { next: 0, limit: 5 });
            let (_tx, rx) = watch::channel(false);

            let summary = runner.run_gesture(source, classifier, rx).await.unwrap();
            assert_eq!(summary.phase, SessionPhase::Aborted);
        }

        #[tokio::test]
        async fn shutdown_aborts() {
            let presenter = Arc::new(InMemoryPresenter::new());
            let mut runner = runner(presenter);
            let classifier = Arc::new(ReplayClassifier::default());
            let source = Box::new(CountedFrames { next: 0, limit: u64::MAX });
            let (tx, rx) = watch::channel(false);

            let handle = tokio::spawn(async move {
                let summary = runner.run_gesture(source, classifier, rx).await;
                summary.map(|s| s.phase)
            });
            time::sleep(Duration::from_millis(20)).await;
            tx.send(true).unwrap();

            assert_eq!(handle.await.unwrap().unwrap(), SessionPhase::Aborted);
        }
    }
}
