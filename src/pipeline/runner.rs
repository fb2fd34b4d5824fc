//! Pipeline orchestrator — drives the full capture → recognize → solve →
//! swipe loop.
//!
//! [`PipelineOrchestrator`] owns the [`SharedState`] and responds to
//! [`TriggerEvent`]s received over a `tokio::sync::mpsc` channel.
//!
//! # Pipeline flow
//!
//! ```text
//! TriggerEvent::Solve                        (dropped unless Idle)
//!   └─▶ capture(region)                      [Capturing]
//!         ├─ Unavailable → one retry after frame_retry_ms
//!         └─▶ recognize(frame)               [Recognizing]
//!               └─▶ BoardSnapshot + letters
//!                     └─▶ find_words         [Solving]
//!                           └─▶ per word, longest first:   [Acting]
//!                                 build_path → spawn_blocking(perform)
//!                                 → sleep(swipe_gap_ms)
//! ```
//!
//! Blocking work (the screen grab, the swipe playback) is pushed onto
//! `tokio::task::spawn_blocking` so the async runtime never stalls.  Every
//! exit path — success or failure — returns the state machine to `Idle`, so
//! one bad cycle never wedges the pipeline.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;

use crate::board::{build_path, BoardSnapshot};
use crate::capture::{CaptureError, CaptureRegion, Frame, FrameSource};
use crate::dict::{Dictionary, DictionaryError};
use crate::gesture::{swipe_duration, GestureActuator};
use crate::hotkey::TriggerEvent;
use crate::recognize::TextRecognizer;

use super::state::{PipelineState, SharedState};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Failures that end a solve cycle early.
///
/// None of these are fatal: each is reported and the pipeline returns to
/// `Idle` so the next trigger can retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    /// The frame source had nothing to give, twice in a row.
    #[error("no screen frame available — is the capture region on screen?")]
    FrameUnavailable,

    /// The text recognizer failed on the captured frame.
    #[error("recognition failed: {0}")]
    RecognitionFailed(String),

    /// Recognition succeeded but found zero letter tiles in the region.
    #[error("no letter tiles recognised — center the capture region on the letters")]
    EmptyBoard,

    /// The word list has not finished loading yet.
    #[error("dictionary is still loading — try again shortly")]
    DictionaryNotReady,

    /// No gesture actuator is available, so solving would be wasted work.
    #[error("gesture actuator not available — check input permissions")]
    ActuatorNotReady,
}

// ---------------------------------------------------------------------------
// PipelineReport
// ---------------------------------------------------------------------------

/// Outcome of one solve cycle, stored in `AppState::last_report`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineReport {
    /// The cycle ran to completion.  `swiped` can be less than `found` when
    /// some candidates turned out unreachable on the physical board.
    Solved { found: usize, swiped: usize },

    /// The board was valid but no dictionary word of sufficient length fits
    /// it.  A normal outcome, not a failure.
    NoWords,

    /// The cycle ended early.
    Failed(PipelineError),
}

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Drives the complete capture → solve → swipe pipeline.
///
/// Create with [`PipelineOrchestrator::new`], then call [`run`](Self::run)
/// inside a tokio task.
///
/// The actuator is an *optional* capability: when it is absent (no input
/// permissions, unsupported session type) triggers still capture and
/// recognise nothing — the cycle fails fast with
/// [`PipelineError::ActuatorNotReady`] before any solving work.
pub struct PipelineOrchestrator {
    state: SharedState,
    frames: Arc<dyn FrameSource>,
    recognizer: Arc<dyn TextRecognizer>,
    dictionary: Arc<Dictionary>,
    actuator: Option<Arc<dyn GestureActuator>>,
}

impl PipelineOrchestrator {
    /// Create a new orchestrator.
    ///
    /// # Arguments
    ///
    /// * `state`      — shared application state (also read by observers).
    /// * `frames`     — frame source (e.g. `ScreenFrameSource`).
    /// * `recognizer` — text recognizer (e.g. `TesseractRecognizer`).
    /// * `dictionary` — word index handle; may still be loading.
    /// * `actuator`   — gesture actuator, or `None` when unavailable.
    pub fn new(
        state: SharedState,
        frames: Arc<dyn FrameSource>,
        recognizer: Arc<dyn TextRecognizer>,
        dictionary: Arc<Dictionary>,
        actuator: Option<Arc<dyn GestureActuator>>,
    ) -> Self {
        Self {
            state,
            frames,
            recognizer,
            dictionary,
            actuator,
        }
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run the orchestrator until `trigger_rx` is closed.
    ///
    /// This is an `async fn` and should be spawned as a tokio task (or be
    /// the future `main` blocks on).  It never returns while the channel is
    /// open.
    pub async fn run(self, mut trigger_rx: mpsc::Receiver<TriggerEvent>) {
        while let Some(event) = trigger_rx.recv().await {
            match event {
                TriggerEvent::Solve => self.handle_trigger().await,
            }
        }

        log::info!("pipeline: trigger channel closed, orchestrator shutting down");
    }

    // -----------------------------------------------------------------------
    // One solve cycle
    // -----------------------------------------------------------------------

    async fn handle_trigger(&self) {
        // ── Busy rejection ───────────────────────────────────────────────
        // Overlapping triggers are dropped, never queued; in-flight state is
        // untouched.
        let (region, solver) = {
            let mut st = self.state.lock().unwrap();
            if st.pipeline.is_busy() {
                log::debug!(
                    "pipeline: trigger dropped while {}",
                    st.pipeline.label()
                );
                return;
            }
            st.pipeline = PipelineState::Capturing;
            st.last_letters = None;
            st.last_report = None;
            (CaptureRegion::from(st.config.capture), st.config.solver)
        };

        // ── Capturing ────────────────────────────────────────────────────
        let frame = match self.acquire_frame(region, solver.frame_retry_ms).await {
            Ok(frame) => frame,
            Err(e) => {
                log::debug!("pipeline: capture failed: {e}");
                self.finish(PipelineReport::Failed(PipelineError::FrameUnavailable));
                return;
            }
        };

        // ── Recognizing ──────────────────────────────────────────────────
        self.set_pipeline(PipelineState::Recognizing);

        let detections = match self.recognizer.recognize(&frame).await {
            Ok(detections) => detections,
            Err(e) => {
                self.finish(PipelineReport::Failed(PipelineError::RecognitionFailed(
                    e.to_string(),
                )));
                return;
            }
        };

        let board = BoardSnapshot::from_detections(&detections, frame.origin);
        if board.is_empty() {
            self.finish(PipelineReport::Failed(PipelineError::EmptyBoard));
            return;
        }

        let letters = board.letters();
        log::info!("pipeline: recognised letters {letters:?}");
        {
            let mut st = self.state.lock().unwrap();
            st.last_letters = Some(letters.clone());
        }

        // ── Solving ──────────────────────────────────────────────────────
        self.set_pipeline(PipelineState::Solving);

        // A missing actuator fails the cycle before any solve work.
        let Some(actuator) = self.actuator.clone() else {
            self.finish(PipelineReport::Failed(PipelineError::ActuatorNotReady));
            return;
        };

        let mut words = match self.dictionary.find_words(&letters) {
            Ok(words) => words,
            Err(DictionaryError::NotReady) => {
                self.finish(PipelineReport::Failed(PipelineError::DictionaryNotReady));
                return;
            }
        };

        words.retain(|w| w.len() >= solver.min_word_len);
        if words.is_empty() {
            self.finish(PipelineReport::NoWords);
            return;
        }

        // Longest first; the stable sort keeps discovery order within a
        // length.
        words.sort_by(|a, b| b.len().cmp(&a.len()));
        log::info!("pipeline: {} candidate words, longest {:?}", words.len(), words[0]);

        // ── Acting ───────────────────────────────────────────────────────
        self.set_pipeline(PipelineState::Acting);

        let found = words.len();
        let mut swiped = 0;
        let mut claims = board.new_claims();

        for word in &words {
            // build_path resets the claims, so each word sees a fresh board.
            let path = match build_path(word, &board, &mut claims) {
                Ok(path) => path,
                Err(e) => {
                    // The finder counted letters in the raw string; the board
                    // disagreed.  Skip this word, keep the batch going.
                    log::debug!("pipeline: {e}");
                    continue;
                }
            };

            let duration = swipe_duration(path.len());
            let act = Arc::clone(&actuator);
            match tokio::task::spawn_blocking(move || act.perform(&path, duration)).await {
                Ok(Ok(())) => swiped += 1,
                Ok(Err(e)) => log::warn!("pipeline: swipe for {word:?} failed: {e}"),
                Err(e) => log::warn!("pipeline: swipe task panicked: {e}"),
            }

            // Give the game time to register and clear the swipe before the
            // next one starts.
            tokio::time::sleep(Duration::from_millis(solver.swipe_gap_ms)).await;
        }

        self.finish(PipelineReport::Solved { found, swiped });
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Grab a frame of `region`, retrying once after `retry_ms` when the
    /// source reports `Unavailable`.  An off-screen region is not retried —
    /// it cannot fix itself.
    async fn acquire_frame(
        &self,
        region: CaptureRegion,
        retry_ms: u64,
    ) -> Result<Frame, CaptureError> {
        match self.capture_once(region).await {
            Err(CaptureError::Unavailable) => {
                log::debug!("pipeline: no frame available, retrying in {retry_ms} ms");
                tokio::time::sleep(Duration::from_millis(retry_ms)).await;
                self.capture_once(region).await
            }
            other => other,
        }
    }

    async fn capture_once(&self, region: CaptureRegion) -> Result<Frame, CaptureError> {
        let frames = Arc::clone(&self.frames);
        match tokio::task::spawn_blocking(move || frames.capture(region)).await {
            Ok(result) => result,
            Err(e) => {
                log::warn!("pipeline: capture task panicked: {e}");
                Err(CaptureError::Unavailable)
            }
        }
    }

    fn set_pipeline(&self, state: PipelineState) {
        let mut st = self.state.lock().unwrap();
        st.pipeline = state;
    }

    /// Record the cycle outcome and return to `Idle`.
    fn finish(&self, report: PipelineReport) {
        match &report {
            PipelineReport::Solved { found, swiped } => {
                log::info!("pipeline: swiped {swiped} of {found} candidate words");
            }
            PipelineReport::NoWords => {
                log::info!("pipeline: no words found for this board");
            }
            PipelineReport::Failed(e) => {
                log::warn!("pipeline: cycle failed: {e}");
            }
        }

        let mut st = self.state.lock().unwrap();
        st.pipeline = PipelineState::Idle;
        st.last_report = Some(report);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Point;
    use crate::capture::MockFrameSource;
    use crate::config::AppConfig;
    use crate::dict::Trie;
    use crate::gesture::RecordingActuator;
    use crate::pipeline::state::new_shared_state;
    use crate::recognize::{MockRecognizer, RectF, TextDetection};

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Config with pacing shrunk so tests run fast.
    fn fast_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.solver.swipe_gap_ms = 1;
        config.solver.frame_retry_ms = 1;
        config
    }

    fn detection(text: &str, x: f32) -> TextDetection {
        TextDetection {
            text: text.into(),
            bounds: RectF {
                left: x,
                top: 100.0,
                width: 40.0,
                height: 40.0,
            },
        }
    }

    /// One detection per letter, spaced 100 px apart.
    fn detections_for(letters: &str) -> Vec<TextDetection> {
        letters
            .chars()
            .enumerate()
            .map(|(i, c)| detection(&c.to_string(), i as f32 * 100.0))
            .collect()
    }

    fn ready_dictionary(words: &[&str]) -> Arc<Dictionary> {
        let mut trie = Trie::new();
        for w in words {
            trie.insert(w);
        }
        let dict = Arc::new(Dictionary::new());
        assert!(dict.publish(trie));
        dict
    }

    struct Fixture {
        state: SharedState,
        frames: Arc<MockFrameSource>,
        recognizer: Arc<MockRecognizer>,
        actuator: Arc<RecordingActuator>,
    }

    fn make_orchestrator(
        frames: MockFrameSource,
        recognizer: MockRecognizer,
        dictionary: Arc<Dictionary>,
        with_actuator: bool,
    ) -> (PipelineOrchestrator, Fixture) {
        let state = new_shared_state(fast_config());
        let frames = Arc::new(frames);
        let recognizer = Arc::new(recognizer);
        let actuator = Arc::new(RecordingActuator::new());

        let orc = PipelineOrchestrator::new(
            Arc::clone(&state),
            Arc::clone(&frames) as Arc<dyn FrameSource>,
            Arc::clone(&recognizer) as Arc<dyn TextRecognizer>,
            dictionary,
            with_actuator.then(|| Arc::clone(&actuator) as Arc<dyn GestureActuator>),
        );

        let fixture = Fixture {
            state,
            frames,
            recognizer,
            actuator,
        };
        (orc, fixture)
    }

    async fn run_one_trigger(orc: PipelineOrchestrator) {
        let (tx, rx) = mpsc::channel(4);
        tx.send(TriggerEvent::Solve).await.unwrap();
        drop(tx); // close channel so run() returns
        orc.run(rx).await;
    }

    fn last_report(fixture: &Fixture) -> PipelineReport {
        fixture
            .state
            .lock()
            .unwrap()
            .last_report
            .clone()
            .expect("cycle should have reported")
    }

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    /// Full happy path: four tiles, four words, four swipes, longest first.
    #[tokio::test]
    async fn crat_board_swipes_all_four_words_longest_first() {
        let frames = MockFrameSource::new(vec![Ok(MockFrameSource::blank_frame())]);
        let recognizer = MockRecognizer::ok(detections_for("CRAT"));
        let dict = ready_dictionary(&["CAR", "ART", "CART", "RAT"]);

        let (orc, fixture) = make_orchestrator(frames, recognizer, dict, true);
        run_one_trigger(orc).await;

        assert_eq!(
            last_report(&fixture),
            PipelineReport::Solved {
                found: 4,
                swiped: 4,
            }
        );
        assert_eq!(
            fixture.state.lock().unwrap().pipeline,
            PipelineState::Idle
        );
        assert_eq!(
            fixture.state.lock().unwrap().last_letters.as_deref(),
            Some("CRAT")
        );

        let swipes = fixture.actuator.performed();
        assert_eq!(swipes.len(), 4);
        // CART is the only length-4 word and must come first.
        assert_eq!(swipes[0].0.len(), 4);
        for (path, duration) in &swipes[1..] {
            assert_eq!(path.len(), 3);
            assert_eq!(*duration, swipe_duration(3));
        }

        // Tiles C R A T sit at x = 20, 120, 220, 320 (rect centers).
        // CART visits C, A, R, T.
        let xs: Vec<f32> = swipes[0].0.points().iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![20.0, 220.0, 120.0, 320.0]);
    }

    /// Words shorter than the minimum length are filtered before ranking.
    #[tokio::test]
    async fn short_words_are_filtered_out() {
        let frames = MockFrameSource::new(vec![Ok(MockFrameSource::blank_frame())]);
        let recognizer = MockRecognizer::ok(detections_for("CRAT"));
        let dict = ready_dictionary(&["AT", "RAT"]);

        let (orc, fixture) = make_orchestrator(frames, recognizer, dict, true);
        run_one_trigger(orc).await;

        assert_eq!(
            last_report(&fixture),
            PipelineReport::Solved {
                found: 1,
                swiped: 1,
            }
        );
        assert_eq!(fixture.actuator.performed().len(), 1);
    }

    /// A trigger while the pipeline is busy must be dropped without touching
    /// in-flight state.
    #[tokio::test]
    async fn busy_trigger_is_rejected() {
        let frames = MockFrameSource::new(vec![Ok(MockFrameSource::blank_frame())]);
        let recognizer = MockRecognizer::ok(detections_for("CRAT"));
        let dict = ready_dictionary(&["RAT"]);

        let (orc, fixture) = make_orchestrator(frames, recognizer, dict, true);

        // Simulate an in-flight cycle.
        fixture.state.lock().unwrap().pipeline = PipelineState::Acting;

        run_one_trigger(orc).await;

        let st = fixture.state.lock().unwrap();
        assert_eq!(st.pipeline, PipelineState::Acting);
        assert!(st.last_report.is_none());
        assert_eq!(fixture.frames.calls(), 0);
        assert_eq!(fixture.recognizer.calls(), 0);
    }

    /// Two `Unavailable` frames in a row surface `FrameUnavailable` and the
    /// recognizer is never consulted.
    #[tokio::test]
    async fn frame_unavailable_twice_fails_without_recognition() {
        let frames = MockFrameSource::always_unavailable();
        let recognizer = MockRecognizer::ok(detections_for("CRAT"));
        let dict = ready_dictionary(&["RAT"]);

        let (orc, fixture) = make_orchestrator(frames, recognizer, dict, true);
        run_one_trigger(orc).await;

        assert_eq!(
            last_report(&fixture),
            PipelineReport::Failed(PipelineError::FrameUnavailable)
        );
        assert_eq!(
            fixture.state.lock().unwrap().pipeline,
            PipelineState::Idle
        );
        assert_eq!(fixture.frames.calls(), 2); // initial attempt + one retry
        assert_eq!(fixture.recognizer.calls(), 0);
    }

    /// A frame that shows up on the retry lets the cycle complete.
    #[tokio::test]
    async fn frame_available_on_retry_completes_the_cycle() {
        let frames = MockFrameSource::new(vec![
            Err(CaptureError::Unavailable),
            Ok(MockFrameSource::blank_frame()),
        ]);
        let recognizer = MockRecognizer::ok(detections_for("CRAT"));
        let dict = ready_dictionary(&["RAT"]);

        let (orc, fixture) = make_orchestrator(frames, recognizer, dict, true);
        run_one_trigger(orc).await;

        assert_eq!(fixture.frames.calls(), 2);
        assert_eq!(
            last_report(&fixture),
            PipelineReport::Solved {
                found: 1,
                swiped: 1,
            }
        );
    }

    /// Recognition failure surfaces and returns the pipeline to idle.
    #[tokio::test]
    async fn recognition_failure_returns_to_idle() {
        let frames = MockFrameSource::new(vec![Ok(MockFrameSource::blank_frame())]);
        let recognizer = MockRecognizer::err("engine crashed");
        let dict = ready_dictionary(&["RAT"]);

        let (orc, fixture) = make_orchestrator(frames, recognizer, dict, true);
        run_one_trigger(orc).await;

        match last_report(&fixture) {
            PipelineReport::Failed(PipelineError::RecognitionFailed(msg)) => {
                assert!(msg.contains("engine crashed"));
            }
            other => panic!("expected RecognitionFailed, got {other:?}"),
        }
        assert_eq!(
            fixture.state.lock().unwrap().pipeline,
            PipelineState::Idle
        );
        assert!(fixture.actuator.performed().is_empty());
    }

    /// Zero recognised letter tiles is its own failure, distinct from "no
    /// words".
    #[tokio::test]
    async fn empty_board_is_reported() {
        let frames = MockFrameSource::new(vec![Ok(MockFrameSource::blank_frame())]);
        // Score counters and chrome only — nothing tile-like.
        let recognizer = MockRecognizer::ok(vec![detection("1250", 0.0), detection("OK", 100.0)]);
        let dict = ready_dictionary(&["RAT"]);

        let (orc, fixture) = make_orchestrator(frames, recognizer, dict, true);
        run_one_trigger(orc).await;

        assert_eq!(
            last_report(&fixture),
            PipelineReport::Failed(PipelineError::EmptyBoard)
        );
    }

    /// A missing actuator fails the cycle before the dictionary is even
    /// consulted — the unready dictionary here must not be the reported
    /// failure.
    #[tokio::test]
    async fn missing_actuator_fails_before_solving() {
        let frames = MockFrameSource::new(vec![Ok(MockFrameSource::blank_frame())]);
        let recognizer = MockRecognizer::ok(detections_for("CRAT"));
        let dict = Arc::new(Dictionary::new()); // never published

        let (orc, fixture) = make_orchestrator(frames, recognizer, dict, false);
        run_one_trigger(orc).await;

        assert_eq!(
            last_report(&fixture),
            PipelineReport::Failed(PipelineError::ActuatorNotReady)
        );
        assert_eq!(
            fixture.state.lock().unwrap().pipeline,
            PipelineState::Idle
        );
    }

    /// Triggering before the word list finishes loading reports NotReady.
    #[tokio::test]
    async fn unready_dictionary_is_reported() {
        let frames = MockFrameSource::new(vec![Ok(MockFrameSource::blank_frame())]);
        let recognizer = MockRecognizer::ok(detections_for("CRAT"));
        let dict = Arc::new(Dictionary::new()); // still "loading"

        let (orc, fixture) = make_orchestrator(frames, recognizer, dict, true);
        run_one_trigger(orc).await;

        assert_eq!(
            last_report(&fixture),
            PipelineReport::Failed(PipelineError::DictionaryNotReady)
        );
        assert!(fixture.actuator.performed().is_empty());
    }

    /// An empty result from a ready dictionary is NoWords, not a failure.
    #[tokio::test]
    async fn no_matching_words_is_a_normal_outcome() {
        let frames = MockFrameSource::new(vec![Ok(MockFrameSource::blank_frame())]);
        let recognizer = MockRecognizer::ok(detections_for("CRAT"));
        let dict = ready_dictionary(&["ZEBRA"]);

        let (orc, fixture) = make_orchestrator(frames, recognizer, dict, true);
        run_one_trigger(orc).await;

        assert_eq!(last_report(&fixture), PipelineReport::NoWords);
        assert_eq!(
            fixture.state.lock().unwrap().pipeline,
            PipelineState::Idle
        );
        assert!(fixture.actuator.performed().is_empty());
    }

    /// After a failed cycle the pipeline accepts the next trigger.
    #[tokio::test]
    async fn pipeline_recovers_after_a_failure() {
        let frames = MockFrameSource::new(vec![
            Err(CaptureError::OffScreen),
            Ok(MockFrameSource::blank_frame()),
        ]);
        let recognizer = MockRecognizer::ok(detections_for("CRAT"));
        let dict = ready_dictionary(&["RAT"]);

        let (orc, fixture) = make_orchestrator(frames, recognizer, dict, true);

        let (tx, rx) = mpsc::channel(4);
        tx.send(TriggerEvent::Solve).await.unwrap();
        tx.send(TriggerEvent::Solve).await.unwrap();
        drop(tx);
        orc.run(rx).await;

        // The first cycle failed (off-screen is not retried); the second ran
        // to completion.
        assert_eq!(
            last_report(&fixture),
            PipelineReport::Solved {
                found: 1,
                swiped: 1,
            }
        );
    }
}
