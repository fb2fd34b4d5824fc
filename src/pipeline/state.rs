//! Pipeline state machine and shared application state.
//!
//! [`PipelineState`] drives the orchestrator's state machine; [`AppState`]
//! is the single source of truth for anything outside the orchestrator that
//! wants to display progress (current phase, last recognised letters, last
//! cycle report).
//!
//! [`SharedState`] is a type alias for `Arc<Mutex<AppState>>` — cheap to
//! clone and safe to share across threads.  The orchestrator is the only
//! writer; everyone else reads a published snapshot.

use std::sync::{Arc, Mutex};

use crate::config::AppConfig;

use super::runner::PipelineReport;

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of the capture → solve → act pipeline.
///
/// The state machine transitions are:
///
/// ```text
/// Idle ──trigger──▶ Capturing ──frame──▶ Recognizing ──board──▶ Solving
///                                                                  │
///                       Idle ◀──batch done── Acting ◀──candidates──┘
/// any phase ──failure──▶ Idle  (with a report, so the next trigger works)
/// ```
///
/// A trigger arriving in any state but `Idle` is dropped, never queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Waiting for a solve trigger.
    Idle,

    /// Acquiring a frame of the solve region (with one bounded retry).
    Capturing,

    /// The recognizer is running on the cropped frame.
    Recognizing,

    /// Finding and ranking candidate words for the recognised board.
    Solving,

    /// Swiping accepted words one at a time, paced by the inter-swipe gap.
    Acting,
}

impl PipelineState {
    /// Returns `true` while a solve cycle is in flight.  New triggers are
    /// rejected while busy.
    ///
    /// ```
    /// use word_swiper::pipeline::PipelineState;
    ///
    /// assert!(!PipelineState::Idle.is_busy());
    /// assert!(PipelineState::Capturing.is_busy());
    /// assert!(PipelineState::Recognizing.is_busy());
    /// assert!(PipelineState::Solving.is_busy());
    /// assert!(PipelineState::Acting.is_busy());
    /// ```
    pub fn is_busy(&self) -> bool {
        !matches!(self, PipelineState::Idle)
    }

    /// A short human-readable label suitable for status display.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "Idle",
            PipelineState::Capturing => "Capturing",
            PipelineState::Recognizing => "Recognizing",
            PipelineState::Solving => "Solving",
            PipelineState::Acting => "Swiping",
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        PipelineState::Idle
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Shared application state.
///
/// Held behind [`SharedState`] (`Arc<Mutex<AppState>>`).  The pipeline
/// orchestrator mutates it; observers read it.
pub struct AppState {
    /// Current phase of the solve pipeline.
    pub pipeline: PipelineState,

    /// The raw letters recognised in the most recent cycle, in detection
    /// order.  `None` until a cycle reaches the solving phase.
    pub last_letters: Option<String>,

    /// Outcome of the most recently finished cycle.
    pub last_report: Option<PipelineReport>,

    /// Current application configuration.
    ///
    /// The orchestrator reads the capture region and solver pacing from
    /// here at the start of every cycle.
    pub config: AppConfig,
}

impl AppState {
    /// Create a new `AppState` in the idle phase.
    pub fn new(config: AppConfig) -> Self {
        Self {
            pipeline: PipelineState::Idle,
            last_letters: None,
            last_report: None,
            config,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`AppState`].
///
/// Cheap to clone (`Arc` clone).  Lock with `.lock().unwrap()` for a short
/// critical section; do **not** hold the lock across `.await` points.
pub type SharedState = Arc<Mutex<AppState>>;

/// Construct a new [`SharedState`] wrapping [`AppState::new`].
pub fn new_shared_state(config: AppConfig) -> SharedState {
    Arc::new(Mutex::new(AppState::new(config)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- PipelineState::is_busy ---

    #[test]
    fn only_idle_is_not_busy() {
        assert!(!PipelineState::Idle.is_busy());
        assert!(PipelineState::Capturing.is_busy());
        assert!(PipelineState::Recognizing.is_busy());
        assert!(PipelineState::Solving.is_busy());
        assert!(PipelineState::Acting.is_busy());
    }

    // ---- PipelineState::label ---

    #[test]
    fn labels_cover_every_state() {
        assert_eq!(PipelineState::Idle.label(), "Idle");
        assert_eq!(PipelineState::Capturing.label(), "Capturing");
        assert_eq!(PipelineState::Recognizing.label(), "Recognizing");
        assert_eq!(PipelineState::Solving.label(), "Solving");
        assert_eq!(PipelineState::Acting.label(), "Swiping");
    }

    // ---- Default ---

    #[test]
    fn default_pipeline_state_is_idle() {
        assert_eq!(PipelineState::default(), PipelineState::Idle);
    }

    // ---- AppState / SharedState ---

    #[test]
    fn app_state_default_is_idle_with_no_history() {
        let state = AppState::default();
        assert_eq!(state.pipeline, PipelineState::Idle);
        assert!(state.last_letters.is_none());
        assert!(state.last_report.is_none());
    }

    #[test]
    fn shared_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedState>();
    }

    #[test]
    fn shared_state_can_be_cloned_and_mutated() {
        let state = new_shared_state(AppConfig::default());
        let state2 = Arc::clone(&state);

        state.lock().unwrap().pipeline = PipelineState::Solving;
        assert_eq!(state2.lock().unwrap().pipeline, PipelineState::Solving);
    }
}
