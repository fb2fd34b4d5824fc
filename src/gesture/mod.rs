//! Gesture synthesis — replays a swipe path as pointer input.
//!
//! # Overview
//!
//! [`GestureActuator`] is a fire-and-forget contract: `perform` dispatches a
//! pointer-down / move / up sequence along the path and returns once the
//! events are delivered — there is no completion signal from the target
//! application.  Swipes must never overlap; the pipeline serialises them and
//! paces with a fixed gap.
//!
//! [`swipe_duration`] scales the gesture with word length so the game's
//! swipe recognizer registers a full drag rather than a tap.

pub mod pointer;

pub use pointer::PointerActuator;

use std::time::Duration;

use thiserror::Error;

use crate::board::SwipePath;

// ---------------------------------------------------------------------------
// GestureError
// ---------------------------------------------------------------------------

/// Failures while synthesising pointer input.
#[derive(Debug, Error)]
pub enum GestureError {
    /// The input backend could not be initialised or refused an event.
    #[error("pointer backend error: {0}")]
    Backend(String),
}

// ---------------------------------------------------------------------------
// GestureActuator trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe pointer-swipe dispatcher.
///
/// Implementations must be `Send + Sync` so the pipeline can hold one behind
/// an `Arc<dyn GestureActuator>` and call it from the blocking pool (a swipe
/// sleeps for its whole duration).
pub trait GestureActuator: Send + Sync {
    /// Swipe along `path` over roughly `duration`.  Dispatch-only: a
    /// successful return means the events went out, not that the target
    /// application accepted the word.
    fn perform(&self, path: &SwipePath, duration: Duration) -> Result<(), GestureError>;
}

// ---------------------------------------------------------------------------
// swipe_duration
// ---------------------------------------------------------------------------

/// Gesture duration for a path of `points` tiles: 100 ms per point with a
/// 200 ms floor.
pub fn swipe_duration(points: usize) -> Duration {
    Duration::from_millis((points as u64 * 100).max(200))
}

// ---------------------------------------------------------------------------
// RecordingActuator  (test-only)
// ---------------------------------------------------------------------------

/// Test double that records every dispatched swipe instead of moving the
/// pointer.
#[cfg(test)]
#[derive(Default)]
pub struct RecordingActuator {
    performed: std::sync::Mutex<Vec<(SwipePath, Duration)>>,
}

#[cfg(test)]
impl RecordingActuator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn performed(&self) -> Vec<(SwipePath, Duration)> {
        self.performed.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl GestureActuator for RecordingActuator {
    fn perform(&self, path: &SwipePath, duration: Duration) -> Result<(), GestureError> {
        self.performed.lock().unwrap().push((path.clone(), duration));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
