//! Pointer actuator backed by the `enigo` crate.
//!
//! Presses the left button at the first path point, drags through the
//! remaining points with interpolated intermediate moves, and releases.  A
//! new [`Enigo`] instance is created for each swipe because `Enigo` is not
//! `Send` and the handle is cheap to construct.

use std::time::Duration;

use enigo::{Button, Coordinate, Direction, Enigo, Mouse, Settings};

use crate::board::{Point, SwipePath};

use super::{GestureActuator, GestureError};

/// Intermediate pointer moves per path segment.  Games sample pointer
/// position; a straight jump between distant tiles can skip over a tile's
/// hit box or be rejected as teleportation.
const STEPS_PER_SEGMENT: u32 = 4;

// ---------------------------------------------------------------------------
// PointerActuator
// ---------------------------------------------------------------------------

/// Production gesture actuator driving the system pointer via `enigo`.
#[derive(Debug, Clone, Default)]
pub struct PointerActuator;

impl PointerActuator {
    pub fn new() -> Self {
        Self
    }

    /// Check that the enigo backend can be initialised (e.g. that the
    /// process has the needed input-synthesis permissions).
    ///
    /// # Errors
    ///
    /// [`GestureError::Backend`] when the backend refuses to initialise;
    /// the caller should treat the actuator as absent.
    pub fn probe() -> Result<(), GestureError> {
        Enigo::new(&Settings::default())
            .map(|_| ())
            .map_err(|e| GestureError::Backend(e.to_string()))
    }

    fn drag(
        enigo: &mut Enigo,
        points: &[Point],
        duration: Duration,
    ) -> Result<(), GestureError> {
        let segments = (points.len() - 1) as u32;
        let step_delay = duration / (segments * STEPS_PER_SEGMENT);

        for pair in points.windows(2) {
            for step in 1..=STEPS_PER_SEGMENT {
                let t = step as f32 / STEPS_PER_SEGMENT as f32;
                let x = pair[0].x + (pair[1].x - pair[0].x) * t;
                let y = pair[0].y + (pair[1].y - pair[0].y) * t;

                enigo
                    .move_mouse(x.round() as i32, y.round() as i32, Coordinate::Abs)
                    .map_err(|e| GestureError::Backend(e.to_string()))?;
                std::thread::sleep(step_delay);
            }
        }
        Ok(())
    }
}

impl GestureActuator for PointerActuator {
    fn perform(&self, path: &SwipePath, duration: Duration) -> Result<(), GestureError> {
        let points = path.points();
        // A single point cannot form a swipe; dispatch nothing.
        if points.len() < 2 {
            return Ok(());
        }

        let mut enigo =
            Enigo::new(&Settings::default()).map_err(|e| GestureError::Backend(e.to_string()))?;

        enigo
            .move_mouse(
                points[0].x.round() as i32,
                points[0].y.round() as i32,
                Coordinate::Abs,
            )
            .map_err(|e| GestureError::Backend(e.to_string()))?;
        enigo
            .button(Button::Left, Direction::Press)
            .map_err(|e| GestureError::Backend(e.to_string()))?;

        let dragged = Self::drag(&mut enigo, points, duration);

        // Always try to release — a stuck button is worse than a failed swipe.
        let released = enigo
            .button(Button::Left, Direction::Release)
            .map_err(|e| GestureError::Backend(e.to_string()));

        dragged.and(released)
    }
}
