//! Board model — the letter tiles recognised in one capture cycle.
//!
//! A [`BoardSnapshot`] is rebuilt from scratch on every solve cycle and
//! discarded afterwards; tiles never survive between captures.  Claim marks
//! live in a separate [`ClaimSet`] rather than on the tiles themselves, so
//! building paths for several words against the same snapshot can never
//! alias each other's state — each word starts from a fresh (or reset) set.

pub mod path;

pub use path::{build_path, PathError, SwipePath};

use crate::recognize::TextDetection;

// ---------------------------------------------------------------------------
// Point / Tile
// ---------------------------------------------------------------------------

/// A position in full-screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// One recognised letter tile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tile {
    /// Uppercase ASCII letter shown on the tile.
    pub letter: char,
    /// Center of the tile's bounding box, in full-screen coordinates.
    pub center: Point,
}

// ---------------------------------------------------------------------------
// BoardSnapshot
// ---------------------------------------------------------------------------

/// The complete set of letter tiles from one capture.
///
/// Tile order is the recognizer's detection order; [`claim`](Self::claim)
/// resolves ties by that order, not spatially.
#[derive(Debug, Clone)]
pub struct BoardSnapshot {
    tiles: Vec<Tile>,
}

impl BoardSnapshot {
    /// Build a snapshot from recognizer detections.
    ///
    /// Detections whose text is not exactly one ASCII letter are discarded
    /// (the recognizer emits one detection per glyph, but also picks up
    /// score counters, buttons and other chrome).  Each kept detection's
    /// bounding-rect center is re-offset by `origin` — the cropped frame's
    /// top-left — back into full-screen coordinates.
    pub fn from_detections(detections: &[TextDetection], origin: (i32, i32)) -> Self {
        let tiles = detections
            .iter()
            .filter_map(|d| {
                let mut chars = d.text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if c.is_ascii_alphabetic() => {
                        let center = d.bounds.center();
                        Some(Tile {
                            letter: c.to_ascii_uppercase(),
                            center: Point {
                                x: center.0 + origin.0 as f32,
                                y: center.1 + origin.1 as f32,
                            },
                        })
                    }
                    _ => None,
                }
            })
            .collect();

        Self { tiles }
    }

    /// Build a snapshot directly from tiles (tests, replays).
    pub fn from_tiles(tiles: Vec<Tile>) -> Self {
        Self { tiles }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// The raw letter string in detection order — the Word Finder's input.
    pub fn letters(&self) -> String {
        self.tiles.iter().map(|t| t.letter).collect()
    }

    /// A claim set sized for this snapshot, with every tile unclaimed.
    pub fn new_claims(&self) -> ClaimSet {
        ClaimSet {
            used: vec![false; self.tiles.len()],
        }
    }

    /// Claim the first unclaimed tile showing `letter` (detection order) and
    /// return its position.  Returns `None` when every matching tile is
    /// already claimed in `claims` — or none ever matched.
    pub fn claim(&self, letter: char, claims: &mut ClaimSet) -> Option<Point> {
        debug_assert_eq!(claims.used.len(), self.tiles.len());
        let target = letter.to_ascii_uppercase();

        for (i, tile) in self.tiles.iter().enumerate() {
            if tile.letter == target && !claims.used[i] {
                claims.used[i] = true;
                return Some(tile.center);
            }
        }
        None
    }
}

// ---------------------------------------------------------------------------
// ClaimSet
// ---------------------------------------------------------------------------

/// Per-path-build tile ownership marks.
///
/// Scoped to a single word: the path builder resets it before every build,
/// and the same snapshot serves any number of words sequentially.
#[derive(Debug, Clone)]
pub struct ClaimSet {
    used: Vec<bool>,
}

impl ClaimSet {
    /// Clear every claim mark, making the whole board available again.
    pub fn reset(&mut self) {
        self.used.fill(false);
    }

    /// Number of tiles currently claimed.
    pub fn claimed(&self) -> usize {
        self.used.iter().filter(|&&u| u).count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recognize::RectF;

    fn det(text: &str, left: f32, top: f32) -> TextDetection {
        TextDetection {
            text: text.into(),
            bounds: RectF {
                left,
                top,
                width: 40.0,
                height: 40.0,
            },
        }
    }

    #[test]
    fn from_detections_keeps_single_letters_only() {
        let dets = vec![
            det("C", 0.0, 0.0),
            det("12", 50.0, 0.0),
            det("r", 100.0, 0.0),
            det("", 150.0, 0.0),
            det("OK", 200.0, 0.0),
            det("!", 250.0, 0.0),
        ];
        let board = BoardSnapshot::from_detections(&dets, (0, 0));

        assert_eq!(board.len(), 2);
        assert_eq!(board.letters(), "CR");
    }

    #[test]
    fn tile_position_is_offset_rect_center() {
        let dets = vec![det("A", 10.0, 20.0)];
        let board = BoardSnapshot::from_detections(&dets, (100, 200));

        let tile = board.tiles()[0];
        // Rect center (30, 40) plus the crop origin (100, 200).
        assert_eq!(tile.center, Point { x: 130.0, y: 240.0 });
    }

    #[test]
    fn claim_uses_detection_order_for_ties() {
        let dets = vec![det("A", 300.0, 0.0), det("A", 0.0, 0.0)];
        let board = BoardSnapshot::from_detections(&dets, (0, 0));
        let mut claims = board.new_claims();

        // First claim resolves to the first-detected A even though the
        // second is further left on screen.
        let first = board.claim('A', &mut claims).unwrap();
        assert_eq!(first.x, 320.0);
        let second = board.claim('A', &mut claims).unwrap();
        assert_eq!(second.x, 20.0);
        assert_eq!(board.claim('A', &mut claims), None);
    }

    #[test]
    fn claim_is_case_insensitive_on_lookup() {
        let board = BoardSnapshot::from_detections(&[det("Q", 0.0, 0.0)], (0, 0));
        let mut claims = board.new_claims();
        assert!(board.claim('q', &mut claims).is_some());
    }

    #[test]
    fn missing_letter_is_not_found() {
        let board = BoardSnapshot::from_detections(&[det("A", 0.0, 0.0)], (0, 0));
        let mut claims = board.new_claims();
        assert_eq!(board.claim('Z', &mut claims), None);
        // The failed lookup must not consume anything.
        assert_eq!(claims.claimed(), 0);
    }

    #[test]
    fn reset_makes_an_exhausted_board_usable_again() {
        let board = BoardSnapshot::from_detections(&[det("A", 0.0, 0.0)], (0, 0));
        let mut claims = board.new_claims();

        assert!(board.claim('A', &mut claims).is_some());
        assert_eq!(board.claim('A', &mut claims), None);

        claims.reset();
        assert!(board.claim('A', &mut claims).is_some());
    }

    #[test]
    fn empty_detection_set_gives_empty_board() {
        let board = BoardSnapshot::from_detections(&[], (0, 0));
        assert!(board.is_empty());
        assert_eq!(board.letters(), "");
    }
}
