//! Path Synthesizer — turns a word plus a board into a swipe path.
//!
//! One point per letter, each the claimed tile's screen center; the gesture
//! layer is responsible for interpolating between them.  A word that the
//! board cannot actually cover fails with [`PathError::UnreachableWord`] —
//! this can happen even for words the finder accepted, because the finder
//! validates against the raw detection string while the claim walk validates
//! against the physical tiles, and noisy recognition can make the two
//! disagree.  Such words are skipped, not treated as fatal.

use thiserror::Error;

use super::{BoardSnapshot, ClaimSet, Point};

// ---------------------------------------------------------------------------
// SwipePath
// ---------------------------------------------------------------------------

/// Ordered sequence of screen points, one per letter of the swiped word.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipePath {
    points: Vec<Point>,
}

impl SwipePath {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// PathError
// ---------------------------------------------------------------------------

/// Failure to cover a word with the available tiles.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// No unclaimed tile was available for `letter` while building `word`.
    #[error("no free tile for '{letter}' while building path for {word}")]
    UnreachableWord { word: String, letter: char },
}

// ---------------------------------------------------------------------------
// build_path
// ---------------------------------------------------------------------------

/// Build the swipe path for `word` against `board`.
///
/// Resets `claims` first — every word's build starts from a fully unclaimed
/// board — then claims one tile per character in word order.  On success the
/// path has exactly one point per letter; on failure the word is unreachable
/// and the caller should move on to the next candidate.
pub fn build_path(
    word: &str,
    board: &BoardSnapshot,
    claims: &mut ClaimSet,
) -> Result<SwipePath, PathError> {
    claims.reset();

    let mut points = Vec::with_capacity(word.len());
    for letter in word.chars() {
        match board.claim(letter, claims) {
            Some(point) => points.push(point),
            None => {
                return Err(PathError::UnreachableWord {
                    word: word.to_string(),
                    letter,
                })
            }
        }
    }

    Ok(SwipePath { points })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
