//! Dictionary subsystem — the word index and the word finder.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────┐
//! │                Dictionary (handle)                 │
//! │                                                    │
//! │  spawn_load ──builds──▶ Trie ──publish──▶ OnceLock │
//! │   (blocking pool)                          (read-  │
//! │                                             only)  │
//! │                                                    │
//! │  find_words(letters) ──▶ solver::find_words        │
//! │        └─ NotReady before publication              │
//! └────────────────────────────────────────────────────┘
//! ```
//!
//! The trie is built off-thread in full, then published atomically.  Readers
//! either see nothing (and report [`DictionaryError::NotReady`]) or the
//! complete index — never a partially loaded one.

pub mod solver;
pub mod trie;

pub use trie::Trie;

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use thiserror::Error;

// ---------------------------------------------------------------------------
// DictionaryError
// ---------------------------------------------------------------------------

/// Errors surfaced by the dictionary handle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DictionaryError {
    /// The word list has not finished loading.  Distinct from an empty
    /// result: "no words match" and "still loading" must never be confused.
    #[error("dictionary is still loading — try again shortly")]
    NotReady,
}

// ---------------------------------------------------------------------------
// Dictionary
// ---------------------------------------------------------------------------

/// Shared handle to the word index.
///
/// Starts unpublished; [`publish`](Self::publish) installs the fully built
/// [`Trie`] exactly once.  After that the index is immutable and can be read
/// from any thread without locking.
pub struct Dictionary {
    trie: OnceLock<Trie>,
}

impl Dictionary {
    /// Create an unpublished (not-ready) dictionary handle.
    pub fn new() -> Self {
        Self {
            trie: OnceLock::new(),
        }
    }

    /// `true` once a trie has been published.
    pub fn is_ready(&self) -> bool {
        self.trie.get().is_some()
    }

    /// Install the built trie.  The first publication wins; returns `false`
    /// (and drops `trie`) if an index was already published.
    pub fn publish(&self, trie: Trie) -> bool {
        self.trie.set(trie).is_ok()
    }

    /// Number of words in the published index, or `None` while loading.
    pub fn word_count(&self) -> Option<usize> {
        self.trie.get().map(Trie::len)
    }

    /// Find every indexed word spellable from `letters` (each letter used at
    /// most once).
    ///
    /// # Errors
    ///
    /// [`DictionaryError::NotReady`] until the word list finishes loading.
    /// A ready-but-empty index returns `Ok(vec![])`.
    pub fn find_words(&self, letters: &str) -> Result<Vec<String>, DictionaryError> {
        let trie = self.trie.get().ok_or(DictionaryError::NotReady)?;
        Ok(solver::find_words(trie, letters))
    }
}

impl Default for Dictionary {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// spawn_load
// ---------------------------------------------------------------------------

/// Read the word list at `path` on the blocking pool, build the trie, and
/// publish it into `dict`.
///
/// A missing or unreadable file publishes an empty index with a warning:
/// the solver then finds no words, but the pipeline stays usable.  Returns
/// the task handle mainly so tests can await completion.
pub fn spawn_load(dict: Arc<Dictionary>, path: PathBuf) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        let mut trie = Trie::new();

        match std::fs::read_to_string(&path) {
            Ok(content) => {
                let skipped = trie.load_lines(content.lines());
                if skipped > 0 {
                    log::warn!(
                        "dictionary: skipped {skipped} malformed line(s) in {}",
                        path.display()
                    );
                }
                log::info!(
                    "dictionary: loaded {} words from {}",
                    trie.len(),
                    path.display()
                );
            }
            Err(e) => {
                log::warn!(
                    "dictionary: cannot read {} ({e}); starting with an empty word list",
                    path.display()
                );
            }
        }

        if !dict.publish(trie) {
            log::warn!("dictionary: index was already published, discarding reload");
        }
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
