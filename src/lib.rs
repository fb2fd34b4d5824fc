//! Word Swiper — screen-reading word-game solver.
//!
//! Watches a configurable region of the screen for a ring of letter tiles,
//! finds every dictionary word those tiles can spell without reusing a tile,
//! and replays each word as a simulated pointer swipe across the tile
//! positions.
//!
//! # Architecture
//!
//! ```text
//! hotkey trigger
//!   └─▶ PipelineOrchestrator                        [pipeline]
//!         ├─▶ FrameSource::capture(region)          [capture]
//!         ├─▶ TextRecognizer::recognize(frame)      [recognize]
//!         ├─▶ BoardSnapshot::from_detections        [board]
//!         ├─▶ Dictionary::find_words(letters)       [dict]
//!         └─▶ per word: build_path → GestureActuator [board::path, gesture]
//! ```
//!
//! The orchestrator owns all state transitions; the recognizer runs at an
//! async boundary and the dictionary loads on the blocking pool, both handing
//! results back before any shared state is touched.

pub mod board;
pub mod capture;
pub mod config;
pub mod dict;
pub mod gesture;
pub mod hotkey;
pub mod pipeline;
pub mod recognize;
