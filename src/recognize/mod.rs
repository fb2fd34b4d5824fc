//! Text recognition — turns a captured frame into per-glyph detections.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │              TextRecognizer (trait)             │
//! │                                                 │
//! │   Frame ──▶ recognize() ──▶ [TextDetection]     │
//! │                  │                              │
//! │                  ▼                              │
//! │        TesseractRecognizer                      │
//! │        (PNG over stdin → TSV over stdout)       │
//! └─────────────────────────────────────────────────┘
//! ```
//!
//! Detections carry bounding rectangles in **cropped-image coordinates**;
//! the board layer re-offsets them by the frame origin.  The recognizer is
//! async and fallible — the pipeline awaits it at a single suspension point
//! and keeps at most one recognition in flight.

pub mod tesseract;

pub use tesseract::TesseractRecognizer;

use async_trait::async_trait;
use thiserror::Error;

use crate::capture::Frame;

// ---------------------------------------------------------------------------
// RectF / TextDetection
// ---------------------------------------------------------------------------

/// Axis-aligned bounding rectangle in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectF {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl RectF {
    /// Rectangle center `(x, y)`.
    pub fn center(&self) -> (f32, f32) {
        (self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}

/// One recognised piece of text with its bounding rectangle.
///
/// The recognizer emits one detection per glyph for tile letters, but other
/// screen text (scores, buttons) comes through too — the board layer filters
/// to single A–Z letters.
#[derive(Debug, Clone, PartialEq)]
pub struct TextDetection {
    pub text: String,
    pub bounds: RectF,
}

// ---------------------------------------------------------------------------
// RecognizeError
// ---------------------------------------------------------------------------

/// Failures in the recognition subsystem.
#[derive(Debug, Error)]
pub enum RecognizeError {
    /// The OCR engine is not installed or not on `PATH`.
    #[error("OCR engine not available: {0}")]
    EngineMissing(String),

    /// The frame could not be encoded for the engine.
    #[error("cannot encode frame: {0}")]
    Encode(String),

    /// The engine ran but failed (non-zero exit, I/O error, bad output).
    #[error("recognition failed: {0}")]
    Failed(String),
}

// ---------------------------------------------------------------------------
// TextRecognizer trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for text recognizers.
///
/// Implementations must be `Send + Sync` so they can be held behind an
/// `Arc<dyn TextRecognizer>` and awaited from the pipeline task.
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognise text in `frame`, returning detections in cropped-image
    /// coordinates.
    async fn recognize(&self, frame: &Frame) -> Result<Vec<TextDetection>, RecognizeError>;
}

// ---------------------------------------------------------------------------
// MockRecognizer  (test-only)
// ---------------------------------------------------------------------------

/// Test double returning a pre-configured response and counting calls.
#[cfg(test)]
pub struct MockRecognizer {
    response: Result<Vec<TextDetection>, String>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockRecognizer {
    /// A mock that always succeeds with `detections`.
    pub fn ok(detections: Vec<TextDetection>) -> Self {
        Self {
            response: Ok(detections),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// A mock that always fails with [`RecognizeError::Failed`].
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            response: Err(message.into()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl TextRecognizer for MockRecognizer {
    async fn recognize(&self, _frame: &Frame) -> Result<Vec<TextDetection>, RecognizeError> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match &self.response {
            Ok(dets) => Ok(dets.clone()),
            Err(msg) => Err(RecognizeError::Failed(msg.clone())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
