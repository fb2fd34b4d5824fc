//! Frame capture — grabs the solve region of the screen as a raster image.
//!
//! # Overview
//!
//! [`FrameSource`] is the interface the pipeline sees: hand it a
//! [`CaptureRegion`], get back a [`Frame`] or [`CaptureError::Unavailable`].
//! The production implementation ([`ScreenFrameSource`]) grabs the primary
//! monitor through `xcap` and crops to the region; the clamping rules live
//! in [`crop_to_region`] so they can be tested without a real screen.
//!
//! A [`Frame`] carries its clamped top-left `origin` so that detection
//! coordinates (which are relative to the crop) can be re-offset back into
//! full-screen space when the board is built.

use image::RgbaImage;
use thiserror::Error;
use xcap::Monitor;

// ---------------------------------------------------------------------------
// CaptureRegion
// ---------------------------------------------------------------------------

/// A rectangular screen region to capture.
///
/// The origin may be negative or the rectangle may overhang a screen edge;
/// [`crop_to_region`] clamps it to the visible screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureRegion {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl From<crate::config::CaptureConfig> for CaptureRegion {
    fn from(c: crate::config::CaptureConfig) -> Self {
        Self {
            x: c.x,
            y: c.y,
            width: c.width,
            height: c.height,
        }
    }
}

// ---------------------------------------------------------------------------
// Frame
// ---------------------------------------------------------------------------

/// One captured and cropped screen frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Pixels of the cropped region.
    pub image: RgbaImage,
    /// Top-left of the crop in full-screen coordinates (after clamping).
    pub origin: (i32, i32),
}

// ---------------------------------------------------------------------------
// CaptureError
// ---------------------------------------------------------------------------

/// Failures while acquiring a frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The screen source had no frame to give.  Transient — worth one retry.
    #[error("no frame available from the screen source")]
    Unavailable,

    /// The capture region lies entirely outside the screen.  Retrying will
    /// not help until the user moves the region.
    #[error("capture region lies entirely off screen")]
    OffScreen,
}

// ---------------------------------------------------------------------------
// FrameSource trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe frame provider.
///
/// Implementations must be `Send + Sync` so the pipeline can hold one behind
/// an `Arc<dyn FrameSource>` and call it from the blocking pool.
pub trait FrameSource: Send + Sync {
    /// Capture the given screen region.
    fn capture(&self, region: CaptureRegion) -> Result<Frame, CaptureError>;
}

// ---------------------------------------------------------------------------
// crop_to_region
// ---------------------------------------------------------------------------

/// Crop a full-screen grab down to `region`, clamping to the image bounds.
///
/// The clamped top-left becomes the frame's `origin`.  A region entirely
/// outside the image is [`CaptureError::OffScreen`].
pub fn crop_to_region(full: &RgbaImage, region: CaptureRegion) -> Result<Frame, CaptureError> {
    let x = region.x.max(0) as u32;
    let y = region.y.max(0) as u32;

    if x >= full.width() || y >= full.height() {
        return Err(CaptureError::OffScreen);
    }

    let width = region.width.min(full.width() - x);
    let height = region.height.min(full.height() - y);
    if width == 0 || height == 0 {
        return Err(CaptureError::OffScreen);
    }

    let image = image::imageops::crop_imm(full, x, y, width, height).to_image();
    Ok(Frame {
        image,
        origin: (x as i32, y as i32),
    })
}

// ---------------------------------------------------------------------------
// ScreenFrameSource
// ---------------------------------------------------------------------------

/// Production frame source backed by `xcap`.
///
/// Grabs the primary monitor in full and crops to the requested region.
/// Capture failures are logged and collapsed into
/// [`CaptureError::Unavailable`]; the pipeline owns the retry policy.
#[derive(Debug, Default)]
pub struct ScreenFrameSource;

impl ScreenFrameSource {
    pub fn new() -> Self {
        Self
    }
}

impl FrameSource for ScreenFrameSource {
    fn capture(&self, region: CaptureRegion) -> Result<Frame, CaptureError> {
        let monitors = Monitor::all().map_err(|e| {
            log::warn!("capture: cannot enumerate monitors: {e}");
            CaptureError::Unavailable
        })?;

        let monitor = monitors
            .iter()
            .find(|m| m.is_primary().unwrap_or(false))
            .or_else(|| monitors.first())
            .ok_or(CaptureError::Unavailable)?;

        let full = monitor.capture_image().map_err(|e| {
            log::warn!("capture: screen grab failed: {e}");
            CaptureError::Unavailable
        })?;

        crop_to_region(&full, region)
    }
}

// ---------------------------------------------------------------------------
// MockFrameSource  (test-only)
// ---------------------------------------------------------------------------

/// Test double that serves a scripted sequence of capture results and counts
/// how many times it was asked.
#[cfg(test)]
pub struct MockFrameSource {
    responses: std::sync::Mutex<std::collections::VecDeque<Result<Frame, CaptureError>>>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockFrameSource {
    pub fn new(responses: Vec<Result<Frame, CaptureError>>) -> Self {
        Self {
            responses: std::sync::Mutex::new(responses.into()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// A frame source that always reports `Unavailable`.
    pub fn always_unavailable() -> Self {
        Self::new(Vec::new())
    }

    /// A 1×1 placeholder frame at origin (0, 0).
    pub fn blank_frame() -> Frame {
        Frame {
            image: RgbaImage::new(1, 1),
            origin: (0, 0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl FrameSource for MockFrameSource {
    fn capture(&self, _region: CaptureRegion) -> Result<Frame, CaptureError> {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(CaptureError::Unavailable))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
