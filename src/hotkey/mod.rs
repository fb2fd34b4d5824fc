//! Global hotkey trigger for the solve pipeline, backed by `rdev`.
//!
//! # Design
//!
//! `rdev::listen()` is a blocking OS-level call that never returns while the
//! process is alive.  It must run on a **dedicated OS thread** — it cannot
//! be used inside a tokio task.
//!
//! [`HotkeyListener::start`] spawns that dedicated thread and returns a
//! [`HotkeyListener`] handle.  Dropping the handle sets a stop flag so the
//! callback silently discards further events.
//!
//! # Usage
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use word_swiper::hotkey::{HotkeyListener, TriggerEvent, parse_key};
//!
//! let (tx, mut rx) = mpsc::channel(16);
//! let key = parse_key("F9").expect("unknown key");
//! let _listener = HotkeyListener::start(key, tx);
//!
//! // In your async loop:
//! // while let Some(TriggerEvent::Solve) = rx.recv().await { ... }
//! ```

pub mod listener;

pub use listener::HotkeyListener;

// ---------------------------------------------------------------------------
// TriggerEvent
// ---------------------------------------------------------------------------

/// Events emitted by the hotkey listener thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Run one capture → solve → swipe cycle.
    Solve,
}

// ---------------------------------------------------------------------------
// parse_key
// ---------------------------------------------------------------------------

/// Parse a hotkey name from a config string into an [`rdev::Key`].
///
/// Supports the function keys F1–F12 and a handful of named keys.  Letter
/// keys are deliberately not supported — a global single-letter trigger
/// would fire on ordinary typing.
///
/// Returns `None` for unrecognised names so callers can fall back to a
/// default or display an error to the user.
///
/// # Examples
///
/// ```
/// use word_swiper::hotkey::parse_key;
///
/// assert_eq!(parse_key("F9"),     Some(rdev::Key::F9));
/// assert_eq!(parse_key("Pause"),  Some(rdev::Key::Pause));
/// assert_eq!(parse_key("Q"),      None);
/// ```
pub fn parse_key(key_str: &str) -> Option<rdev::Key> {
    use rdev::Key;

    if let Some(n) = key_str.strip_prefix('F').and_then(|s| s.parse::<u8>().ok()) {
        return match n {
            1 => Some(Key::F1),
            2 => Some(Key::F2),
            3 => Some(Key::F3),
            4 => Some(Key::F4),
            5 => Some(Key::F5),
            6 => Some(Key::F6),
            7 => Some(Key::F7),
            8 => Some(Key::F8),
            9 => Some(Key::F9),
            10 => Some(Key::F10),
            11 => Some(Key::F11),
            12 => Some(Key::F12),
            _ => None,
        };
    }

    match key_str {
        "Pause" => Some(Key::Pause),
        "ScrollLock" => Some(Key::ScrollLock),
        "PrintScreen" => Some(Key::PrintScreen),
        "Insert" => Some(Key::Insert),
        "Home" => Some(Key::Home),
        "End" => Some(Key::End),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
