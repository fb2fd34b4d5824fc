//! Application entry point — Word Swiper.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime (multi-thread, 2 workers).
//! 4. Build the collaborators: screen frame source, tesseract recognizer
//!    (stubbed when the binary is missing), pointer actuator (absent when
//!    the input backend refuses to initialise).
//! 5. Spawn the dictionary load onto the blocking pool.
//! 6. Spawn the hotkey listener thread.
//! 7. Block on the pipeline orchestrator until the process is killed.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use word_swiper::{
    capture::{Frame, FrameSource, ScreenFrameSource},
    config::AppConfig,
    dict::{self, Dictionary},
    gesture::{GestureActuator, PointerActuator},
    hotkey::{parse_key, HotkeyListener, TriggerEvent},
    pipeline::{new_shared_state, PipelineOrchestrator},
    recognize::{RecognizeError, TesseractRecognizer, TextDetection, TextRecognizer},
};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Word Swiper starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (2 workers — recognition + gesture playback)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to create tokio runtime");

    // 4. Collaborators
    let frames: Arc<dyn FrameSource> = Arc::new(ScreenFrameSource::new());

    let tesseract = TesseractRecognizer::default();
    let recognizer: Arc<dyn TextRecognizer> = match tesseract.probe() {
        Ok(()) => {
            log::info!("tesseract OCR engine found");
            Arc::new(tesseract)
        }
        Err(e) => {
            log::warn!("{e}; recognition will return an error until tesseract is installed");
            // Use a stub that always returns an explanatory error so the app
            // still launches without tesseract present.
            Arc::new(NoEngineRecognizer)
        }
    };

    let actuator: Option<Arc<dyn GestureActuator>> = match PointerActuator::probe() {
        Ok(()) => Some(Arc::new(PointerActuator::new())),
        Err(e) => {
            log::warn!("gesture actuator unavailable ({e}); solve cycles will be rejected");
            None
        }
    };

    // 5. Dictionary (loads in the background; triggers before it finishes
    //    report DictionaryNotReady)
    let dictionary = Arc::new(Dictionary::new());
    let dictionary_path = config.dictionary.resolved_path();

    // 6. Trigger channel + hotkey listener thread
    let (trigger_tx, trigger_rx) = mpsc::channel::<TriggerEvent>(16);
    let solve_key = parse_key(&config.hotkey.solve_key).unwrap_or_else(|| {
        log::warn!(
            "unknown solve key {:?}, falling back to F9",
            config.hotkey.solve_key
        );
        rdev::Key::F9
    });
    let _hotkey_listener = HotkeyListener::start(solve_key, trigger_tx);
    log::info!("press {} to solve the board", config.hotkey.solve_key);

    // 7. Run the orchestrator (blocks until the process exits)
    let state = new_shared_state(config);
    let orchestrator =
        PipelineOrchestrator::new(state, frames, recognizer, Arc::clone(&dictionary), actuator);

    rt.block_on(async move {
        dict::spawn_load(dictionary, dictionary_path);
        orchestrator.run(trigger_rx).await;
    });

    Ok(())
}

// ---------------------------------------------------------------------------
// NoEngineRecognizer — fallback TextRecognizer when tesseract is absent
// ---------------------------------------------------------------------------

struct NoEngineRecognizer;

#[async_trait]
impl TextRecognizer for NoEngineRecognizer {
    async fn recognize(&self, _frame: &Frame) -> Result<Vec<TextDetection>, RecognizeError> {
        Err(RecognizeError::EngineMissing(
            "tesseract is not installed or not on PATH".into(),
        ))
    }
}
