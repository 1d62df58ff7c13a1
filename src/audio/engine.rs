use std::sync::{Arc, Mutex};

use cpal::{
    traits::{DeviceTrait, HostTrait, StreamTrait},
    Stream,
};

use crate::schedule::prayer::PrayerName;

use super::{
    deck::{Deck, DeckState},
    library::AzanLibrary,
    player::AzanPlayer,
};

/// cpal-backed azan player: one output stream, one deck.
///
/// The stream callback pulls interleaved f32 from the deck; the control
/// methods lock the deck from the caller's thread. The callback uses
/// `try_lock` and outputs silence when the lock is contended rather than
/// blocking the real-time thread.
pub struct CpalPlayer {
    _stream: Stream,
    deck: Arc<Mutex<Deck>>,
    library: AzanLibrary,
}

impl CpalPlayer {
    /// Initialise the default output device and start the stream.
    pub fn new(library: AzanLibrary, volume: f32) -> Result<Self, String> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or("No default audio output device found")?;

        let config = device
            .default_output_config()
            .map_err(|e| format!("Default config error: {e}"))?;

        log::info!(
            "Audio device: {} | sample rate: {} | channels: {}",
            device.name().unwrap_or_default(),
            config.sample_rate().0,
            config.channels()
        );

        let deck = Arc::new(Mutex::new(Deck::new(volume)));
        let deck_cb = Arc::clone(&deck);

        let err_fn = |e| log::error!("CPAL stream error: {e}");
        let stream = device
            .build_output_stream(
                &config.into(),
                move |output: &mut [f32], _info: &cpal::OutputCallbackInfo| {
                    match deck_cb.try_lock() {
                        Ok(mut deck) => deck.fill_buffer(output),
                        // Lock held by a control call — silence beats a glitch
                        Err(_) => output.fill(0.0),
                    }
                },
                err_fn,
                None,
            )
            .map_err(|e| format!("Build stream error: {e}"))?;
        stream
            .play()
            .map_err(|e| format!("Stream play error: {e}"))?;

        Ok(Self {
            _stream: stream,
            deck,
            library,
        })
    }

    pub fn deck_state(&self) -> DeckState {
        self.deck.lock().unwrap().state
    }

    pub fn position_ms(&self) -> u64 {
        self.deck.lock().unwrap().position_ms()
    }
}

impl AzanPlayer for CpalPlayer {
    fn play(&self, prayer: PrayerName) -> Result<(), String> {
        let path = self
            .library
            .resolve(prayer)
            .ok_or_else(|| format!("no azan audio configured for {prayer}"))?;
        if !path.is_file() {
            return Err(format!("azan file not found: {}", path.display()));
        }
        self.deck.lock().unwrap().load(path.clone())
    }

    fn pause(&self) {
        self.deck.lock().unwrap().pause();
    }

    fn resume(&self) {
        self.deck.lock().unwrap().resume();
    }

    fn stop(&self) {
        self.deck.lock().unwrap().stop();
    }
}

// SAFETY: cpal::Stream is !Send/!Sync on some platforms. The stream itself is
// created and dropped on the daemon's main thread and is never touched again
// through this handle — the scheduler's timer task only reaches the deck,
// which lives behind its own Mutex.
unsafe impl Send for CpalPlayer {}
unsafe impl Sync for CpalPlayer {}
