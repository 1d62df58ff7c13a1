use std::{path::PathBuf, sync::atomic::Ordering};

use ringbuf::traits::Observer as _;

use serde::{Deserialize, Serialize};

use super::decoder::{spawn_decoder, DecoderHandle};

/// Playback states of the azan channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeckState {
    Idle,
    Playing,
    Paused,
    Stopped,
}

/// The single playback channel.
///
/// The deck does not own an audio output thread. The CPAL callback in
/// `audio::engine` calls `fill_buffer()` each time the device needs samples;
/// control methods run on whatever thread holds the deck lock.
pub struct Deck {
    pub state: DeckState,

    // Active decoder (None when Idle/Stopped)
    decoder: Option<DecoderHandle>,

    /// Master playback gain (0.0 – 1.0)
    pub gain: f32,

    // Frames handed to the device, for position reporting
    frames_consumed: u64,
    sample_rate: u32,
}

impl Deck {
    pub fn new(gain: f32) -> Self {
        Self {
            state: DeckState::Idle,
            decoder: None,
            gain: gain.clamp(0.0, 1.0),
            frames_consumed: 0,
            sample_rate: 44100,
        }
    }

    /// Load `path` and start playing from the beginning.
    /// Stops any existing playback first.
    pub fn load(&mut self, path: PathBuf) -> Result<(), String> {
        self.stop_decoder();
        self.frames_consumed = 0;

        let handle = spawn_decoder(path)?;
        self.sample_rate = handle.sample_rate;
        self.decoder = Some(handle);
        self.state = DeckState::Playing;
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state == DeckState::Playing {
            self.state = DeckState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == DeckState::Paused {
            self.state = DeckState::Playing;
        }
    }

    pub fn stop(&mut self) {
        self.stop_decoder();
        self.state = DeckState::Stopped;
        self.frames_consumed = 0;
    }

    /// Current position in ms based on frames consumed
    pub fn position_ms(&self) -> u64 {
        if self.sample_rate == 0 {
            return 0;
        }
        self.frames_consumed * 1000 / self.sample_rate as u64
    }

    /// Whether the decode thread has finished and the ring buffer is drained
    pub fn is_eof(&self) -> bool {
        match &self.decoder {
            Some(d) => d.decode_done.load(Ordering::Relaxed) && d.consumer.is_empty(),
            None => true,
        }
    }

    /// Fill `output` with interleaved stereo f32 samples, scaled by `self.gain`.
    /// Zeros are written for any frames the ring buffer cannot supply.
    ///
    /// Called on the real-time audio thread — no allocations, no blocking.
    pub fn fill_buffer(&mut self, output: &mut [f32]) {
        if self.state != DeckState::Playing {
            output.fill(0.0);
            return;
        }

        let finished = {
            let decoder = match &mut self.decoder {
                Some(d) => d,
                None => {
                    output.fill(0.0);
                    return;
                }
            };

            use ringbuf::traits::Consumer as _;
            let mut i = 0;
            while i < output.len() {
                match decoder.consumer.try_pop() {
                    Some(s) => {
                        output[i] = s * self.gain;
                        i += 1;
                    }
                    None => {
                        // Underrun — fill the rest with silence
                        output[i..].fill(0.0);
                        break;
                    }
                }
            }
            self.frames_consumed += (i / 2) as u64;

            decoder.decode_done.load(Ordering::Relaxed) && decoder.consumer.is_empty()
        };

        if finished {
            // The azan played to its end
            self.stop_decoder();
            self.state = DeckState::Stopped;
        }
    }

    // ── Private helpers ──────────────────────────────────────────────────

    fn stop_decoder(&mut self) {
        if let Some(d) = self.decoder.take() {
            d.stop_flag.store(true, Ordering::Relaxed);
            // Thread exits on its own after seeing stop_flag
        }
    }
}

impl Drop for Deck {
    fn drop(&mut self) {
        self.stop_decoder();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pause_only_applies_while_playing() {
        let mut deck = Deck::new(1.0);
        deck.pause();
        assert_eq!(deck.state, DeckState::Idle);
        deck.resume();
        assert_eq!(deck.state, DeckState::Idle);
    }

    #[test]
    fn stop_resets_position() {
        let mut deck = Deck::new(1.0);
        deck.stop();
        assert_eq!(deck.state, DeckState::Stopped);
        assert_eq!(deck.position_ms(), 0);
    }

    #[test]
    fn idle_deck_outputs_silence() {
        let mut deck = Deck::new(1.0);
        let mut out = [1.0_f32; 64];
        deck.fill_buffer(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn gain_is_clamped() {
        assert_eq!(Deck::new(3.0).gain, 1.0);
        assert_eq!(Deck::new(-1.0).gain, 0.0);
    }

    #[test]
    fn missing_file_reports_an_error() {
        let mut deck = Deck::new(1.0);
        let err = deck.load(PathBuf::from("/nonexistent/azan.mp3"));
        assert!(err.is_err());
        assert_eq!(deck.state, DeckState::Idle);
    }
}
