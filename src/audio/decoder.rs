use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
};

use ringbuf::{
    traits::{Observer as _, Producer as _, Split},
    HeapRb,
};
use symphonia::core::{
    audio::SampleBuffer,
    codecs::{DecoderOptions, CODEC_TYPE_NULL},
    errors::Error as SymphoniaError,
    formats::FormatOptions,
    io::MediaSourceStream,
    meta::MetadataOptions,
    probe::Hint,
};

/// Stereo f32 samples buffered ahead of the playback thread (~3 s at 44.1 kHz)
const RING_CAPACITY: usize = 44100 * 2 * 3;

/// Consumer-side handle owned by the deck.
pub struct DecoderHandle {
    pub consumer: ringbuf::HeapCons<f32>,
    pub stop_flag: Arc<AtomicBool>,
    /// Set true when the decode thread reaches EOF or a fatal error.
    pub decode_done: Arc<AtomicBool>,
    pub sample_rate: u32,
}

/// Spawn a background Symphonia decode thread for `path`.
/// Returns a `DecoderHandle` the deck uses to pull interleaved stereo PCM.
pub fn spawn_decoder(path: PathBuf) -> Result<DecoderHandle, String> {
    let rb = HeapRb::<f32>::new(RING_CAPACITY);
    let (mut producer, consumer) = rb.split();

    let stop_flag = Arc::new(AtomicBool::new(false));
    let decode_done = Arc::new(AtomicBool::new(false));

    let sample_rate = probe_sample_rate(&path)?;

    let handle = DecoderHandle {
        consumer,
        stop_flag: Arc::clone(&stop_flag),
        decode_done: Arc::clone(&decode_done),
        sample_rate,
    };

    let stop_flag_t = Arc::clone(&stop_flag);
    let decode_done_t = Arc::clone(&decode_done);

    thread::Builder::new()
        .name(format!(
            "azan-dec:{}",
            path.file_name().unwrap_or_default().to_string_lossy()
        ))
        .spawn(move || {
            if let Err(e) = decode_loop(path, &mut producer, &stop_flag_t) {
                log::warn!("Decoder exited: {e}");
            }
            decode_done_t.store(true, Ordering::Relaxed);
        })
        .map_err(|e| format!("Failed to spawn decoder thread: {e}"))?;

    Ok(handle)
}

fn open_format(
    path: &PathBuf,
) -> Result<Box<dyn symphonia::core::formats::FormatReader>, String> {
    let file =
        std::fs::File::open(path).map_err(|e| format!("Cannot open {}: {e}", path.display()))?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());
    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }
    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| format!("Probe failed: {e}"))?;
    Ok(probed.format)
}

fn probe_sample_rate(path: &PathBuf) -> Result<u32, String> {
    let format = open_format(path)?;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or("No audio track found")?;
    Ok(track.codec_params.sample_rate.unwrap_or(44100))
}

fn decode_loop(
    path: PathBuf,
    producer: &mut ringbuf::HeapProd<f32>,
    stop_flag: &AtomicBool,
) -> Result<(), String> {
    let mut format = open_format(&path)?;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or("No audio track found")?
        .clone();

    let track_id = track.id;
    let n_channels = track
        .codec_params
        .channels
        .map(|c| c.count())
        .unwrap_or(1)
        .max(1);

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| format!("Codec init: {e}"))?;

    let mut sample_buf: Option<SampleBuffer<f32>> = None;

    loop {
        if stop_flag.load(Ordering::Relaxed) {
            break;
        }
        let packet = match format.next_packet() {
            Ok(p) => p,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(SymphoniaError::ResetRequired) => {
                decoder.reset();
                continue;
            }
            Err(e) => {
                log::warn!("Format read: {e}");
                break;
            }
        };
        if packet.track_id() != track_id {
            continue;
        }
        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            Err(SymphoniaError::DecodeError(e)) => {
                log::warn!("Decode error (skip): {e}");
                continue;
            }
            Err(e) => {
                log::warn!("Fatal decode: {e}");
                break;
            }
        };

        let buf = sample_buf.get_or_insert_with(|| {
            SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec())
        });
        buf.copy_interleaved_ref(decoded);

        if !push_stereo(buf.samples(), n_channels, producer, stop_flag) {
            break;
        }
    }
    Ok(())
}

/// Push interleaved source frames as stereo pairs. Mono is duplicated to
/// both channels, channels beyond the first two are dropped.
/// Returns false when the stop flag interrupted the push.
fn push_stereo(
    samples: &[f32],
    n_channels: usize,
    producer: &mut ringbuf::HeapProd<f32>,
    stop_flag: &AtomicBool,
) -> bool {
    for frame in samples.chunks(n_channels) {
        let l = frame[0];
        let r = if frame.len() > 1 { frame[1] } else { frame[0] };
        // Wait for room for BOTH samples so an interleaved pair is never
        // split across a full buffer.
        loop {
            if stop_flag.load(Ordering::Relaxed) {
                return false;
            }
            if producer.vacant_len() >= 2 {
                let _ = producer.try_push(l);
                let _ = producer.try_push(r);
                break;
            }
            thread::yield_now();
        }
    }
    true
}
