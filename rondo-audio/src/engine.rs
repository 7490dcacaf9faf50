//! Click synthesis on a cpal output stream.
//!
//! The output callback is also the audio clock: a monotonic sample counter
//! advanced per rendered frame, read as seconds by the scheduler. Scheduled
//! clicks become short sine voices with an exponential decay envelope, mixed
//! sample-accurately at their absolute start sample.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::StreamConfig;

use crate::scheduler::BeatKind;

/// Click duration; matches the envelope ramp of the original tone.
const CLICK_DECAY_SECS: f32 = 0.1;
/// Envelope end value for the exponential ramp (1.0 -> floor over the decay).
const ENVELOPE_FLOOR: f32 = 0.001;

struct ClickVoice {
    start_sample: u64,
    freq: f32,
    amp: f32,
}

struct EngineShared {
    /// Frames rendered since the stream started; the audio clock.
    samples: AtomicU64,
    /// Pending and sounding voices. Locked briefly by the callback and by
    /// `schedule_click`; both sides only push/retain, never block.
    voices: Mutex<Vec<ClickVoice>>,
}

/// Owns the output stream. Must live on the thread that created it
/// (cpal streams are not Send); in practice that is the audio thread.
pub(crate) struct ClickEngine {
    _stream: cpal::Stream,
    shared: Arc<EngineShared>,
    sample_rate: f64,
}

impl ClickEngine {
    /// Acquire the default output device and start the stream. Failure here
    /// is the fatal precondition for starting transport; it is reported
    /// upward, never retried.
    pub fn new() -> Result<Self, String> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| "no audio output device available".to_string())?;
        let config = device
            .default_output_config()
            .map_err(|e| format!("failed to query output config: {}", e))?;

        let sample_rate = f64::from(config.sample_rate().0);
        let channels = config.channels() as usize;
        let stream_config: StreamConfig = config.into();

        let shared = Arc::new(EngineShared {
            samples: AtomicU64::new(0),
            voices: Mutex::new(Vec::new()),
        });
        let cb_shared = Arc::clone(&shared);

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    render(data, channels, sample_rate, &cb_shared);
                },
                |err| {
                    log::error!(target: "audio", "output stream error: {}", err);
                },
                None,
            )
            .map_err(|e| format!("failed to build output stream: {}", e))?;

        stream
            .play()
            .map_err(|e| format!("failed to start output stream: {}", e))?;

        log::info!(target: "audio", "output stream up ({} Hz, {} ch)", sample_rate, channels);

        Ok(Self {
            _stream: stream,
            shared,
            sample_rate,
        })
    }

    /// Monotonic audio-clock reading in seconds.
    pub fn now(&self) -> f64 {
        self.shared.samples.load(Ordering::Relaxed) as f64 / self.sample_rate
    }

    /// Queue a click at an absolute clock time. `time` is normally in the
    /// future (inside the schedule-ahead window); a past time plays
    /// immediately from its envelope midpoint rather than being dropped.
    pub fn schedule_click(&self, time: f64, kind: BeatKind, volume: f32) {
        let start_sample = (time.max(0.0) * self.sample_rate) as u64;
        if let Ok(mut voices) = self.shared.voices.lock() {
            voices.push(ClickVoice {
                start_sample,
                freq: kind.frequency(),
                amp: volume,
            });
        }
    }

    /// Drop every voice that has not finished sounding. Stop must be
    /// deterministic: no scheduled beat may fire afterwards.
    pub fn cancel_pending(&self) {
        if let Ok(mut voices) = self.shared.voices.lock() {
            voices.clear();
        }
    }
}

fn render(data: &mut [f32], channels: usize, sample_rate: f64, shared: &EngineShared) {
    let start = shared.samples.load(Ordering::Relaxed);
    let frames = (data.len() / channels.max(1)) as u64;

    let mut voices = match shared.voices.lock() {
        Ok(v) => v,
        Err(_) => {
            data.fill(0.0);
            shared.samples.fetch_add(frames, Ordering::Relaxed);
            return;
        }
    };

    let decay_samples = (CLICK_DECAY_SECS as f64 * sample_rate) as u64;
    for (i, frame) in data.chunks_mut(channels.max(1)).enumerate() {
        let n = start + i as u64;
        let mut sample = 0.0f32;
        for voice in voices.iter() {
            if n < voice.start_sample || n >= voice.start_sample + decay_samples {
                continue;
            }
            let t = (n - voice.start_sample) as f32 / sample_rate as f32;
            let envelope = ENVELOPE_FLOOR.powf(t / CLICK_DECAY_SECS);
            sample += (std::f32::consts::TAU * voice.freq * t).sin() * envelope * voice.amp;
        }
        for out in frame.iter_mut() {
            *out = sample;
        }
    }

    let end = start + frames;
    voices.retain(|v| v.start_sample + decay_samples > end);
    shared.samples.store(end, Ordering::Relaxed);
}
