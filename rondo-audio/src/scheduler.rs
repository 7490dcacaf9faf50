//! Lookahead beat scheduler.
//!
//! The poll loop runs on a coarse, jitter-prone timer; every beat that falls
//! inside the schedule-ahead window is emitted with its exact audio-clock
//! timestamp, so playback stays sample-accurate no matter how late the poll
//! wakes up. Tempo and measure interval are read fresh on every poll, never
//! snapshotted at start.

use std::time::Duration;

use rondo_types::{TransportPhase, BEATS_PER_MEASURE};

/// How far ahead of the audio clock beats are scheduled.
pub const SCHEDULE_AHEAD_SECS: f64 = 0.1;

/// Poll period for the scheduling loop.
pub const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Safety margin between starting transport and the first beat.
const START_DELAY_SECS: f64 = 0.05;

/// What a beat should sound like. Attached by the scheduler; the output
/// device never infers accents itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatKind {
    /// Downbeat of the count-off measure
    PrepAccent,
    /// Downbeat of a real measure
    Accent,
    /// Any other beat
    Tick,
}

impl BeatKind {
    /// Click oscillator frequency for this beat.
    pub fn frequency(&self) -> f32 {
        match self {
            BeatKind::PrepAccent => 1200.0,
            BeatKind::Accent => 880.0,
            BeatKind::Tick => 440.0,
        }
    }
}

/// A scheduled beat: when it plays and what the counters read at that beat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeatEvent {
    /// Absolute audio-clock time the beat must sound at
    pub time: f64,
    /// Beat within the measure, 1-4
    pub beat: u8,
    /// Measure within the rotation interval; 0 during the prep measure
    pub measure: u8,
    pub preparing: bool,
    pub kind: BeatKind,
    /// True when this beat begins a new rotation interval. The key rotation
    /// must be applied while handling this event, before the next beat's
    /// timestamp is computed.
    pub rotates_key: bool,
}

/// Parameters the scheduler reads at poll time. The owning thread refreshes
/// these from incoming commands before every poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransportParams {
    pub bpm: u16,
    pub measures_to_change: u8,
}

#[derive(Debug)]
pub struct BeatScheduler {
    phase: TransportPhase,
    beat: u8,
    measure: u8,
    next_beat_time: f64,
}

impl BeatScheduler {
    pub fn new() -> Self {
        Self {
            phase: TransportPhase::Stopped,
            beat: 0,
            measure: 1,
            next_beat_time: 0.0,
        }
    }

    pub fn phase(&self) -> TransportPhase {
        self.phase
    }

    /// Arm the scheduler at `now`. With a prep bar the first measure is a
    /// count-off (measure counter 0); otherwise counting starts at measure 1.
    /// Also used for reset-while-running: identical re-initialization, and
    /// the armed timestamp is strictly after `now`.
    pub fn start(&mut self, now: f64, prep_bar: bool) {
        self.beat = 0;
        if prep_bar {
            self.phase = TransportPhase::Preparing;
            self.measure = 0;
        } else {
            self.phase = TransportPhase::Running;
            self.measure = 1;
        }
        self.next_beat_time = now + START_DELAY_SECS;
    }

    /// Stop scheduling and restore display defaults. No key rotation.
    pub fn stop(&mut self) {
        self.phase = TransportPhase::Stopped;
        self.beat = 0;
        self.measure = 1;
    }

    /// Emit every beat due inside the schedule-ahead window. Drains all due
    /// beats before returning, so a starved host catches up instead of
    /// skipping beats. Non-blocking; the caller re-arms the poll timer
    /// unconditionally.
    pub fn poll(&mut self, now: f64, params: &TransportParams, mut emit: impl FnMut(BeatEvent)) {
        if !self.phase.is_active() {
            return;
        }
        while self.next_beat_time < now + SCHEDULE_AHEAD_SECS {
            let event = self.advance(params);
            emit(event);
            // Fresh read: a tempo change takes effect at the next boundary,
            // never mid-beat.
            let seconds_per_beat = 60.0 / f64::from(params.bpm);
            self.next_beat_time += seconds_per_beat;
        }
    }

    /// Advance beat/measure counters by one beat and describe the beat that
    /// now sounds. Invoked exactly once per emitted beat.
    fn advance(&mut self, params: &TransportParams) -> BeatEvent {
        self.beat += 1;
        let mut rotates_key = false;
        if self.beat > BEATS_PER_MEASURE {
            self.beat = 1;
            if self.phase == TransportPhase::Preparing {
                // The count-off is always exactly one measure and never
                // rotates the key.
                self.phase = TransportPhase::Running;
                self.measure = 1;
            } else {
                self.measure += 1;
                if self.measure > params.measures_to_change {
                    self.measure = 1;
                    rotates_key = true;
                }
            }
        }

        let preparing = self.phase == TransportPhase::Preparing;
        let kind = if self.beat != 1 {
            BeatKind::Tick
        } else if preparing {
            BeatKind::PrepAccent
        } else {
            BeatKind::Accent
        };

        BeatEvent {
            time: self.next_beat_time,
            beat: self.beat,
            measure: self.measure,
            preparing,
            kind,
            rotates_key,
        }
    }
}

impl Default for BeatScheduler {
    fn default() -> Self {
        Self::new()
    }
}
