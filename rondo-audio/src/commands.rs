//! Command/feedback protocol between the main thread and the audio thread.

use rondo_types::{KeyCategory, MusicalKey};

/// Commands into the audio thread. All pending commands are drained before
/// each scheduler poll, so the scheduler always reads the latest parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioCmd {
    Start,
    Stop,
    Reset,
    SetBpm(u16),
    SetMeasures(u8),
    SetPrepBar(bool),
    SetCategory(KeyCategory),
    SetClickVolume(f32),
    Shutdown,
}

/// Feedback out of the audio thread. The audio thread is the authority on
/// transport counters and the Active/Next key pair; the UI only mirrors them.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioFeedback {
    Beat {
        beat: u8,
        measure: u8,
        preparing: bool,
    },
    Stopped,
    Keys {
        active: MusicalKey,
        next: MusicalKey,
    },
    /// Audio clock could not be acquired; transport did not start.
    StreamError(String),
}
