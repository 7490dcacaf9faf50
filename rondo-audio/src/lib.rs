//! # rondo-audio
//!
//! Audio subsystem for the rondo metronome: the lookahead beat scheduler,
//! key rotation state machine, click synthesis on a cpal output stream, and
//! the command/feedback channel protocol. The `AudioHandle` is the only type
//! other crates need; everything time-critical runs on a dedicated thread.

mod audio_thread;
mod commands;
mod engine;
mod handle;
mod rotation;
mod scheduler;

pub use commands::{AudioCmd, AudioFeedback};
pub use handle::{AudioHandle, AudioReadState};
pub use rotation::KeyRotation;
pub use scheduler::{BeatEvent, BeatKind, BeatScheduler, TransportParams};
