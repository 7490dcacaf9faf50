//! # rondo-core
//!
//! Backend library for the rondo metronome: application state, action
//! dispatch, MIDI input, and configuration — independent of any UI framework
//! and of the audio thread (audio side effects are returned to the caller,
//! which forwards them through `rondo_audio::AudioHandle`).

pub mod config;
pub mod dispatch;
pub mod midi;
pub mod state;
