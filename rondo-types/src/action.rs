//! Action enums: the command surface from UI and MIDI input.

use serde::{Deserialize, Serialize};

use crate::state::music::KeyCategory;

/// Top-level action. Dispatched through `rondo_core::dispatch::dispatch_action`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Transport(TransportAction),
    Session(SessionAction),
    Midi(MidiAction),
    Quit,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportAction {
    Start,
    Stop,
    /// Start if stopped, stop if active
    Toggle,
    /// Re-synchronize a running transport (or re-roll keys while stopped)
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SessionAction {
    SetBpm(u16),
    AdjustBpm(i16),
    SetMeasures(u8),
    AdjustMeasures(i8),
    SetCategory(KeyCategory),
    CycleCategory,
    TogglePrepBar,
    AdjustClickVolume(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MidiAction {
    ToggleEnabled,
    NoteOn(u8),
    NoteOff(u8),
    /// Drop every held note (stuck-note recovery)
    Panic,
}

/// Side effect for the audio thread, produced by dispatch and applied by the
/// caller through `AudioHandle`. Keeps rondo-core free of audio dependencies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AudioEffect {
    Start,
    Stop,
    Reset,
    SetBpm(u16),
    SetMeasures(u8),
    SetPrepBar(bool),
    SetCategory(KeyCategory),
    SetClickVolume(f32),
}
