//! Session settings and transport display state.

use serde::{Deserialize, Serialize};

use super::music::KeyCategory;

pub const MIN_BPM: u16 = 40;
pub const MAX_BPM: u16 = 240;
pub const MIN_MEASURES: u8 = 1;
pub const MAX_MEASURES: u8 = 16;

/// Beats per measure. The metronome is fixed at 4/4.
pub const BEATS_PER_MEASURE: u8 = 4;

/// User-editable session settings. Mutated only through reducers;
/// the audio thread reads the latest values via commands, never a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Tempo in beats per minute, clamped to [MIN_BPM, MAX_BPM]
    pub bpm: u16,
    /// Measures before the key rotates, clamped to [MIN_MEASURES, MAX_MEASURES]
    pub measures_to_change: u8,
    /// Whether starting transport plays a one-measure count-off first
    pub prep_bar: bool,
    /// Which keys the rotation draws from
    pub category: KeyCategory,
    /// Click volume (0.0 - 1.0)
    pub click_volume: f32,
    /// Whether MIDI input is enabled
    pub midi_enabled: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            bpm: 120,
            measures_to_change: 4,
            prep_bar: true,
            category: KeyCategory::All,
            click_volume: 0.7,
            midi_enabled: false,
        }
    }
}

/// Transport lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportPhase {
    Stopped,
    /// Count-off measure in progress (prep bar)
    Preparing,
    Running,
}

impl TransportPhase {
    pub fn is_active(&self) -> bool {
        !matches!(self, TransportPhase::Stopped)
    }
}

impl Default for TransportPhase {
    fn default() -> Self {
        TransportPhase::Stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_defaults() {
        let s = SessionState::default();
        assert_eq!(s.bpm, 120);
        assert_eq!(s.measures_to_change, 4);
        assert!(s.prep_bar);
        assert_eq!(s.category, KeyCategory::All);
        assert!(!s.midi_enabled);
    }

    #[test]
    fn stopped_is_not_active() {
        assert!(!TransportPhase::Stopped.is_active());
        assert!(TransportPhase::Preparing.is_active());
        assert!(TransportPhase::Running.is_active());
    }
}
