//! Application state: session settings plus the live MIDI note set and the
//! chord derived from it. Transport counters and the key pair live on the
//! audio thread and are mirrored by the UI, not stored here.

use std::collections::BTreeSet;

use rondo_types::{classify_chord, DetectedChord, SessionState};

pub struct AppState {
    pub session: SessionState,
    /// Currently held MIDI note numbers, bass-first by ordering.
    pub held_notes: BTreeSet<u8>,
    /// Classification of the held set, recomputed on every note change.
    pub detected_chord: DetectedChord,
}

impl AppState {
    pub fn new(session: SessionState) -> Self {
        Self {
            session,
            held_notes: BTreeSet::new(),
            detected_chord: DetectedChord::NothingHeld,
        }
    }

    pub fn note_on(&mut self, note: u8) {
        self.held_notes.insert(note);
        self.reclassify();
    }

    /// A release for a note that is not held is ignored.
    pub fn note_off(&mut self, note: u8) {
        if self.held_notes.remove(&note) {
            self.reclassify();
        }
    }

    pub fn clear_held(&mut self) {
        self.held_notes.clear();
        self.detected_chord = DetectedChord::NothingHeld;
    }

    fn reclassify(&mut self) {
        let held: Vec<u8> = self.held_notes.iter().copied().collect();
        self.detected_chord = classify_chord(&held);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(SessionState::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rondo_types::{ChordQuality, PitchClass};

    #[test]
    fn test_notes_update_chord() {
        let mut state = AppState::default();
        state.note_on(60);
        state.note_on(64);
        assert_eq!(state.detected_chord, DetectedChord::Unrecognized);

        state.note_on(67);
        assert_eq!(
            state.detected_chord,
            DetectedChord::Chord {
                root: PitchClass::C,
                quality: ChordQuality::Major,
            }
        );

        state.note_off(64);
        assert_eq!(state.detected_chord, DetectedChord::Unrecognized);
    }

    #[test]
    fn test_release_all_returns_to_nothing_held() {
        let mut state = AppState::default();
        state.note_on(60);
        state.note_on(64);
        state.note_on(67);
        state.note_off(60);
        state.note_off(64);
        state.note_off(67);
        assert_eq!(state.detected_chord, DetectedChord::NothingHeld);
        assert!(state.held_notes.is_empty());
    }

    #[test]
    fn test_stray_note_off_is_ignored() {
        let mut state = AppState::default();
        state.note_on(60);
        state.note_on(64);
        state.note_on(67);
        let before = state.detected_chord.clone();
        state.note_off(99);
        assert_eq!(state.detected_chord, before);
    }

    #[test]
    fn test_clear_held() {
        let mut state = AppState::default();
        state.note_on(60);
        state.note_on(64);
        state.clear_held();
        assert!(state.held_notes.is_empty());
        assert_eq!(state.detected_chord, DetectedChord::NothingHeld);
    }
}
