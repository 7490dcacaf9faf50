//! Central action dispatch. Every user intent flows through here: the
//! reducer updates session state, and any audio-thread consequence is
//! returned as an effect for the caller to forward.

use rondo_types::{reduce_session, Action, AudioEffect, MidiAction, SessionAction, TransportAction};

use crate::state::AppState;

#[derive(Debug, Default)]
pub struct DispatchResult {
    pub quit: bool,
    pub effects: Vec<AudioEffect>,
    /// Set when midi_enabled flipped; the runtime owns the port connection.
    pub midi_toggled: bool,
}

pub fn dispatch_action(action: Action, state: &mut AppState) -> DispatchResult {
    let mut result = DispatchResult::default();

    match action {
        Action::Transport(transport) => {
            if let Some(effect) = transport_effect(transport) {
                result.effects.push(effect);
            }
        }
        Action::Session(session_action) => {
            reduce_session(&session_action, &mut state.session);
            result
                .effects
                .push(session_effect(&session_action, state));
        }
        Action::Midi(midi_action) => match midi_action {
            MidiAction::ToggleEnabled => {
                state.session.midi_enabled = !state.session.midi_enabled;
                if !state.session.midi_enabled {
                    state.clear_held();
                }
                result.midi_toggled = true;
            }
            MidiAction::NoteOn(note) => state.note_on(note),
            MidiAction::NoteOff(note) => state.note_off(note),
            MidiAction::Panic => state.clear_held(),
        },
        Action::Quit => result.quit = true,
        Action::None => {}
    }

    result
}

fn transport_effect(action: TransportAction) -> Option<AudioEffect> {
    match action {
        TransportAction::Start => Some(AudioEffect::Start),
        TransportAction::Stop => Some(AudioEffect::Stop),
        TransportAction::Reset => Some(AudioEffect::Reset),
        // The runtime resolves Toggle into Start or Stop against the
        // transport phase it mirrors from the audio thread.
        TransportAction::Toggle => None,
    }
}

/// Effects carry the post-clamp value so the audio thread never sees a
/// setting the session state itself rejected.
fn session_effect(action: &SessionAction, state: &AppState) -> AudioEffect {
    match action {
        SessionAction::SetBpm(_) | SessionAction::AdjustBpm(_) => {
            AudioEffect::SetBpm(state.session.bpm)
        }
        SessionAction::SetMeasures(_) | SessionAction::AdjustMeasures(_) => {
            AudioEffect::SetMeasures(state.session.measures_to_change)
        }
        SessionAction::SetCategory(_) | SessionAction::CycleCategory => {
            AudioEffect::SetCategory(state.session.category)
        }
        SessionAction::TogglePrepBar => AudioEffect::SetPrepBar(state.session.prep_bar),
        SessionAction::AdjustClickVolume(_) => {
            AudioEffect::SetClickVolume(state.session.click_volume)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rondo_types::{DetectedChord, KeyCategory, MAX_BPM};

    #[test]
    fn test_quit() {
        let mut state = AppState::default();
        let result = dispatch_action(Action::Quit, &mut state);
        assert!(result.quit);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn test_bpm_effect_carries_clamped_value() {
        let mut state = AppState::default();
        let result = dispatch_action(
            Action::Session(SessionAction::SetBpm(999)),
            &mut state,
        );
        assert_eq!(state.session.bpm, MAX_BPM);
        assert_eq!(result.effects, vec![AudioEffect::SetBpm(MAX_BPM)]);
    }

    #[test]
    fn test_adjust_bpm_relative() {
        let mut state = AppState::default();
        dispatch_action(Action::Session(SessionAction::AdjustBpm(-5)), &mut state);
        assert_eq!(state.session.bpm, 115);
    }

    #[test]
    fn test_cycle_category_emits_effect() {
        let mut state = AppState::default();
        let result = dispatch_action(Action::Session(SessionAction::CycleCategory), &mut state);
        assert_eq!(state.session.category, KeyCategory::Majors);
        assert_eq!(
            result.effects,
            vec![AudioEffect::SetCategory(KeyCategory::Majors)]
        );
    }

    #[test]
    fn test_toggle_midi_off_clears_held_notes() {
        let mut state = AppState::default();
        state.session.midi_enabled = true;
        dispatch_action(Action::Midi(MidiAction::NoteOn(60)), &mut state);
        dispatch_action(Action::Midi(MidiAction::NoteOn(64)), &mut state);
        dispatch_action(Action::Midi(MidiAction::NoteOn(67)), &mut state);

        let result = dispatch_action(Action::Midi(MidiAction::ToggleEnabled), &mut state);
        assert!(result.midi_toggled);
        assert!(!state.session.midi_enabled);
        assert!(state.held_notes.is_empty());
        assert_eq!(state.detected_chord, DetectedChord::NothingHeld);
    }

    #[test]
    fn test_panic_clears_held_notes() {
        let mut state = AppState::default();
        dispatch_action(Action::Midi(MidiAction::NoteOn(60)), &mut state);
        dispatch_action(Action::Midi(MidiAction::NoteOn(64)), &mut state);
        dispatch_action(Action::Midi(MidiAction::Panic), &mut state);
        assert!(state.held_notes.is_empty());
        assert_eq!(state.detected_chord, DetectedChord::NothingHeld);
    }

    #[test]
    fn test_transport_start_effect() {
        let mut state = AppState::default();
        let result = dispatch_action(Action::Transport(TransportAction::Start), &mut state);
        assert_eq!(result.effects, vec![AudioEffect::Start]);
    }

    #[test]
    fn test_toggle_has_no_direct_effect() {
        let mut state = AppState::default();
        let result = dispatch_action(Action::Transport(TransportAction::Toggle), &mut state);
        assert!(result.effects.is_empty());
    }
}
