//! Main event loop: keyboard input, dispatch, MIDI polling, audio feedback,
//! and rendering.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::backend::Backend;
use ratatui::Terminal;

use rondo_audio::AudioHandle;
use rondo_core::config::Config;
use rondo_core::dispatch::dispatch_action;
use rondo_core::midi::{MidiEvent, MidiInputManager};
use rondo_core::state::AppState;
use rondo_types::{Action, MidiAction, SessionAction, TransportAction};

const POLL_TIMEOUT: Duration = Duration::from_millis(16);
const RENDER_INTERVAL: Duration = Duration::from_millis(33);

pub struct AppRuntime {
    state: AppState,
    audio: AudioHandle,
    midi_input: MidiInputManager,
}

impl AppRuntime {
    pub fn new() -> Self {
        let config = Config::load();
        let state = AppState::new(config.session_defaults());
        let audio = AudioHandle::new(&state.session);

        Self {
            state,
            audio,
            midi_input: MidiInputManager::new(),
        }
    }

    pub fn run<B: Backend>(mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        let mut last_render = Instant::now() - RENDER_INTERVAL;
        let mut dirty = true;

        loop {
            if event::poll(POLL_TIMEOUT)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        let action = map_key(&key);
                        if self.apply(action) {
                            break;
                        }
                        dirty = true;
                    }
                    Event::Resize(_, _) => dirty = true,
                    _ => {}
                }
            }

            for midi_event in self.midi_input.poll_events() {
                let action = match midi_event {
                    MidiEvent::NoteOn { note, .. } => Action::Midi(MidiAction::NoteOn(note)),
                    MidiEvent::NoteOff { note } => Action::Midi(MidiAction::NoteOff(note)),
                };
                self.apply(action);
                dirty = true;
            }

            if self.audio.drain_feedback() {
                dirty = true;
            }

            if dirty && last_render.elapsed() >= RENDER_INTERVAL {
                last_render = Instant::now();
                dirty = false;
                terminal.draw(|frame| {
                    crate::render::draw(
                        frame,
                        &self.state,
                        self.audio.read_state(),
                        self.midi_input.connected_port_name(),
                    );
                })?;
            }
        }

        Ok(())
    }

    /// Dispatch one action and apply its consequences. Returns true on quit.
    fn apply(&mut self, action: Action) -> bool {
        let action = self.resolve_toggle(action);
        let result = dispatch_action(action, &mut self.state);

        for effect in &result.effects {
            self.audio.apply_effect(effect);
        }

        if result.midi_toggled {
            self.sync_midi_connection();
        }

        result.quit
    }

    /// Toggle needs the transport phase, which only the audio mirror knows.
    fn resolve_toggle(&self, action: Action) -> Action {
        if action == Action::Transport(TransportAction::Toggle) {
            if self.audio.is_active() {
                Action::Transport(TransportAction::Stop)
            } else {
                Action::Transport(TransportAction::Start)
            }
        } else {
            action
        }
    }

    fn sync_midi_connection(&mut self) {
        if self.state.session.midi_enabled {
            if let Err(e) = self.midi_input.connect_first() {
                log::warn!(target: "midi", "could not enable MIDI input: {}", e);
                self.state.session.midi_enabled = false;
            }
        } else {
            self.midi_input.disconnect();
        }
    }
}

fn map_key(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char(' ') => Action::Transport(TransportAction::Toggle),
        KeyCode::Char('r') => Action::Transport(TransportAction::Reset),
        KeyCode::Up => Action::Session(SessionAction::AdjustBpm(1)),
        KeyCode::Down => Action::Session(SessionAction::AdjustBpm(-1)),
        KeyCode::Char('+') | KeyCode::Char('=') => Action::Session(SessionAction::AdjustBpm(5)),
        KeyCode::Char('-') => Action::Session(SessionAction::AdjustBpm(-5)),
        KeyCode::Char(']') => Action::Session(SessionAction::AdjustMeasures(1)),
        KeyCode::Char('[') => Action::Session(SessionAction::AdjustMeasures(-1)),
        KeyCode::Char('c') => Action::Session(SessionAction::CycleCategory),
        KeyCode::Char('p') => Action::Session(SessionAction::TogglePrepBar),
        KeyCode::Char('.') => Action::Session(SessionAction::AdjustClickVolume(0.1)),
        KeyCode::Char(',') => Action::Session(SessionAction::AdjustClickVolume(-0.1)),
        KeyCode::Char('m') => Action::Midi(MidiAction::ToggleEnabled),
        KeyCode::Char('x') => Action::Midi(MidiAction::Panic),
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_key_map() {
        assert_eq!(
            map_key(&press(KeyCode::Char(' '))),
            Action::Transport(TransportAction::Toggle)
        );
        assert_eq!(
            map_key(&press(KeyCode::Char('c'))),
            Action::Session(SessionAction::CycleCategory)
        );
        assert_eq!(map_key(&press(KeyCode::Char('q'))), Action::Quit);
        assert_eq!(
            map_key(&press(KeyCode::Char('x'))),
            Action::Midi(MidiAction::Panic)
        );
        assert_eq!(map_key(&press(KeyCode::Char('z'))), Action::None);
    }
}
