//! AudioHandle: main-thread interface to the audio thread.
//!
//! Owns the command/feedback channels. The scheduler, rotation, and click
//! engine all live on the audio thread; the handle mirrors their observable
//! state for display.

use std::sync::mpsc::{self, Receiver};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender as CrossbeamSender;

use rondo_types::{
    AudioEffect, KeyCategory, Mode, MusicalKey, PitchClass, SessionState, TransportPhase,
};

use crate::audio_thread::AudioThread;
use crate::commands::{AudioCmd, AudioFeedback};

/// Audio-owned read state: the audio thread is the authority on these
/// values; the UI reads them for display and feedback updates them.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioReadState {
    pub phase: TransportPhase,
    pub beat: u8,
    pub measure: u8,
    pub preparing: bool,
    pub active_key: MusicalKey,
    pub next_key: MusicalKey,
    /// Set when the output stream could not be acquired
    pub last_error: Option<String>,
}

impl Default for AudioReadState {
    fn default() -> Self {
        Self {
            phase: TransportPhase::Stopped,
            beat: 0,
            measure: 1,
            preparing: false,
            // Placeholder until the audio thread publishes its initial pair.
            active_key: MusicalKey::new(PitchClass::C, Mode::Major),
            next_key: MusicalKey::new(PitchClass::G, Mode::Major),
            last_error: None,
        }
    }
}

pub struct AudioHandle {
    cmd_tx: CrossbeamSender<AudioCmd>,
    feedback_rx: Receiver<AudioFeedback>,
    read_state: AudioReadState,
    join_handle: Option<JoinHandle<()>>,
}

impl AudioHandle {
    /// Spawn the audio thread with the session's current settings.
    pub fn new(session: &SessionState) -> Self {
        let (cmd_tx, cmd_rx) = crossbeam_channel::unbounded();
        let (feedback_tx, feedback_rx) = mpsc::channel();

        let initial = session.clone();
        let join_handle = thread::spawn(move || {
            AudioThread::new(cmd_rx, feedback_tx, &initial).run();
        });

        Self {
            cmd_tx,
            feedback_rx,
            read_state: AudioReadState::default(),
            join_handle: Some(join_handle),
        }
    }

    /// Fire-and-forget: log if the audio thread is gone.
    fn send(&self, cmd: AudioCmd) {
        if self.cmd_tx.send(cmd).is_err() {
            log::warn!(target: "audio", "command dropped: audio thread disconnected");
        }
    }

    pub fn start(&self) {
        self.send(AudioCmd::Start);
    }

    pub fn stop(&self) {
        self.send(AudioCmd::Stop);
    }

    pub fn reset(&self) {
        self.send(AudioCmd::Reset);
    }

    pub fn set_category(&self, category: KeyCategory) {
        self.send(AudioCmd::SetCategory(category));
    }

    /// Forward a dispatch side effect to the audio thread.
    pub fn apply_effect(&self, effect: &AudioEffect) {
        let cmd = match effect {
            AudioEffect::Start => AudioCmd::Start,
            AudioEffect::Stop => AudioCmd::Stop,
            AudioEffect::Reset => AudioCmd::Reset,
            AudioEffect::SetBpm(bpm) => AudioCmd::SetBpm(*bpm),
            AudioEffect::SetMeasures(n) => AudioCmd::SetMeasures(*n),
            AudioEffect::SetPrepBar(prep) => AudioCmd::SetPrepBar(*prep),
            AudioEffect::SetCategory(category) => AudioCmd::SetCategory(*category),
            AudioEffect::SetClickVolume(volume) => AudioCmd::SetClickVolume(*volume),
        };
        self.send(cmd);
    }

    /// Fold pending feedback into the read state. Returns true if anything
    /// observable changed (the UI uses this as its render-dirty signal).
    pub fn drain_feedback(&mut self) -> bool {
        let mut changed = false;
        while let Ok(feedback) = self.feedback_rx.try_recv() {
            self.apply_feedback(feedback);
            changed = true;
        }
        changed
    }

    fn apply_feedback(&mut self, feedback: AudioFeedback) {
        match feedback {
            AudioFeedback::Beat {
                beat,
                measure,
                preparing,
            } => {
                self.read_state.beat = beat;
                self.read_state.measure = measure;
                self.read_state.preparing = preparing;
                self.read_state.phase = if preparing {
                    TransportPhase::Preparing
                } else {
                    TransportPhase::Running
                };
            }
            AudioFeedback::Stopped => {
                self.read_state.phase = TransportPhase::Stopped;
                self.read_state.beat = 0;
                self.read_state.measure = 1;
                self.read_state.preparing = false;
            }
            AudioFeedback::Keys { active, next } => {
                self.read_state.active_key = active;
                self.read_state.next_key = next;
            }
            AudioFeedback::StreamError(msg) => {
                log::error!(target: "audio", "stream error: {}", msg);
                self.read_state.last_error = Some(msg);
                self.read_state.phase = TransportPhase::Stopped;
            }
        }
    }

    pub fn read_state(&self) -> &AudioReadState {
        &self.read_state
    }

    pub fn is_active(&self) -> bool {
        self.read_state.phase.is_active()
    }
}

impl Drop for AudioHandle {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(AudioCmd::Shutdown);
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}
