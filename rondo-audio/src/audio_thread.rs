//! The audio thread: owns the click engine, the beat scheduler, and the key
//! rotation state machine. Commands are drained before every scheduler poll
//! so parameter changes are never observed stale.

use std::sync::mpsc::Sender;
use std::time::Instant;

use crossbeam_channel::{Receiver, TryRecvError};

use rondo_types::{KeyCategory, SessionState};

use crate::commands::{AudioCmd, AudioFeedback};
use crate::engine::ClickEngine;
use crate::rotation::KeyRotation;
use crate::scheduler::{BeatScheduler, TransportParams, POLL_INTERVAL};

pub(crate) struct AudioThread {
    cmd_rx: Receiver<AudioCmd>,
    feedback_tx: Sender<AudioFeedback>,
    /// Created lazily on the first Start so a missing audio device surfaces
    /// as a start failure, not a construction failure.
    engine: Option<ClickEngine>,
    scheduler: BeatScheduler,
    rotation: KeyRotation,
    params: TransportParams,
    prep_bar: bool,
    category: KeyCategory,
    click_volume: f32,
}

impl AudioThread {
    pub(crate) fn new(
        cmd_rx: Receiver<AudioCmd>,
        feedback_tx: Sender<AudioFeedback>,
        session: &SessionState,
    ) -> Self {
        Self {
            cmd_rx,
            feedback_tx,
            engine: None,
            scheduler: BeatScheduler::new(),
            rotation: KeyRotation::from_entropy(session.category),
            params: TransportParams {
                bpm: session.bpm,
                measures_to_change: session.measures_to_change,
            },
            prep_bar: session.prep_bar,
            category: session.category,
            click_volume: session.click_volume,
        }
    }

    pub(crate) fn run(mut self) {
        self.send_keys();

        let mut last_poll = Instant::now();
        loop {
            let remaining = POLL_INTERVAL.saturating_sub(last_poll.elapsed());

            crossbeam_channel::select! {
                recv(self.cmd_rx) -> result => {
                    match result {
                        Ok(cmd) => {
                            if self.handle_cmd(cmd) {
                                break;
                            }
                        }
                        Err(_) => break, // Disconnected
                    }
                }
                default(remaining) => {}
            }

            if self.drain_commands() {
                break;
            }

            if last_poll.elapsed() >= POLL_INTERVAL {
                last_poll = Instant::now();
                self.tick();
            }
        }

        log::debug!(target: "audio", "audio thread exiting");
    }

    /// Drain all pending commands so the next poll sees current parameters.
    fn drain_commands(&mut self) -> bool {
        loop {
            match self.cmd_rx.try_recv() {
                Ok(cmd) => {
                    if self.handle_cmd(cmd) {
                        return true;
                    }
                }
                Err(TryRecvError::Empty) => return false,
                Err(TryRecvError::Disconnected) => return true,
            }
        }
    }

    /// Returns true on shutdown.
    fn handle_cmd(&mut self, cmd: AudioCmd) -> bool {
        match cmd {
            AudioCmd::Start => self.start(),
            AudioCmd::Stop => self.stop(),
            AudioCmd::Reset => self.reset(),
            AudioCmd::SetBpm(bpm) => self.params.bpm = bpm,
            AudioCmd::SetMeasures(n) => self.params.measures_to_change = n,
            AudioCmd::SetPrepBar(prep) => self.prep_bar = prep,
            AudioCmd::SetCategory(category) => self.set_category(category),
            AudioCmd::SetClickVolume(volume) => self.click_volume = volume,
            AudioCmd::Shutdown => return true,
        }
        false
    }

    fn start(&mut self) {
        if self.scheduler.phase().is_active() {
            return;
        }
        let engine = match self.ensure_engine() {
            Some(engine) => engine,
            None => return,
        };
        let now = engine.now();
        self.scheduler.start(now, self.prep_bar);
        self.send_transport_armed();
    }

    fn stop(&mut self) {
        self.scheduler.stop();
        if let Some(engine) = &self.engine {
            engine.cancel_pending();
        }
        let _ = self.feedback_tx.send(AudioFeedback::Stopped);
    }

    /// Re-roll the key pair; a running transport re-arms without stopping.
    fn reset(&mut self) {
        self.rotation.resample(self.category);
        self.send_keys();
        if self.scheduler.phase().is_active() {
            if let Some(engine) = &self.engine {
                engine.cancel_pending();
                let now = engine.now();
                self.scheduler.start(now, self.prep_bar);
                self.send_transport_armed();
            }
        }
    }

    fn set_category(&mut self, category: KeyCategory) {
        self.category = category;
        if self.scheduler.phase().is_active() {
            // Only Next is redrawn mid-run; a rotation pending on the next
            // beat promotes the redrawn value.
            self.rotation.redraw_next(category);
        } else {
            self.rotation.resample(category);
        }
        self.send_keys();
    }

    fn tick(&mut self) {
        let engine = match &self.engine {
            Some(engine) => engine,
            None => return,
        };
        if !self.scheduler.phase().is_active() {
            return;
        }

        let now = engine.now();
        let params = self.params;
        let category = self.category;
        let volume = self.click_volume;
        let rotation = &mut self.rotation;
        let feedback_tx = &self.feedback_tx;

        self.scheduler.poll(now, &params, |event| {
            if event.rotates_key {
                rotation.rotate(category);
                let _ = feedback_tx.send(AudioFeedback::Keys {
                    active: rotation.active(),
                    next: rotation.next(),
                });
            }
            engine.schedule_click(event.time, event.kind, volume);
            let _ = feedback_tx.send(AudioFeedback::Beat {
                beat: event.beat,
                measure: event.measure,
                preparing: event.preparing,
            });
        });
    }

    fn ensure_engine(&mut self) -> Option<&ClickEngine> {
        if self.engine.is_none() {
            match ClickEngine::new() {
                Ok(engine) => self.engine = Some(engine),
                Err(msg) => {
                    log::error!(target: "audio", "cannot start transport: {}", msg);
                    let _ = self.feedback_tx.send(AudioFeedback::StreamError(msg));
                    return None;
                }
            }
        }
        self.engine.as_ref()
    }

    fn send_keys(&self) {
        let _ = self.feedback_tx.send(AudioFeedback::Keys {
            active: self.rotation.active(),
            next: self.rotation.next(),
        });
    }

    /// Display state right after arming: beat 0, measure 0 or 1.
    fn send_transport_armed(&self) {
        let preparing = self.prep_bar;
        let _ = self.feedback_tx.send(AudioFeedback::Beat {
            beat: 0,
            measure: if preparing { 0 } else { 1 },
            preparing,
        });
    }
}
