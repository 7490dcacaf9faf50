//! # rondo-types
//!
//! Shared type definitions for the rondo practice metronome.
//! Pure data model and music theory: keys, chords, actions, reducers.
//! No I/O and no audio dependencies live here.

pub mod action;
pub mod chord;
pub mod reduce;
pub mod state;

pub use action::*;
pub use chord::{classify_chord, relate_chord, ChordQuality, DetectedChord, KeyRelation};
pub use reduce::reduce_session;
pub use state::*;
