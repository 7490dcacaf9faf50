//! Relation of a detected chord to the active key.

use serde::{Deserialize, Serialize};

use super::{ChordQuality, DetectedChord};
use crate::state::music::{Mode, MusicalKey};

/// How a detected chord relates to the active key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyRelation {
    /// Nothing held, or an unrecognized cluster
    None,
    /// Exactly the key's own chord (root and mode match)
    Tonic,
    /// Root and every chord tone inside the key's scale
    Diatonic,
    /// Anything else
    Other,
}

impl KeyRelation {
    pub fn name(&self) -> &'static str {
        match self {
            KeyRelation::None => "none",
            KeyRelation::Tonic => "tonic",
            KeyRelation::Diatonic => "diatonic",
            KeyRelation::Other => "other",
        }
    }
}

/// Pure function of (detected chord, active key). Never stored; recomputed
/// for display on every change.
pub fn relate_chord(chord: &DetectedChord, key: MusicalKey) -> KeyRelation {
    let (root, quality) = match chord {
        DetectedChord::NothingHeld | DetectedChord::Unrecognized => return KeyRelation::None,
        DetectedChord::Chord { root, quality } => (*root, *quality),
    };

    let tonic_quality = match key.mode {
        Mode::Major => ChordQuality::Major,
        Mode::Minor => ChordQuality::Minor,
    };
    if root == key.root && quality == tonic_quality {
        return KeyRelation::Tonic;
    }

    if !key.scale_contains(root.semitone()) {
        return KeyRelation::Other;
    }

    let diatonic = quality
        .intervals()
        .iter()
        .all(|&i| key.scale_contains((root.semitone() + i) % 12));
    if diatonic {
        KeyRelation::Diatonic
    } else {
        KeyRelation::Other
    }
}
