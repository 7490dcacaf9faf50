//! Musical keys: pitch classes, modes, and the fixed 24-key pool.

use serde::{Deserialize, Serialize};

/// Pitch class, chromatic sharp spelling with the flat enharmonics
/// used for display (Eb, Ab, Bb).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Eb,
    E,
    F,
    Fs,
    G,
    Ab,
    A,
    Bb,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Eb,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Ab,
        PitchClass::A,
        PitchClass::Bb,
        PitchClass::B,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Eb => "Eb",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Ab => "Ab",
            PitchClass::A => "A",
            PitchClass::Bb => "Bb",
            PitchClass::B => "B",
        }
    }

    /// Semitone offset from C (0-11).
    pub fn semitone(&self) -> u8 {
        match self {
            PitchClass::C => 0,
            PitchClass::Cs => 1,
            PitchClass::D => 2,
            PitchClass::Eb => 3,
            PitchClass::E => 4,
            PitchClass::F => 5,
            PitchClass::Fs => 6,
            PitchClass::G => 7,
            PitchClass::Ab => 8,
            PitchClass::A => 9,
            PitchClass::Bb => 10,
            PitchClass::B => 11,
        }
    }

    /// Pitch class of a raw MIDI note number.
    pub fn from_midi(note: u8) -> Self {
        Self::ALL[(note % 12) as usize]
    }
}

/// Key mode. Determines the 7-note scale used for diatonic checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    Major,
    Minor,
}

impl Mode {
    /// Semitone intervals from the key root.
    pub fn intervals(&self) -> &'static [u8; 7] {
        match self {
            Mode::Major => &[0, 2, 4, 5, 7, 9, 11],
            Mode::Minor => &[0, 2, 3, 5, 7, 8, 10],
        }
    }
}

/// A musical key: root pitch class plus mode. 24 total values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MusicalKey {
    pub root: PitchClass,
    pub mode: Mode,
}

impl MusicalKey {
    pub const fn new(root: PitchClass, mode: Mode) -> Self {
        Self { root, mode }
    }

    /// Display name: minor keys carry an `m` suffix ("Cm").
    pub fn name(&self) -> String {
        match self.mode {
            Mode::Major => self.root.name().to_string(),
            Mode::Minor => format!("{}m", self.root.name()),
        }
    }

    /// Whether a pitch class (0-11) belongs to this key's scale.
    pub fn scale_contains(&self, pitch_class: u8) -> bool {
        let root = self.root.semitone();
        self.mode
            .intervals()
            .iter()
            .any(|&i| (root + i) % 12 == pitch_class % 12)
    }
}

impl std::fmt::Display for MusicalKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

const fn majors() -> [MusicalKey; 12] {
    let mut keys = [MusicalKey::new(PitchClass::C, Mode::Major); 12];
    let mut i = 0;
    while i < 12 {
        keys[i] = MusicalKey::new(PitchClass::ALL[i], Mode::Major);
        i += 1;
    }
    keys
}

const fn minors() -> [MusicalKey; 12] {
    let mut keys = [MusicalKey::new(PitchClass::C, Mode::Minor); 12];
    let mut i = 0;
    while i < 12 {
        keys[i] = MusicalKey::new(PitchClass::ALL[i], Mode::Minor);
        i += 1;
    }
    keys
}

pub const MAJOR_KEYS: [MusicalKey; 12] = majors();
pub const MINOR_KEYS: [MusicalKey; 12] = minors();

/// Category filter over the key pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCategory {
    All,
    Majors,
    Minors,
}

impl KeyCategory {
    pub const ALL: [KeyCategory; 3] = [KeyCategory::All, KeyCategory::Majors, KeyCategory::Minors];

    pub fn name(&self) -> &'static str {
        match self {
            KeyCategory::All => "All Keys",
            KeyCategory::Majors => "Majors",
            KeyCategory::Minors => "Minors",
        }
    }

    /// The filtered pool for this category.
    pub fn pool(&self) -> Vec<MusicalKey> {
        match self {
            KeyCategory::All => MAJOR_KEYS.iter().chain(MINOR_KEYS.iter()).copied().collect(),
            KeyCategory::Majors => MAJOR_KEYS.to_vec(),
            KeyCategory::Minors => MINOR_KEYS.to_vec(),
        }
    }

    /// Cycle to the next category (UI toggle order).
    pub fn next(&self) -> Self {
        match self {
            KeyCategory::All => KeyCategory::Majors,
            KeyCategory::Majors => KeyCategory::Minors,
            KeyCategory::Minors => KeyCategory::All,
        }
    }
}

impl Default for KeyCategory {
    fn default() -> Self {
        KeyCategory::All
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn pitch_class_all_has_12() {
        assert_eq!(PitchClass::ALL.len(), 12);
    }

    #[test]
    fn pitch_class_names_unique() {
        let names: HashSet<&str> = PitchClass::ALL.iter().map(|p| p.name()).collect();
        assert_eq!(names.len(), 12);
    }

    #[test]
    fn pitch_class_semitones_0_to_11() {
        let semis: Vec<u8> = PitchClass::ALL.iter().map(|p| p.semitone()).collect();
        assert_eq!(semis, (0..12).collect::<Vec<u8>>());
    }

    #[test]
    fn pitch_class_from_midi_wraps_octaves() {
        assert_eq!(PitchClass::from_midi(60), PitchClass::C);
        assert_eq!(PitchClass::from_midi(61), PitchClass::Cs);
        assert_eq!(PitchClass::from_midi(127), PitchClass::G);
    }

    #[test]
    fn key_names() {
        assert_eq!(MusicalKey::new(PitchClass::C, Mode::Major).name(), "C");
        assert_eq!(MusicalKey::new(PitchClass::Eb, Mode::Minor).name(), "Ebm");
        assert_eq!(MusicalKey::new(PitchClass::Fs, Mode::Major).name(), "F#");
    }

    #[test]
    fn c_major_scale_membership() {
        let key = MusicalKey::new(PitchClass::C, Mode::Major);
        for pc in [0, 2, 4, 5, 7, 9, 11] {
            assert!(key.scale_contains(pc), "pc {} should be in C major", pc);
        }
        for pc in [1, 3, 6, 8, 10] {
            assert!(!key.scale_contains(pc), "pc {} should not be in C major", pc);
        }
    }

    #[test]
    fn a_minor_scale_matches_c_major_pitches() {
        let am = MusicalKey::new(PitchClass::A, Mode::Minor);
        let cmaj = MusicalKey::new(PitchClass::C, Mode::Major);
        for pc in 0..12 {
            assert_eq!(am.scale_contains(pc), cmaj.scale_contains(pc));
        }
    }

    #[test]
    fn category_pool_sizes() {
        assert_eq!(KeyCategory::All.pool().len(), 24);
        assert_eq!(KeyCategory::Majors.pool().len(), 12);
        assert_eq!(KeyCategory::Minors.pool().len(), 12);
    }

    #[test]
    fn category_pools_are_disjoint_by_mode() {
        assert!(KeyCategory::Majors.pool().iter().all(|k| k.mode == Mode::Major));
        assert!(KeyCategory::Minors.pool().iter().all(|k| k.mode == Mode::Minor));
    }

    #[test]
    fn category_pool_keys_unique() {
        let pool = KeyCategory::All.pool();
        let set: HashSet<MusicalKey> = pool.iter().copied().collect();
        assert_eq!(set.len(), 24);
    }

    #[test]
    fn category_cycle_covers_all() {
        let mut cat = KeyCategory::All;
        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(cat);
            cat = cat.next();
        }
        assert_eq!(cat, KeyCategory::All);
        assert_eq!(seen.len(), 3);
    }
}
