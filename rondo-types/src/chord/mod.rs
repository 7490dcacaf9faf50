//! Chord classification from a set of held MIDI notes.
//!
//! Matching is exact: the unique pitch-class set, normalized to a candidate
//! root, must equal a dictionary entry (no subset or superset matches).
//! The bass pitch class is tried first as root, so inversions still resolve
//! to the chord whose tones are sounding.

mod relation;

pub use relation::{relate_chord, KeyRelation};

use serde::{Deserialize, Serialize};

use crate::state::music::PitchClass;

/// Chord quality. Declaration order is the tie-break order during matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
    Augmented,
    Dominant7,
    Major7,
    Minor7,
    HalfDiminished7,
    Sus4,
    Sus2,
    Power,
}

impl ChordQuality {
    /// Dictionary order. Matching tries entries in this fixed order.
    pub const DICTIONARY: [ChordQuality; 11] = [
        ChordQuality::Major,
        ChordQuality::Minor,
        ChordQuality::Diminished,
        ChordQuality::Augmented,
        ChordQuality::Dominant7,
        ChordQuality::Major7,
        ChordQuality::Minor7,
        ChordQuality::HalfDiminished7,
        ChordQuality::Sus4,
        ChordQuality::Sus2,
        ChordQuality::Power,
    ];

    /// Sorted semitone intervals from the chord root.
    pub fn intervals(&self) -> &'static [u8] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
            ChordQuality::Augmented => &[0, 4, 8],
            ChordQuality::Dominant7 => &[0, 4, 7, 10],
            ChordQuality::Major7 => &[0, 4, 7, 11],
            ChordQuality::Minor7 => &[0, 3, 7, 10],
            ChordQuality::HalfDiminished7 => &[0, 3, 6, 10],
            ChordQuality::Sus4 => &[0, 5, 7],
            ChordQuality::Sus2 => &[0, 2, 7],
            ChordQuality::Power => &[0, 7],
        }
    }

    /// Chord symbol suffix ("" for major, "m" for minor, ...).
    pub fn suffix(&self) -> &'static str {
        match self {
            ChordQuality::Major => "",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
            ChordQuality::Augmented => "aug",
            ChordQuality::Dominant7 => "7",
            ChordQuality::Major7 => "maj7",
            ChordQuality::Minor7 => "m7",
            ChordQuality::HalfDiminished7 => "m7b5",
            ChordQuality::Sus4 => "sus4",
            ChordQuality::Sus2 => "sus2",
            ChordQuality::Power => "5",
        }
    }
}

/// Result of chord classification.
///
/// `NothingHeld` (0 or 1 notes down) is distinct from `Unrecognized`
/// (2+ notes that match no dictionary entry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectedChord {
    NothingHeld,
    Unrecognized,
    Chord {
        root: PitchClass,
        quality: ChordQuality,
    },
}

impl DetectedChord {
    /// Display label; `None` when nothing is held, "n.c." for clusters.
    pub fn label(&self) -> Option<String> {
        match self {
            DetectedChord::NothingHeld => None,
            DetectedChord::Unrecognized => Some("n.c.".to_string()),
            DetectedChord::Chord { root, quality } => {
                Some(format!("{}{}", root.name(), quality.suffix()))
            }
        }
    }
}

/// Classify the currently held raw MIDI note numbers.
///
/// Root candidates are tried bass-first (pitch class of the lowest raw note),
/// then the remaining unique pitch classes in ascending order. The first
/// candidate producing an exact dictionary match wins.
pub fn classify_chord(held: &[u8]) -> DetectedChord {
    if held.len() < 2 {
        return DetectedChord::NothingHeld;
    }

    let mut present = [false; 12];
    for &note in held {
        present[(note % 12) as usize] = true;
    }
    let pitch_classes: Vec<u8> = (0..12).filter(|&pc| present[pc as usize]).collect();

    let bass = held.iter().min().copied().unwrap_or(0) % 12;
    let mut candidates = Vec::with_capacity(pitch_classes.len());
    candidates.push(bass);
    candidates.extend(pitch_classes.iter().copied().filter(|&pc| pc != bass));

    for root in candidates {
        let mut normalized: Vec<u8> = pitch_classes
            .iter()
            .map(|&pc| (pc + 12 - root) % 12)
            .collect();
        normalized.sort_unstable();

        for quality in ChordQuality::DICTIONARY {
            if normalized == quality.intervals() {
                return DetectedChord::Chord {
                    root: PitchClass::from_midi(root),
                    quality,
                };
            }
        }
    }

    DetectedChord::Unrecognized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_single_note_are_nothing_held() {
        assert_eq!(classify_chord(&[]), DetectedChord::NothingHeld);
        assert_eq!(classify_chord(&[60]), DetectedChord::NothingHeld);
    }

    #[test]
    fn octave_doubling_is_unrecognized() {
        // Two notes are held, so this is past the nothing-held threshold, but
        // one pitch class matches no dictionary entry.
        assert_eq!(classify_chord(&[60, 72]), DetectedChord::Unrecognized);
        assert_eq!(classify_chord(&[48, 60, 72]), DetectedChord::Unrecognized);
    }

    #[test]
    fn c_major_root_position() {
        assert_eq!(
            classify_chord(&[60, 64, 67]),
            DetectedChord::Chord {
                root: PitchClass::C,
                quality: ChordQuality::Major
            }
        );
    }

    #[test]
    fn c_major_all_inversions_resolve_to_c() {
        // E-G-C and G-C-E: bass-first candidate order still lands on C major
        // because only C as root yields an exact dictionary match.
        for notes in [[64u8, 67, 72], [67, 72, 76]] {
            assert_eq!(
                classify_chord(&notes),
                DetectedChord::Chord {
                    root: PitchClass::C,
                    quality: ChordQuality::Major
                }
            );
        }
    }

    #[test]
    fn d_minor() {
        assert_eq!(
            classify_chord(&[62, 65, 69]),
            DetectedChord::Chord {
                root: PitchClass::D,
                quality: ChordQuality::Minor
            }
        );
    }

    #[test]
    fn sevenths() {
        assert_eq!(
            classify_chord(&[60, 64, 67, 70]),
            DetectedChord::Chord {
                root: PitchClass::C,
                quality: ChordQuality::Dominant7
            }
        );
        assert_eq!(
            classify_chord(&[60, 64, 67, 71]),
            DetectedChord::Chord {
                root: PitchClass::C,
                quality: ChordQuality::Major7
            }
        );
        assert_eq!(
            classify_chord(&[69, 72, 76, 79]),
            DetectedChord::Chord {
                root: PitchClass::A,
                quality: ChordQuality::Minor7
            }
        );
        assert_eq!(
            classify_chord(&[71, 74, 77, 81]),
            DetectedChord::Chord {
                root: PitchClass::B,
                quality: ChordQuality::HalfDiminished7
            }
        );
    }

    #[test]
    fn sus_and_power() {
        assert_eq!(
            classify_chord(&[60, 65, 67]),
            DetectedChord::Chord {
                root: PitchClass::C,
                quality: ChordQuality::Sus4
            }
        );
        assert_eq!(
            classify_chord(&[60, 62, 67]),
            DetectedChord::Chord {
                root: PitchClass::C,
                quality: ChordQuality::Sus2
            }
        );
        assert_eq!(
            classify_chord(&[60, 67]),
            DetectedChord::Chord {
                root: PitchClass::C,
                quality: ChordQuality::Power
            }
        );
    }

    #[test]
    fn bass_preference_breaks_sus_ambiguity() {
        // {G, C, D} is Gsus4 from G and Csus2 from C. The bass decides.
        assert_eq!(
            classify_chord(&[55, 60, 62]),
            DetectedChord::Chord {
                root: PitchClass::G,
                quality: ChordQuality::Sus4
            }
        );
        assert_eq!(
            classify_chord(&[48, 55, 62]),
            DetectedChord::Chord {
                root: PitchClass::C,
                quality: ChordQuality::Sus2
            }
        );
    }

    #[test]
    fn cluster_is_unrecognized() {
        // Chromatic cluster C-C#-D matches nothing.
        assert_eq!(classify_chord(&[60, 61, 62]), DetectedChord::Unrecognized);
    }

    #[test]
    fn subset_does_not_match_larger_entry() {
        // C-E alone is not a chord in the dictionary (no exact 2-note entry
        // with a major third), even though it is a subset of C major.
        assert_eq!(classify_chord(&[60, 64]), DetectedChord::Unrecognized);
    }

    #[test]
    fn duplicate_pitch_classes_collapse() {
        assert_eq!(
            classify_chord(&[60, 64, 67, 72, 76]),
            DetectedChord::Chord {
                root: PitchClass::C,
                quality: ChordQuality::Major
            }
        );
    }

    #[test]
    fn labels() {
        assert_eq!(DetectedChord::NothingHeld.label(), None);
        assert_eq!(DetectedChord::Unrecognized.label().as_deref(), Some("n.c."));
        let c = DetectedChord::Chord {
            root: PitchClass::C,
            quality: ChordQuality::Major,
        };
        assert_eq!(c.label().as_deref(), Some("C"));
        let fsm7 = DetectedChord::Chord {
            root: PitchClass::Fs,
            quality: ChordQuality::Minor7,
        };
        assert_eq!(fsm7.label().as_deref(), Some("F#m7"));
    }

    #[test]
    fn dictionary_entries_are_distinct() {
        for (i, a) in ChordQuality::DICTIONARY.iter().enumerate() {
            for b in &ChordQuality::DICTIONARY[i + 1..] {
                assert_ne!(a.intervals(), b.intervals());
            }
        }
    }
}
