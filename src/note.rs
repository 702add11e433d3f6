//! MIDI note value type with naming and parsing.
//!
//! A [`Note`] wraps a MIDI v1 note number in `[0, 127]`. Middle C (MIDI 60)
//! is spelled `C4`, following the Octave Designation System (Yamaha
//! convention), so the full range runs from `C-1` to `G9`.
//!
//! # Example
//! ```
//! use keybed::Note;
//!
//! let middle_c = Note::new(60);
//! assert_eq!(middle_c.label_with_sharps(), "C4");
//! assert_eq!(Note::parse("C♯4"), middle_c.offset(1));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Octave of note labels using sharps for accidentals.
const LABELS_WITH_SHARPS: [&str; 12] = [
    "C", "C♯", "D", "D♯", "E", "F", "F♯", "G", "G♯", "A", "A♯", "B",
];

/// Octave of note labels using flats for accidentals.
const LABELS_WITH_FLATS: [&str; 12] = [
    "C", "D♭", "D", "E♭", "E", "F", "G♭", "G", "A♭", "A", "B♭", "B",
];

/// Solfege labels. Many variations exist; this is the "Sound of Music" one.
const SOLFEGE_LABELS: [&str; 12] = [
    "Do", "Do", "Re", "Re", "Mi", "Fa", "Fa", "Sol", "Sol", "La", "La", "Ti",
];

/// MIDI note number in `[0, 127]`.
///
/// Immutable value type; equality, ordering, and hashing use the MIDI value
/// alone. Construction with [`Note::new`] panics on an out-of-range value --
/// that is a programmer error, not a recoverable one. Use
/// [`Note::from_midi`] when the input is untrusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Note(u8);

impl Note {
    /// Lowest playable note (`C-1`).
    pub const LOWEST: Note = Note(0);
    /// Highest playable note (`G9`).
    pub const HIGHEST: Note = Note(127);
    /// Middle C (MIDI 60).
    pub const MIDDLE_C: Note = Note(60);
    /// Concert A, 440 Hz (MIDI 69).
    pub const CONCERT_A: Note = Note(69);

    /// Sentinel for a key-layout slot with no real pitch (the E♯/B♯ gaps in
    /// the black-key row). Never valid as a sounding note; the tracker and
    /// the output channel reject it.
    pub const PHANTOM: Note = Note(128);

    /// Create a note from a MIDI value.
    ///
    /// # Panics
    /// Panics if `midi > 127`.
    pub const fn new(midi: u8) -> Note {
        assert!(midi <= 127, "MIDI note value out of range");
        Note(midi)
    }

    /// Checked constructor; returns `None` if the value is > 127.
    #[inline]
    pub const fn from_midi(midi: u8) -> Option<Note> {
        if midi > 127 {
            None
        } else {
            Some(Note(midi))
        }
    }

    /// The raw MIDI value. 128 for [`Note::PHANTOM`].
    #[inline]
    pub const fn midi(self) -> u8 {
        self.0
    }

    /// True for the phantom layout sentinel.
    #[inline]
    pub const fn is_phantom(self) -> bool {
        self.0 > 127
    }

    /// 0-11, where 0 = C.
    #[inline]
    pub const fn note_index(self) -> u8 {
        self.0 % 12
    }

    /// True if this is an accented (black) key.
    #[inline]
    pub const fn accented(self) -> bool {
        matches!(self.note_index(), 1 | 3 | 6 | 8 | 10)
    }

    /// Octave number, -1 to 9.
    #[inline]
    pub const fn octave(self) -> i8 {
        (self.0 / 12) as i8 - 1
    }

    /// Move by a number of semitones; `None` if the result leaves `[0, 127]`.
    pub fn offset(self, semitones: i32) -> Option<Note> {
        let midi = self.0 as i32 + semitones;
        if (0..=127).contains(&midi) {
            Some(Note(midi as u8))
        } else {
            None
        }
    }

    /// Frequency in Hz (A4 = 440 Hz, equal temperament).
    pub fn frequency(self) -> f64 {
        440.0 * 2f64.powf((self.0 as f64 - 69.0) / 12.0)
    }

    /// Label using sharps for accidentals, e.g. `"C♯4"`.
    pub fn label_with_sharps(self) -> String {
        format!("{}{}", LABELS_WITH_SHARPS[self.note_index() as usize], self.octave())
    }

    /// Label using flats for accidentals, e.g. `"D♭4"`.
    pub fn label_with_flats(self) -> String {
        format!("{}{}", LABELS_WITH_FLATS[self.note_index() as usize], self.octave())
    }

    /// Solfege name, e.g. `"Do"` for C and C♯.
    pub fn solfege(self) -> &'static str {
        SOLFEGE_LABELS[self.note_index() as usize]
    }

    /// Parse a note name: a letter `A`-`G`, an optional accidental (`#` or
    /// `♯` raises a semitone, `b` or `♭` lowers one), then an octave in
    /// `[-1, 9]`. Returns `None` for malformed input or a result outside
    /// `[0, 127]`. Total; never panics.
    pub fn parse(text: &str) -> Option<Note> {
        // Shortest is "C0", longest is "C♯-1".
        let char_count = text.chars().count();
        if !(2..=4).contains(&char_count) {
            return None;
        }

        let mut chars = text.chars();
        let mut semitone = match chars.next()? {
            'C' => 0i32,
            'D' => 2,
            'E' => 4,
            'F' => 5,
            'G' => 7,
            'A' => 9,
            'B' => 11,
            _ => return None,
        };

        let mut rest = chars.as_str();
        if let Some(accidental) = rest.chars().next() {
            match accidental {
                '#' | '♯' => {
                    semitone += 1;
                    rest = &rest[accidental.len_utf8()..];
                }
                'b' | '♭' => {
                    semitone -= 1;
                    rest = &rest[accidental.len_utf8()..];
                }
                _ => {}
            }
        }

        let octave: i32 = rest.parse().ok()?;
        if !(-1..=9).contains(&octave) {
            return None;
        }

        let midi = (octave + 1) * 12 + semitone;
        if (0..=127).contains(&midi) {
            Some(Note(midi as u8))
        } else {
            None
        }
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label_with_sharps())
    }
}

impl FromStr for Note {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Note::parse(s).ok_or_else(|| Error::InvalidNoteName(s.to_owned()))
    }
}

impl From<Note> for u8 {
    fn from(note: Note) -> u8 {
        note.0
    }
}

impl TryFrom<u8> for Note {
    type Error = Error;

    fn try_from(midi: u8) -> Result<Self, Self::Error> {
        Note::from_midi(midi).ok_or(Error::NoteOutOfRange(midi as u16))
    }
}

// Notes travel as bare MIDI numbers in configs and snapshots. Deserialization
// validates the range so the phantom sentinel can never arrive from outside.
impl Serialize for Note {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for Note {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let midi = u8::deserialize(deserializer)?;
        Note::from_midi(midi)
            .ok_or_else(|| serde::de::Error::custom(format!("MIDI note value out of range: {midi}")))
    }
}
