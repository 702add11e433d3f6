//! Key-layout sequence generators and frame layout math.
//!
//! Two finite, restartable iterators walk the MIDI range and produce the
//! visual key order: [`WhiteKeys`] yields every natural note, and
//! [`BlackKeys`] yields one entry per white-key slot - a real accented note,
//! or [`Note::PHANTOM`] at the E♯/B♯ gaps where no black key exists. That
//! 1:1 slot correspondence is a correctness contract: layout math indexes the
//! two sequences together, so the black row may never drift relative to the
//! white row.

use crate::config::{LayoutMetrics, BLACK_KEY_HEIGHT_RATIO, BLACK_KEY_WIDTH_RATIO};
use crate::hit_test::{KeyFrames, Rect};
use crate::note::Note;

/// Semitone steps from one natural note to the next, cycled from C.
const WHITE_STEPS: [u8; 7] = [2, 2, 1, 2, 2, 2, 1];

/// Semitone steps between accented notes, cycled from C♯. A step of 0 marks
/// a slot with no real key (E♯, B♯).
const BLACK_STEPS: [u8; 7] = [2, 3, 0, 2, 2, 3, 0];

/// Yields every unaccented [`Note`] in ascending order, starting at MIDI 0
/// and stopping once the next value would exceed 127.
#[derive(Clone, Debug, Default)]
pub struct WhiteKeys {
    next_midi: u16,
    step: usize,
}

impl WhiteKeys {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Iterator for WhiteKeys {
    type Item = Note;

    fn next(&mut self) -> Option<Note> {
        if self.next_midi > 127 {
            return None;
        }
        let note = Note::new(self.next_midi as u8);
        self.next_midi += WHITE_STEPS[self.step] as u16;
        self.step = (self.step + 1) % WHITE_STEPS.len();
        Some(note)
    }
}

/// Yields one entry per white-key slot: the accented [`Note`] above that
/// slot's white key, or [`Note::PHANTOM`] where the scale has no accidental.
/// Starts at MIDI 1 and stops once exceeding 127, which makes the sequence
/// exactly one entry shorter than [`WhiteKeys`].
#[derive(Clone, Debug)]
pub struct BlackKeys {
    next_midi: u16,
    step: usize,
}

impl BlackKeys {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for BlackKeys {
    fn default() -> Self {
        BlackKeys {
            next_midi: 1,
            step: 0,
        }
    }
}

impl Iterator for BlackKeys {
    type Item = Note;

    fn next(&mut self) -> Option<Note> {
        if self.next_midi > 127 {
            return None;
        }
        let step = BLACK_STEPS[self.step];
        self.step = (self.step + 1) % BLACK_STEPS.len();
        // A zero step emits the phantom placeholder without advancing.
        let note = if step > 0 {
            Note::new(self.next_midi as u8)
        } else {
            Note::PHANTOM
        };
        self.next_midi += step as u16;
        Some(note)
    }
}

/// Build the full 128-entry key-frame table for the given metrics.
///
/// White key `i` sits at `i * (key_width + key_spacing)` at full height;
/// black slot `j` is narrower and shorter, centered on the boundary between
/// whites `j` and `j + 1`. Phantom slots write nothing.
pub fn layout_frames(metrics: &LayoutMetrics) -> KeyFrames {
    let mut frames = KeyFrames::new();
    let pitch = metrics.key_width + metrics.key_spacing;
    let black_width = metrics.key_width * BLACK_KEY_WIDTH_RATIO;
    let black_height = metrics.keyboard_height * BLACK_KEY_HEIGHT_RATIO;

    for (slot, note) in WhiteKeys::new().enumerate() {
        frames.set(
            note,
            Rect::new(slot as f32 * pitch, 0.0, metrics.key_width, metrics.keyboard_height),
        );
    }

    for (slot, note) in BlackKeys::new().enumerate() {
        let x = (slot as f32 + 1.0) * pitch - black_width / 2.0;
        frames.set(note, Rect::new(x, 0.0, black_width, black_height));
    }

    frames
}

/// Lowest and highest white notes visible in a horizontal scroll window
/// spanning `[min_x, max_x)`. Returns `None` when the window sits outside
/// the keyboard entirely.
pub fn visible_white_range(metrics: &LayoutMetrics, min_x: f32, max_x: f32) -> Option<(Note, Note)> {
    let pitch = metrics.key_width + metrics.key_spacing;
    if pitch <= 0.0 || max_x < min_x {
        return None;
    }

    let whites: Vec<Note> = WhiteKeys::new().collect();
    let low = (min_x / pitch).floor() as i64;
    let high = (max_x / pitch).floor() as i64;
    if high < 0 || low >= whites.len() as i64 {
        return None;
    }

    let low = low.clamp(0, whites.len() as i64 - 1) as usize;
    let high = high.clamp(0, whites.len() as i64 - 1) as usize;
    Some((whites[low], whites[high]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_keys_first_five() {
        let first: Vec<u8> = WhiteKeys::new().take(5).map(Note::midi).collect();
        assert_eq!(first, [0, 2, 4, 5, 7]);
    }

    #[test]
    fn test_white_keys_cover_all_naturals_once() {
        let whites: Vec<Note> = WhiteKeys::new().collect();
        assert_eq!(whites.len(), 75);
        assert!(whites.iter().all(|n| !n.accented() && !n.is_phantom()));
        assert!(whites.windows(2).all(|pair| pair[0] < pair[1]));

        let naturals = (0..=127u8).filter(|m| !Note::new(*m).accented()).count();
        assert_eq!(whites.len(), naturals);
    }

    #[test]
    fn test_black_keys_one_entry_per_white_slot() {
        let whites = WhiteKeys::new().count();
        let blacks: Vec<Note> = BlackKeys::new().collect();
        assert_eq!(blacks.len(), whites - 1);
    }

    #[test]
    fn test_black_keys_real_entries_are_accented() {
        let reals: Vec<Note> = BlackKeys::new().filter(|n| !n.is_phantom()).collect();
        assert!(reals.iter().all(|n| n.accented()));
        assert!(reals.windows(2).all(|pair| pair[0] < pair[1]));

        let accidentals = (0..=127u8).filter(|m| Note::new(*m).accented()).count();
        assert_eq!(reals.len(), accidentals);
    }

    #[test]
    fn test_phantom_slots_fall_on_e_and_b() {
        // A phantom sits above every E and B white key, nowhere else
        // (except that the final slot is simply absent).
        for (white, black) in WhiteKeys::new().zip(BlackKeys::new()) {
            let gap = matches!(white.note_index(), 4 | 11);
            assert_eq!(black.is_phantom(), gap, "slot above {white}");
        }
    }

    #[test]
    fn test_generators_restart_clean() {
        let a: Vec<Note> = WhiteKeys::new().collect();
        let b: Vec<Note> = WhiteKeys::new().collect();
        assert_eq!(a, b);

        let mut gen = BlackKeys::new();
        let first = gen.next();
        assert_eq!(BlackKeys::new().next(), first);
    }

    #[test]
    fn test_generators_terminate() {
        let mut gen = WhiteKeys::new();
        assert_eq!(gen.by_ref().count(), 75);
        assert_eq!(gen.next(), None);
        assert_eq!(gen.next(), None);
    }

    #[test]
    fn test_layout_black_centers_on_white_boundary() {
        let metrics = LayoutMetrics::default();
        let frames = layout_frames(&metrics);
        let pitch = metrics.key_width + metrics.key_spacing;

        // C#-1 straddles the boundary between the first two whites.
        let black = frames.get(Note::new(1));
        assert!((black.mid_x() - pitch).abs() < 1.0e-3);
        assert!(black.width < metrics.key_width);
        assert!(black.height < metrics.keyboard_height);
    }

    #[test]
    fn test_layout_fills_every_midi_slot() {
        let frames = layout_frames(&LayoutMetrics::default());
        for midi in 0..=127u8 {
            assert!(frames.get(Note::new(midi)).width > 0.0, "empty frame for {midi}");
        }
    }

    #[test]
    fn test_visible_white_range() {
        let metrics = LayoutMetrics::default();
        let pitch = metrics.key_width + metrics.key_spacing;

        let (low, high) = visible_white_range(&metrics, 0.0, pitch * 6.5).unwrap();
        assert_eq!(low, Note::new(0));
        // Seventh white key from C-1 is B-1 (MIDI 11).
        assert_eq!(high, Note::new(11));

        // Window past the end clamps to the last white key.
        let (_, high) = visible_white_range(&metrics, pitch * 70.0, pitch * 1000.0).unwrap();
        assert_eq!(high, Note::new(127));

        assert_eq!(visible_white_range(&metrics, -100.0, -50.0), None);
    }
}
