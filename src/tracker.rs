//! Per-contact note assignment with reference counting.
//!
//! Each touch contact holds at most one note; a note may be held by several
//! contacts at once (rare, but two fingers can land on one key), and one
//! contact can slide across many notes. The tracker keeps a contact-to-note
//! map plus a fixed array of 128 per-note counters, so a note sounds exactly
//! while its count is positive.
//!
//! Every operation is total: double releases, unknown contacts, and
//! suppressed reassignments are defined no-ops, never errors. The tracker is
//! single-owner - callbacks for one keyboard session must arrive in order on
//! one thread.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::hit_test::Point;
use crate::note::Note;

/// Platform-supplied identifier of one ongoing touch/pointer interaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContactId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContactPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// Minimal platform-neutral gesture value: id, current location, phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    pub id: ContactId,
    pub location: Point,
    pub phase: ContactPhase,
}

/// Outcome of [`TouchTracker::assign`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment {
    /// A previously held note whose count dropped to zero, or - when the
    /// assignment was a same-note or fixed-mode no-op - the held note
    /// itself. See the quirk note on [`TouchTracker::assign`].
    pub released: Option<Note>,
    /// True when the note's count was zero before this assignment.
    pub first_time: bool,
}

/// Contact-to-note map with per-note activation counts.
///
/// Invariant: for every note `n`, `count(n)` equals the number of contacts
/// currently mapped to `n`. Phantom notes never enter either structure.
#[derive(Clone, Debug)]
pub struct TouchTracker {
    contacts: HashMap<ContactId, Note>,
    counts: [u16; 128],
}

// Arrays longer than 32 elements have no derived Default.
impl Default for TouchTracker {
    fn default() -> Self {
        TouchTracker {
            contacts: HashMap::new(),
            counts: [0; 128],
        }
    }
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign a contact to a note.
    ///
    /// A new contact records the mapping and increments the note's count. A
    /// contact already holding a *different* note reassigns only when
    /// `slide_allowed`; the old note's count drops, and it is reported in
    /// `released` if it reached zero.
    ///
    /// Quirk, preserved for compatibility with the reference behavior: when
    /// the contact already holds this same note, or the reassignment is
    /// suppressed by fixed mode, the result is `released: Some(note),
    /// first_time: true` even though nothing changed. Callers compare
    /// `released` against `note` to recognize the no-op.
    ///
    /// # Panics
    /// Panics on a phantom note - phantom slots must be filtered out before
    /// reaching activation logic.
    pub fn assign(&mut self, id: ContactId, note: Note, slide_allowed: bool) -> Assignment {
        assert!(!note.is_phantom(), "phantom note cannot be assigned");

        let mut released = None;
        if let Some(&previous) = self.contacts.get(&id) {
            if previous == note || !slide_allowed {
                return Assignment {
                    released: Some(note),
                    first_time: true,
                };
            }
            if self.decrement(previous) {
                released = Some(previous);
            }
        }

        self.contacts.insert(id, note);
        let count = &mut self.counts[note.midi() as usize];
        let first_time = *count == 0;
        *count += 1;
        Assignment {
            released,
            first_time,
        }
    }

    /// Remove a contact's mapping and decrement its note's count. Returns
    /// the note only when the count reached zero - a fully released note.
    /// Unknown contacts are a no-op returning `None`.
    pub fn release(&mut self, id: ContactId) -> Option<Note> {
        let note = self.contacts.remove(&id)?;
        self.decrement(note).then_some(note)
    }

    /// Drop every contact and zero every count. Reports nothing; callers
    /// needing audio cleanup must force note-off for each note in
    /// [`TouchTracker::active_notes`] first.
    pub fn release_all(&mut self) {
        self.contacts.clear();
        self.counts = [0; 128];
    }

    /// True while at least one contact holds the note.
    #[inline]
    pub fn is_active(&self, note: Note) -> bool {
        !note.is_phantom() && self.counts[note.midi() as usize] > 0
    }

    /// All currently sounding notes, in ascending order.
    pub fn active_notes(&self) -> impl Iterator<Item = Note> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(midi, _)| Note::new(midi as u8))
    }

    /// Number of live contacts.
    pub fn contact_count(&self) -> usize {
        self.contacts.len()
    }

    /// Drop the count for `note`, returning true when it reached zero.
    fn decrement(&mut self, note: Note) -> bool {
        let count = &mut self.counts[note.midi() as usize];
        match *count {
            0 => false,
            1 => {
                *count = 0;
                true
            }
            _ => {
                *count -= 1;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const C4: Note = Note::MIDDLE_C;
    const D4: Note = Note::new(62);

    fn check_invariant(tracker: &TouchTracker) {
        for midi in 0..=127u8 {
            let note = Note::new(midi);
            let holders = tracker.contacts.values().filter(|&&n| n == note).count();
            assert_eq!(
                tracker.counts[midi as usize] as usize, holders,
                "count mismatch for {note}"
            );
        }
    }

    #[test]
    fn test_fresh_tracker_is_silent() {
        let tracker = TouchTracker::default();
        assert_eq!(tracker.contact_count(), 0);
        assert_eq!(tracker.active_notes().count(), 0);
        for midi in 0..=127u8 {
            assert!(!tracker.is_active(Note::new(midi)));
        }
        check_invariant(&tracker);
    }

    #[test]
    fn test_two_contacts_one_note() {
        let mut tracker = TouchTracker::new();

        let first = tracker.assign(ContactId(1), C4, true);
        assert_eq!(first, Assignment { released: None, first_time: true });

        let second = tracker.assign(ContactId(2), C4, true);
        assert_eq!(second, Assignment { released: None, first_time: false });
        check_invariant(&tracker);

        // Releasing one holder keeps the note sounding.
        assert_eq!(tracker.release(ContactId(1)), None);
        assert!(tracker.is_active(C4));

        // Releasing the last holder fully releases it.
        assert_eq!(tracker.release(ContactId(2)), Some(C4));
        assert!(!tracker.is_active(C4));
        check_invariant(&tracker);
    }

    #[test]
    fn test_slide_reassigns() {
        let mut tracker = TouchTracker::new();
        tracker.assign(ContactId(1), C4, true);

        let slid = tracker.assign(ContactId(1), D4, true);
        assert_eq!(slid, Assignment { released: Some(C4), first_time: true });
        assert!(!tracker.is_active(C4));
        assert!(tracker.is_active(D4));
        check_invariant(&tracker);
    }

    #[test]
    fn test_slide_keeps_note_held_elsewhere() {
        let mut tracker = TouchTracker::new();
        tracker.assign(ContactId(1), C4, true);
        tracker.assign(ContactId(2), C4, true);

        // The old note stays active under the other finger, so it is not
        // reported as released.
        let slid = tracker.assign(ContactId(1), D4, true);
        assert_eq!(slid, Assignment { released: None, first_time: true });
        assert!(tracker.is_active(C4));
        check_invariant(&tracker);
    }

    #[test]
    fn test_fixed_mode_suppresses_reassignment() {
        let mut tracker = TouchTracker::new();
        tracker.assign(ContactId(1), C4, false);

        let result = tracker.assign(ContactId(1), D4, false);
        // Quirky but preserved: the suppressed call claims first_time and
        // echoes the requested note back in `released`.
        assert_eq!(result, Assignment { released: Some(D4), first_time: true });
        assert!(tracker.is_active(C4));
        assert!(!tracker.is_active(D4));
        check_invariant(&tracker);
    }

    #[test]
    fn test_same_note_reassignment_quirk() {
        let mut tracker = TouchTracker::new();
        tracker.assign(ContactId(1), C4, true);

        // Preserved reference behavior: reassigning the note a contact
        // already holds reports first_time even though nothing changed.
        let again = tracker.assign(ContactId(1), C4, true);
        assert_eq!(again, Assignment { released: Some(C4), first_time: true });
        check_invariant(&tracker);

        // And the count did not grow - one release fully releases.
        assert_eq!(tracker.release(ContactId(1)), Some(C4));
    }

    #[test]
    fn test_release_unknown_contact_is_noop() {
        let mut tracker = TouchTracker::new();
        assert_eq!(tracker.release(ContactId(9)), None);

        tracker.assign(ContactId(1), C4, true);
        assert_eq!(tracker.release(ContactId(1)), Some(C4));
        // Double release.
        assert_eq!(tracker.release(ContactId(1)), None);
        check_invariant(&tracker);
    }

    #[test]
    fn test_release_all() {
        let mut tracker = TouchTracker::new();
        tracker.assign(ContactId(1), C4, true);
        tracker.assign(ContactId(2), D4, true);
        assert_eq!(tracker.active_notes().count(), 2);

        tracker.release_all();
        assert_eq!(tracker.active_notes().count(), 0);
        assert_eq!(tracker.contact_count(), 0);
        check_invariant(&tracker);
    }

    #[test]
    fn test_active_notes_sorted() {
        let mut tracker = TouchTracker::new();
        tracker.assign(ContactId(1), D4, true);
        tracker.assign(ContactId(2), C4, true);
        let active: Vec<Note> = tracker.active_notes().collect();
        assert_eq!(active, [C4, D4]);
    }

    #[test]
    #[should_panic(expected = "phantom")]
    fn test_phantom_assignment_panics() {
        let mut tracker = TouchTracker::new();
        tracker.assign(ContactId(1), Note::PHANTOM, true);
    }
}
