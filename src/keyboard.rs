//! Keyboard session: contacts in, key events out.
//!
//! Glues the hit tester, the tracker, and the output channel together. The
//! gesture layer feeds raw [`Contact`] values; the session locates the key
//! under each contact, updates per-contact note state, and emits
//! [`KeyEvent`]s for the synth collaborator to drain.
//!
//! Single logical owner: apply all gesture callbacks for one session in
//! arrival order on one thread. Nothing here blocks or suspends.

use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::config::KeyboardConfig;
use crate::hit_test::KeyFrames;
use crate::note::Note;
use crate::output::{KeyEvent, KeyEventProducer};
use crate::tracker::{Contact, ContactId, ContactPhase, TouchTracker};

/// On-screen keys always strike at full velocity; velocity shaping belongs
/// to the synth side.
const KEY_VELOCITY: u8 = 127;

pub struct Keyboard {
    frames: KeyFrames,
    tracker: TouchTracker,
    config: KeyboardConfig,
    events: KeyEventProducer,
}

impl Keyboard {
    pub fn new(config: KeyboardConfig, frames: KeyFrames, events: KeyEventProducer) -> Self {
        Keyboard {
            frames,
            tracker: TouchTracker::new(),
            config,
            events,
        }
    }

    /// The key-frame table, for the view layer to rewrite as layout settles.
    pub fn frames_mut(&mut self) -> &mut KeyFrames {
        &mut self.frames
    }

    pub fn config(&self) -> &KeyboardConfig {
        &self.config
    }

    /// Settings changes take effect on the next contact.
    pub fn set_config(&mut self, config: KeyboardConfig) {
        self.config = config;
    }

    #[inline]
    pub fn is_active(&self, note: Note) -> bool {
        self.tracker.is_active(note)
    }

    /// Apply one gesture callback. Begin/move assigns the key under the
    /// contact; end/cancel releases it. A contact outside every key is
    /// ignored.
    pub fn handle(&mut self, contact: Contact) {
        match contact.phase {
            ContactPhase::Began | ContactPhase::Moved => self.assign(contact),
            ContactPhase::Ended | ContactPhase::Cancelled => self.release(contact.id),
        }
    }

    /// Force note-off for every sounding note, then clear all contact state.
    /// For backgrounding-style cleanup where gesture ends may never arrive.
    pub fn all_off(&mut self) {
        let sounding: SmallVec<[Note; 16]> = self.tracker.active_notes().collect();
        for note in sounding {
            self.emit(KeyEvent::NoteOff { note });
        }
        self.tracker.release_all();
    }

    fn assign(&mut self, contact: Contact) {
        let Some(note) = self.frames.hit(contact.location) else {
            return;
        };

        let assignment = self
            .tracker
            .assign(contact.id, note, self.config.keyboard_slides);

        // Nothing to emit unless state moved: a repeat assignment of the
        // note the contact already holds echoes that note back, and a
        // second finger on a sounding note reports neither flag.
        if assignment.released.is_none() && !assignment.first_time {
            return;
        }
        if assignment.released == Some(note) {
            return;
        }

        if let Some(previous) = assignment.released {
            trace!(%previous, contact = contact.id.0, "note off (slide)");
            self.emit(KeyEvent::NoteOff { note: previous });
        }
        trace!(%note, contact = contact.id.0, "note on");
        self.emit(KeyEvent::NoteOn {
            note,
            velocity: KEY_VELOCITY,
        });
    }

    fn release(&mut self, id: ContactId) {
        if let Some(note) = self.tracker.release(id) {
            trace!(%note, contact = id.0, "note off");
            self.emit(KeyEvent::NoteOff { note });
        }
    }

    fn emit(&mut self, event: KeyEvent) {
        if !self.events.push(event) {
            debug!("key event ring buffer full, dropping event");
        }
    }
}
