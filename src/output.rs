//! Lock-free note-event channel toward the synth collaborator.
//!
//! The tracker decides note-on/note-off synchronously; the synth may live on
//! another thread, so events cross over a single-producer single-consumer
//! ring buffer. The producer side never blocks or allocates.

use ringbuf::{traits::*, HeapCons, HeapProd, HeapRb};

use crate::note::Note;

/// Default capacity of the key-event ring buffer.
const DEFAULT_CAPACITY: usize = 256;

/// Note activation event emitted by the keyboard session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyEvent {
    NoteOn { note: Note, velocity: u8 },
    NoteOff { note: Note },
}

impl KeyEvent {
    pub fn note(&self) -> Note {
        match *self {
            KeyEvent::NoteOn { note, .. } => note,
            KeyEvent::NoteOff { note } => note,
        }
    }
}

/// Producer half; owned by the keyboard session.
pub struct KeyEventProducer {
    producer: HeapProd<KeyEvent>,
}

impl KeyEventProducer {
    /// Push an event. Returns false if the buffer is full and the event was
    /// dropped.
    #[inline]
    pub fn push(&mut self, event: KeyEvent) -> bool {
        debug_assert!(!event.note().is_phantom());
        self.producer.try_push(event).is_ok()
    }
}

/// Consumer half; drained by the synth collaborator on its own thread.
pub struct KeyEventConsumer {
    consumer: HeapCons<KeyEvent>,
}

impl KeyEventConsumer {
    #[inline]
    pub fn pop(&mut self) -> Option<KeyEvent> {
        self.consumer.try_pop()
    }

    /// Drain every pending event into a vector.
    pub fn drain_all(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::with_capacity(self.consumer.occupied_len());
        while let Some(event) = self.consumer.try_pop() {
            events.push(event);
        }
        events
    }

    #[inline]
    pub fn has_pending(&self) -> bool {
        !self.consumer.is_empty()
    }

    #[inline]
    pub fn pending_count(&self) -> usize {
        self.consumer.occupied_len()
    }
}

/// Create a key-event channel with the default capacity.
pub fn key_event_channel() -> (KeyEventProducer, KeyEventConsumer) {
    key_event_channel_with_capacity(DEFAULT_CAPACITY)
}

/// Create a key-event channel with the given capacity.
pub fn key_event_channel_with_capacity(capacity: usize) -> (KeyEventProducer, KeyEventConsumer) {
    let rb = HeapRb::new(capacity);
    let (producer, consumer) = rb.split();
    (
        KeyEventProducer { producer },
        KeyEventConsumer { consumer },
    )
}
