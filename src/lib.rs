//! Touch keyboard input mapping.
//!
//! Translates concurrent pointer/touch contacts into note on/off events for
//! a virtual piano layout.
//!
//! # Pieces
//!
//! - **Note model**: [`Note`] wraps a MIDI value with naming and parsing.
//! - **Layout generators**: [`WhiteKeys`] and [`BlackKeys`] walk the MIDI
//!   range and produce the visual key order, phantom slots included.
//! - **Hit testing**: [`KeyFrames::hit`] finds the key under a point, black
//!   keys winning where they overlap white ones.
//! - **Tracking**: [`TouchTracker`] refcounts note activations per contact,
//!   with legato slide or fixed-key semantics.
//! - **Session**: [`Keyboard`] wires the above together and emits
//!   [`KeyEvent`]s over a lock-free channel for the synth to drain.
//!
//! # Example
//!
//! ```
//! use keybed::{
//!     key_event_channel, layout_frames, Contact, ContactId, ContactPhase, Keyboard,
//!     KeyboardConfig, LayoutMetrics, Point,
//! };
//!
//! let (producer, mut consumer) = key_event_channel();
//! let frames = layout_frames(&LayoutMetrics::default());
//! let mut keyboard = Keyboard::new(KeyboardConfig::default(), frames, producer);
//!
//! keyboard.handle(Contact {
//!     id: ContactId(1),
//!     location: Point::new(10.0, 150.0),
//!     phase: ContactPhase::Began,
//! });
//!
//! for event in consumer.drain_all() {
//!     // hand off to the synth
//!     let _ = event;
//! }
//! ```

pub mod error;
pub use error::{Error, Result};

mod config;
mod keyboard;
mod layout;
mod note;
mod output;
mod tracker;

pub use config::{KeyLabels, KeyboardConfig, LayoutMetrics};
pub use hit_test::{hit_index, KeyFrames, Point, Rect};
pub use keyboard::Keyboard;
pub use layout::{layout_frames, visible_white_range, BlackKeys, WhiteKeys};
pub use note::Note;
pub use output::{
    key_event_channel, key_event_channel_with_capacity, KeyEvent, KeyEventConsumer,
    KeyEventProducer,
};
pub use tracker::{Assignment, Contact, ContactId, ContactPhase, TouchTracker};
