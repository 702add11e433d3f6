//! Error type for fallible note conversions.
//!
//! Parsing and numeric conversion are the only fallible operations in this
//! crate; everything else is either total or a fail-fast precondition.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid note name: {0:?}")]
    InvalidNoteName(String),

    #[error("MIDI note value out of range: {0}")]
    NoteOutOfRange(u16),
}

pub type Result<T> = std::result::Result<T, Error>;
