//! Preprocessor Errors
//!
//! Every failure in this crate is fatal for the file being processed: no
//! partially rewritten source is ever handed back to the host.

use std::ops::Range;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PreprocessError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreprocessError {
    #[error(transparent)]
    ConflictingEdit(#[from] ConflictingEditError),

    #[error("edit {start}..{end} is outside of the source (length {len}) or splits a character")]
    EditOutOfBounds { start: usize, end: usize, len: usize },

    #[error("invalid edit range {start}..{end}")]
    InvalidRange { start: usize, end: usize },

    #[error(transparent)]
    Serialization(#[from] SerializationError),

    #[error("invalid template tree: {0}")]
    InvalidTree(String),

    #[error("invalid preprocessor configuration: {0}")]
    Config(String),
}

/// Two edits touch the same region of the original source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "conflicting edits: {first:?} (from {first_origin}) overlaps {second:?} (from {second_origin})"
)]
pub struct ConflictingEditError {
    pub first: Range<usize>,
    pub first_origin: String,
    pub second: Range<usize>,
    pub second_origin: String,
}

/// An attribute value could not be turned into a runtime expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot serialize attribute `{attribute}`: {reason}")]
pub struct SerializationError {
    pub attribute: String,
    pub reason: String,
}

impl SerializationError {
    pub fn new(attribute: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }
}
