//! Code Buffer
//!
//! Collects offset-based edits against the *original* source of one file and
//! renders them in a single left-to-right pass. Edits never see each other's
//! output, so passes can be composed without recomputing offsets.

use std::ops::Range;

use crate::error::{ConflictingEditError, PreprocessError, Result};

/// A queued mutation of the original source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOperation {
    /// Zero-width insertion before the character at `at`.
    Insert { at: usize, text: String },
    Remove { start: usize, end: usize },
    Overwrite { start: usize, end: usize, text: String },
}

impl EditOperation {
    pub fn start(&self) -> usize {
        match self {
            EditOperation::Insert { at, .. } => *at,
            EditOperation::Remove { start, .. } | EditOperation::Overwrite { start, .. } => *start,
        }
    }

    pub fn end(&self) -> usize {
        match self {
            EditOperation::Insert { at, .. } => *at,
            EditOperation::Remove { end, .. } | EditOperation::Overwrite { end, .. } => *end,
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.start()..self.end()
    }

    fn is_insert(&self) -> bool {
        matches!(self, EditOperation::Insert { .. })
    }
}

/// An edit together with the pass that submitted it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub operation: EditOperation,
    pub origin: String,
}

#[derive(Debug, Clone, Default)]
pub struct CodeBuffer {
    edits: Vec<Edit>,
    origin: String,
}

impl CodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Label attached to every edit submitted from now on.
    pub fn set_origin(&mut self, origin: impl Into<String>) {
        self.origin = origin.into();
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn insert_after(&mut self, offset: usize, text: impl Into<String>) {
        self.push(EditOperation::Insert {
            at: offset,
            text: text.into(),
        });
    }

    /// Removing an empty range is a no-op.
    pub fn remove(&mut self, start: usize, end: usize) -> Result<()> {
        if start > end {
            return Err(PreprocessError::InvalidRange { start, end });
        }
        if start < end {
            self.push(EditOperation::Remove { start, end });
        }
        Ok(())
    }

    pub fn overwrite(&mut self, start: usize, end: usize, text: impl Into<String>) -> Result<()> {
        if start >= end {
            return Err(PreprocessError::InvalidRange { start, end });
        }
        self.push(EditOperation::Overwrite {
            start,
            end,
            text: text.into(),
        });
        Ok(())
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn len(&self) -> usize {
        self.edits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    fn push(&mut self, operation: EditOperation) {
        self.edits.push(Edit {
            operation,
            origin: self.origin.clone(),
        });
    }

    /// Apply every queued edit to `original`.
    ///
    /// Edits are ordered by start offset; at equal offsets inserts come before
    /// range edits, and submission order breaks remaining ties. Range edits
    /// must be pairwise disjoint, and an insert may only touch a range edit at
    /// one of its boundaries.
    pub fn render(&self, original: &str) -> Result<String> {
        for edit in &self.edits {
            let (start, end) = (edit.operation.start(), edit.operation.end());
            if end > original.len()
                || !original.is_char_boundary(start)
                || !original.is_char_boundary(end)
            {
                return Err(PreprocessError::EditOutOfBounds {
                    start,
                    end,
                    len: original.len(),
                });
            }
        }

        let mut order: Vec<&Edit> = self.edits.iter().collect();
        // Stable sort keeps submission order among equal keys.
        order.sort_by_key(|edit| (edit.operation.start(), !edit.operation.is_insert()));

        let extra: usize = self
            .edits
            .iter()
            .map(|edit| match &edit.operation {
                EditOperation::Insert { text, .. } | EditOperation::Overwrite { text, .. } => text.len(),
                EditOperation::Remove { .. } => 0,
            })
            .sum();
        let mut out = String::with_capacity(original.len() + extra);
        let mut cursor = 0;
        let mut last_range: Option<&Edit> = None;

        for edit in order {
            let start = edit.operation.start();
            // Starts are ascending, so only the last range edit can reach past `start`.
            if let Some(previous) = last_range {
                if start < previous.operation.end() {
                    return Err(conflict(previous, edit).into());
                }
            }
            out.push_str(&original[cursor..start]);
            match &edit.operation {
                EditOperation::Insert { text, .. } => {
                    out.push_str(text);
                    cursor = start;
                }
                EditOperation::Remove { end, .. } => {
                    cursor = *end;
                    last_range = Some(edit);
                }
                EditOperation::Overwrite { end, text, .. } => {
                    out.push_str(text);
                    cursor = *end;
                    last_range = Some(edit);
                }
            }
        }
        out.push_str(&original[cursor..]);
        Ok(out)
    }
}

fn conflict(first: &Edit, second: &Edit) -> ConflictingEditError {
    ConflictingEditError {
        first: first.operation.range(),
        first_origin: first.origin.clone(),
        second: second.operation.range(),
        second_origin: second.origin.clone(),
    }
}
