//! Preprocessing pass API
//!
//! A pass is a self-contained rewrite: a cheap textual pre-check plus a
//! tree-driven function that records edits into the file's shared buffer.

use crate::ast::Template;
use crate::code_buffer::CodeBuffer;
use crate::error::Result;
use crate::identifier::IdentifierAllocator;
use crate::logging::Logger;

/// Code to splice into the component script, around the user's code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptAdditions {
    pub before: Vec<String>,
    pub after: Vec<String>,
}

impl ScriptAdditions {
    pub fn is_empty(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }

    pub fn extend(&mut self, other: ScriptAdditions) {
        self.before.extend(other.before);
        self.after.extend(other.after);
    }
}

/// Everything a pass may look at or write to while it runs on one file.
pub struct PassContext<'a> {
    pub template: &'a Template,
    /// The original, unmodified source. Every offset refers to it.
    pub source: &'a str,
    pub code: &'a mut CodeBuffer,
    pub ids: IdentifierAllocator<'a>,
    pub logger: &'a dyn Logger,
}

pub trait PreprocessingPass: Send + Sync {
    /// The name of this pass (for debugging, error messages and identifier
    /// scopes).
    fn name(&self) -> &str;

    /// Whether `apply` could possibly edit `source`.
    ///
    /// May answer `true` for files the pass ends up leaving alone, but must
    /// never answer `false` for a file the pass would edit.
    fn condition(&self, source: &str) -> bool;

    /// Record this pass's edits and return the script code they rely on.
    fn apply(&self, ctx: &mut PassContext<'_>) -> Result<ScriptAdditions>;
}
