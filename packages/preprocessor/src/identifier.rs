//! Hygienic identifiers
//!
//! Generated glue code lives in the same script as user code, so every name
//! it declares is prefixed with a per-pass scope and checked against the words
//! already present in the file. Names handed out are added to the same set,
//! which keeps the allocators of different passes on one file apart too.

use std::collections::HashSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[A-Za-z_$][0-9A-Za-z_$]*").unwrap());

/// Identifier-like words of one source file, plus every name generated for it.
#[derive(Debug, Clone, Default)]
pub struct ReservedNames {
    words: HashSet<String>,
}

impl ReservedNames {
    pub fn from_source(source: &str) -> Self {
        ReservedNames {
            words: WORD_RE
                .find_iter(source)
                .map(|m| m.as_str().to_string())
                .collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.words.contains(name)
    }

    /// Returns `false` if `name` was already taken.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.words.insert(name.into())
    }
}

/// Hands out names for one pass invocation on one file.
///
/// The same base name always maps to the same identifier, different base names
/// never share one, and the output depends only on the scope, the reserved
/// words and the call sequence.
#[derive(Debug)]
pub struct IdentifierAllocator<'a> {
    scope: String,
    reserved: &'a mut ReservedNames,
    assigned: IndexMap<String, String>,
}

impl<'a> IdentifierAllocator<'a> {
    pub fn new(scope: &str, reserved: &'a mut ReservedNames) -> Self {
        IdentifierAllocator {
            scope: sanitize_identifier(scope),
            reserved,
            assigned: IndexMap::new(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn identifier(&mut self, base_name: &str) -> String {
        if let Some(name) = self.assigned.get(base_name) {
            return name.clone();
        }

        let preferred = sanitize_identifier(&format!("{}_{}", self.scope, base_name));
        let mut candidate = preferred.clone();
        let mut suffix = 0;
        while !self.reserved.insert(candidate.clone()) {
            suffix += 1;
            candidate = format!("{}_{}", preferred, suffix);
        }

        self.assigned.insert(base_name.to_string(), candidate.clone());
        candidate
    }
}

/// Replace every character that cannot appear in a JS identifier with `_`,
/// and make sure the result does not start with a digit.
pub fn sanitize_identifier(name: &str) -> String {
    let mut sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    if sanitized.is_empty() || sanitized.starts_with(|c: char| c.is_ascii_digit()) {
        sanitized.insert(0, '_');
    }
    sanitized
}
