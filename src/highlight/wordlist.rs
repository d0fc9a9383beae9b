//! Word lists
//!
//! A word list is an ordered set of entries painted with one style.
//! Its priority is its index in the enclosing sequence.

use std::collections::HashSet;

use super::entry::Entry;
use super::style::Style;

/// One configured list of words and phrases
#[derive(Debug, Clone)]
pub struct WordList {
    /// Compiled entries, in source order, case-insensitively unique
    entries: Vec<Entry>,
    /// Disabled lists keep their slot but never match
    pub enabled: bool,
    /// Style used to render this list's spans
    pub style: Style,
}

impl WordList {
    /// Build a list from already-trimmed, non-empty entry texts
    ///
    /// Later duplicates (ignoring case) are dropped.
    pub fn new<I, S>(entries: I, style: Style) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut compiled = Vec::new();

        for text in entries {
            let text = text.as_ref();
            if !seen.insert(text.to_lowercase()) {
                continue;
            }
            match Entry::new(text) {
                Some(entry) => compiled.push(entry),
                None => tracing::warn!("Skipping entry that cannot be compiled: {:?}", text),
            }
        }

        Self {
            entries: compiled,
            enabled: true,
            style,
        }
    }

    /// A list with no entries
    pub fn empty(style: Style) -> Self {
        Self {
            entries: Vec::new(),
            enabled: true,
            style,
        }
    }

    /// A disabled list with no entries
    pub fn disabled() -> Self {
        Self {
            entries: Vec::new(),
            enabled: false,
            style: Style::default(),
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Phrase entries, in source order
    pub fn phrases(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| e.is_phrase())
    }

    /// Word entries, in source order
    pub fn words(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter().filter(|e| !e.is_phrase())
    }
}
