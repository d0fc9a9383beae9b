//! Entry matchers
//!
//! An entry is one configured word or phrase. Entries containing
//! whitespace are phrases, everything else is a word. Both are matched
//! case-insensitively with the entry text escaped, so regex
//! metacharacters are always taken literally.

use regex::{Regex, RegexBuilder};

/// How an entry is scanned for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Multi-token entry; every occurrence is found, overlapping repeats included
    Phrase,
    /// Single token anchored at a word boundary on its start only
    Word,
}

impl EntryKind {
    /// Classify an entry by whether it has an internal separator
    pub fn classify(text: &str) -> Self {
        if text.chars().any(char::is_whitespace) {
            EntryKind::Phrase
        } else {
            EntryKind::Word
        }
    }
}

/// A compiled word or phrase
#[derive(Debug, Clone)]
pub struct Entry {
    /// Entry text as written in the list source
    pub text: String,
    /// Phrase or word
    pub kind: EntryKind,
    /// Compiled, escaped, case-insensitive pattern
    pattern: Regex,
}

impl Entry {
    /// Compile an entry
    ///
    /// Returns `None` only if the escaped pattern exceeds the regex
    /// engine's size limits.
    pub fn new(text: &str) -> Option<Self> {
        let kind = EntryKind::classify(text);
        let escaped = regex::escape(text);
        let source = match kind {
            EntryKind::Phrase => escaped,
            EntryKind::Word => format!(r"\b{}", escaped),
        };
        RegexBuilder::new(&source)
            .case_insensitive(true)
            .build()
            .ok()
            .map(|pattern| Self {
                text: text.to_string(),
                kind,
                pattern,
            })
    }

    /// Is this entry a phrase?
    pub fn is_phrase(&self) -> bool {
        self.kind == EntryKind::Phrase
    }

    /// Find every occurrence of this entry in `text` as byte ranges
    pub fn find_all(&self, text: &str) -> Vec<(usize, usize)> {
        match self.kind {
            EntryKind::Phrase => self.find_overlapping(text),
            EntryKind::Word => self
                .pattern
                .find_iter(text)
                .map(|m| (m.start(), m.end()))
                .collect(),
        }
    }

    /// Scan advancing one character past each hit's start, not past its end
    fn find_overlapping(&self, text: &str) -> Vec<(usize, usize)> {
        let mut hits = Vec::new();
        let mut pos = 0;

        while pos <= text.len() {
            let Some(m) = self.pattern.find_at(text, pos) else {
                break;
            };
            hits.push((m.start(), m.end()));
            let step = text[m.start()..].chars().next().map_or(1, char::len_utf8);
            pos = m.start() + step;
        }

        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(EntryKind::classify("quick brown"), EntryKind::Phrase);
        assert_eq!(EntryKind::classify("tab\tseparated"), EntryKind::Phrase);
        assert_eq!(EntryKind::classify("fox"), EntryKind::Word);
        assert_eq!(EntryKind::classify("co-op"), EntryKind::Word);
    }

    #[test]
    fn test_word_matches_prefix_at_boundary() {
        let entry = Entry::new("cat").unwrap();
        assert_eq!(entry.find_all("catastrophe"), vec![(0, 3)]);
        assert_eq!(entry.find_all("a cat, CATS"), vec![(2, 5), (7, 10)]);
        // No boundary before the match
        assert!(entry.find_all("concat").is_empty());
    }

    #[test]
    fn test_phrase_finds_overlapping_repeats() {
        let entry = Entry::new("aa aa").unwrap();
        assert_eq!(entry.find_all("aa aa aa"), vec![(0, 5), (3, 8)]);
    }

    #[test]
    fn test_phrase_ignores_boundaries() {
        let entry = Entry::new("an ox").unwrap();
        assert_eq!(entry.find_all("Titan Oxide"), vec![(3, 8)]);
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let entry = Entry::new("c++").unwrap();
        assert_eq!(entry.find_all("use c++ or c"), vec![(4, 7)]);

        let entry = Entry::new("a.b").unwrap();
        assert!(entry.find_all("axb").is_empty());
        assert_eq!(entry.find_all("x a.b"), vec![(2, 5)]);

        let entry = Entry::new("1.5 x").unwrap();
        assert!(entry.find_all("105 x").is_empty());
        assert_eq!(entry.find_all("1.5 X"), vec![(0, 5)]);
    }

    #[test]
    fn test_offsets_are_bytes_into_original_text() {
        let entry = Entry::new("straße").unwrap();
        assert_eq!(entry.find_all("Die STRASSE, die Straße"), vec![(17, 24)]);

        let entry = Entry::new("über alles").unwrap();
        assert_eq!(entry.find_all("ÜBER ALLES"), vec![(0, 11)]);
    }
}
