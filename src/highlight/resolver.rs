//! Match resolution
//!
//! Turns document text plus an ordered sequence of word lists into one
//! bucket of disjoint spans per list. Lower list index wins any overlap,
//! and within a list a phrase always beats a word.
//!
//! Resolution is pure: no I/O and no state survives between calls.

use serde::Serialize;

use super::coverage::Coverage;
use super::wordlist::WordList;

/// A highlighted byte range `[start, end)` attributed to one list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Byte offset where this span starts (inclusive)
    pub start: usize,
    /// Byte offset where this span ends (exclusive)
    pub end: usize,
    /// Index of the word list this span belongs to
    pub list: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, list: usize) -> Self {
        Self { start, end, list }
    }

    /// Do the two spans share at least one offset?
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// The covered text, if the span lies on char boundaries of `text`
    pub fn text<'t>(&self, text: &'t str) -> Option<&'t str> {
        text.get(self.start..self.end)
    }
}

/// A tentative match, before cross-list overlap resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate<'a> {
    /// The entry text that produced this match
    pub entry: &'a str,
    /// Where it matched, and for which list
    pub span: Span,
}

/// Resolve the final highlight spans, one bucket per input list
///
/// The output always has `lists.len()` buckets. Disabled and empty lists
/// get an empty bucket in their slot.
pub fn resolve(text: &str, lists: &[WordList]) -> Vec<Vec<Span>> {
    resolve_candidates(lists.len(), candidates(text, lists))
}

/// Every candidate for every list, grouped by list in priority order
///
/// Within a list, phrase candidates come first in entry order, then the
/// word candidates that no phrase of the same list overlaps.
pub fn candidates<'a>(text: &str, lists: &'a [WordList]) -> Vec<Candidate<'a>> {
    lists
        .iter()
        .enumerate()
        .filter(|(_, list)| list.enabled && !list.is_empty())
        .flat_map(|(index, list)| list_candidates(text, index, list))
        .collect()
}

fn list_candidates<'a>(text: &str, index: usize, list: &'a WordList) -> Vec<Candidate<'a>> {
    let mut found = Vec::new();
    let mut phrase_cover = Coverage::new();

    for phrase in list.phrases() {
        for (start, end) in phrase.find_all(text) {
            phrase_cover.insert(start, end);
            found.push(Candidate {
                entry: &phrase.text,
                span: Span::new(start, end, index),
            });
        }
    }

    for word in list.words() {
        for (start, end) in word.find_all(text) {
            if phrase_cover.overlaps(start, end) {
                continue;
            }
            found.push(Candidate {
                entry: &word.text,
                span: Span::new(start, end, index),
            });
        }
    }

    found
}

/// Accept candidates in order, dropping any that overlap an accepted span
///
/// `candidates` must already be grouped by ascending list index. This
/// also applies within a list, so overlapping repeats of one phrase
/// keep only the earliest-discovered occurrence.
pub fn resolve_candidates(list_count: usize, candidates: Vec<Candidate<'_>>) -> Vec<Vec<Span>> {
    let mut buckets = vec![Vec::new(); list_count];
    let mut claimed = Coverage::new();

    for candidate in candidates {
        let span = candidate.span;
        if claimed.overlaps(span.start, span.end) {
            continue;
        }
        if let Some(bucket) = buckets.get_mut(span.list) {
            claimed.insert(span.start, span.end);
            bucket.push(span);
        }
    }

    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::style::Style;

    fn list(entries: &[&str]) -> WordList {
        WordList::new(entries.iter().copied(), Style::default())
    }

    fn ranges(bucket: &[Span]) -> Vec<(usize, usize)> {
        bucket.iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_phrase_claims_before_lower_priority_word() {
        let text = "the quick brown fox";
        let lists = vec![list(&["quick brown"]), list(&["brown", "fox"])];
        let spans = resolve(text, &lists);

        assert_eq!(spans.len(), 2);
        assert_eq!(ranges(&spans[0]), vec![(4, 15)]);
        assert_eq!(spans[0][0].text(text), Some("quick brown"));
        assert_eq!(ranges(&spans[1]), vec![(16, 19)]);
        assert_eq!(spans[1][0].text(text), Some("fox"));
    }

    #[test]
    fn test_word_prefix_matches() {
        let spans = resolve("catastrophe", &[list(&["cat"])]);
        assert_eq!(ranges(&spans[0]), vec![(0, 3)]);
    }

    #[test]
    fn test_overlapping_phrase_repeats() {
        let text = "aa aa aa";
        let lists = vec![list(&["aa aa"])];

        let found: Vec<(usize, usize)> = candidates(text, &lists)
            .iter()
            .map(|c| (c.span.start, c.span.end))
            .collect();
        assert_eq!(found, vec![(0, 5), (3, 8)]);

        // The later repeat overlaps the earlier one and is dropped
        let spans = resolve(text, &lists);
        assert_eq!(ranges(&spans[0]), vec![(0, 5)]);
    }

    #[test]
    fn test_phrase_beats_word_within_list() {
        // The word is listed first but the phrase still wins
        let text = "new york city";
        let lists = [list(&["york", "new york"])];
        let spans = resolve(text, &lists);
        assert_eq!(ranges(&spans[0]), vec![(0, 8)]);

        let found = candidates(text, &lists);
        let entries: Vec<&str> = found.iter().map(|c| c.entry).collect();
        assert_eq!(entries, vec!["new york"]);
    }

    #[test]
    fn test_word_partially_overlapping_phrase_is_dropped() {
        // "yorkshire" starts inside the phrase "new york"
        let spans = resolve("new yorkshire", &[list(&["new york", "yorkshire"])]);
        assert_eq!(ranges(&spans[0]), vec![(0, 8)]);
    }

    #[test]
    fn test_priority_independent_of_entry_order() {
        let text = "red alert";
        let high = vec![list(&["alert", "red alert"]), list(&["red"])];
        let spans = resolve(text, &high);
        assert_eq!(ranges(&spans[0]), vec![(0, 9)]);
        assert!(spans[1].is_empty());

        let swapped = vec![list(&["red"]), list(&["alert", "red alert"])];
        let spans = resolve(text, &swapped);
        assert_eq!(ranges(&spans[0]), vec![(0, 3)]);
        // "red alert" hides its own "alert", then loses to "red"
        assert!(spans[1].is_empty());
    }

    #[test]
    fn test_same_phrase_in_two_lists_goes_to_lower_index() {
        let text = "open source software";
        let lists = vec![list(&["open source"]), list(&["open source"])];
        let spans = resolve(text, &lists);
        assert_eq!(ranges(&spans[0]), vec![(0, 11)]);
        assert!(spans[1].is_empty());
    }

    #[test]
    fn test_case_insensitive_with_original_offsets() {
        let text = "Quick BROWN fox";
        let spans = resolve(text, &[list(&["quick brown", "FOX"])]);
        assert_eq!(spans[0][0].text(text), Some("Quick BROWN"));
        assert_eq!(spans[0][1].text(text), Some("fox"));
    }

    #[test]
    fn test_index_alignment_with_disabled_and_empty_lists() {
        let mut disabled = list(&["fox"]);
        disabled.enabled = false;
        let lists = vec![
            WordList::disabled(),
            disabled,
            WordList::empty(Style::default()),
            list(&["fox"]),
        ];
        let spans = resolve("the fox", &lists);
        assert_eq!(spans.len(), 4);
        assert!(spans[0].is_empty());
        assert!(spans[1].is_empty());
        assert!(spans[2].is_empty());
        assert_eq!(ranges(&spans[3]), vec![(4, 7)]);
        assert_eq!(spans[3][0].list, 3);
    }

    #[test]
    fn test_no_input() {
        assert!(resolve("anything", &[]).is_empty());

        let spans = resolve("", &[list(&["fox", "a phrase"])]);
        assert_eq!(spans, vec![Vec::<Span>::new()]);
    }

    #[test]
    fn test_adjacent_spans_both_accepted() {
        let spans = resolve("foobar", &[list(&["foo"]), list(&["foobar", "bar"])]);
        assert_eq!(ranges(&spans[0]), vec![(0, 3)]);
        // "bar" has no boundary before it, "foobar" overlaps "foo"
        assert!(spans[1].is_empty());

        let spans = resolve("foo-bar", &[list(&["foo"]), list(&["-bar", "bar"])]);
        assert_eq!(ranges(&spans[0]), vec![(0, 3)]);
        assert_eq!(ranges(&spans[1]), vec![(3, 7)]);
    }

    #[test]
    fn test_deterministic() {
        let text = "alpha beta gamma alpha beta";
        let lists = vec![list(&["alpha beta", "gamma"]), list(&["beta", "alpha"])];
        assert_eq!(resolve(text, &lists), resolve(text, &lists));
    }

    #[test]
    fn test_non_overlap_across_buckets() {
        let text = "ab ab ab abc abcd a b";
        let lists = vec![
            list(&["ab ab", "abc"]),
            list(&["ab", "b ab", "a b"]),
            list(&["a", "abcd", "b"]),
        ];
        let spans: Vec<Span> = resolve(text, &lists).into_iter().flatten().collect();
        for (i, a) in spans.iter().enumerate() {
            for b in &spans[i + 1..] {
                assert!(!a.overlaps(b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_span_overlap_is_half_open() {
        let span = Span::new(5, 10, 0);
        assert!(span.overlaps(&Span::new(0, 6, 1)));
        assert!(!span.overlaps(&Span::new(0, 5, 1)));
        assert!(span.overlaps(&Span::new(9, 12, 1)));
        assert!(!span.overlaps(&Span::new(10, 12, 1)));
    }
}
