//! Word-frequency engine.
//!
//! # Responsibility
//! - Tokenize note text into lower-cased letter/digit runs.
//! - Produce a frequency table in a fully deterministic order.
//!
//! # Invariants
//! - Keys are unique and lower-cased.
//! - Order is `count DESC, word ASC`; map iteration order is never observed.
//! - Never fails: absent or blank text yields an empty table.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::HashMap;

// Anything that is neither a Unicode letter nor a decimal digit separates words.
static WORD_DELIMITER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{Nd}]+").expect("valid word delimiter regex"));

/// One `(word, count)` row of a frequency table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCount {
    pub word: String,
    pub count: u64,
}

/// Ordered word-frequency report.
///
/// Serializes as a JSON object whose key order matches table order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    entries: Vec<WordCount>,
}

impl FrequencyTable {
    /// Rows in `count DESC, word ASC` order.
    pub fn entries(&self) -> &[WordCount] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries
            .iter()
            .map(|entry| (entry.word.as_str(), entry.count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count for one already lower-cased word.
    pub fn get(&self, word: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|entry| entry.word == word)
            .map(|entry| entry.count)
    }

    /// Sum of all counts, i.e. the number of tokens in the source text.
    pub fn total_words(&self) -> u64 {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    pub fn into_entries(self) -> Vec<WordCount> {
        self.entries
    }
}

impl Serialize for FrequencyTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.word, &entry.count)?;
        }
        map.end()
    }
}

/// Counts word occurrences in `text`.
///
/// Rules:
/// - `None`, empty and whitespace-only input produce an empty table.
/// - Text is lower-cased with locale-independent Unicode case mapping.
/// - Tokens are maximal runs of letters (`\p{L}`) and decimal digits
///   (`\p{Nd}`); `v2` is one token, `snake_case` is two.
/// - Ordering is `count DESC`, ties broken by `word ASC` (code point order).
pub fn count_words<'a>(text: impl Into<Option<&'a str>>) -> FrequencyTable {
    let Some(text) = text.into() else {
        return FrequencyTable::default();
    };
    if text.trim().is_empty() {
        return FrequencyTable::default();
    }

    let lowered = text.to_lowercase();
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for token in WORD_DELIMITER_RE
        .split(&lowered)
        .filter(|token| !token.is_empty())
    {
        *counts.entry(token).or_insert(0) += 1;
    }

    let mut entries: Vec<WordCount> = counts
        .into_iter()
        .map(|(word, count)| WordCount {
            word: word.to_string(),
            count,
        })
        .collect();
    entries.sort_by(compare_rows);

    FrequencyTable { entries }
}

fn compare_rows(left: &WordCount, right: &WordCount) -> Ordering {
    right
        .count
        .cmp(&left.count)
        .then_with(|| left.word.cmp(&right.word))
}

#[cfg(test)]
mod tests {
    use super::count_words;

    fn rows(text: &str) -> Vec<(String, u64)> {
        count_words(text)
            .iter()
            .map(|(word, count)| (word.to_string(), count))
            .collect()
    }

    #[test]
    fn folds_case_and_strips_punctuation() {
        assert_eq!(rows("Note, note!"), vec![("note".to_string(), 2)]);
    }

    #[test]
    fn ties_are_broken_alphabetically() {
        assert_eq!(
            rows("note is just a note"),
            vec![
                ("note".to_string(), 2),
                ("a".to_string(), 1),
                ("is".to_string(), 1),
                ("just".to_string(), 1),
            ]
        );
    }

    #[test]
    fn absent_and_blank_text_yield_empty_table() {
        assert!(count_words(None).is_empty());
        assert!(count_words("").is_empty());
        assert!(count_words("   \n\t").is_empty());
        assert!(count_words("?!... --- ***").is_empty());
    }

    #[test]
    fn digits_are_word_characters_and_underscore_is_a_delimiter() {
        let table = count_words("v2 V2 snake_case 2024");
        assert_eq!(table.get("v2"), Some(2));
        assert_eq!(table.get("snake"), Some(1));
        assert_eq!(table.get("case"), Some(1));
        assert_eq!(table.get("2024"), Some(1));
        assert_eq!(table.get("snake_case"), None);
    }

    #[test]
    fn non_latin_scripts_fold_per_character() {
        let table = count_words("Привет, ПРИВЕТ мир! Straße STRASSE");
        assert_eq!(table.get("привет"), Some(2));
        assert_eq!(table.get("мир"), Some(1));
        assert_eq!(table.get("straße"), Some(1));
        assert_eq!(table.get("strasse"), Some(1));
    }

    #[test]
    fn total_words_matches_token_count() {
        let table = count_words("  --a b, a;c...a  ");
        assert_eq!(table.total_words(), 5);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn output_is_sorted_and_repeatable() {
        let text = "delta alpha charlie bravo alpha delta delta echo";
        let first = count_words(text);
        let second = count_words(text);
        assert_eq!(first, second);

        for pair in first.entries().windows(2) {
            let (left, right) = (&pair[0], &pair[1]);
            assert!(left.count >= right.count);
            if left.count == right.count {
                assert!(left.word < right.word);
            }
        }
    }

    #[test]
    fn serializes_as_ordered_object() {
        let json = serde_json::to_string(&count_words("b a b c")).unwrap();
        assert_eq!(json, r#"{"b":2,"a":1,"c":1}"#);
    }
}
