//! Data-driven keyword rule tables.
//!
//! The classifier, emotion scorer and tag extractor each own a table; the matching
//! algorithms here are the only code that walks them. Text is expected lower-cased.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Matches anywhere in the text.
    Substring(&'static str),
    /// Matches only between ASCII word boundaries, for short tokens like "ai" or "it".
    Word(&'static str),
}

impl Pattern {
    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Pattern::Substring(p) => text.contains(p),
            Pattern::Word(p) => contains_word(text, p),
        }
    }
}

fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let is_word_byte = |b: u8| b.is_ascii_alphanumeric() || b == b'_';
    let bytes = text.as_bytes();
    text.match_indices(word).any(|(start, _)| {
        let end = start + word.len();
        let before_ok = start == 0 || !is_word_byte(bytes[start - 1]);
        let after_ok = end == bytes.len() || !is_word_byte(bytes[end]);
        before_ok && after_ok
    })
}

/// `pattern` routes to `target`. Tables are ordered; position is priority.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule<T> {
    pub pattern: Pattern,
    pub target: T,
}

pub const fn substring<T>(pattern: &'static str, target: T) -> KeywordRule<T> {
    KeywordRule {
        pattern: Pattern::Substring(pattern),
        target,
    }
}

pub const fn word<T>(pattern: &'static str, target: T) -> KeywordRule<T> {
    KeywordRule {
        pattern: Pattern::Word(pattern),
        target,
    }
}

/// Target of the first rule whose pattern occurs in `text`.
pub fn first_match<'a, T>(text: &str, rules: &'a [KeywordRule<T>]) -> Option<&'a T> {
    rules
        .iter()
        .find(|rule| rule.pattern.is_match(text))
        .map(|rule| &rule.target)
}

/// Targets of every matching rule, deduplicated, in table order.
pub fn all_matches<'a, T: PartialEq>(text: &str, rules: &'a [KeywordRule<T>]) -> Vec<&'a T> {
    let mut targets: Vec<&T> = Vec::new();
    for rule in rules {
        if rule.pattern.is_match(text) && !targets.contains(&&rule.target) {
            targets.push(&rule.target);
        }
    }
    targets
}

/// Adds `weight` to `bucket` once when any of `patterns` occurs.
#[derive(Debug, Clone, Copy)]
pub struct WeightedRule<B> {
    pub patterns: &'static [Pattern],
    pub weight: u32,
    pub bucket: B,
}

/// Sums the weights of every matching rule per bucket.
pub fn tally<B: Copy + Eq + Hash>(text: &str, rules: &[WeightedRule<B>]) -> HashMap<B, u32> {
    let mut totals = HashMap::new();
    for rule in rules {
        if rule.patterns.iter().any(|p| p.is_match(text)) {
            *totals.entry(rule.bucket).or_insert(0) += rule.weight;
        }
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Colour {
        Red,
        Blue,
    }

    const TABLE: &[KeywordRule<Colour>] = &[
        substring("cherry", Colour::Red),
        substring("sky", Colour::Blue),
        word("red", Colour::Red),
    ];

    #[test]
    fn test_first_match_respects_table_order() {
        assert_eq!(first_match("sky full of cherry", TABLE), Some(&Colour::Red));
        assert_eq!(first_match("blue sky", TABLE), Some(&Colour::Blue));
        assert_eq!(first_match("nothing here", TABLE), None);
    }

    #[test]
    fn test_word_pattern_needs_boundaries() {
        assert!(Pattern::Word("ai").is_match("we use ai daily"));
        assert!(Pattern::Word("ai").is_match("ai-driven tools"));
        assert!(!Pattern::Word("ai").is_match("we maintain trains"));
        assert!(!Pattern::Word("it").is_match("with quality"));
        assert!(Pattern::Word("it").is_match("it consulting"));
    }

    #[test]
    fn test_word_pattern_accepts_non_ascii_neighbours() {
        assert!(Pattern::Word("ai").is_match("最新のaiを活用"));
    }

    #[test]
    fn test_all_matches_dedups_targets() {
        let hits = all_matches("red cherry sky", TABLE);
        assert_eq!(hits, vec![&Colour::Red, &Colour::Blue]);
    }

    #[test]
    fn test_tally_counts_each_rule_once() {
        const WEIGHTED: &[WeightedRule<Colour>] = &[
            WeightedRule {
                patterns: &[Pattern::Substring("cherry")],
                weight: 2,
                bucket: Colour::Red,
            },
            WeightedRule {
                patterns: &[Pattern::Substring("rose"), Pattern::Substring("ruby")],
                weight: 1,
                bucket: Colour::Red,
            },
            WeightedRule {
                patterns: &[Pattern::Substring("sky")],
                weight: 2,
                bucket: Colour::Blue,
            },
        ];
        let totals = tally("cherry cherry rose ruby", WEIGHTED);
        assert_eq!(totals.get(&Colour::Red), Some(&3));
        assert_eq!(totals.get(&Colour::Blue), None);
    }
}
