//! Keyword extraction from free resume text.
//!
//! Default: `FrequencyKeywordExtractor` (pure Rust, deterministic). The trait
//! lets a smarter extractor be swapped in without touching enrichment.

use std::collections::HashMap;

pub trait KeywordExtractor: Send + Sync {
    /// Returns at most `max_count` lowercase keywords, most significant first.
    fn extract(&self, text: &str, max_count: usize) -> Vec<String>;
}

/// Ranks tokens by frequency, ties broken by first occurrence.
pub struct FrequencyKeywordExtractor;

const STOPWORDS: &[&str] = &[
    "a", "about", "across", "after", "all", "also", "an", "and", "any", "are", "as", "at", "be",
    "been", "but", "by", "can", "could", "did", "do", "during", "each", "for", "from", "had",
    "has", "have", "he", "her", "his", "i", "in", "including", "into", "is", "it", "its", "me",
    "more", "most", "my", "new", "not", "of", "on", "or", "our", "over", "per", "she", "so",
    "such", "than", "that", "the", "their", "them", "then", "there", "these", "they", "this",
    "those", "through", "to", "up", "us", "using", "via", "was", "we", "were", "what", "when",
    "which", "while", "who", "will", "with", "within", "would", "you", "your",
    // resume filler
    "experience", "experienced", "responsible", "responsibilities", "worked", "working", "work",
    "team", "teams", "years", "year", "months", "role", "company", "skills", "various", "project",
    "projects", "etc",
];

impl KeywordExtractor for FrequencyKeywordExtractor {
    fn extract(&self, text: &str, max_count: usize) -> Vec<String> {
        if max_count == 0 {
            return Vec::new();
        }

        // keyword -> (count, first position)
        let mut counts: HashMap<String, (usize, usize)> = HashMap::new();
        for (position, token) in tokenize(text).enumerate() {
            counts
                .entry(token)
                .and_modify(|(count, _)| *count += 1)
                .or_insert((1, position));
        }

        let mut ranked: Vec<(String, usize, usize)> = counts
            .into_iter()
            .map(|(keyword, (count, first))| (keyword, count, first))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        ranked
            .into_iter()
            .take(max_count)
            .map(|(keyword, _, _)| keyword)
            .collect()
    }
}

/// Splits on whitespace and punctuation, keeping `+`, `#`, `.` and `-` inside
/// tokens so "c++", "c#", "node.js" and "ci-cd" survive.
fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.' | '-')))
        .map(|raw| raw.trim_matches(|c: char| matches!(c, '.' | '-')).to_lowercase())
        .filter(|token| token.chars().count() >= 2)
        .filter(|token| token.chars().any(|c| c.is_alphabetic()))
        .filter(|token| !STOPWORDS.contains(&token.as_str()))
}
