//! Per-document word, sentence and paragraph statistics.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::utils::round_to;

static WORD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9]+").unwrap());
static SENTENCE_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());
static PARAGRAPH_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [r"(?i)<\s*p\b", r"(?i)<\s*br\b", r"(?i)</\s*p\s*>", r"(?i)<\s*div\b", r"(?i)<\s*li\b"]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentStatistics {
    pub word_count: usize,
    pub sentence_count: usize,
    pub paragraph_count: usize,
    pub avg_word_length: f64,
}

/// Words are maximal runs of ASCII letters and digits.
pub fn tokenize(text: &str) -> Vec<&str> {
    WORD_RE.find_iter(text).map(|m| m.as_str()).collect()
}

/// Tokens lower-cased, as the corpus tables count them.
pub fn tokenize_lower(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_ascii_lowercase())
        .collect()
}

pub fn word_stats(text: &str) -> (usize, f64) {
    let tokens = tokenize(text);
    let count = tokens.len();
    if count == 0 {
        return (0, 0.0);
    }
    let chars: usize = tokens.iter().map(|t| t.len()).sum();
    (count, round_to(chars as f64 / count as f64, 3))
}

pub fn sentence_count(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    SENTENCE_SPLIT_RE
        .split(text)
        .filter(|part| !part.trim().is_empty())
        .count()
}

/// Counts structural tags in the original markup, not the stripped text.
/// Markup without any of them counts as one paragraph if it has text at all.
pub fn paragraph_count(html: &str, stripped_text: &str) -> usize {
    let tags: usize = PARAGRAPH_RES
        .iter()
        .map(|re| re.find_iter(html).count())
        .sum();
    if tags > 0 {
        tags
    } else if stripped_text.is_empty() {
        0
    } else {
        1
    }
}

pub fn compute(html: &str, text: &str) -> DocumentStatistics {
    let (word_count, avg_word_length) = word_stats(text);
    DocumentStatistics {
        word_count,
        sentence_count: sentence_count(text),
        paragraph_count: paragraph_count(html, text),
        avg_word_length,
    }
}
