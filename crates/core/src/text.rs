//! Script normalization, segmentation and tokenization.
//!
//! Segmentation is a heuristic: a sentence ends at `.`, `!` or `?` followed by whitespace and
//! an ASCII upper-case letter. Abbreviations ("Dr. Who") and similar constructs are split
//! the same way and that behavior is kept stable.

use std::collections::HashSet;
use std::sync::OnceLock;

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "were", "will", "with", "you", "your", "we",
    "our", "this", "their", "they", "but", "or",
];

/// Tokens of this many characters or fewer are never keywords.
const MIN_TOKEN_EXCLUSIVE: usize = 2;

fn stop_words() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| STOP_WORDS.iter().copied().collect())
}

/// Returns true when `word` is in the fixed stop-word set.
pub fn is_stop_word(word: &str) -> bool {
    stop_words().contains(word)
}

/// Collapses every whitespace run, newlines included, to a single space and trims.
pub fn normalize_script(script: &str) -> String {
    let mut output = String::with_capacity(script.len());
    let mut in_gap = false;
    for ch in script.chars() {
        if is_gap(ch) {
            in_gap = true;
            continue;
        }
        if in_gap && !output.is_empty() {
            output.push(' ');
        }
        in_gap = false;
        output.push(ch);
    }
    output
}

// `char::is_whitespace` plus the byte-order mark
fn is_gap(ch: char) -> bool {
    ch.is_whitespace() || ch == '\u{feff}'
}

/// Splits a script into scene-worthy segments.
///
/// Paragraph mode is used when the normalized text contains a blank line, sentence mode
/// otherwise. Normalization folds newlines into spaces, so in practice segments are
/// sentences. Empty segments are dropped.
pub fn split_script(script: &str) -> Vec<String> {
    let normalized = normalize_script(script);
    if normalized.is_empty() {
        return Vec::new();
    }
    let segments: Vec<&str> = if normalized.contains("\n\n") {
        normalized.split("\n\n").collect()
    } else {
        split_sentences(&normalized)
    };
    segments
        .into_iter()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0usize;
    let mut prev: Option<char> = None;
    let mut iter = text.char_indices().peekable();
    while let Some((idx, ch)) = iter.next() {
        let after_terminal = matches!(prev, Some('.' | '!' | '?'));
        if after_terminal && ch.is_whitespace() {
            let mut end = idx + ch.len_utf8();
            while let Some(&(next_idx, next)) = iter.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = next_idx + next.len_utf8();
                iter.next();
            }
            match iter.peek() {
                Some(&(_, next)) if next.is_ascii_uppercase() => {
                    segments.push(&text[start..idx]);
                    start = end;
                    prev = None;
                }
                _ => prev = text[..end].chars().next_back(),
            }
            continue;
        }
        prev = Some(ch);
    }
    segments.push(&text[start..]);
    segments
}

/// Lower-cases `text` and returns its `[a-z0-9]+` tokens, minus short tokens and stop words.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|ch: char| !(ch.is_ascii_lowercase() || ch.is_ascii_digit()))
        .filter(|token| token.len() > MIN_TOKEN_EXCLUSIVE && !is_stop_word(token))
        .map(str::to_string)
        .collect()
}

/// Counts whitespace-separated words of the trimmed script.
pub fn word_count(script: &str) -> usize {
    script.split_whitespace().count()
}

#[cfg(test)]
#[path = "tests/text_tests.rs"]
mod tests;
