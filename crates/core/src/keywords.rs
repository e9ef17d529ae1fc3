//! Frequency-ranked keyword extraction.

use std::collections::HashMap;

use crate::text::tokenize;

/// Number of keywords synthesis extracts per segment.
pub const SYNTHESIS_KEYWORDS: usize = 3;

/// Upper bound for the keyword list of any scene on an editable path.
pub const MAX_SCENE_KEYWORDS: usize = 5;

/// Returns up to `limit` distinct keywords ordered by descending frequency.
///
/// Ties keep first-occurrence order.
pub fn extract_keywords(text: &str, limit: usize) -> Vec<String> {
    rank_tokens(tokenize(text), limit)
}

pub(crate) fn rank_tokens(tokens: Vec<String>, limit: usize) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for token in &tokens {
        let count = counts.entry(token.as_str()).or_insert_with(|| {
            order.push(token.as_str());
            0
        });
        *count += 1;
    }
    // sort_by_key is stable, so equal counts stay in first-seen order
    order.sort_by_key(|token| std::cmp::Reverse(counts[token]));
    order
        .into_iter()
        .take(limit)
        .map(str::to_string)
        .collect()
}

/// Parses free-text keyword entry ("launch, growth\nteam") into at most five tags.
pub fn parse_keyword_input(input: &str) -> Vec<String> {
    input
        .split([',', '\n'])
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .take(MAX_SCENE_KEYWORDS)
        .map(str::to_string)
        .collect()
}
