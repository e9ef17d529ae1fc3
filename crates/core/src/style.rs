//! Deterministic style assignment.
//!
//! Every choice here is a pure function of segment text and position. The hash recurrence
//! and the sine-based draw must stay bit-for-bit stable: persisted storyboards and golden
//! fixtures depend on them.

use crate::scene::{AnimationStyle, LayoutStyle, Scene, TextPlacement};

/// Fixed accent palette, indexed by `scene index % 6`.
pub const ACCENT_COLORS: [&str; 6] = [
    "#5531A7", "#2BB3B1", "#FF6F61", "#FFB74D", "#1B1C3B", "#4F46E5",
];

const ANIMATION_KEYWORDS: &[(&str, AnimationStyle)] = &[
    ("energy", AnimationStyle::Bounce),
    ("launch", AnimationStyle::Zoom),
    ("growth", AnimationStyle::Slide),
    ("journey", AnimationStyle::Slide),
    ("future", AnimationStyle::Zoom),
    ("audience", AnimationStyle::Fade),
    ("idea", AnimationStyle::Bounce),
    ("solution", AnimationStyle::Fade),
    ("product", AnimationStyle::Zoom),
    ("story", AnimationStyle::Slide),
];

const MIN_SYNTH_DURATION: f64 = 4.0;
const MAX_SYNTH_DURATION: f64 = 12.0;
/// Word count assumed for segments without a single usable token.
const EMPTY_SEGMENT_WORDS: usize = 12;

/// Folds UTF-16 code units into a wrapping 32-bit `hash * 31 + unit` and returns its magnitude.
pub fn hash_string(input: &str) -> u32 {
    let mut hash: i32 = 0;
    for unit in input.encode_utf16() {
        hash = hash.wrapping_mul(31).wrapping_add(i32::from(unit));
    }
    hash.unsigned_abs()
}

/// Maps a hash onto `[min, max]` through `(sin(h) + 1) / 2`, rounding half up.
pub fn random_from_hash(hash: u32, min: f64, max: f64) -> f64 {
    let normalized = (f64::from(hash).sin() + 1.0) / 2.0;
    round_half_up(min + normalized * (max - min))
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Seconds for a segment of `words` usable tokens, clamped to `[4, 12]` at one decimal.
pub fn determine_duration(words: usize) -> f64 {
    let words = if words == 0 { EMPTY_SEGMENT_WORDS } else { words };
    let base = (words as f64 / 3.0).clamp(MIN_SYNTH_DURATION, MAX_SYNTH_DURATION);
    round_half_up(base * 10.0) / 10.0
}

pub fn determine_layout(index: usize, keywords: &[String]) -> LayoutStyle {
    let has = |word: &str| keywords.iter().any(|keyword| keyword == word);
    if has("split") || has("compare") {
        return LayoutStyle::Split;
    }
    if has("hero") {
        return LayoutStyle::Hero;
    }
    if has("grid") {
        return LayoutStyle::Grid;
    }
    LayoutStyle::CYCLE[index % LayoutStyle::CYCLE.len()]
}

pub fn determine_text_placement(hash: u32) -> TextPlacement {
    TextPlacement::ALL[hash as usize % TextPlacement::ALL.len()]
}

/// The first keyword with a mapped animation wins; otherwise `hash % 4`.
pub fn determine_animation(keywords: &[String], hash: u32) -> AnimationStyle {
    keywords
        .iter()
        .find_map(|keyword| {
            ANIMATION_KEYWORDS
                .iter()
                .find(|(word, _)| word == keyword)
                .map(|(_, style)| *style)
        })
        .unwrap_or(AnimationStyle::ALL[hash as usize % AnimationStyle::ALL.len()])
}

pub fn accent_color(index: usize) -> &'static str {
    ACCENT_COLORS[index % ACCENT_COLORS.len()]
}

/// `"Scene N"`, `"{Keyword} Moment"`, or the first two keywords joined with `" & "`.
pub fn title_from_keywords(keywords: &[String], index: usize) -> String {
    match keywords {
        [] => format!("Scene {}", index + 1),
        [only] => format!("{} Moment", capitalize(only)),
        [first, second, ..] => format!("{} & {}", capitalize(first), capitalize(second)),
    }
}

/// Per-scene jitter for preview composition, stable for a given id and title.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PreviewHints {
    pub illustration_scale: f64,
    pub illustration_rotation_deg: f64,
    pub blob_top_pct: f64,
    pub blob_left_pct: f64,
}

pub fn preview_hints(scene: &Scene) -> PreviewHints {
    let hash = hash_string(&format!("{}{}", scene.id, scene.title));
    // offsets decorrelate draws from the same base hash; hash <= 2^31 so they cannot overflow
    PreviewHints {
        illustration_scale: random_from_hash(hash, 75.0, 110.0) / 100.0,
        illustration_rotation_deg: random_from_hash(hash + 23, -8.0, 8.0),
        blob_top_pct: random_from_hash(hash + 9, 10.0, 40.0),
        blob_left_pct: random_from_hash(hash + 14, 10.0, 60.0),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "tests/style_tests.rs"]
mod tests;
