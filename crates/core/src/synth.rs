//! Scene synthesis: script text in, fully styled scenes out.

use crate::error::StoryResult;
use crate::keywords::{rank_tokens, SYNTHESIS_KEYWORDS};
use crate::scene::{AnimationStyle, LayoutStyle, Scene, SceneId, TextPlacement};
use crate::style::{
    accent_color, determine_animation, determine_duration, determine_layout,
    determine_text_placement, hash_string, title_from_keywords,
};
use crate::text::{split_script, tokenize};

/// Source of scenes for a generation run.
///
/// The state machine only ever sees the `Result`; failures become a user-facing warning.
pub trait Synthesizer {
    fn synthesize(&self, script: &str) -> StoryResult<Vec<Scene>>;
}

/// The heuristic, deterministic synthesizer.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScriptSynthesizer;

impl Synthesizer for ScriptSynthesizer {
    fn synthesize(&self, script: &str) -> StoryResult<Vec<Scene>> {
        Ok(synthesize(script))
    }
}

/// Turns script text into scenes.
///
/// Empty or whitespace-only input yields [`fallback_scenes`]. For identical input every field
/// except `id` is identical across calls.
pub fn synthesize(script: &str) -> Vec<Scene> {
    let segments = split_script(script);
    if segments.is_empty() {
        return fallback_scenes();
    }
    segments
        .into_iter()
        .enumerate()
        .map(|(index, segment)| scene_from_segment(index, segment))
        .collect()
}

fn scene_from_segment(index: usize, segment: String) -> Scene {
    let tokens = tokenize(&segment);
    let word_total = tokens.len();
    let keywords = rank_tokens(tokens, SYNTHESIS_KEYWORDS);
    let hash = hash_string(&format!("{segment}{index}"));
    Scene {
        id: SceneId::new(),
        title: title_from_keywords(&keywords, index),
        duration: determine_duration(word_total),
        layout: determine_layout(index, &keywords),
        text_placement: determine_text_placement(hash),
        animation: determine_animation(&keywords, hash),
        accent_color: accent_color(index).to_string(),
        narrative: segment,
        keywords,
        asset: None,
    }
}

/// The three example scenes shown before any script has been written.
pub fn fallback_scenes() -> Vec<Scene> {
    vec![
        fallback_scene(
            0,
            "Ignite Curiosity",
            "Hook your audience with a bold statement that frames the problem you solve.",
            ["hook", "audience", "problem"],
            6.0,
            LayoutStyle::Hero,
            TextPlacement::Center,
            AnimationStyle::Fade,
        ),
        fallback_scene(
            1,
            "Show the Transformation",
            "Illustrate the before-and-after journey with a confident tone and clear visuals.",
            ["transformation", "journey", "clarity"],
            7.0,
            LayoutStyle::Split,
            TextPlacement::Left,
            AnimationStyle::Slide,
        ),
        fallback_scene(
            2,
            "Call to Action",
            "Close with energy and invite your viewers to take the next step right now.",
            ["action", "energy", "invite"],
            5.0,
            LayoutStyle::Centered,
            TextPlacement::Bottom,
            AnimationStyle::Bounce,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn fallback_scene(
    index: usize,
    title: &str,
    narrative: &str,
    keywords: [&str; 3],
    duration: f64,
    layout: LayoutStyle,
    text_placement: TextPlacement,
    animation: AnimationStyle,
) -> Scene {
    Scene {
        id: SceneId::new(),
        title: title.to_string(),
        narrative: narrative.to_string(),
        keywords: keywords.iter().map(|word| word.to_string()).collect(),
        duration,
        layout,
        text_placement,
        animation,
        accent_color: accent_color(index).to_string(),
        asset: None,
    }
}

#[cfg(test)]
#[path = "tests/synth_tests.rs"]
mod tests;
