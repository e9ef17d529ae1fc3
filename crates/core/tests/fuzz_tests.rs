//! Deterministic pseudo-random scripts driven through synthesis and the state machine.

use std::collections::HashSet;

use storyboard_engine::{
    compute_warnings, split_script, synthesize, AnimationStyle, LayoutStyle, ScenePatch,
    StoryboardState, TextPlacement,
};

const WORDS: &[&str] = &[
    "launch", "growth", "the", "a", "story", "Idea", "energy", "we", "compare", "hero", "grid",
    "future", "Product", "audience", "x", "ok", "journey", "solution", "team", "2024", "café",
];
const SEPARATORS: &[&str] = &[" ", "  ", ". ", "! ", "? ", ", ", "\n", "\n\n", "\t", "... "];

fn fill_deterministic(buf: &mut [u8], seed: u64) {
    let mut state = seed;
    for byte in buf.iter_mut() {
        // xorshift64*
        state ^= state >> 12;
        state ^= state << 25;
        state ^= state >> 27;
        state = state.wrapping_mul(0x2545_F491_4F6C_DD1D);
        *byte = (state & 0xFF) as u8;
    }
}

fn generated_script(seed: u64) -> String {
    let mut bytes = vec![0u8; 96];
    fill_deterministic(&mut bytes, seed);
    let mut script = String::new();
    for pair in bytes.chunks(2) {
        script.push_str(WORDS[pair[0] as usize % WORDS.len()]);
        script.push_str(SEPARATORS[pair[1] as usize % SEPARATORS.len()]);
    }
    script
}

#[test]
fn synthesized_scenes_respect_invariants() {
    for seed in 1..=300u64 {
        let script = generated_script(seed);
        let scenes = synthesize(&script);
        let segments = split_script(&script);
        assert!(!segments.is_empty(), "seed {seed}: generated scripts always have text");
        assert_eq!(scenes.len(), segments.len(), "seed {seed}");

        let ids: HashSet<_> = scenes.iter().map(|scene| scene.id.clone()).collect();
        assert_eq!(ids.len(), scenes.len(), "seed {seed}: ids must be unique");

        for (index, scene) in scenes.iter().enumerate() {
            assert!((4.0..=12.0).contains(&scene.duration), "seed {seed}");
            assert!(scene.keywords.len() <= 3, "seed {seed}");
            let distinct: HashSet<_> = scene.keywords.iter().collect();
            assert_eq!(distinct.len(), scene.keywords.len(), "seed {seed}");
            assert!(!scene.narrative.trim().is_empty(), "seed {seed}");
            assert!(!scene.narrative.contains("  "), "seed {seed}");
            assert!(!scene.narrative.contains(['\n', '\t']), "seed {seed}");

            let forced = scene
                .keywords
                .iter()
                .any(|word| matches!(word.as_str(), "split" | "compare" | "hero" | "grid"));
            if !forced {
                assert_eq!(scene.layout, LayoutStyle::CYCLE[index % 6], "seed {seed}");
            }
            assert!(TextPlacement::ALL.contains(&scene.text_placement));
            assert!(AnimationStyle::ALL.contains(&scene.animation));
        }
    }
}

#[test]
fn synthesis_is_repeatable() {
    for seed in 1..=100u64 {
        let script = generated_script(seed);
        let first = synthesize(&script);
        let second = synthesize(&script);
        assert_eq!(first.len(), second.len());
        for (left, right) in first.iter().zip(&second) {
            assert!(left.same_content(right), "seed {seed}");
        }
    }
}

#[test]
fn arbitrary_bytes_never_panic() {
    for seed in 1..=200u64 {
        let mut bytes = vec![0u8; 128];
        fill_deterministic(&mut bytes, seed);
        let script = String::from_utf8_lossy(&bytes);
        let scenes = synthesize(&script);
        assert!(!scenes.is_empty());
        let _ = compute_warnings(&script);
    }
}

#[test]
fn random_edits_keep_duration_and_keyword_bounds() {
    let mut state = StoryboardState::initial(0);
    let mut bytes = vec![0u8; 600];
    fill_deterministic(&mut bytes, 0xDEAD_BEEF);
    for (step, chunk) in bytes.chunks(3).enumerate() {
        let index = chunk[0] as usize % state.scenes.len();
        let id = state.scenes[index].id.clone();
        let duration = (f64::from(chunk[1]) - 100.0) * 0.5;
        let keyword_count = usize::from(chunk[2] % 12);
        let keywords = (0..keyword_count).map(|k| format!("k{k}")).collect();
        state.update_scene(&id, ScenePatch::duration(duration), step as u64);
        state.update_scene(&id, ScenePatch::keywords(keywords), step as u64);
        let scene = &state.scenes[index];
        assert!((1.0..=30.0).contains(&scene.duration));
        assert!(scene.keywords.len() <= 5);
    }
}
