#![allow(dead_code)]

use std::fmt::Write as _;

use storyboard_engine::{AnimationStyle, LayoutStyle, Scene, SceneId, TextPlacement};

pub const THREE_SENTENCES: &str =
    "Hook your viewers. Show the transformation. Call them to act now.";

pub const PARAGRAPHS: &str = "Our product launch is here. The launch brings energy!\n\n\
Compare the old grid with the new hero layout.\n\n\n\
Every story needs a future, and every future needs a story.";

/// Id-free, line-oriented rendering of a scene list for golden comparisons.
pub fn render_scenes(scenes: &[Scene]) -> String {
    let mut output = String::new();
    for (index, scene) in scenes.iter().enumerate() {
        let _ = writeln!(output, "{}. {}", index + 1, scene.title);
        let _ = writeln!(output, "   narrative: {}", scene.narrative);
        let _ = writeln!(output, "   keywords: [{}]", scene.keywords.join(", "));
        let _ = writeln!(
            output,
            "   {:.1}s {} / text {} / {} / {}",
            scene.duration,
            scene.layout.as_str(),
            scene.text_placement.as_str(),
            scene.animation.as_str(),
            scene.accent_color
        );
    }
    output
}

pub fn plain_scene(id: &str) -> Scene {
    Scene {
        id: SceneId::from(id),
        title: format!("Scene {id}"),
        narrative: format!("Narrative for {id}."),
        keywords: vec!["story".to_string()],
        duration: 5.0,
        layout: LayoutStyle::Column,
        text_placement: TextPlacement::Overlay,
        animation: AnimationStyle::Slide,
        accent_color: "#4F46E5".to_string(),
        asset: None,
    }
}
