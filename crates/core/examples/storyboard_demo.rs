//! Example: Script to storyboard
//!
//! Synthesizes a short script, edits one scene, and persists the result in memory.

use std::time::Duration;

use storyboard_engine::{
    format_duration, preview_hints, ManualClock, MemoryStore, ResolvedConfig, ScenePatch,
    StoryboardSession,
};

fn main() {
    println!("=== Storyboard Example ===\n");

    let store = MemoryStore::new();
    let clock = ManualClock::new(0);
    let mut session =
        StoryboardSession::with_clock(store.clone(), clock.clone(), ResolvedConfig::default());

    session.set_script(
        "Our product launch is here. Growth follows a clear story. Invite the audience to act today.",
    );
    let outcome = session.generate();
    println!("Generation: {outcome:?}\n");

    for scene in &session.state().scenes {
        let hints = preview_hints(scene);
        println!(
            "{:<24} {:>6}  {:<8} text:{:<7} {:<6} scale {:.2} rot {:+}",
            scene.title,
            format_duration(scene.duration),
            scene.layout.as_str(),
            scene.text_placement.as_str(),
            scene.animation.as_str(),
            hints.illustration_scale,
            hints.illustration_rotation_deg,
        );
    }

    // Stretch the opening scene; the edit is clamped to 30 seconds
    if let Some(first) = session.state().scenes.first().map(|scene| scene.id.clone()) {
        session.update_scene(&first, ScenePatch::duration(45.0));
    }
    println!(
        "\nTimeline length: {}",
        format_duration(session.state().total_duration())
    );

    clock.advance(Duration::from_millis(600));
    session.tick();
    println!("Writes after quiet period: {}", store.writes());
}
