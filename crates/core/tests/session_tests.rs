use std::fs;
use std::time::Duration;

use storyboard_engine::{
    FileStore, GenerationOutcome, HydrationOutcome, ManualClock, ResolvedConfig, SceneId,
    ScenePatch, StoryboardConfig, StoryboardSession,
};

mod common;
use common::{plain_scene, THREE_SENTENCES};

fn config_for(dir: &tempfile::TempDir) -> ResolvedConfig {
    StoryboardConfig {
        storage_path: Some(dir.path().join("storyboard.json")),
        ..StoryboardConfig::default()
    }
    .resolve()
}

#[test]
fn storyboard_survives_a_restart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_for(&dir);
    let clock = ManualClock::new(1_000);

    let first_id = {
        let store = FileStore::new(&config.storage_path);
        let mut session = StoryboardSession::with_clock(store, clock.clone(), config.clone());
        assert_eq!(session.hydration(), &HydrationOutcome::Absent);
        session.set_script(THREE_SENTENCES);
        assert_eq!(
            session.generate(),
            GenerationOutcome::Committed { scenes: 3 }
        );
        let first = session.state().scenes[0].id.clone();
        session.update_scene(&first, ScenePatch::duration(9.5));
        clock.advance(Duration::from_millis(600));
        assert!(session.tick());
        first
    };

    let store = FileStore::new(&config.storage_path);
    let session = StoryboardSession::with_clock(store, clock.clone(), config);
    assert_eq!(session.hydration(), &HydrationOutcome::Restored);
    let state = session.state();
    assert_eq!(state.script, THREE_SENTENCES);
    assert_eq!(state.scenes.len(), 3);
    assert_eq!(state.scenes[0].id, first_id);
    assert_eq!(state.scenes[0].duration, 9.5);
    assert_eq!(state.active_scene_id.as_ref(), Some(&first_id));
    assert!(!state.is_generating);
}

#[test]
fn corrupt_file_without_backup_starts_fresh() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_for(&dir);
    fs::write(&config.storage_path, "{\"scenes\": [}").expect("write corrupt payload");

    let session = StoryboardSession::with_clock(
        FileStore::new(&config.storage_path),
        ManualClock::new(0),
        config,
    );
    assert!(matches!(session.hydration(), HydrationOutcome::Corrupt(_)));
    assert_eq!(session.state().scenes.len(), 3);
    assert_eq!(session.state().scenes[0].title, "Ignite Curiosity");
}

#[test]
fn reorder_then_flush_writes_new_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = config_for(&dir);
    let mut session = StoryboardSession::with_clock(
        FileStore::new(&config.storage_path),
        ManualClock::new(0),
        config.clone(),
    );
    session.reorder_scenes(vec![plain_scene("b"), plain_scene("a")]);
    session.set_active_scene(SceneId::from("a"));
    let written = session.flush().expect("flush should write");
    assert!(written > 0);
    assert!(!session.has_pending_write());

    let reopened = StoryboardSession::with_clock(
        FileStore::new(&config.storage_path),
        ManualClock::new(0),
        config,
    );
    let ids: Vec<&str> = reopened
        .state()
        .scenes
        .iter()
        .map(|scene| scene.id.as_str())
        .collect();
    assert_eq!(ids, vec!["b", "a"]);
    assert_eq!(
        reopened.active_scene().map(|scene| scene.id.as_str()),
        Some("a")
    );
}
