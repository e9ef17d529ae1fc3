use super::*;
use crate::scene::SceneId;

fn sample_state() -> StoryboardState {
    let mut state = StoryboardState::initial(1_700_000_000_000);
    state.script = "Hook your viewers.".to_string();
    state
}

#[test]
fn encode_forces_generating_false_and_tags_version() {
    let mut state = sample_state();
    state.is_generating = true;
    let bytes = encode_state(&state).expect("state should encode");
    let json: serde_json::Value = serde_json::from_slice(&bytes).expect("payload is json");
    assert_eq!(json["isGenerating"], false);
    assert_eq!(json["storyboardFormatVersion"], 1);
    assert_eq!(json["script"], "Hook your viewers.");
    assert!(json["scenes"].is_array());
}

#[test]
fn decode_round_trips_state() {
    let state = sample_state();
    let bytes = encode_state(&state).expect("state should encode");
    let decoded = decode_state(&bytes).expect("state should decode");
    assert_eq!(decoded, state);
}

#[test]
fn decode_accepts_legacy_payload_without_version() {
    let payload = r##"{
        "scenes": [{
            "id": "s1", "title": "Launch Moment", "narrative": "We launch.",
            "keywords": ["launch"], "duration": 6, "layout": "hero",
            "textPlacement": "center", "animation": "zoom", "accentColor": "#5531A7"
        }],
        "activeSceneId": "s1",
        "script": "We launch.",
        "warnings": [],
        "isGenerating": true,
        "lastUpdated": 1712345678901
    }"##;
    let state = decode_state(payload.as_bytes()).expect("legacy payload should decode");
    assert_eq!(state.scenes.len(), 1);
    assert_eq!(state.scenes[0].duration, 6.0);
    assert_eq!(state.active_scene_id, Some(SceneId::from("s1")));
    assert!(!state.is_generating);
    assert_eq!(state.last_updated, 1_712_345_678_901);
}

#[test]
fn decode_rejects_unknown_version() {
    let mut json = serde_json::to_value(sample_state()).expect("state should serialize");
    json["storyboardFormatVersion"] = serde_json::json!(9);
    let bytes = serde_json::to_vec(&json).expect("json should encode");
    let err = decode_state(&bytes).expect_err("version 9 must be rejected");
    assert!(matches!(
        err,
        PersistError::UnsupportedVersion {
            found: 9,
            expected: 1
        }
    ));
}

#[test]
fn decode_rejects_duplicate_ids() {
    let mut state = sample_state();
    let clone = state.scenes[0].clone();
    state.scenes.push(clone);
    let bytes = serde_json::to_vec(&state).expect("state should serialize");
    let err = decode_state(&bytes).expect_err("duplicate ids are corrupt");
    assert!(matches!(err, PersistError::DuplicateSceneId(_)));
}

#[test]
fn decode_rejects_malformed_json() {
    for payload in ["", "{", "[]", "{\"scenes\": 3}"] {
        let err = decode_state(payload.as_bytes()).expect_err("malformed payload");
        assert!(matches!(err, PersistError::Serialization(_)), "{payload}");
    }
}

#[test]
fn file_store_missing_file_is_absent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(dir.path().join("state.json"));
    assert!(store.load().expect("missing file is not an error").is_none());
}

#[test]
fn file_store_round_trip_keeps_backup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(dir.path().join("nested").join("state.json"));
    let mut state = sample_state();
    let written = store.save(&state).expect("first save");
    assert!(written > 0);
    assert!(!store.backup_path().exists());

    state.script = "Second draft.".to_string();
    store.save(&state).expect("second save");
    assert!(store.backup_path().exists());

    let loaded = store.load().expect("load").expect("state present");
    assert_eq!(loaded.script, "Second draft.");
    let backup = decode_state(&fs::read(store.backup_path()).expect("read backup"))
        .expect("backup decodes");
    assert_eq!(backup.script, "Hook your viewers.");
}

#[test]
fn file_store_replaces_in_place_without_leftovers() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("state.json");
    let store = FileStore::new(&path);
    let mut state = sample_state();
    store.save(&state).expect("first save");
    state.script = "Replaced.".to_string();
    store.save(&state).expect("second save");

    let mut names: Vec<String> = fs::read_dir(dir.path())
        .expect("list dir")
        .map(|entry| entry.expect("dir entry").file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["state.json", "state.json.bak"]);
    let loaded = decode_state(&fs::read(&path).expect("read primary")).expect("decodes");
    assert_eq!(loaded.script, "Replaced.");
}

#[test]
fn file_store_recovers_from_backup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(dir.path().join("state.json"));
    let state = sample_state();
    store.save(&state).expect("first save");
    store.save(&state).expect("second save");
    fs::write(store.path(), b"{ not json").expect("corrupt primary");

    let loaded = store.load().expect("backup recovers").expect("state present");
    assert_eq!(loaded.script, state.script);
}

#[test]
fn file_store_reports_unrecoverable_payload() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(dir.path().join("state.json"));
    fs::write(store.path(), b"garbage").expect("write garbage");
    let err = store.load().expect_err("no backup to recover from");
    assert!(matches!(err, PersistError::RecoveryFailed { backup: None, .. }));
    assert!(err.to_string().contains("backup missing"));
}

#[test]
fn file_store_uses_backup_when_primary_vanished() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileStore::new(dir.path().join("state.json"));
    let state = sample_state();
    store.save(&state).expect("first save");
    store.save(&state).expect("second save");
    fs::remove_file(store.path()).expect("remove primary");
    let loaded = store.load().expect("load").expect("backup present");
    assert_eq!(loaded.script, state.script);
}

#[test]
fn memory_store_counts_writes_and_shares_slot() {
    let store = MemoryStore::new();
    let view = store.clone();
    assert!(store.load().expect("empty store").is_none());
    store.save(&sample_state()).expect("save");
    store.save(&sample_state()).expect("save");
    assert_eq!(view.writes(), 2);
    assert!(view.load().expect("load").is_some());
}

#[test]
fn memory_store_surfaces_corrupt_bytes() {
    let store = MemoryStore::with_bytes("not json");
    assert!(store.load().is_err());
}
