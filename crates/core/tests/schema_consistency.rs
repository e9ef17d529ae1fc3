use std::env;
use std::fs;
use std::path::PathBuf;

use schemars::schema_for;
use storyboard_engine::{PersistedStoryboard, StoryboardAction};

fn verify_schema<T: schemars::JsonSchema>(name: &str) {
    let schema = schema_for!(T);
    let schema_json = serde_json::to_string_pretty(&schema).expect("schema should serialize");

    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push(format!("schema_{name}.json"));

    if env::var("UPDATE_SCHEMA").is_ok() || !path.exists() {
        fs::write(&path, schema_json).expect("failed to write schema");
        return;
    }

    let existing_json = fs::read_to_string(&path).expect("failed to read existing schema");

    let schema_json = schema_json.replace("\r\n", "\n");
    let existing_json = existing_json.replace("\r\n", "\n");

    if schema_json != existing_json {
        panic!(
            "Schema mismatch for {name}. Run with UPDATE_SCHEMA=1 to update.\nExpected:\n{existing_json}\nActual:\n{schema_json}"
        );
    }
}

#[test]
fn persisted_storyboard_schema_snapshot() {
    verify_schema::<PersistedStoryboard>("persisted_storyboard");
}

#[test]
fn storyboard_action_schema_snapshot() {
    verify_schema::<StoryboardAction>("storyboard_action");
}

#[test]
fn persisted_schema_names_camel_case_fields() {
    let schema = serde_json::to_value(schema_for!(PersistedStoryboard)).expect("schema json");
    let properties = &schema["properties"];
    for field in ["scenes", "activeSceneId", "isGenerating", "lastUpdated"] {
        assert!(properties.get(field).is_some(), "missing {field}");
    }
}
