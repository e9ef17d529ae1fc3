//! Format versioning constants for persisted storyboards.
//!
//! Payloads without a version are accepted as legacy; anything else must match exactly.

/// Current format version for persisted storyboard state.
/// Increment when the serialized shape of `StoryboardState` changes.
pub const STORYBOARD_FORMAT_VERSION: u16 = 1;

/// Storage key (file stem) under which the storyboard state is persisted.
pub const STORAGE_KEY: &str = "storyvid-storyboard-state";
