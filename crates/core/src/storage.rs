//! Durable storyboard persistence.
//!
//! Payloads are camelCase JSON: the state fields plus an optional `storyboardFormatVersion`.
//! Payloads without a version are accepted as legacy.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::state::StoryboardState;
use crate::version::STORYBOARD_FORMAT_VERSION;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage io error: {0}")]
    Io(#[from] io::Error),
    #[error("storyboard payload is not valid: {0}")]
    Serialization(String),
    #[error("unsupported storyboard format version: found {found}, expected {expected}")]
    UnsupportedVersion { found: u16, expected: u16 },
    #[error("storyboard payload repeats scene id {0}")]
    DuplicateSceneId(String),
    #[error("storyboard payload is corrupt ({primary}); backup {}", describe_backup(.backup))]
    RecoveryFailed {
        primary: Box<PersistError>,
        backup: Option<Box<PersistError>>,
    },
}

fn describe_backup(backup: &Option<Box<PersistError>>) -> String {
    match backup {
        Some(err) => format!("also unusable: {err}"),
        None => "missing".to_string(),
    }
}

/// On-disk shape of a persisted storyboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PersistedStoryboard {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storyboard_format_version: Option<u16>,
    #[serde(flatten)]
    pub state: StoryboardState,
}

/// Serializes `state` for storage. `isGenerating` is always written as `false`.
pub fn encode_state(state: &StoryboardState) -> Result<Vec<u8>, PersistError> {
    let persisted = PersistedStoryboard {
        storyboard_format_version: Some(STORYBOARD_FORMAT_VERSION),
        state: StoryboardState {
            is_generating: false,
            ..state.clone()
        },
    };
    serde_json::to_vec(&persisted).map_err(|err| PersistError::Serialization(err.to_string()))
}

/// Parses and validates a stored payload.
pub fn decode_state(bytes: &[u8]) -> Result<StoryboardState, PersistError> {
    let persisted: PersistedStoryboard = serde_json::from_slice(bytes)
        .map_err(|err| PersistError::Serialization(err.to_string()))?;
    if let Some(found) = persisted.storyboard_format_version {
        if found != STORYBOARD_FORMAT_VERSION {
            return Err(PersistError::UnsupportedVersion {
                found,
                expected: STORYBOARD_FORMAT_VERSION,
            });
        }
    }
    let mut state = persisted.state;
    if let Some(id) = state.duplicate_scene_id() {
        return Err(PersistError::DuplicateSceneId(id.to_string()));
    }
    state.is_generating = false;
    Ok(state)
}

/// Storage medium for the storyboard snapshot.
pub trait StateStore {
    /// `Ok(None)` when nothing has been stored yet.
    fn load(&self) -> Result<Option<StoryboardState>, PersistError>;

    /// Persists `state`, returning the number of bytes written.
    fn save(&self, state: &StoryboardState) -> Result<usize, PersistError>;
}

/// JSON file with atomic replacement and a `.bak` copy of the previous payload.
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn backup_path(&self) -> PathBuf {
        backup_path(&self.path)
    }

    /// Stages `bytes` next to the target and renames over it, so readers see either the old
    /// payload or the new one. The previous payload is copied to the backup first.
    fn atomic_write(&self, bytes: &[u8]) -> Result<(), PersistError> {
        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let staged = sibling_path(&self.path, ".tmp");
        {
            let mut file = fs::File::create(&staged)?;
            file.write_all(bytes)?;
            file.sync_all()?;
        }
        match fs::copy(&self.path, self.backup_path()) {
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(PersistError::Io(err)),
        }
        // rename replaces an existing target on every supported platform
        fs::rename(&staged, &self.path)?;
        Ok(())
    }
}

impl StateStore for FileStore {
    fn load(&self) -> Result<Option<StoryboardState>, PersistError> {
        let backup = self.backup_path();
        let Some(primary_bytes) = read_optional(&self.path)? else {
            // primary removed out of band; the backup is the newest surviving payload
            return match read_optional(&backup)? {
                Some(bytes) => {
                    warn!(path = %backup.display(), "primary storyboard missing, using backup");
                    decode_state(&bytes).map(Some)
                }
                None => Ok(None),
            };
        };
        match decode_state(&primary_bytes) {
            Ok(state) => Ok(Some(state)),
            Err(primary) => match read_optional(&backup)? {
                Some(bytes) => {
                    warn!(
                        path = %self.path.display(),
                        error = %primary,
                        "primary storyboard unreadable, recovering from backup"
                    );
                    decode_state(&bytes)
                        .map(Some)
                        .map_err(|backup| PersistError::RecoveryFailed {
                            primary: Box::new(primary),
                            backup: Some(Box::new(backup)),
                        })
                }
                None => Err(PersistError::RecoveryFailed {
                    primary: Box::new(primary),
                    backup: None,
                }),
            },
        }
    }

    fn save(&self, state: &StoryboardState) -> Result<usize, PersistError> {
        let bytes = encode_state(state)?;
        self.atomic_write(&bytes)?;
        Ok(bytes.len())
    }
}

/// In-process store. Clones share the same slot.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    bytes: Option<Vec<u8>>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot with raw bytes, valid or not.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let store = Self::default();
        store.slot().bytes = Some(bytes.into());
        store
    }

    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.slot().bytes.clone()
    }

    /// Number of completed `save` calls.
    pub fn writes(&self) -> usize {
        self.slot().writes
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, MemorySlot> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<StoryboardState>, PersistError> {
        match self.bytes() {
            Some(bytes) => decode_state(&bytes).map(Some),
            None => Ok(None),
        }
    }

    fn save(&self, state: &StoryboardState) -> Result<usize, PersistError> {
        let bytes = encode_state(state)?;
        let len = bytes.len();
        let mut slot = self.slot();
        slot.bytes = Some(bytes);
        slot.writes += 1;
        Ok(len)
    }
}

fn read_optional(path: &Path) -> Result<Option<Vec<u8>>, PersistError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(PersistError::Io(err)),
    }
}

fn backup_path(path: &Path) -> PathBuf {
    sibling_path(path, ".bak")
}

fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut output = path.as_os_str().to_os_string();
    output.push(suffix);
    PathBuf::from(output)
}

#[cfg(test)]
#[path = "tests/storage_tests.rs"]
mod tests;
