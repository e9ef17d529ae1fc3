//! Session configuration.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{StoryError, StoryResult};
use crate::state::{WarningPolicy, WORD_LIMIT};
use crate::version::STORAGE_KEY;

const DEFAULT_GENERATION_DELAY_MS: u64 = 800;
const DEFAULT_PERSIST_DEBOUNCE_MS: u64 = 600;

/// User-facing configuration; every field is optional in TOML.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoryboardConfig {
    pub word_limit: Option<usize>,
    pub generation_delay_ms: Option<u64>,
    pub persist_debounce_ms: Option<u64>,
    pub storage_path: Option<PathBuf>,
}

impl StoryboardConfig {
    pub fn from_toml(input: &str) -> StoryResult<Self> {
        toml::from_str(input).map_err(|err| StoryError::Config(err.to_string()))
    }

    /// Reads a TOML file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> StoryResult<Self> {
        match fs::read_to_string(path) {
            Ok(input) => Self::from_toml(&input),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(StoryError::Config(format!(
                "cannot read {}: {err}",
                path.display()
            ))),
        }
    }

    pub fn resolve(&self) -> ResolvedConfig {
        ResolvedConfig {
            word_limit: self.word_limit.unwrap_or(WORD_LIMIT),
            generation_delay: Duration::from_millis(
                self.generation_delay_ms
                    .unwrap_or(DEFAULT_GENERATION_DELAY_MS),
            ),
            persist_debounce: Duration::from_millis(
                self.persist_debounce_ms
                    .unwrap_or(DEFAULT_PERSIST_DEBOUNCE_MS),
            ),
            storage_path: self
                .storage_path
                .clone()
                .unwrap_or_else(default_storage_path),
        }
    }
}

/// Platform data directory entry for the storyboard, or a relative file when no home exists.
pub fn default_storage_path() -> PathBuf {
    let file_name = format!("{STORAGE_KEY}.json");
    ProjectDirs::from("com", "storyvid", "storyboard")
        .map(|dirs| dirs.data_dir().join(&file_name))
        .unwrap_or_else(|| PathBuf::from(file_name))
}

#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedConfig {
    pub word_limit: usize,
    pub generation_delay: Duration,
    pub persist_debounce: Duration,
    pub storage_path: PathBuf,
}

impl ResolvedConfig {
    pub fn warning_policy(&self) -> WarningPolicy {
        WarningPolicy {
            word_limit: self.word_limit,
        }
    }
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        StoryboardConfig::default().resolve()
    }
}
