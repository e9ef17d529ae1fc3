//! The authoritative storyboard state and its transition function.
//!
//! Every mutation is expressible as a [`StoryboardAction`] and applied by
//! [`StoryboardState::apply`]. Operations are synchronous and leave no partially applied state
//! behind.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{StoryError, StoryResult};
use crate::scene::{Scene, SceneAsset, SceneId, ScenePatch};
use crate::synth::fallback_scenes;
use crate::text::word_count;

/// Default word budget before the too-long warning fires.
pub const WORD_LIMIT: usize = 500;

pub const EMPTY_SCRIPT_WARNING: &str = "Add a script to unlock AI-assisted scene generation.";
pub const GENERATION_FAILED_WARNING: &str =
    "Scene generation failed. Please adjust your script and try again.";

/// Validation rules applied whenever the script text changes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WarningPolicy {
    pub word_limit: usize,
}

impl Default for WarningPolicy {
    fn default() -> Self {
        Self {
            word_limit: WORD_LIMIT,
        }
    }
}

impl WarningPolicy {
    /// Recomputes the full warning list for `script`.
    ///
    /// Checks run in a fixed order: length first, then emptiness.
    pub fn warnings(&self, script: &str) -> Vec<String> {
        let mut warnings = Vec::new();
        let words = word_count(script);
        if words > self.word_limit {
            warnings.push(format!(
                "Script is {words} words. Consider trimming below {} for best results.",
                self.word_limit
            ));
        }
        if script.trim().is_empty() {
            warnings.push(EMPTY_SCRIPT_WARNING.to_string());
        }
        warnings
    }
}

/// Warnings for `script` under the default word limit.
pub fn compute_warnings(script: &str) -> Vec<String> {
    WarningPolicy::default().warnings(script)
}

/// Per-session storyboard container.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardState {
    pub scenes: Vec<Scene>,
    #[serde(default)]
    pub active_scene_id: Option<SceneId>,
    #[serde(default)]
    pub script: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    #[serde(default)]
    pub is_generating: bool,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub last_updated: u64,
}

/// A single state transition in serializable form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum StoryboardAction {
    Hydrate { state: StoryboardState },
    SetScript { script: String },
    BeginGenerate,
    CommitScenes { scenes: Vec<Scene> },
    CommitGenerationFailure { message: String },
    SetActiveScene { id: SceneId },
    UpdateScene { id: SceneId, patch: ScenePatch },
    ReorderScenes { scenes: Vec<Scene> },
    AssignAsset {
        id: SceneId,
        #[serde(default)]
        asset: Option<SceneAsset>,
    },
}

impl StoryboardAction {
    /// Parses a JSON array of actions. Errors carry the input and the failing position.
    pub fn parse_log(input: &str) -> StoryResult<Vec<StoryboardAction>> {
        serde_json::from_str(input).map_err(|err| StoryError::from_json(input, &err))
    }
}

impl StoryboardState {
    /// Session-start state: the fallback storyboard with the first scene active.
    pub fn initial(now_ms: u64) -> Self {
        let scenes = fallback_scenes();
        let active_scene_id = scenes.first().map(|scene| scene.id.clone());
        Self {
            scenes,
            active_scene_id,
            script: String::new(),
            warnings: Vec::new(),
            is_generating: false,
            last_updated: now_ms,
        }
    }

    pub fn apply(&mut self, action: StoryboardAction, now_ms: u64, policy: &WarningPolicy) {
        match action {
            StoryboardAction::Hydrate { state } => self.hydrate(state),
            StoryboardAction::SetScript { script } => self.set_script(script, policy, now_ms),
            StoryboardAction::BeginGenerate => self.begin_generate(now_ms),
            StoryboardAction::CommitScenes { scenes } => self.commit_scenes(scenes, now_ms),
            StoryboardAction::CommitGenerationFailure { message } => {
                self.commit_generation_failure(message, now_ms)
            }
            StoryboardAction::SetActiveScene { id } => self.set_active_scene(id, now_ms),
            StoryboardAction::UpdateScene { id, patch } => self.update_scene(&id, patch, now_ms),
            StoryboardAction::ReorderScenes { scenes } => self.reorder_scenes(scenes, now_ms),
            StoryboardAction::AssignAsset { id, asset } => self.assign_asset(&id, asset, now_ms),
        }
    }

    /// Replaces the whole state with a persisted snapshot. Leaves `last_updated` as stored.
    pub fn hydrate(&mut self, state: StoryboardState) {
        *self = StoryboardState {
            is_generating: false,
            ..state
        };
    }

    pub fn set_script(&mut self, script: String, policy: &WarningPolicy, now_ms: u64) {
        self.warnings = policy.warnings(&script);
        self.script = script;
        self.last_updated = now_ms;
    }

    /// Marks a generation as in flight. A second call while generating is not rejected.
    pub fn begin_generate(&mut self, now_ms: u64) {
        self.is_generating = true;
        self.last_updated = now_ms;
    }

    /// Replaces the scene list with a synthesis result and selects its first scene.
    pub fn commit_scenes(&mut self, scenes: Vec<Scene>, now_ms: u64) {
        self.active_scene_id = scenes.first().map(|scene| scene.id.clone());
        self.scenes = scenes;
        self.is_generating = false;
        self.last_updated = now_ms;
    }

    /// Ends a failed generation: scenes and selection stay, warnings become `[message]`.
    pub fn commit_generation_failure(&mut self, message: String, now_ms: u64) {
        self.warnings = vec![message];
        self.is_generating = false;
        self.last_updated = now_ms;
    }

    /// Moves the cursor. The id is not checked against the scene list.
    pub fn set_active_scene(&mut self, id: SceneId, now_ms: u64) {
        self.active_scene_id = Some(id);
        self.last_updated = now_ms;
    }

    pub fn update_scene(&mut self, id: &SceneId, patch: ScenePatch, now_ms: u64) {
        if let Some(scene) = self.scene_mut(id) {
            scene.apply_patch(patch);
        }
        self.last_updated = now_ms;
    }

    /// Replaces the scene order. Callers are expected to pass a permutation of the current
    /// scenes; anything else is logged and applied as given.
    pub fn reorder_scenes(&mut self, scenes: Vec<Scene>, now_ms: u64) {
        if !same_id_set(&self.scenes, &scenes) {
            warn!(
                current = self.scenes.len(),
                proposed = scenes.len(),
                "reorder payload is not a permutation of the current scenes"
            );
        }
        self.scenes = scenes;
        self.last_updated = now_ms;
    }

    pub fn assign_asset(&mut self, id: &SceneId, asset: Option<SceneAsset>, now_ms: u64) {
        if let Some(scene) = self.scene_mut(id) {
            scene.asset = asset;
        }
        self.last_updated = now_ms;
    }

    /// Drag-and-drop move: removes the scene at `from` and inserts it at `to`.
    ///
    /// Returns `false` without touching the state when either index is out of range.
    pub fn move_scene(&mut self, from: usize, to: usize, now_ms: u64) -> bool {
        if from >= self.scenes.len() || to >= self.scenes.len() {
            return false;
        }
        let mut reordered = self.scenes.clone();
        let scene = reordered.remove(from);
        reordered.insert(to, scene);
        self.reorder_scenes(reordered, now_ms);
        true
    }

    pub fn reverse_scenes(&mut self, now_ms: u64) {
        let reordered = self.scenes.iter().rev().cloned().collect();
        self.reorder_scenes(reordered, now_ms);
    }

    /// The scene under the cursor, falling back to the first scene for a missing or
    /// dangling id.
    pub fn active_scene(&self) -> Option<&Scene> {
        self.active_scene_id
            .as_ref()
            .and_then(|id| self.scene(id))
            .or_else(|| self.scenes.first())
    }

    pub fn scene(&self, id: &SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|scene| &scene.id == id)
    }

    fn scene_mut(&mut self, id: &SceneId) -> Option<&mut Scene> {
        self.scenes.iter_mut().find(|scene| &scene.id == id)
    }

    /// Timeline length in seconds.
    pub fn total_duration(&self) -> f64 {
        self.scenes.iter().map(|scene| scene.duration).sum()
    }

    /// Returns the first id that occurs more than once, if any.
    pub fn duplicate_scene_id(&self) -> Option<&SceneId> {
        let mut seen = HashSet::new();
        self.scenes
            .iter()
            .map(|scene| &scene.id)
            .find(|id| !seen.insert(*id))
    }
}

fn same_id_set(current: &[Scene], proposed: &[Scene]) -> bool {
    if current.len() != proposed.len() {
        return false;
    }
    let mut left: Vec<&SceneId> = current.iter().map(|scene| &scene.id).collect();
    let mut right: Vec<&SceneId> = proposed.iter().map(|scene| &scene.id).collect();
    left.sort();
    right.sort();
    left == right
}

#[cfg(test)]
#[path = "tests/state_tests.rs"]
mod tests;
