//! A storyboard session: state machine, persistence discipline and generation orchestration.
//!
//! Every state-changing call (re)arms the persistence timer; [`StoryboardSession::tick`]
//! writes once the quiet period has elapsed, so only the latest state reaches the store.

use tracing::{debug, info, instrument, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::ResolvedConfig;
use crate::debounce::Debouncer;
use crate::error::StoryResult;
use crate::lookup::{illustrate_all, illustrate_scene, AssetLookup};
use crate::scene::{Scene, SceneAsset, SceneId, ScenePatch};
use crate::state::{StoryboardAction, StoryboardState, WarningPolicy, GENERATION_FAILED_WARNING};
use crate::storage::{PersistError, StateStore};
use crate::synth::{ScriptSynthesizer, Synthesizer};

/// How a hydration attempt at session start went.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HydrationOutcome {
    Restored,
    Absent,
    /// Stored data was unusable; the session runs on defaults.
    Corrupt(String),
}

/// Script snapshot taken when a generation begins.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "a begun generation must be completed"]
pub struct PendingGeneration {
    script: String,
}

impl PendingGeneration {
    pub fn script(&self) -> &str {
        &self.script
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GenerationOutcome {
    Committed { scenes: usize },
    Failed { reason: String },
}

pub struct StoryboardSession<S: StateStore, C: Clock = SystemClock> {
    state: StoryboardState,
    store: S,
    clock: C,
    config: ResolvedConfig,
    policy: WarningPolicy,
    debouncer: Debouncer,
    synthesizer: Box<dyn Synthesizer>,
    hydration: HydrationOutcome,
}

impl<S: StateStore> StoryboardSession<S, SystemClock> {
    pub fn open(store: S, config: ResolvedConfig) -> Self {
        Self::with_clock(store, SystemClock, config)
    }
}

impl<S: StateStore, C: Clock> StoryboardSession<S, C> {
    /// Builds the default state and hydrates it from `store` before anything else runs.
    pub fn with_clock(store: S, clock: C, config: ResolvedConfig) -> Self {
        let mut state = StoryboardState::initial(clock.now_ms());
        let hydration = match store.load() {
            Ok(Some(persisted)) => {
                info!(scenes = persisted.scenes.len(), "restored persisted storyboard");
                state.hydrate(persisted);
                HydrationOutcome::Restored
            }
            Ok(None) => {
                debug!("no persisted storyboard, starting from defaults");
                HydrationOutcome::Absent
            }
            Err(err) => {
                warn!(error = %err, "persisted storyboard unusable, starting from defaults");
                HydrationOutcome::Corrupt(err.to_string())
            }
        };
        Self {
            state,
            store,
            clock,
            policy: config.warning_policy(),
            debouncer: Debouncer::new(config.persist_debounce),
            config,
            synthesizer: Box::new(ScriptSynthesizer),
            hydration,
        }
    }

    /// Replaces the synthesizer used by [`generate`](Self::generate).
    pub fn with_synthesizer(mut self, synthesizer: impl Synthesizer + 'static) -> Self {
        self.synthesizer = Box::new(synthesizer);
        self
    }

    pub fn state(&self) -> &StoryboardState {
        &self.state
    }

    pub fn active_scene(&self) -> Option<&Scene> {
        self.state.active_scene()
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hydration(&self) -> &HydrationOutcome {
        &self.hydration
    }

    pub fn has_pending_write(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Applies any serialized action and schedules persistence.
    pub fn apply(&mut self, action: StoryboardAction) {
        let now = self.clock.now_ms();
        self.state.apply(action, now, &self.policy);
        self.touched(now);
    }

    pub fn set_script(&mut self, script: impl Into<String>) {
        let now = self.clock.now_ms();
        self.state.set_script(script.into(), &self.policy, now);
        self.touched(now);
    }

    pub fn set_active_scene(&mut self, id: SceneId) {
        let now = self.clock.now_ms();
        self.state.set_active_scene(id, now);
        self.touched(now);
    }

    pub fn update_scene(&mut self, id: &SceneId, patch: ScenePatch) {
        let now = self.clock.now_ms();
        self.state.update_scene(id, patch, now);
        self.touched(now);
    }

    pub fn reorder_scenes(&mut self, scenes: Vec<Scene>) {
        let now = self.clock.now_ms();
        self.state.reorder_scenes(scenes, now);
        self.touched(now);
    }

    pub fn move_scene(&mut self, from: usize, to: usize) -> bool {
        let now = self.clock.now_ms();
        let moved = self.state.move_scene(from, to, now);
        if moved {
            self.touched(now);
        }
        moved
    }

    pub fn reverse_scenes(&mut self) {
        let now = self.clock.now_ms();
        self.state.reverse_scenes(now);
        self.touched(now);
    }

    pub fn assign_asset(&mut self, id: &SceneId, asset: Option<SceneAsset>) {
        let now = self.clock.now_ms();
        self.state.assign_asset(id, asset, now);
        self.touched(now);
    }

    /// Illustrates one scene, or every scene when `target` is `None`. Returns the number of
    /// scenes that received an asset.
    pub fn auto_illustrate(&mut self, lookup: &dyn AssetLookup, target: Option<&SceneId>) -> usize {
        let now = self.clock.now_ms();
        let assigned = match target {
            Some(id) => usize::from(illustrate_scene(&mut self.state, lookup, id, now)),
            None => illustrate_all(&mut self.state, lookup, now),
        };
        if assigned > 0 {
            self.touched(now);
        }
        assigned
    }

    /// Full generation cycle: begin, cosmetic delay, synthesize, commit.
    #[instrument(skip(self))]
    pub fn generate(&mut self) -> GenerationOutcome {
        let pending = self.begin_generation();
        self.clock.sleep(self.config.generation_delay);
        self.complete_generation(pending)
    }

    /// First half of [`generate`](Self::generate) for callers that run the delay themselves.
    /// The previous scenes stay readable until completion.
    pub fn begin_generation(&mut self) -> PendingGeneration {
        let now = self.clock.now_ms();
        if self.state.is_generating {
            debug!("generation requested while another is in flight");
        }
        self.state.begin_generate(now);
        self.touched(now);
        info!(words = crate::text::word_count(&self.state.script), "generation started");
        PendingGeneration {
            script: self.state.script.clone(),
        }
    }

    #[instrument(skip_all)]
    pub fn complete_generation(&mut self, pending: PendingGeneration) -> GenerationOutcome {
        let result = self.synthesizer.synthesize(&pending.script);
        let now = self.clock.now_ms();
        let outcome = match result {
            Ok(scenes) => {
                let count = scenes.len();
                self.state.commit_scenes(scenes, now);
                info!(scenes = count, "generation committed");
                GenerationOutcome::Committed { scenes: count }
            }
            Err(err) => {
                warn!(error = %err, "generation failed, keeping previous scenes");
                self.state
                    .commit_generation_failure(GENERATION_FAILED_WARNING.to_string(), now);
                GenerationOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        };
        self.touched(now);
        outcome
    }

    /// Writes the state if the persistence timer is due. Returns `true` when a write happened.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now_ms();
        if self.debouncer.fire_if_due(now).is_none() {
            return false;
        }
        self.persist().is_ok()
    }

    /// Cancels the timer and writes the current state immediately.
    pub fn flush(&mut self) -> StoryResult<usize> {
        self.debouncer.cancel();
        Ok(self.persist()?)
    }

    fn persist(&mut self) -> Result<usize, PersistError> {
        match self.store.save(&self.state) {
            Ok(bytes) => {
                debug!(bytes, "storyboard persisted");
                Ok(bytes)
            }
            Err(err) => {
                warn!(error = %err, "failed to persist storyboard");
                Err(err)
            }
        }
    }

    fn touched(&mut self, now: u64) {
        self.debouncer.schedule(now);
    }
}

impl<S: StateStore, C: Clock> Drop for StoryboardSession<S, C> {
    fn drop(&mut self) {
        if self.debouncer.cancel().is_some() {
            debug!("session closed with an unwritten change");
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
