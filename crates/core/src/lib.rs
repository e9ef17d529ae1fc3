//! Storyboard scene synthesis and state management.
//!
//! Script text is segmented, keyword-ranked and deterministically styled into [`Scene`]s; a
//! [`StoryboardState`] owns the resulting timeline under user edits, and a
//! [`StoryboardSession`] adds debounced persistence and generation orchestration on top.

pub mod clock;
pub mod config;
pub mod debounce;
mod error;
pub mod keywords;
pub mod lookup;
pub mod scene;
pub mod session;
pub mod state;
pub mod storage;
pub mod style;
pub mod synth;
pub mod text;
pub mod version;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ResolvedConfig, StoryboardConfig};
pub use debounce::{Debouncer, TimerHandle};
pub use error::{StoryError, StoryResult};
pub use keywords::{extract_keywords, parse_keyword_input};
pub use lookup::AssetLookup;
pub use scene::{
    clamp_duration, format_duration, AnimationStyle, LayoutStyle, Scene, SceneAsset, SceneId,
    ScenePatch, TextPlacement,
};
pub use session::{GenerationOutcome, HydrationOutcome, PendingGeneration, StoryboardSession};
pub use state::{compute_warnings, StoryboardAction, StoryboardState, WarningPolicy};
pub use storage::{
    decode_state, encode_state, FileStore, MemoryStore, PersistError, PersistedStoryboard,
    StateStore,
};
pub use style::{hash_string, preview_hints, random_from_hash, PreviewHints};
pub use synth::{fallback_scenes, synthesize, ScriptSynthesizer, Synthesizer};
pub use text::{normalize_script, split_script, word_count};
pub use version::{STORAGE_KEY, STORYBOARD_FORMAT_VERSION};
