//! The narrow interface the state machine needs from an illustration catalog.

use crate::scene::{SceneAsset, SceneId};
use crate::state::StoryboardState;

/// Read-only access to an illustration catalog.
///
/// Returned assets are copies; scenes keep whatever they captured even if the catalog
/// changes afterwards.
pub trait AssetLookup {
    fn find_by_id(&self, id: &str) -> Option<SceneAsset>;

    /// Ordered suggestions for `keywords`. Implementations may return a default sample
    /// instead of an empty list.
    fn suggest(&self, keywords: &[String]) -> Vec<SceneAsset>;
}

impl<T: AssetLookup + ?Sized> AssetLookup for &T {
    fn find_by_id(&self, id: &str) -> Option<SceneAsset> {
        (**self).find_by_id(id)
    }

    fn suggest(&self, keywords: &[String]) -> Vec<SceneAsset> {
        (**self).suggest(keywords)
    }
}

/// Assigns the first suggestion for the scene's keywords. Returns `false` when the scene is
/// unknown or nothing was suggested.
pub fn illustrate_scene(
    state: &mut StoryboardState,
    lookup: &dyn AssetLookup,
    id: &SceneId,
    now_ms: u64,
) -> bool {
    let Some(scene) = state.scene(id) else {
        return false;
    };
    match lookup.suggest(&scene.keywords).into_iter().next() {
        Some(asset) => {
            state.assign_asset(id, Some(asset), now_ms);
            true
        }
        None => false,
    }
}

/// Illustrates every scene independently, in scene order. Returns how many were assigned.
pub fn illustrate_all(state: &mut StoryboardState, lookup: &dyn AssetLookup, now_ms: u64) -> usize {
    let ids: Vec<SceneId> = state.scenes.iter().map(|scene| scene.id.clone()).collect();
    ids.iter()
        .filter(|id| illustrate_scene(state, lookup, id, now_ms))
        .count()
}
