//! Scene records and their styling enumerations.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::keywords::MAX_SCENE_KEYWORDS;

/// Lower bound for a user-edited scene duration, in seconds.
pub const MIN_SCENE_DURATION: f64 = 1.0;
/// Upper bound for a user-edited scene duration, in seconds.
pub const MAX_SCENE_DURATION: f64 = 30.0;

/// Opaque scene identifier, minted fresh for every synthesized scene.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for SceneId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for SceneId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for SceneId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for SceneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStyle {
    Hero,
    Split,
    Row,
    Column,
    Grid,
    Centered,
}

impl LayoutStyle {
    /// Cycle order used when no keyword forces a layout.
    pub const CYCLE: [LayoutStyle; 6] = [
        LayoutStyle::Hero,
        LayoutStyle::Split,
        LayoutStyle::Row,
        LayoutStyle::Column,
        LayoutStyle::Grid,
        LayoutStyle::Centered,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutStyle::Hero => "hero",
            LayoutStyle::Split => "split",
            LayoutStyle::Row => "row",
            LayoutStyle::Column => "column",
            LayoutStyle::Grid => "grid",
            LayoutStyle::Centered => "centered",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TextPlacement {
    Left,
    Right,
    Top,
    Bottom,
    Overlay,
    Center,
}

impl TextPlacement {
    /// Declaration order indexed by `hash % 6`.
    pub const ALL: [TextPlacement; 6] = [
        TextPlacement::Left,
        TextPlacement::Right,
        TextPlacement::Top,
        TextPlacement::Bottom,
        TextPlacement::Overlay,
        TextPlacement::Center,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TextPlacement::Left => "left",
            TextPlacement::Right => "right",
            TextPlacement::Top => "top",
            TextPlacement::Bottom => "bottom",
            TextPlacement::Overlay => "overlay",
            TextPlacement::Center => "center",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum AnimationStyle {
    Fade,
    Slide,
    Zoom,
    Bounce,
}

impl AnimationStyle {
    /// Declaration order indexed by `hash % 4`.
    pub const ALL: [AnimationStyle; 4] = [
        AnimationStyle::Fade,
        AnimationStyle::Slide,
        AnimationStyle::Zoom,
        AnimationStyle::Bounce,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AnimationStyle::Fade => "fade",
            AnimationStyle::Slide => "slide",
            AnimationStyle::Zoom => "zoom",
            AnimationStyle::Bounce => "bounce",
        }
    }
}

/// Illustration record captured by value from the asset catalog.
///
/// `svg` is opaque, already-sanitized markup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SceneAsset {
    pub id: String,
    pub name: String,
    pub svg: String,
    pub library: String,
    pub category: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub palette: Vec<String>,
}

/// One storyboard unit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub id: SceneId,
    pub title: String,
    pub narrative: String,
    pub keywords: Vec<String>,
    pub duration: f64,
    pub layout: LayoutStyle,
    pub text_placement: TextPlacement,
    pub animation: AnimationStyle,
    pub accent_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<SceneAsset>,
}

impl Scene {
    /// Merges a partial edit, re-validating duration and keyword count.
    pub fn apply_patch(&mut self, patch: ScenePatch) {
        let ScenePatch {
            title,
            narrative,
            keywords,
            duration,
            layout,
            text_placement,
            animation,
            accent_color,
        } = patch;
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(narrative) = narrative {
            self.narrative = narrative;
        }
        if let Some(mut keywords) = keywords {
            keywords.truncate(MAX_SCENE_KEYWORDS);
            self.keywords = keywords;
        }
        if let Some(duration) = duration.and_then(clamp_duration) {
            self.duration = duration;
        }
        if let Some(layout) = layout {
            self.layout = layout;
        }
        if let Some(text_placement) = text_placement {
            self.text_placement = text_placement;
        }
        if let Some(animation) = animation {
            self.animation = animation;
        }
        if let Some(accent_color) = accent_color {
            self.accent_color = accent_color;
        }
    }

    /// Compares every field except `id`.
    pub fn same_content(&self, other: &Scene) -> bool {
        self.title == other.title
            && self.narrative == other.narrative
            && self.keywords == other.keywords
            && self.duration == other.duration
            && self.layout == other.layout
            && self.text_placement == other.text_placement
            && self.animation == other.animation
            && self.accent_color == other.accent_color
            && self.asset == other.asset
    }
}

/// Partial scene edit. `None` leaves the field untouched; the id is never patchable.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScenePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narrative: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keywords: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<LayoutStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_placement: Option<TextPlacement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
}

impl ScenePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn duration(duration: f64) -> Self {
        Self {
            duration: Some(duration),
            ..Self::default()
        }
    }

    pub fn keywords(keywords: Vec<String>) -> Self {
        Self {
            keywords: Some(keywords),
            ..Self::default()
        }
    }
}

/// Clamps a user-entered duration into `[1, 30]`. Non-finite input is rejected.
pub fn clamp_duration(seconds: f64) -> Option<f64> {
    if seconds.is_finite() {
        Some(seconds.clamp(MIN_SCENE_DURATION, MAX_SCENE_DURATION))
    } else {
        None
    }
}

/// Formats seconds with one decimal, e.g. `"6.0s"`.
pub fn format_duration(seconds: f64) -> String {
    format!("{seconds:.1}s")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_scene() -> Scene {
        Scene {
            id: SceneId::from("scene-a"),
            title: "Launch Moment".to_string(),
            narrative: "We launch today.".to_string(),
            keywords: vec!["launch".to_string()],
            duration: 6.0,
            layout: LayoutStyle::Hero,
            text_placement: TextPlacement::Center,
            animation: AnimationStyle::Zoom,
            accent_color: "#5531A7".to_string(),
            asset: None,
        }
    }

    #[test]
    fn patch_clamps_duration() {
        let mut scene = sample_scene();
        scene.apply_patch(ScenePatch::duration(90.0));
        assert_eq!(scene.duration, 30.0);
        scene.apply_patch(ScenePatch::duration(-4.0));
        assert_eq!(scene.duration, 1.0);
        scene.apply_patch(ScenePatch::duration(f64::NAN));
        assert_eq!(scene.duration, 1.0);
    }

    #[test]
    fn patch_caps_keywords() {
        let mut scene = sample_scene();
        let keywords = (0..8).map(|idx| format!("tag{idx}")).collect();
        scene.apply_patch(ScenePatch::keywords(keywords));
        assert_eq!(scene.keywords.len(), MAX_SCENE_KEYWORDS);
        assert_eq!(scene.keywords[4], "tag4");
    }

    #[test]
    fn patch_leaves_untouched_fields() {
        let mut scene = sample_scene();
        scene.apply_patch(ScenePatch::title("Liftoff"));
        assert_eq!(scene.title, "Liftoff");
        assert_eq!(scene.narrative, "We launch today.");
        assert_eq!(scene.id.as_str(), "scene-a");
    }

    #[test]
    fn scene_serializes_with_camel_case_fields() {
        let json = serde_json::to_value(sample_scene()).expect("scene should serialize");
        assert_eq!(json["textPlacement"], "center");
        assert_eq!(json["accentColor"], "#5531A7");
        assert_eq!(json["layout"], "hero");
        assert!(json.get("asset").is_none());
    }

    #[test]
    fn formats_duration_with_one_decimal() {
        assert_eq!(format_duration(6.0), "6.0s");
        assert_eq!(format_duration(4.26), "4.3s");
    }
}
