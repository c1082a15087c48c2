use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::animation::spring::SpringConfig;
use crate::effects::config::EffectsDecl;
use crate::foundation::core::Fps;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Output channel a scene belongs to.
pub enum Track {
    /// Drawn content. Visual scenes may not overlap.
    #[default]
    Visual,
    /// Sound content. Audio scenes may overlap anything.
    Audio,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Declarative description of a composition, as produced by an external config loader.
///
/// Building a [`crate::Timeline`] from it validates everything up front, so frame queries
/// never fail on configuration.
pub struct CompositionDecl {
    /// Timeline frame rate.
    #[serde(default)]
    pub fps: Fps,
    /// Explicit composition length. Defaults to the end of the last scene.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_frames: Option<u64>,
    /// Scenes in declaration order.
    pub scenes: Vec<SceneDecl>,
    /// Spring presets, added to (or replacing) the built-in ones.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub springs: BTreeMap<String, SpringConfig>,
    /// Effect/quality presets. Each is a preset object, optionally with `"extends"`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub presets: BTreeMap<String, JsonValue>,
    /// Preset whose `render` section describes output quality.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
    /// Global determinism seed; per-scene seeds are derived from it.
    #[serde(default)]
    pub seed: u64,
}

impl CompositionDecl {
    /// Empty composition at `fps`.
    pub fn new(fps: Fps) -> Self {
        Self {
            fps,
            duration_frames: None,
            scenes: Vec::new(),
            springs: BTreeMap::new(),
            presets: BTreeMap::new(),
            quality: None,
            seed: 0,
        }
    }

    /// Append a scene.
    pub fn scene(mut self, scene: SceneDecl) -> Self {
        self.scenes.push(scene);
        self
    }

    /// Set the global seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// One scene as declared. Start and duration may each be given in frames or seconds, not both.
pub struct SceneDecl {
    /// Unique, non-empty scene id.
    pub id: String,
    /// Start frame. Scenes without a start follow the previous scene on the same track.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_frame: Option<i64>,
    /// Start time in seconds, rounded to the nearest frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_seconds: Option<f64>,
    /// Length in frames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_frames: Option<i64>,
    /// Length in seconds, rounded to the nearest frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    /// Output channel.
    #[serde(default)]
    pub track: Track,
    /// Effect stack wrapped around the scene (visual scenes only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<EffectsDecl>,
    /// Spring preset driving the scene's entrance progress.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spring: Option<String>,
}

impl SceneDecl {
    /// Visual scene of `duration_frames` frames placed after the previous visual scene.
    pub fn visual(id: impl Into<String>, duration_frames: i64) -> Self {
        Self {
            id: id.into(),
            duration_frames: Some(duration_frames),
            ..Self::default()
        }
    }

    /// Audio scene of `duration_frames` frames placed after the previous audio scene.
    pub fn audio(id: impl Into<String>, duration_frames: i64) -> Self {
        Self {
            track: Track::Audio,
            ..Self::visual(id, duration_frames)
        }
    }

    /// Pin the scene to `start_frame`.
    pub fn at(mut self, start_frame: i64) -> Self {
        self.start_frame = Some(start_frame);
        self
    }

    /// Attach an effect stack.
    pub fn with_effects(mut self, effects: EffectsDecl) -> Self {
        self.effects = Some(effects);
        self
    }

    /// Drive the scene with the named spring preset.
    pub fn with_spring(mut self, preset: impl Into<String>) -> Self {
        self.spring = Some(preset.into());
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;
