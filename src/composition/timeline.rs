//! The validated, immutable form of a [`CompositionDecl`].

use std::collections::BTreeMap;

use crate::animation::spring::{SETTLE_EPSILON, SpringConfig, SpringPresets, measure_spring};
use crate::compile::plan::{PlannedScene, SceneIndex, plan};
use crate::composition::model::{CompositionDecl, Track};
use crate::effects::pipeline::{ResolvedStack, resolve};
use crate::effects::preset::{DEFAULT_EFFECT_PRESET, PresetRegistry, RenderParams};
use crate::eval::time::{SceneState, scene_state};
use crate::foundation::core::{Fps, FrameIndex, FrameRange};
use crate::foundation::error::{PresetWarning, TimelineError, TimelineResult};
use crate::foundation::math::stable_hash64;

#[derive(Clone, Debug, Default)]
pub(crate) struct SceneRuntime {
    pub(crate) spring: Option<SpringConfig>,
    pub(crate) settle_frames: Option<u64>,
    pub(crate) effects: Option<ResolvedStack>,
    pub(crate) seed: u64,
}

#[derive(Clone, Debug)]
/// A composition with every scene placed, every preset resolved and every referenced spring
/// measured.
///
/// Nothing here changes after [`Timeline::build`]; frame queries only read it, so one timeline
/// can be shared by any number of workers.
pub struct Timeline {
    fps: Fps,
    total_frames: u64,
    seed: u64,
    index: SceneIndex,
    runtime: Vec<SceneRuntime>, // by declaration index
    presets: PresetRegistry,
    springs: SpringPresets,
    render: RenderParams,
    warnings: Vec<PresetWarning>,
}

impl Timeline {
    /// Validate `decl` and precompute everything frame queries need.
    ///
    /// Malformed configuration fails here rather than on some later frame. Unknown preset
    /// names do not fail; they are collected in [`Timeline::warnings`].
    #[tracing::instrument(skip(decl), fields(scenes = decl.scenes.len()))]
    pub fn build(decl: &CompositionDecl) -> TimelineResult<Self> {
        let fps = Fps::new(decl.fps.num, decl.fps.den)?;
        let index = plan(&decl.scenes, fps)?;
        let total_frames = composition_length(decl.duration_frames, &index)?;

        let presets = PresetRegistry::from_decls(&decl.presets)?;
        let mut springs = SpringPresets::builtin();
        for (name, cfg) in &decl.springs {
            springs.insert(name.clone(), *cfg)?;
        }

        let mut warnings = Vec::new();
        let mut measured = BTreeMap::<String, u64>::new();
        let mut runtime = vec![SceneRuntime::default(); decl.scenes.len()];

        for planned in index.scenes() {
            let scene = &decl.scenes[planned.decl_index];
            let id = planned.id.as_str();
            let mut rt = SceneRuntime {
                seed: stable_hash64(decl.seed, id),
                ..SceneRuntime::default()
            };

            if let Some(name) = &scene.spring {
                let (cfg, warn) = springs.resolve(name);
                warnings.extend(warn.map(|w| attribute(w, id)));
                let settle = match measured.get(name) {
                    Some(&n) => n,
                    None => {
                        let n = measure_spring(fps, &cfg, SETTLE_EPSILON)
                            .map_err(|e| e.with_scene(id))?;
                        measured.insert(name.clone(), n);
                        n
                    }
                };
                rt.spring = Some(cfg);
                rt.settle_frames = Some(settle);
            }

            if let Some(effects) = &scene.effects {
                if planned.track != Track::Visual {
                    return Err(
                        TimelineError::config("effects are only valid on visual scenes")
                            .with_scene(id),
                    );
                }
                let res = resolve(effects, &presets).map_err(|e| e.with_scene(id))?;
                warnings.extend(res.warnings.into_iter().map(|w| attribute(w, id)));
                rt.effects = Some(res.stack);
            }

            runtime[planned.decl_index] = rt;
        }

        let (quality, warn) =
            presets.resolve_name(decl.quality.as_deref().unwrap_or(DEFAULT_EFFECT_PRESET));
        warnings.extend(warn);
        let render = presets.render_params(quality)?;

        tracing::debug!(
            total_frames,
            warnings = warnings.len(),
            springs_measured = measured.len(),
            "built timeline"
        );

        Ok(Self {
            fps,
            total_frames,
            seed: decl.seed,
            index,
            runtime,
            presets,
            springs,
            render,
            warnings,
        })
    }

    /// Timeline frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Number of frames in the composition.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// `[0, total_frames)`.
    pub fn range(&self) -> FrameRange {
        FrameRange::from_start_len(FrameIndex(0), self.total_frames)
    }

    /// Global determinism seed.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Planned scenes.
    pub fn index(&self) -> &SceneIndex {
        &self.index
    }

    /// Planned scene by id.
    pub fn scene(&self, id: &str) -> Option<&PlannedScene> {
        self.index.get(id)
    }

    /// State of scene `id` at `frame`.
    pub fn scene_state(&self, id: &str, frame: FrameIndex) -> Option<SceneState> {
        self.index.get(id).map(|s| scene_state(frame, s.range))
    }

    /// Resolved effect stack of scene `id`, if it declared one.
    pub fn effects(&self, id: &str) -> Option<&ResolvedStack> {
        self.index
            .get(id)
            .and_then(|s| self.runtime(s).effects.as_ref())
    }

    /// Spring configuration driving scene `id`, after preset fallback.
    pub fn spring(&self, id: &str) -> Option<SpringConfig> {
        self.index.get(id).and_then(|s| self.runtime(s).spring)
    }

    /// Frames until scene `id`'s spring settles within [`SETTLE_EPSILON`].
    pub fn settle_frames(&self, id: &str) -> Option<u64> {
        self.index.get(id).and_then(|s| self.runtime(s).settle_frames)
    }

    /// Effect preset registry, including declared presets.
    pub fn presets(&self) -> &PresetRegistry {
        &self.presets
    }

    /// Spring presets, including declared ones.
    pub fn springs(&self) -> &SpringPresets {
        &self.springs
    }

    /// Output quality hints.
    pub fn render_params(&self) -> &RenderParams {
        &self.render
    }

    /// Preset lookups that fell back to a default during the build.
    pub fn warnings(&self) -> &[PresetWarning] {
        &self.warnings
    }

    pub(crate) fn runtime(&self, scene: &PlannedScene) -> &SceneRuntime {
        &self.runtime[scene.decl_index]
    }
}

fn attribute(mut w: PresetWarning, scene_id: &str) -> PresetWarning {
    w.scene_id.get_or_insert_with(|| scene_id.to_owned());
    w
}

fn composition_length(declared: Option<u64>, index: &SceneIndex) -> TimelineResult<u64> {
    let planned = index.total_frames();
    match declared {
        Some(0) => Err(TimelineError::config("durationFrames must be > 0")),
        Some(d) if d < planned => {
            let last = index
                .scenes()
                .iter()
                .max_by_key(|s| s.range.end)
                .map(|s| s.id.as_str())
                .unwrap_or_default();
            Err(TimelineError::config(format!(
                "scene ends at frame {planned}, after the declared composition end {d}"
            ))
            .with_scene(last))
        }
        Some(d) => Ok(d),
        None if planned == 0 => Err(TimelineError::config(
            "composition has no scenes and no durationFrames",
        )),
        None => Ok(planned),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/composition/timeline.rs"]
mod tests;
