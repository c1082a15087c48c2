use crate::animation::spring;
use crate::animation::stagger::{StaggerOrder, StaggerSpec, StaggerStrategy, compute_order};
use crate::composition::model::Track;
use crate::composition::timeline::Timeline;
use crate::effects::pipeline::ResolvedStack;
use crate::eval::time::relative_frame;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{TimelineError, TimelineResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// Everything an external renderer needs for one frame.
pub struct FrameState {
    /// Evaluated frame index.
    pub frame: FrameIndex,
    /// Active scenes in start order.
    pub scenes: Vec<ActiveScene>,
    /// Effect stack of the active visual scene, if it declared one.
    pub effects: Option<ResolvedStack>,
}

impl FrameState {
    /// Active scene by id.
    pub fn scene(&self, id: &str) -> Option<&ActiveScene> {
        self.scenes.iter().find(|s| s.scene_id == id)
    }

    /// The active visual scene. Visual scenes never overlap, so there is at most one.
    pub fn visual(&self) -> Option<&ActiveScene> {
        self.scenes.iter().find(|s| s.track == Track::Visual)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// One scene active at the evaluated frame.
pub struct ActiveScene {
    /// Scene id.
    pub scene_id: String,
    /// Output channel.
    pub track: Track,
    /// Frames since the scene started.
    pub local_frame: u64,
    /// Scene length in frames.
    pub duration_frames: u64,
    /// `local_frame / duration_frames`, in `[0, 1)`.
    pub progress: f64,
    /// Progress of the scene's spring, when it declared one.
    pub spring: Option<f64>,
    /// Per-scene seed derived from the composition seed and the scene id.
    pub seed: u64,
}

impl ActiveScene {
    /// Order `count` items of this scene, seeding random orders with the scene seed.
    pub fn stagger_order(&self, count: usize, strategy: StaggerStrategy) -> StaggerOrder {
        compute_order(count, strategy, Some(self.seed))
    }

    /// Per-item delays for `spec`; a spec without its own seed uses the scene seed.
    pub fn stagger_delays(&self, count: usize, spec: &StaggerSpec) -> Vec<f64> {
        StaggerSpec {
            seed: spec.seed.or(Some(self.seed)),
            ..*spec
        }
        .delays(count)
    }
}

/// Stateless per-frame query over a built [`Timeline`].
pub struct Evaluator;

impl Evaluator {
    #[tracing::instrument(skip(timeline))]
    /// Evaluate `frame`. Any frame can be evaluated in any order; nothing carries over between
    /// calls.
    pub fn eval_frame(timeline: &Timeline, frame: FrameIndex) -> TimelineResult<FrameState> {
        if frame.0 >= timeline.total_frames() {
            return Err(TimelineError::evaluation(format!(
                "frame is outside the composition {}",
                timeline.range()
            ))
            .with_frame(frame));
        }

        let fps = timeline.fps();
        let mut scenes = Vec::new();
        let mut effects = None;
        for planned in timeline.index().active_at(frame) {
            let rt = timeline.runtime(planned);
            let local = relative_frame(frame, planned.range.start).max(0) as u64;
            let duration = planned.range.len_frames();
            let progress = local as f64 / duration as f64;
            let spring = rt
                .spring
                .as_ref()
                .map(|cfg| spring::evaluate(local as f64, fps, cfg));

            if planned.track == Track::Visual {
                effects = rt.effects.clone();
            }
            scenes.push(ActiveScene {
                scene_id: planned.id.clone(),
                track: planned.track,
                local_frame: local,
                duration_frames: duration,
                progress,
                spring,
                seed: rt.seed,
            });
        }

        Ok(FrameState {
            frame,
            scenes,
            effects,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;
