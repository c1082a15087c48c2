//! Scene placement and validation.

use std::collections::BTreeSet;

use crate::composition::model::{SceneDecl, Track};
use crate::foundation::core::{Fps, FrameIndex, FrameRange};
use crate::foundation::error::{TimelineError, TimelineResult};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// A scene with its frame range fixed.
pub struct PlannedScene {
    /// Scene id.
    pub id: String,
    /// Output channel.
    pub track: Track,
    /// Frames the scene occupies.
    pub range: FrameRange,
    /// Position of the scene in the declaration list.
    pub decl_index: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// Planned scenes sorted by `(start, declaration order)`.
pub struct SceneIndex {
    scenes: Vec<PlannedScene>,
    total_frames: u64,
}

impl SceneIndex {
    /// Every planned scene in start order.
    pub fn scenes(&self) -> &[PlannedScene] {
        &self.scenes
    }

    /// End of the last scene.
    pub fn total_frames(&self) -> u64 {
        self.total_frames
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// Return `true` if nothing was planned.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Look up a scene by id.
    pub fn get(&self, id: &str) -> Option<&PlannedScene> {
        self.scenes.iter().find(|s| s.id == id)
    }

    /// Scenes active at `frame`, in start order.
    pub fn active_at(&self, frame: FrameIndex) -> impl Iterator<Item = &PlannedScene> {
        // Sorted by start, so nothing after the first scene starting past `frame` can be active.
        let end = self.scenes.partition_point(|s| s.range.start <= frame);
        self.scenes[..end]
            .iter()
            .filter(move |s| s.range.contains(frame))
    }
}

/// Place every scene on the timeline and validate the result.
///
/// Scenes without an explicit start follow the previous scene declared on the same track.
/// Seconds are rounded to the nearest frame. Visual scenes must not overlap; audio scenes are
/// unrestricted.
#[tracing::instrument(skip(decls), fields(scenes = decls.len()))]
pub fn plan(decls: &[SceneDecl], fps: Fps) -> TimelineResult<SceneIndex> {
    let fps = Fps::new(fps.num, fps.den)?;
    let mut ids = BTreeSet::<&str>::new();
    let mut visual_cursor = 0u64;
    let mut audio_cursor = 0u64;
    let mut scenes = Vec::with_capacity(decls.len());

    for (decl_index, decl) in decls.iter().enumerate() {
        let id = decl.id.trim();
        if id.is_empty() {
            return Err(TimelineError::config(format!(
                "scene #{decl_index} has an empty id"
            )));
        }
        if !ids.insert(id) {
            return Err(TimelineError::config("duplicate scene id").with_scene(id));
        }

        let cursor = match decl.track {
            Track::Visual => &mut visual_cursor,
            Track::Audio => &mut audio_cursor,
        };
        let range = place(decl, fps, *cursor).map_err(|e| e.with_scene(id))?;
        *cursor = range.end.0;

        scenes.push(PlannedScene {
            id: id.to_owned(),
            track: decl.track,
            range,
            decl_index,
        });
    }

    scenes.sort_by_key(|s| (s.range.start, s.decl_index));
    check_visual_overlaps(&scenes)?;

    let total_frames = scenes.iter().map(|s| s.range.end.0).max().unwrap_or(0);
    tracing::debug!(scenes = scenes.len(), total_frames, "planned scenes");
    Ok(SceneIndex {
        scenes,
        total_frames,
    })
}

fn place(decl: &SceneDecl, fps: Fps, cursor: u64) -> TimelineResult<FrameRange> {
    let start = match (decl.start_frame, decl.start_seconds) {
        (Some(_), Some(_)) => {
            return Err(TimelineError::config(
                "startFrame and startSeconds are mutually exclusive",
            ));
        }
        (Some(f), None) => f,
        (None, Some(s)) => seconds_to_frames(fps, s, "startSeconds")?,
        (None, None) => i64::try_from(cursor)
            .map_err(|_| TimelineError::config("scene start overflows the timeline"))?,
    };
    if start < 0 {
        return Err(TimelineError::config(format!(
            "scene start must be >= 0 (got {start})"
        )));
    }

    let duration = match (decl.duration_frames, decl.duration_seconds) {
        (Some(_), Some(_)) => {
            return Err(TimelineError::config(
                "durationFrames and durationSeconds are mutually exclusive",
            ));
        }
        (Some(f), None) => f,
        (None, Some(s)) => seconds_to_frames(fps, s, "durationSeconds")?,
        (None, None) => {
            return Err(TimelineError::config(
                "scene needs durationFrames or durationSeconds",
            ));
        }
    };
    if duration <= 0 {
        return Err(TimelineError::config(format!(
            "scene duration must be > 0 frames (got {duration})"
        )));
    }

    let start = start as u64;
    let end = start
        .checked_add(duration as u64)
        .ok_or_else(|| TimelineError::config("scene end overflows the timeline"))?;
    FrameRange::new(FrameIndex(start), FrameIndex(end))
}

fn seconds_to_frames(fps: Fps, secs: f64, field: &str) -> TimelineResult<i64> {
    if !secs.is_finite() {
        return Err(TimelineError::config(format!("{field} must be finite")));
    }
    Ok(fps.secs_to_frames_round(secs))
}

fn check_visual_overlaps(sorted: &[PlannedScene]) -> TimelineResult<()> {
    // Non-overlapping visual scenes sorted by start also have increasing ends, so each scene
    // only needs checking against the previous visual one.
    let mut prev: Option<&PlannedScene> = None;
    for s in sorted.iter().filter(|s| s.track == Track::Visual) {
        if let Some(p) = prev
            && let Some(range) = p.range.intersection(s.range)
        {
            return Err(TimelineError::OutOfOrder {
                first: p.id.clone(),
                second: s.id.clone(),
                range,
            });
        }
        prev = Some(s);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/compile/plan.rs"]
mod tests;
