use crate::foundation::core::{FrameIndex, FrameRange};

/// Scene-local frame for a global frame: `global - start`, negative before the scene starts.
pub fn relative_frame(global: FrameIndex, start: FrameIndex) -> i64 {
    global.0 as i64 - start.0 as i64
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
/// Where a global frame falls relative to a scene. Computed per query, never stored.
pub enum SceneState {
    /// `frame < start`.
    NotStarted,
    /// `start <= frame < end`.
    Active,
    /// `frame >= end`.
    Ended,
}

/// Classify `frame` against `range`.
pub fn scene_state(frame: FrameIndex, range: FrameRange) -> SceneState {
    if frame < range.start {
        SceneState::NotStarted
    } else if frame < range.end {
        SceneState::Active
    } else {
        SceneState::Ended
    }
}
