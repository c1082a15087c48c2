use crate::foundation::core::{FrameIndex, FrameRange};

/// Convenience result type used across the timeline engine.
pub type TimelineResult<T> = Result<T, TimelineError>;

/// Location of a failure inside a composition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Scene the failure belongs to, when known.
    pub scene_id: Option<String>,
    /// Global frame the failure was raised for, when known.
    pub frame: Option<FrameIndex>,
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.scene_id, self.frame) {
            (None, None) => Ok(()),
            (Some(id), None) => write!(f, " (scene '{id}')"),
            (None, Some(fr)) => write!(f, " (frame {fr})"),
            (Some(id), Some(fr)) => write!(f, " (scene '{id}', frame {fr})"),
        }
    }
}

/// Coarse classification of [`TimelineError`] values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed configuration detected at build time.
    Config,
    /// Two visual scenes overlap.
    OutOfOrder,
    /// A preset name could not be found (non-fatal when reported as a warning).
    UnknownPreset,
    /// A spring configuration does not settle within the iteration budget.
    NumericInstability,
    /// A frame query could not be answered.
    Evaluation,
    /// Parameter (de)serialization failed.
    Serde,
    /// Wrapped collaborator error.
    Other,
}

/// Which preset namespace a [`PresetWarning`] refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PresetKind {
    /// Effect/quality preset from the effect preset registry.
    Effect,
    /// Named spring configuration.
    Spring,
}

/// A preset lookup that fell back to a documented default.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetWarning {
    /// Preset namespace.
    pub kind: PresetKind,
    /// Name that was requested.
    pub requested: String,
    /// Name that was used instead.
    pub fallback: String,
    /// Scene whose configuration referenced the preset.
    pub scene_id: Option<String>,
}

impl std::fmt::Display for PresetWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match self.kind {
            PresetKind::Effect => "effect",
            PresetKind::Spring => "spring",
        };
        write!(f, "{kind} preset '{}'", self.requested)?;
        if let Some(id) = &self.scene_id {
            write!(f, " in scene '{id}'")?;
        }
        write!(f, " not found, using '{}'", self.fallback)
    }
}

/// Top-level error taxonomy used by engine APIs.
#[derive(thiserror::Error, Debug)]
pub enum TimelineError {
    /// Invalid composition, spring, interpolation or effect configuration.
    #[error("config error{ctx}: {msg}")]
    Config {
        /// Human-readable description.
        msg: String,
        /// Failure location.
        ctx: ErrorContext,
    },

    /// Two visual-track scenes claim the same frames.
    #[error("out-of-order error: visual scenes '{first}' and '{second}' overlap on frames {range}")]
    OutOfOrder {
        /// Scene that starts first.
        first: String,
        /// Scene that starts inside `first`.
        second: String,
        /// Frames claimed by both scenes.
        range: FrameRange,
    },

    /// Preset lookup failure; surfaced as a warning during timeline build.
    #[error("unknown preset: {0}")]
    UnknownPreset(PresetWarning),

    /// Spring configuration failed to settle within the iteration budget.
    #[error("numeric instability{ctx}: {msg}")]
    NumericInstability {
        /// Human-readable description.
        msg: String,
        /// Failure location.
        ctx: ErrorContext,
    },

    /// Errors while answering a frame query.
    #[error("evaluation error{ctx}: {msg}")]
    Evaluation {
        /// Human-readable description.
        msg: String,
        /// Failure location.
        ctx: ErrorContext,
    },

    /// Errors when serializing or deserializing parameter data.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from collaborators.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TimelineError {
    /// Build a [`TimelineError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            msg: msg.into(),
            ctx: ErrorContext::default(),
        }
    }

    /// Build a [`TimelineError::NumericInstability`] value.
    pub fn numeric_instability(msg: impl Into<String>) -> Self {
        Self::NumericInstability {
            msg: msg.into(),
            ctx: ErrorContext::default(),
        }
    }

    /// Build a [`TimelineError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation {
            msg: msg.into(),
            ctx: ErrorContext::default(),
        }
    }

    /// Build a [`TimelineError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config { .. } => ErrorKind::Config,
            Self::OutOfOrder { .. } => ErrorKind::OutOfOrder,
            Self::UnknownPreset(_) => ErrorKind::UnknownPreset,
            Self::NumericInstability { .. } => ErrorKind::NumericInstability,
            Self::Evaluation { .. } => ErrorKind::Evaluation,
            Self::Serde(_) => ErrorKind::Serde,
            Self::Other(_) => ErrorKind::Other,
        }
    }

    /// Scene the error is attributed to, if any.
    pub fn scene_id(&self) -> Option<&str> {
        match self {
            Self::Config { ctx, .. }
            | Self::NumericInstability { ctx, .. }
            | Self::Evaluation { ctx, .. } => ctx.scene_id.as_deref(),
            Self::OutOfOrder { first, .. } => Some(first),
            Self::UnknownPreset(w) => w.scene_id.as_deref(),
            Self::Serde(_) | Self::Other(_) => None,
        }
    }

    /// Frame the error is attributed to, if any.
    pub fn frame(&self) -> Option<FrameIndex> {
        match self {
            Self::Config { ctx, .. }
            | Self::NumericInstability { ctx, .. }
            | Self::Evaluation { ctx, .. } => ctx.frame,
            Self::OutOfOrder { range, .. } => Some(range.start),
            Self::UnknownPreset(_) | Self::Serde(_) | Self::Other(_) => None,
        }
    }

    /// Attach a scene id unless one is already present.
    pub fn with_scene(mut self, scene_id: &str) -> Self {
        match &mut self {
            Self::Config { ctx, .. }
            | Self::NumericInstability { ctx, .. }
            | Self::Evaluation { ctx, .. } => {
                ctx.scene_id.get_or_insert_with(|| scene_id.to_owned());
            }
            Self::UnknownPreset(w) => {
                w.scene_id.get_or_insert_with(|| scene_id.to_owned());
            }
            Self::OutOfOrder { .. } | Self::Serde(_) | Self::Other(_) => {}
        }
        self
    }

    /// Attach a frame unless one is already present.
    pub fn with_frame(mut self, frame: FrameIndex) -> Self {
        if let Self::Config { ctx, .. }
        | Self::NumericInstability { ctx, .. }
        | Self::Evaluation { ctx, .. } = &mut self
        {
            ctx.frame.get_or_insert(frame);
        }
        self
    }
}

impl From<PresetWarning> for TimelineError {
    fn from(w: PresetWarning) -> Self {
        Self::UnknownPreset(w)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
