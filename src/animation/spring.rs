//! Damped-oscillator progress curves.
//!
//! Springs are evaluated in closed form: the value at a frame is the analytic step response of
//! a mass-spring-damper released from rest at `0` toward a resting value of `1`. Nothing is
//! integrated across frames, so any frame can be sampled in isolation and in any order.

use std::collections::BTreeMap;

use crate::foundation::core::Fps;
use crate::foundation::error::{PresetKind, PresetWarning, TimelineError, TimelineResult};

/// Distance from the resting value under which a spring counts as settled.
pub const SETTLE_EPSILON: f64 = 1e-3;

/// Upper bound on the frames [`measure_spring`] searches before giving up.
pub const MAX_SETTLE_FRAMES: u64 = 100_000;

/// Name of the spring preset used when a lookup fails.
pub const DEFAULT_SPRING_PRESET: &str = "default";

const CRITICAL_BAND: f64 = 1e-6;

/// Physical parameters of a spring. All three must be finite and strictly positive.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpringConfig {
    /// Damping coefficient `c`.
    pub damping: f64,
    /// Mass `m`.
    pub mass: f64,
    /// Stiffness `k`.
    pub stiffness: f64,
    /// Cap the curve at `1` so under-damped springs never overshoot.
    #[serde(default)]
    pub overshoot_clamping: bool,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            damping: 10.0,
            mass: 1.0,
            stiffness: 100.0,
            overshoot_clamping: false,
        }
    }
}

/// Shape of a spring's response, derived from its damping ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpringRegime {
    /// Damping ratio below 1: overshoots and oscillates while settling.
    Underdamped,
    /// Damping ratio of 1 (within a small band): fastest approach without overshoot.
    Critical,
    /// Damping ratio above 1: slow monotone approach.
    Overdamped,
}

impl SpringConfig {
    /// Create a validated spring configuration.
    pub fn new(damping: f64, mass: f64, stiffness: f64) -> TimelineResult<Self> {
        let cfg = Self {
            damping,
            mass,
            stiffness,
            overshoot_clamping: false,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Return a copy with overshoot clamping toggled.
    pub fn with_overshoot_clamping(self, on: bool) -> Self {
        Self {
            overshoot_clamping: on,
            ..self
        }
    }

    /// Validate that every parameter is finite and strictly positive.
    pub fn validate(&self) -> TimelineResult<()> {
        for (name, v) in [
            ("damping", self.damping),
            ("mass", self.mass),
            ("stiffness", self.stiffness),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(TimelineError::config(format!(
                    "spring {name} must be finite and > 0 (got {v})"
                )));
            }
        }
        Ok(())
    }

    /// Undamped angular frequency `sqrt(k / m)` in radians per second.
    pub fn natural_frequency(&self) -> f64 {
        (self.stiffness / self.mass).sqrt()
    }

    /// Damping ratio `c / (2 * sqrt(k * m))`.
    pub fn damping_ratio(&self) -> f64 {
        self.damping / (2.0 * (self.stiffness * self.mass).sqrt())
    }

    /// Classify the response shape.
    pub fn regime(&self) -> SpringRegime {
        let zeta = self.damping_ratio();
        if (zeta - 1.0).abs() < CRITICAL_BAND {
            SpringRegime::Critical
        } else if zeta < 1.0 {
            SpringRegime::Underdamped
        } else {
            SpringRegime::Overdamped
        }
    }
}

/// Spring progress at `frame` (`frame / fps` seconds after release).
///
/// Frames at or before `0` return exactly `0.0`. `config` is expected to have passed
/// [`SpringConfig::validate`].
pub fn evaluate(frame: f64, fps: Fps, config: &SpringConfig) -> f64 {
    if frame.is_nan() || frame <= 0.0 {
        return 0.0;
    }
    let x = step_response(fps.frames_to_secs(frame), config);
    if config.overshoot_clamping {
        x.min(1.0)
    } else {
        x
    }
}

fn step_response(t: f64, config: &SpringConfig) -> f64 {
    let k = config.stiffness.max(1e-9);
    let c = config.damping.max(0.0);
    let m = config.mass.max(1e-9);

    let w0 = (k / m).sqrt();
    let zeta = c / (2.0 * (k * m).sqrt());

    if (zeta - 1.0).abs() < CRITICAL_BAND {
        let e = (-w0 * t).exp();
        1.0 - e * (1.0 + w0 * t)
    } else if zeta < 1.0 {
        let root = (1.0 - zeta * zeta).sqrt();
        let wd = w0 * root;
        let e = (-zeta * w0 * t).exp();
        1.0 - e * ((wd * t).cos() + (zeta / root) * (wd * t).sin())
    } else {
        // Roots written so neither side cancels catastrophically for large damping ratios.
        let z2 = (zeta * zeta - 1.0).sqrt();
        let slow = -w0 / (zeta + z2);
        let fast = -w0 * (zeta + z2);
        let c_slow = (zeta + z2) / (2.0 * z2);
        let c_fast = 1.0 / (2.0 * z2 * (zeta + z2));
        1.0 - (c_slow * (slow * t).exp() - c_fast * (fast * t).exp())
    }
}

/// First frame from which the spring stays within `threshold` of its resting value.
///
/// Monotone regimes stop at the first frame inside the threshold; under-damped springs use the
/// exponential decay envelope, which bounds every later frame as well.
pub fn measure_spring(fps: Fps, config: &SpringConfig, threshold: f64) -> TimelineResult<u64> {
    config.validate()?;
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(TimelineError::config(
            "spring settle threshold must be finite and > 0",
        ));
    }

    let zeta = config.damping_ratio();
    let w0 = config.natural_frequency();
    if !zeta.is_finite() || !w0.is_finite() {
        return Err(TimelineError::numeric_instability(format!(
            "spring damping ratio is not finite (damping={}, mass={}, stiffness={})",
            config.damping, config.mass, config.stiffness
        )));
    }

    let settled = |frame: u64| -> bool {
        match config.regime() {
            SpringRegime::Underdamped => {
                let t = fps.frames_to_secs(frame as f64);
                let envelope = (-zeta * w0 * t).exp() / (1.0 - zeta * zeta).sqrt();
                envelope < threshold
            }
            SpringRegime::Critical | SpringRegime::Overdamped => {
                (1.0 - evaluate(frame as f64, fps, config)).abs() < threshold
            }
        }
    };

    (0..=MAX_SETTLE_FRAMES).find(|&f| settled(f)).ok_or_else(|| {
        TimelineError::numeric_instability(format!(
            "spring did not settle within {MAX_SETTLE_FRAMES} frames (damping ratio {zeta:.4})"
        ))
    })
}

/// A spring mapped onto a value range, with optional delay and a fixed settle duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpringAnim {
    config: SpringConfig,
    fps: Fps,
    from: f64,
    to: f64,
    delay_frames: f64,
    time_scale: f64,
}

impl SpringAnim {
    /// Spring from `0` to `1` starting at frame `0`.
    pub fn new(config: SpringConfig, fps: Fps) -> TimelineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            fps,
            from: 0.0,
            to: 1.0,
            delay_frames: 0.0,
            time_scale: 1.0,
        })
    }

    /// Map progress `0..1` onto `from..to`.
    pub fn from_to(mut self, from: f64, to: f64) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Hold at `from` for `frames` before releasing the spring.
    pub fn delay(mut self, frames: f64) -> Self {
        self.delay_frames = frames;
        self
    }

    /// Stretch time so the spring settles (within [`SETTLE_EPSILON`]) at `frames`.
    pub fn duration(mut self, frames: u64) -> TimelineResult<Self> {
        if frames == 0 {
            return Err(TimelineError::config("spring duration must be > 0 frames"));
        }
        let natural = measure_spring(self.fps, &self.config, SETTLE_EPSILON)?;
        self.time_scale = natural.max(1) as f64 / frames as f64;
        Ok(self)
    }

    /// Value at `frame` (frame-local to whoever owns the animation).
    pub fn sample(&self, frame: f64) -> f64 {
        let local = (frame - self.delay_frames) * self.time_scale;
        let p = evaluate(local, self.fps, &self.config);
        self.from + (self.to - self.from) * p
    }
}

/// Named spring configurations.
#[derive(Clone, Debug, PartialEq)]
pub struct SpringPresets {
    presets: BTreeMap<String, SpringConfig>,
}

impl SpringPresets {
    /// Built-in presets: `default`, `gentle`, `smooth`, `snappy`, `bouncy`.
    pub fn builtin() -> Self {
        let mut presets = BTreeMap::new();
        let mut put = |name: &str, damping: f64, mass: f64, stiffness: f64| {
            presets.insert(
                name.to_owned(),
                SpringConfig {
                    damping,
                    mass,
                    stiffness,
                    overshoot_clamping: false,
                },
            );
        };
        put(DEFAULT_SPRING_PRESET, 10.0, 1.0, 100.0);
        put("gentle", 15.0, 1.0, 60.0);
        put("smooth", 200.0, 1.0, 100.0);
        put("snappy", 20.0, 1.0, 200.0);
        put("bouncy", 8.0, 1.0, 200.0);
        Self { presets }
    }

    /// Add or replace a preset after validating it.
    pub fn insert(&mut self, name: impl Into<String>, config: SpringConfig) -> TimelineResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TimelineError::config("spring preset name must be non-empty"));
        }
        config
            .validate()
            .map_err(|e| TimelineError::config(format!("spring preset '{name}': {e}")))?;
        self.presets.insert(name, config);
        Ok(())
    }

    /// Look up a preset by name.
    pub fn get(&self, name: &str) -> Option<&SpringConfig> {
        self.presets.get(name)
    }

    /// Iterate preset names and configurations in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SpringConfig)> {
        self.presets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Look up `name`, falling back to [`DEFAULT_SPRING_PRESET`] with a warning.
    pub fn resolve(&self, name: &str) -> (SpringConfig, Option<PresetWarning>) {
        if let Some(cfg) = self.presets.get(name) {
            return (*cfg, None);
        }
        let fallback = self
            .presets
            .get(DEFAULT_SPRING_PRESET)
            .copied()
            .unwrap_or_default();
        tracing::warn!(preset = name, "unknown spring preset, using default");
        (
            fallback,
            Some(PresetWarning {
                kind: PresetKind::Spring,
                requested: name.to_owned(),
                fallback: DEFAULT_SPRING_PRESET.to_owned(),
                scene_id: None,
            }),
        )
    }
}

impl Default for SpringPresets {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/spring.rs"]
mod tests;
