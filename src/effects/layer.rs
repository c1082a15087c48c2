//! Effect layer names and their typed parameter sets.

use std::str::FromStr;

use serde_json::Value as JsonValue;

use crate::foundation::core::Vec2;
use crate::foundation::error::{TimelineError, TimelineResult};

/// Post-processing stage, ordered innermost to outermost.
///
/// The derived `Ord` is the nesting order: `MotionBlur` wraps scene content directly and
/// `Vignette` is applied last.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum EffectLayerName {
    /// Directional blur from motion between frames.
    MotionBlur,
    /// Glow around bright regions.
    Bloom,
    /// RGB channel offset.
    ChromaticAberration,
    /// Seeded block displacement.
    Glitch,
    /// Noise overlay.
    FilmGrain,
    /// Tone and color adjustments.
    ColorGrading,
    /// Animated warm light bleed.
    LightLeak,
    /// Edge darkening.
    Vignette,
}

impl EffectLayerName {
    /// Every layer in nesting order.
    pub const ALL: [Self; 8] = [
        Self::MotionBlur,
        Self::Bloom,
        Self::ChromaticAberration,
        Self::Glitch,
        Self::FilmGrain,
        Self::ColorGrading,
        Self::LightLeak,
        Self::Vignette,
    ];

    /// Wire name of the layer.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MotionBlur => "motionBlur",
            Self::Bloom => "bloom",
            Self::ChromaticAberration => "chromaticAberration",
            Self::Glitch => "glitch",
            Self::FilmGrain => "filmGrain",
            Self::ColorGrading => "colorGrading",
            Self::LightLeak => "lightLeak",
            Self::Vignette => "vignette",
        }
    }
}

impl std::fmt::Display for EffectLayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EffectLayerName {
    type Err = TimelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|l| l.as_str().eq_ignore_ascii_case(&key))
            .ok_or_else(|| TimelineError::config(format!("unknown effect layer '{}'", s.trim())))
    }
}

/// Parameters of the motion blur layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct MotionBlurParams {
    /// Shutter angle in degrees, `0..=360`.
    pub shutter_angle: f64,
    /// Temporal samples per frame.
    pub samples: u32,
}

impl Default for MotionBlurParams {
    fn default() -> Self {
        Self {
            shutter_angle: 180.0,
            samples: 8,
        }
    }
}

/// Parameters of the bloom layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct BloomParams {
    /// Glow strength.
    pub intensity: f64,
    /// Luminance above which pixels bloom, `0..=1`.
    pub threshold: f64,
    /// Blur radius in pixels.
    pub radius: f64,
}

impl Default for BloomParams {
    fn default() -> Self {
        Self {
            intensity: 0.6,
            threshold: 0.7,
            radius: 12.0,
        }
    }
}

/// Parameters of the chromatic aberration layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ChromaticAberrationParams {
    /// Channel offset in pixels.
    pub offset: f64,
    /// Offset direction in degrees.
    pub angle_deg: f64,
}

impl Default for ChromaticAberrationParams {
    fn default() -> Self {
        Self {
            offset: 2.0,
            angle_deg: 0.0,
        }
    }
}

/// Parameters of the glitch layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct GlitchParams {
    /// Displacement strength.
    pub intensity: f64,
    /// Fraction of frames that glitch, `0..=1`.
    pub frequency: f64,
    /// Seed of the displacement pattern.
    pub seed: u64,
}

impl Default for GlitchParams {
    fn default() -> Self {
        Self {
            intensity: 0.3,
            frequency: 0.1,
            seed: 0,
        }
    }
}

/// Parameters of the film grain layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct FilmGrainParams {
    /// Noise opacity.
    pub intensity: f64,
    /// Grain size in pixels.
    pub size: f64,
    /// Reseed the grain every frame.
    pub animated: bool,
}

impl Default for FilmGrainParams {
    fn default() -> Self {
        Self {
            intensity: 0.08,
            size: 1.0,
            animated: true,
        }
    }
}

/// Per-channel color adjustment, also used for plain RGB colors.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColorWheel {
    /// Red channel.
    pub r: f64,
    /// Green channel.
    pub g: f64,
    /// Blue channel.
    pub b: f64,
}

impl ColorWheel {
    /// Same value on every channel.
    pub const fn splat(v: f64) -> Self {
        Self { r: v, g: v, b: v }
    }

    fn is_finite(self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

/// Parameters of the color grading layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct ColorGradingParams {
    /// Additive brightness offset.
    pub brightness: f64,
    /// Contrast multiplier around mid gray.
    pub contrast: f64,
    /// Saturation multiplier.
    pub saturation: f64,
    /// Warm (positive) or cool (negative) shift, `-1..=1`.
    pub temperature: f64,
    /// Magenta (positive) or green (negative) shift, `-1..=1`.
    pub tint: f64,
    /// Shadows offset.
    pub lift: ColorWheel,
    /// Midtones power.
    pub gamma: ColorWheel,
    /// Highlights multiplier.
    pub gain: ColorWheel,
}

impl Default for ColorGradingParams {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 1.0,
            saturation: 1.0,
            temperature: 0.0,
            tint: 0.0,
            lift: ColorWheel::splat(0.0),
            gamma: ColorWheel::splat(1.0),
            gain: ColorWheel::splat(1.0),
        }
    }
}

/// Parameters of the light leak layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct LightLeakParams {
    /// Leak opacity.
    pub intensity: f64,
    /// Leak color.
    pub color: ColorWheel,
    /// Leak origin in normalized frame coordinates.
    pub position: Vec2,
    /// Drift speed in normalized units per second.
    pub speed: f64,
}

impl Default for LightLeakParams {
    fn default() -> Self {
        Self {
            intensity: 0.35,
            color: ColorWheel {
                r: 1.0,
                g: 0.6,
                b: 0.3,
            },
            position: Vec2::new(0.85, 0.15),
            speed: 0.05,
        }
    }
}

/// Parameters of the vignette layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "camelCase")]
pub struct VignetteParams {
    /// Darkening strength.
    pub intensity: f64,
    /// Normalized distance from center where darkening starts.
    pub radius: f64,
    /// Width of the falloff.
    pub softness: f64,
}

impl Default for VignetteParams {
    fn default() -> Self {
        Self {
            intensity: 0.5,
            radius: 0.75,
            softness: 0.45,
        }
    }
}

/// Concrete parameters for one enabled layer.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "layer", content = "params", rename_all = "camelCase")]
pub enum LayerParams {
    /// Parameters for [`EffectLayerName::MotionBlur`].
    MotionBlur(MotionBlurParams),
    /// Parameters for [`EffectLayerName::Bloom`].
    Bloom(BloomParams),
    /// Parameters for [`EffectLayerName::ChromaticAberration`].
    ChromaticAberration(ChromaticAberrationParams),
    /// Parameters for [`EffectLayerName::Glitch`].
    Glitch(GlitchParams),
    /// Parameters for [`EffectLayerName::FilmGrain`].
    FilmGrain(FilmGrainParams),
    /// Parameters for [`EffectLayerName::ColorGrading`].
    ColorGrading(ColorGradingParams),
    /// Parameters for [`EffectLayerName::LightLeak`].
    LightLeak(LightLeakParams),
    /// Parameters for [`EffectLayerName::Vignette`].
    Vignette(VignetteParams),
}

impl LayerParams {
    /// Hard-coded default parameters for `name`.
    pub fn defaults(name: EffectLayerName) -> Self {
        match name {
            EffectLayerName::MotionBlur => Self::MotionBlur(MotionBlurParams::default()),
            EffectLayerName::Bloom => Self::Bloom(BloomParams::default()),
            EffectLayerName::ChromaticAberration => {
                Self::ChromaticAberration(ChromaticAberrationParams::default())
            }
            EffectLayerName::Glitch => Self::Glitch(GlitchParams::default()),
            EffectLayerName::FilmGrain => Self::FilmGrain(FilmGrainParams::default()),
            EffectLayerName::ColorGrading => Self::ColorGrading(ColorGradingParams::default()),
            EffectLayerName::LightLeak => Self::LightLeak(LightLeakParams::default()),
            EffectLayerName::Vignette => Self::Vignette(VignetteParams::default()),
        }
    }

    /// Layer these parameters belong to.
    pub fn name(&self) -> EffectLayerName {
        match self {
            Self::MotionBlur(_) => EffectLayerName::MotionBlur,
            Self::Bloom(_) => EffectLayerName::Bloom,
            Self::ChromaticAberration(_) => EffectLayerName::ChromaticAberration,
            Self::Glitch(_) => EffectLayerName::Glitch,
            Self::FilmGrain(_) => EffectLayerName::FilmGrain,
            Self::ColorGrading(_) => EffectLayerName::ColorGrading,
            Self::LightLeak(_) => EffectLayerName::LightLeak,
            Self::Vignette(_) => EffectLayerName::Vignette,
        }
    }

    /// Parameters as a JSON object (the base that overrides are merged onto).
    pub fn to_json(&self) -> TimelineResult<JsonValue> {
        let v = match self {
            Self::MotionBlur(p) => serde_json::to_value(p),
            Self::Bloom(p) => serde_json::to_value(p),
            Self::ChromaticAberration(p) => serde_json::to_value(p),
            Self::Glitch(p) => serde_json::to_value(p),
            Self::FilmGrain(p) => serde_json::to_value(p),
            Self::ColorGrading(p) => serde_json::to_value(p),
            Self::LightLeak(p) => serde_json::to_value(p),
            Self::Vignette(p) => serde_json::to_value(p),
        };
        v.map_err(|e| TimelineError::serde(format!("encode {} params: {e}", self.name())))
    }

    /// Parse a complete parameter object for `name` and validate ranges.
    pub(crate) fn from_json(name: EffectLayerName, value: JsonValue) -> TimelineResult<Self> {
        fn parse<T: serde::de::DeserializeOwned>(
            name: EffectLayerName,
            value: JsonValue,
        ) -> TimelineResult<T> {
            serde_json::from_value(value)
                .map_err(|e| TimelineError::config(format!("invalid {name} params: {e}")))
        }

        let params = match name {
            EffectLayerName::MotionBlur => Self::MotionBlur(parse(name, value)?),
            EffectLayerName::Bloom => Self::Bloom(parse(name, value)?),
            EffectLayerName::ChromaticAberration => {
                Self::ChromaticAberration(parse(name, value)?)
            }
            EffectLayerName::Glitch => Self::Glitch(parse(name, value)?),
            EffectLayerName::FilmGrain => Self::FilmGrain(parse(name, value)?),
            EffectLayerName::ColorGrading => Self::ColorGrading(parse(name, value)?),
            EffectLayerName::LightLeak => Self::LightLeak(parse(name, value)?),
            EffectLayerName::Vignette => Self::Vignette(parse(name, value)?),
        };
        params.validate()?;
        Ok(params)
    }

    /// Check value ranges.
    pub fn validate(&self) -> TimelineResult<()> {
        let name = self.name();
        let check = |field: &str, v: f64, lo: f64, hi: f64| -> TimelineResult<()> {
            if !v.is_finite() || v < lo || v > hi {
                return Err(TimelineError::config(format!(
                    "{name}.{field} must be finite and within [{lo}, {hi}] (got {v})"
                )));
            }
            Ok(())
        };
        const INF: f64 = f64::MAX;

        match self {
            Self::MotionBlur(p) => {
                check("shutterAngle", p.shutter_angle, 0.0, 360.0)?;
                if p.samples == 0 {
                    return Err(TimelineError::config("motionBlur.samples must be >= 1"));
                }
            }
            Self::Bloom(p) => {
                check("intensity", p.intensity, 0.0, INF)?;
                check("threshold", p.threshold, 0.0, 1.0)?;
                check("radius", p.radius, 0.0, INF)?;
            }
            Self::ChromaticAberration(p) => {
                check("offset", p.offset, 0.0, INF)?;
                check("angleDeg", p.angle_deg, -INF, INF)?;
            }
            Self::Glitch(p) => {
                check("intensity", p.intensity, 0.0, INF)?;
                check("frequency", p.frequency, 0.0, 1.0)?;
            }
            Self::FilmGrain(p) => {
                check("intensity", p.intensity, 0.0, INF)?;
                check("size", p.size, f64::MIN_POSITIVE, INF)?;
            }
            Self::ColorGrading(p) => {
                check("brightness", p.brightness, -1.0, 1.0)?;
                check("contrast", p.contrast, 0.0, INF)?;
                check("saturation", p.saturation, 0.0, INF)?;
                check("temperature", p.temperature, -1.0, 1.0)?;
                check("tint", p.tint, -1.0, 1.0)?;
                for (field, wheel) in [("lift", p.lift), ("gamma", p.gamma), ("gain", p.gain)] {
                    if !wheel.is_finite() {
                        return Err(TimelineError::config(format!(
                            "{name}.{field} channels must be finite"
                        )));
                    }
                }
            }
            Self::LightLeak(p) => {
                check("intensity", p.intensity, 0.0, INF)?;
                check("speed", p.speed, -INF, INF)?;
                if !p.color.is_finite() || !p.position.is_finite() {
                    return Err(TimelineError::config(format!(
                        "{name}.color and {name}.position must be finite"
                    )));
                }
            }
            Self::Vignette(p) => {
                check("intensity", p.intensity, 0.0, INF)?;
                check("radius", p.radius, 0.0, INF)?;
                check("softness", p.softness, 0.0, INF)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/layer.rs"]
mod tests;
