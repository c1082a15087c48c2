//! Named effect/quality bundles and their merge rules.
//!
//! A preset is a JSON object with two optional sections:
//!
//! ```json
//! {
//!   "layers": { "filmGrain": { "intensity": 0.1 }, "vignette": true, "bloom": false },
//!   "render": { "scale": 1.0, "crf": 18, "codec": "h264" }
//! }
//! ```
//!
//! `layers` entries are `true` (layer defaults), `false` (disabled) or a parameter object
//! merged over the layer defaults. `render` carries encode-quality hints for the external
//! renderer.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map as JsonMap, Value as JsonValue, json};

use crate::effects::layer::{EffectLayerName, LayerParams};
use crate::foundation::error::{PresetKind, PresetWarning, TimelineError, TimelineResult};

/// Preset used when a requested preset does not exist.
pub const DEFAULT_EFFECT_PRESET: &str = "standard";

/// Key a declared preset uses to name the preset it builds on.
pub const EXTENDS_KEY: &str = "extends";

/// Encode-quality hints carried by a preset's `render` section.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderParams {
    /// Output resolution multiplier.
    pub scale: f64,
    /// Constant rate factor handed to the encoder.
    pub crf: u8,
    /// Encoder codec name.
    pub codec: String,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            scale: 1.0,
            crf: 20,
            codec: "h264".to_owned(),
        }
    }
}

impl RenderParams {
    fn validate(&self) -> TimelineResult<()> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(TimelineError::config("render.scale must be finite and > 0"));
        }
        if self.crf > 51 {
            return Err(TimelineError::config("render.crf must be within [0, 51]"));
        }
        if self.codec.trim().is_empty() {
            return Err(TimelineError::config("render.codec must be non-empty"));
        }
        Ok(())
    }
}

/// Immutable-after-build store of named presets.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetRegistry {
    presets: BTreeMap<String, JsonMap<String, JsonValue>>,
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl PresetRegistry {
    /// Registry holding the built-in presets `standard`, `cinematic`, `vintage`, `dreamy` and
    /// `draft`.
    pub fn builtin() -> Self {
        let mut presets = BTreeMap::new();
        for (name, body) in builtin_presets() {
            if let JsonValue::Object(map) = body {
                presets.insert(name.to_owned(), map);
            }
        }
        Self { presets }
    }

    /// Built-in presets plus `decls`, where each declaration may name a base preset under
    /// `"extends"`. A declaration extending its own name builds on the built-in of that name.
    #[tracing::instrument(skip(decls), fields(count = decls.len()))]
    pub fn from_decls(decls: &BTreeMap<String, JsonValue>) -> TimelineResult<Self> {
        let mut reg = Self::builtin();
        let mut done = BTreeSet::new();
        for name in decls.keys() {
            let mut visiting = Vec::new();
            reg.define(name, decls, &mut done, &mut visiting)?;
        }
        Ok(reg)
    }

    fn define(
        &mut self,
        name: &str,
        decls: &BTreeMap<String, JsonValue>,
        done: &mut BTreeSet<String>,
        visiting: &mut Vec<String>,
    ) -> TimelineResult<()> {
        if done.contains(name) {
            return Ok(());
        }
        if visiting.iter().any(|v| v == name) {
            visiting.push(name.to_owned());
            return Err(TimelineError::config(format!(
                "effect preset cycle: {}",
                visiting.join(" -> ")
            )));
        }
        let Some(decl) = decls.get(name) else {
            return Ok(());
        };
        let JsonValue::Object(body) = decl else {
            return Err(TimelineError::config(format!(
                "effect preset '{name}' must be an object"
            )));
        };

        let mut body = body.clone();
        let base = match body.remove(EXTENDS_KEY) {
            None => None,
            Some(JsonValue::String(base)) => Some(base),
            Some(_) => {
                return Err(TimelineError::config(format!(
                    "effect preset '{name}'.{EXTENDS_KEY} must be a string"
                )));
            }
        };

        visiting.push(name.to_owned());
        let merged = match base {
            None => body,
            Some(base) => {
                if base != name && decls.contains_key(&base) {
                    self.define(&base, decls, done, visiting)?;
                }
                let base_body = self.presets.get(&base).ok_or_else(|| {
                    TimelineError::config(format!(
                        "effect preset '{name}' extends unknown preset '{base}'"
                    ))
                })?;
                Self::merge(base_body, &body)
            }
        };
        visiting.pop();

        self.insert(name, merged)?;
        done.insert(name.to_owned());
        Ok(())
    }

    /// Add or replace a preset after validating its sections.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        body: JsonMap<String, JsonValue>,
    ) -> TimelineResult<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(TimelineError::config("effect preset name must be non-empty"));
        }
        validate_body(&body)
            .map_err(|e| TimelineError::config(format!("effect preset '{name}': {e}")))?;
        self.presets.insert(name, body);
        Ok(())
    }

    /// Register `name` as `base` with `overrides` merged on top.
    pub fn extend(
        &mut self,
        name: impl Into<String>,
        base: &str,
        overrides: &JsonMap<String, JsonValue>,
    ) -> TimelineResult<()> {
        let base_body = self.presets.get(base).ok_or_else(|| {
            TimelineError::config(format!("cannot extend unknown effect preset '{base}'"))
        })?;
        let merged = Self::merge(base_body, overrides);
        self.insert(name, merged)
    }

    /// Raw preset body.
    pub fn get(&self, name: &str) -> Option<&JsonMap<String, JsonValue>> {
        self.presets.get(name)
    }

    /// Return `true` if `name` is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.presets.contains_key(name)
    }

    /// Registered preset names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.presets.keys().map(String::as_str)
    }

    /// Deep merge: nested objects merge key by key with `overrides` winning per key; scalars
    /// and arrays in `overrides` replace the base value.
    pub fn merge(
        base: &JsonMap<String, JsonValue>,
        overrides: &JsonMap<String, JsonValue>,
    ) -> JsonMap<String, JsonValue> {
        let mut out = base.clone();
        for (k, v) in overrides {
            if let (Some(JsonValue::Object(dst)), JsonValue::Object(src)) = (out.get_mut(k), v) {
                let merged = Self::merge(dst, src);
                *dst = merged;
                continue;
            }
            out.insert(k.clone(), v.clone());
        }
        out
    }

    /// Map `name` to a registered preset, falling back to [`DEFAULT_EFFECT_PRESET`].
    pub fn resolve_name<'a>(&self, name: &'a str) -> (&'a str, Option<PresetWarning>) {
        if self.presets.contains_key(name) {
            return (name, None);
        }
        tracing::warn!(
            preset = name,
            fallback = DEFAULT_EFFECT_PRESET,
            "unknown effect preset"
        );
        (
            DEFAULT_EFFECT_PRESET,
            Some(PresetWarning {
                kind: PresetKind::Effect,
                requested: name.to_owned(),
                fallback: DEFAULT_EFFECT_PRESET.to_owned(),
                scene_id: None,
            }),
        )
    }

    fn body(&self, name: &str) -> TimelineResult<&JsonMap<String, JsonValue>> {
        self.presets
            .get(name)
            .ok_or_else(|| TimelineError::config(format!("effect preset '{name}' is not registered")))
    }

    /// Layers the preset enables, in nesting order.
    pub fn enabled_layers(&self, name: &str) -> TimelineResult<Vec<EffectLayerName>> {
        let body = self.body(name)?;
        let mut out = Vec::new();
        for l in EffectLayerName::ALL {
            if layer_entry(body, l).is_some_and(|v| !matches!(v, JsonValue::Bool(false))) {
                out.push(l);
            }
        }
        Ok(out)
    }

    /// Parameters the preset gives `layer`, or `None` when it leaves the layer disabled.
    pub fn layer_params(
        &self,
        name: &str,
        layer: EffectLayerName,
    ) -> TimelineResult<Option<LayerParams>> {
        let body = self.body(name)?;
        match layer_entry(body, layer) {
            None | Some(JsonValue::Bool(false)) => Ok(None),
            Some(JsonValue::Bool(true)) => Ok(Some(LayerParams::defaults(layer))),
            Some(JsonValue::Object(over)) => Ok(Some(params_with_overrides(layer, over)?)),
            Some(_) => Err(TimelineError::config(format!(
                "effect preset '{name}' has a malformed {layer} entry"
            ))),
        }
    }

    /// Render-quality section of `name`, filled with defaults for missing keys.
    pub fn render_params(&self, name: &str) -> TimelineResult<RenderParams> {
        let body = self.body(name)?;
        parse_render(body.get("render"))
    }
}

/// Layer defaults with `overrides` merged on top, parsed and validated.
pub(crate) fn params_with_overrides(
    layer: EffectLayerName,
    overrides: &JsonMap<String, JsonValue>,
) -> TimelineResult<LayerParams> {
    let JsonValue::Object(base) = LayerParams::defaults(layer).to_json()? else {
        return Err(TimelineError::serde(format!(
            "{layer} defaults did not encode as an object"
        )));
    };
    LayerParams::from_json(
        layer,
        JsonValue::Object(PresetRegistry::merge(&base, overrides)),
    )
}

fn layer_entry(body: &JsonMap<String, JsonValue>, layer: EffectLayerName) -> Option<&JsonValue> {
    body.get("layers")?.as_object()?.get(layer.as_str())
}

fn parse_render(v: Option<&JsonValue>) -> TimelineResult<RenderParams> {
    let params = match v {
        None => RenderParams::default(),
        Some(v) => serde_json::from_value::<RenderParams>(v.clone())
            .map_err(|e| TimelineError::config(format!("invalid render section: {e}")))?,
    };
    params.validate()?;
    Ok(params)
}

fn validate_body(body: &JsonMap<String, JsonValue>) -> TimelineResult<()> {
    for key in body.keys() {
        if key != "layers" && key != "render" {
            return Err(TimelineError::config(format!("unknown section '{key}'")));
        }
    }
    if let Some(layers) = body.get("layers") {
        let JsonValue::Object(layers) = layers else {
            return Err(TimelineError::config("'layers' must be an object"));
        };
        for (key, entry) in layers {
            let layer: EffectLayerName = key.parse()?;
            if layer.as_str() != key {
                return Err(TimelineError::config(format!(
                    "layer key '{key}' must be spelled '{layer}'"
                )));
            }
            match entry {
                JsonValue::Bool(_) => {}
                JsonValue::Object(over) => {
                    params_with_overrides(layer, over)?;
                }
                _ => {
                    return Err(TimelineError::config(format!(
                        "{layer} entry must be a boolean or an object"
                    )));
                }
            }
        }
    }
    parse_render(body.get("render"))?;
    Ok(())
}

fn builtin_presets() -> [(&'static str, JsonValue); 5] {
    [
        (
            DEFAULT_EFFECT_PRESET,
            json!({
                "layers": {
                    "filmGrain": { "intensity": 0.05 },
                    "vignette": { "intensity": 0.3 }
                },
                "render": { "scale": 1.0, "crf": 20, "codec": "h264" }
            }),
        ),
        (
            "cinematic",
            json!({
                "layers": {
                    "motionBlur": true,
                    "bloom": { "intensity": 0.4, "threshold": 0.8 },
                    "filmGrain": { "intensity": 0.1 },
                    "colorGrading": {
                        "contrast": 1.1,
                        "saturation": 0.9,
                        "temperature": 0.1,
                        "lift": { "r": 0.0, "g": 0.0, "b": 0.02 },
                        "gain": { "r": 1.03, "g": 1.0, "b": 0.97 }
                    },
                    "vignette": { "intensity": 0.55 }
                },
                "render": { "scale": 1.0, "crf": 16, "codec": "h264" }
            }),
        ),
        (
            "vintage",
            json!({
                "layers": {
                    "filmGrain": { "intensity": 0.2, "size": 1.5 },
                    "colorGrading": {
                        "saturation": 0.7,
                        "temperature": 0.25,
                        "gamma": { "r": 1.0, "g": 1.05, "b": 1.15 }
                    },
                    "lightLeak": { "intensity": 0.4 },
                    "vignette": { "intensity": 0.6, "softness": 0.6 }
                },
                "render": { "scale": 1.0, "crf": 20, "codec": "h264" }
            }),
        ),
        (
            "dreamy",
            json!({
                "layers": {
                    "bloom": { "intensity": 0.8, "threshold": 0.5, "radius": 24.0 },
                    "chromaticAberration": { "offset": 1.5 },
                    "lightLeak": true,
                    "vignette": { "intensity": 0.4 }
                },
                "render": { "scale": 1.0, "crf": 18, "codec": "h264" }
            }),
        ),
        (
            "draft",
            json!({
                "layers": {},
                "render": { "scale": 0.5, "crf": 28, "codec": "h264" }
            }),
        ),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/effects/preset.rs"]
mod tests;
