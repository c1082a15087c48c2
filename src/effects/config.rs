//! Declarative effect configuration as it arrives from a composition file.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::effects::layer::EffectLayerName;

/// Configuration of one effect layer.
///
/// On the wire a layer accepts `false`, `true`, a preset name, or a parameter object; all four
/// are normalized into this enum at deserialization time.
#[derive(Clone, Debug, PartialEq)]
pub enum LayerConfig {
    /// `false`: the layer is skipped.
    Disabled,
    /// `true`: hard-coded default parameters.
    Default,
    /// Parameter object merged over the layer defaults.
    Explicit(JsonMap<String, JsonValue>),
    /// Parameters taken from a named preset.
    Named(String),
}

impl<'de> Deserialize<'de> for LayerConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Toggle(bool),
            Preset(String),
            Params(JsonMap<String, JsonValue>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Toggle(false) => Ok(Self::Disabled),
            Repr::Toggle(true) => Ok(Self::Default),
            Repr::Preset(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(serde::de::Error::custom(
                        "effect preset name must be non-empty",
                    ));
                }
                Ok(Self::Named(name.to_owned()))
            }
            Repr::Params(params) => Ok(Self::Explicit(params)),
        }
    }
}

impl Serialize for LayerConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Disabled => serializer.serialize_bool(false),
            Self::Default => serializer.serialize_bool(true),
            Self::Explicit(params) => params.serialize(serializer),
            Self::Named(name) => serializer.serialize_str(name),
        }
    }
}

/// Effect stack declaration of a scene.
///
/// Wire form: `{"preset": "cinematic", "vignette": false, "filmGrain": {"intensity": 0.2}}`.
/// Layers listed explicitly take precedence over what the stack-level preset enables.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectsDecl {
    /// Preset that supplies every layer not listed in `layers`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
    /// Per-layer configuration.
    #[serde(flatten)]
    pub layers: BTreeMap<EffectLayerName, LayerConfig>,
}

impl EffectsDecl {
    /// Empty declaration (no layers, no preset).
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `preset` for layers without their own entry.
    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = Some(preset.into());
        self
    }

    /// Set the configuration of one layer.
    pub fn layer(mut self, name: EffectLayerName, config: LayerConfig) -> Self {
        self.layers.insert(name, config);
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/config.rs"]
mod tests;
