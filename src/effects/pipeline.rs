//! Resolution of an [`EffectsDecl`] into the fixed-order effect stack, and the fold that nests
//! the stack around scene content.

use std::collections::{BTreeMap, BTreeSet};

use smallvec::SmallVec;

use crate::effects::config::{EffectsDecl, LayerConfig};
use crate::effects::layer::{EffectLayerName, LayerParams};
use crate::effects::preset::{PresetRegistry, params_with_overrides};
use crate::foundation::error::{PresetWarning, TimelineResult};

/// Where a resolved layer's parameters came from.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LayerSource {
    /// Hard-coded layer defaults.
    Default,
    /// Parameters given inline in the declaration.
    Explicit,
    /// Parameters from the named preset (after any fallback).
    Preset(String),
}

/// One enabled layer of a resolved stack.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLayer {
    /// Layer name.
    pub name: EffectLayerName,
    /// Concrete parameters.
    pub params: LayerParams,
    /// Provenance of `params`.
    pub source: LayerSource,
}

/// Enabled layers in nesting order, innermost first.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct ResolvedStack {
    layers: SmallVec<[ResolvedLayer; 8]>,
}

impl ResolvedStack {
    /// Layers innermost first.
    pub fn layers(&self) -> &[ResolvedLayer] {
        &self.layers
    }

    /// Layer names innermost first.
    pub fn names(&self) -> Vec<EffectLayerName> {
        self.layers.iter().map(|l| l.name).collect()
    }

    /// Parameters of `name`, if enabled.
    pub fn get(&self, name: EffectLayerName) -> Option<&LayerParams> {
        self.layers.iter().find(|l| l.name == name).map(|l| &l.params)
    }

    /// Number of enabled layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Return `true` when no layer is enabled.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Nested form of the stack around opaque content.
    pub fn tree(&self) -> EffectTree {
        compose(EffectTree::Content, &self.layers, |inner, layer| {
            EffectTree::Layer {
                name: layer.name,
                params: layer.params.clone(),
                inner: Box::new(inner),
            }
        })
    }
}

/// Output of [`resolve`]: the stack plus any preset fallbacks that happened on the way.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StackResolution {
    /// Resolved stack.
    pub stack: ResolvedStack,
    /// One warning per distinct unknown preset name.
    pub warnings: Vec<PresetWarning>,
}

/// Resolve a declaration into concrete layers.
///
/// Layers are emitted in [`EffectLayerName`] order whatever order the declaration listed
/// them in. Disabled layers and layers neither listed nor enabled by the stack preset are
/// omitted. Unknown presets resolve to the default preset and are reported in
/// [`StackResolution::warnings`]; malformed parameters fail with a config error.
pub fn resolve(decl: &EffectsDecl, registry: &PresetRegistry) -> TimelineResult<StackResolution> {
    let mut warned = BTreeSet::<String>::new();
    let mut warnings = Vec::new();
    let mut note = |w: Option<PresetWarning>| {
        if let Some(w) = w
            && warned.insert(w.requested.clone())
        {
            warnings.push(w);
        }
    };

    let mut effective: BTreeMap<EffectLayerName, LayerConfig> = BTreeMap::new();
    if let Some(preset) = &decl.preset {
        let (name, warn) = registry.resolve_name(preset);
        note(warn);
        for layer in registry.enabled_layers(name)? {
            effective.insert(layer, LayerConfig::Named(name.to_owned()));
        }
    }
    for (layer, cfg) in &decl.layers {
        effective.insert(*layer, cfg.clone());
    }

    let mut layers = SmallVec::<[ResolvedLayer; 8]>::new();
    for (name, cfg) in effective {
        let (params, source) = match cfg {
            LayerConfig::Disabled => continue,
            LayerConfig::Default => (LayerParams::defaults(name), LayerSource::Default),
            LayerConfig::Explicit(over) => {
                (params_with_overrides(name, &over)?, LayerSource::Explicit)
            }
            LayerConfig::Named(requested) => {
                let (preset, warn) = registry.resolve_name(&requested);
                note(warn);
                let params = match registry.layer_params(preset, name)? {
                    Some(p) => p,
                    None => {
                        tracing::debug!(
                            preset,
                            layer = name.as_str(),
                            "preset does not configure layer, using defaults"
                        );
                        LayerParams::defaults(name)
                    }
                };
                (params, LayerSource::Preset(preset.to_owned()))
            }
        };
        layers.push(ResolvedLayer {
            name,
            params,
            source,
        });
    }

    Ok(StackResolution {
        stack: ResolvedStack { layers },
        warnings,
    })
}

/// Fold `layers` around `content`, innermost (first) to outermost (last).
///
/// `wrap` receives the content built so far and the next layer; its result becomes the input
/// of the following layer.
pub fn compose<T, F>(content: T, layers: &[ResolvedLayer], mut wrap: F) -> T
where
    F: FnMut(T, &ResolvedLayer) -> T,
{
    layers.iter().fold(content, |acc, layer| wrap(acc, layer))
}

/// Inspectable nesting of a resolved stack.
#[derive(Clone, Debug, PartialEq)]
pub enum EffectTree {
    /// Scene content.
    Content,
    /// One layer applied to everything inside it.
    Layer {
        /// Layer name.
        name: EffectLayerName,
        /// Layer parameters.
        params: LayerParams,
        /// What the layer wraps.
        inner: Box<EffectTree>,
    },
}

impl EffectTree {
    /// Layer names from outermost to innermost.
    pub fn nesting(&self) -> Vec<EffectLayerName> {
        let mut out = Vec::new();
        let mut node = self;
        while let Self::Layer { name, inner, .. } = node {
            out.push(*name);
            node = inner;
        }
        out
    }

    /// Return `true` if `inner` is nested strictly inside `outer`.
    pub fn is_inside(&self, inner: EffectLayerName, outer: EffectLayerName) -> bool {
        let nesting = self.nesting();
        let pos = |n| nesting.iter().position(|&x| x == n);
        match (pos(inner), pos(outer)) {
            (Some(i), Some(o)) => i > o,
            _ => false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/pipeline.rs"]
mod tests;
