use super::*;
use crate::composition::model::{CompositionDecl, SceneDecl};
use crate::composition::timeline::Timeline;
use crate::effects::config::{EffectsDecl, LayerConfig};
use crate::effects::layer::EffectLayerName;
use crate::eval::evaluator::Evaluator;
use crate::foundation::core::{Fps, FrameIndex};

fn timeline(grain: LayerConfig) -> Timeline {
    let decl = CompositionDecl::new(Fps::new(30, 1).unwrap())
        .scene(
            SceneDecl::visual("a", 30)
                .with_effects(EffectsDecl::new().layer(EffectLayerName::FilmGrain, grain)),
        )
        .scene(SceneDecl::visual("b", 30));
    Timeline::build(&decl).unwrap()
}

#[test]
fn fingerprint_is_stable_and_frame_sensitive() {
    let tl = timeline(LayerConfig::Default);
    let f = |n: u64| fingerprint_frame(&Evaluator::eval_frame(&tl, FrameIndex(n)).unwrap());
    assert_eq!(f(3), f(3));
    assert_ne!(f(3), f(4));
    assert_ne!(f(29), f(30));
}

#[test]
fn effect_params_change_the_fingerprint() {
    let plain = timeline(LayerConfig::Default);
    let mut over = serde_json::Map::new();
    over.insert("intensity".into(), serde_json::json!(0.5));
    let strong = timeline(LayerConfig::Explicit(over));

    let fp = |tl: &Timeline| fingerprint_frame(&Evaluator::eval_frame(tl, FrameIndex(3)).unwrap());
    assert_ne!(fp(&plain), fp(&strong));
}

#[test]
fn global_frame_index_is_not_hashed() {
    let tl = timeline(LayerConfig::Default);
    let mut state = Evaluator::eval_frame(&tl, FrameIndex(3)).unwrap();
    let before = fingerprint_frame(&state);
    state.frame = FrameIndex(999);
    assert_eq!(fingerprint_frame(&state), before);
}
