use super::*;
use crate::ErrorKind;
use crate::composition::model::{CompositionDecl, SceneDecl};
use crate::effects::config::{EffectsDecl, LayerConfig};
use crate::effects::layer::EffectLayerName;
use crate::foundation::core::Fps;

fn two_scenes() -> Timeline {
    let decl = CompositionDecl::new(Fps::new(30, 1).unwrap())
        .scene(SceneDecl::visual("A", 30).at(0))
        .scene(
            SceneDecl::visual("B", 30)
                .at(30)
                .with_spring("default")
                .with_effects(
                    EffectsDecl::new()
                        .layer(EffectLayerName::Vignette, LayerConfig::Default)
                        .layer(EffectLayerName::FilmGrain, LayerConfig::Default),
                ),
        )
        .scene(SceneDecl::audio("music", 60).at(0));
    Timeline::build(&decl).unwrap()
}

#[test]
fn only_b_is_active_at_45() {
    let tl = two_scenes();
    let state = Evaluator::eval_frame(&tl, FrameIndex(45)).unwrap();

    let visual: Vec<_> = state
        .scenes
        .iter()
        .filter(|s| s.track == Track::Visual)
        .collect();
    assert_eq!(visual.len(), 1);
    let b = state.visual().unwrap();
    assert_eq!(b.scene_id, "B");
    assert_eq!(b.local_frame, 15);
    assert_eq!(b.duration_frames, 30);
    assert_eq!(b.progress, 0.5);
    assert!(b.spring.is_some());

    assert_eq!(state.scene("music").unwrap().local_frame, 45);
    assert!(state.scene("A").is_none());
    assert_eq!(
        state.effects.as_ref().unwrap().names(),
        vec![EffectLayerName::FilmGrain, EffectLayerName::Vignette]
    );
}

#[test]
fn scene_without_effects_has_no_stack() {
    let tl = two_scenes();
    let state = Evaluator::eval_frame(&tl, FrameIndex(10)).unwrap();
    assert_eq!(state.visual().unwrap().scene_id, "A");
    assert!(state.effects.is_none());
    assert_eq!(state.visual().unwrap().spring, None);
}

#[test]
fn spring_starts_at_zero_on_scene_start() {
    let tl = two_scenes();
    let state = Evaluator::eval_frame(&tl, FrameIndex(30)).unwrap();
    assert_eq!(state.visual().unwrap().spring, Some(0.0));
}

#[test]
fn evaluation_order_does_not_matter() {
    let tl = two_scenes();
    let forward: Vec<_> = (0..60)
        .map(|f| Evaluator::eval_frame(&tl, FrameIndex(f)).unwrap())
        .collect();
    let backward: Vec<_> = (0..60)
        .rev()
        .map(|f| Evaluator::eval_frame(&tl, FrameIndex(f)).unwrap())
        .collect();
    for (a, b) in forward.iter().zip(backward.iter().rev()) {
        assert_eq!(a, b);
        for (sa, sb) in a.scenes.iter().zip(&b.scenes) {
            assert_eq!(sa.progress.to_bits(), sb.progress.to_bits());
            assert_eq!(sa.spring.map(f64::to_bits), sb.spring.map(f64::to_bits));
        }
    }
}

#[test]
fn out_of_range_frame_is_an_evaluation_error() {
    let tl = two_scenes();
    let err = Evaluator::eval_frame(&tl, FrameIndex(60)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Evaluation);
    assert_eq!(err.frame(), Some(FrameIndex(60)));
    assert!(err.to_string().contains("[0, 60)"), "{err}");
}

#[test]
fn stagger_helpers_use_the_scene_seed() {
    let tl = two_scenes();
    let state = Evaluator::eval_frame(&tl, FrameIndex(45)).unwrap();
    let b = state.visual().unwrap();

    assert_eq!(
        b.stagger_order(6, StaggerStrategy::Random),
        compute_order(6, StaggerStrategy::Random, Some(b.seed))
    );

    let spec = StaggerSpec {
        strategy: StaggerStrategy::Forward,
        base_delay: 1.0,
        amount: 2.0,
        seed: None,
    };
    assert_eq!(b.stagger_delays(3, &spec), vec![1.0, 3.0, 5.0]);
}
