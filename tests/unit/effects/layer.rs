use super::*;

#[test]
fn layer_order_is_fixed() {
    let mut shuffled = vec![
        EffectLayerName::Vignette,
        EffectLayerName::FilmGrain,
        EffectLayerName::MotionBlur,
        EffectLayerName::LightLeak,
        EffectLayerName::Bloom,
        EffectLayerName::ColorGrading,
        EffectLayerName::Glitch,
        EffectLayerName::ChromaticAberration,
    ];
    shuffled.sort();
    assert_eq!(shuffled, EffectLayerName::ALL.to_vec());
    assert!(EffectLayerName::FilmGrain < EffectLayerName::Vignette);
}

#[test]
fn layer_names_parse_loosely() {
    assert_eq!(
        "film_grain".parse::<EffectLayerName>().unwrap(),
        EffectLayerName::FilmGrain
    );
    assert_eq!(
        "ChromaticAberration".parse::<EffectLayerName>().unwrap(),
        EffectLayerName::ChromaticAberration
    );
    assert_eq!(
        "light-leak".parse::<EffectLayerName>().unwrap(),
        EffectLayerName::LightLeak
    );
    assert!("sparkle".parse::<EffectLayerName>().is_err());
    for l in EffectLayerName::ALL {
        let json = serde_json::to_string(&l).unwrap();
        assert_eq!(json, format!("\"{}\"", l.as_str()));
    }
}

#[test]
fn defaults_round_trip_through_json() {
    for l in EffectLayerName::ALL {
        let d = LayerParams::defaults(l);
        assert_eq!(d.name(), l);
        assert!(d.validate().is_ok());
        let back = LayerParams::from_json(l, d.to_json().unwrap()).unwrap();
        assert_eq!(back, d);
    }
}

#[test]
fn partial_objects_use_field_defaults() {
    let p = LayerParams::from_json(
        EffectLayerName::Vignette,
        serde_json::json!({ "intensity": 0.9 }),
    )
    .unwrap();
    assert_eq!(
        p,
        LayerParams::Vignette(VignetteParams {
            intensity: 0.9,
            ..VignetteParams::default()
        })
    );
}

#[test]
fn malformed_params_are_config_errors() {
    let unknown_field = LayerParams::from_json(
        EffectLayerName::Bloom,
        serde_json::json!({ "glow": 1.0 }),
    )
    .unwrap_err();
    assert_eq!(unknown_field.kind(), crate::ErrorKind::Config);

    let wrong_type = LayerParams::from_json(
        EffectLayerName::FilmGrain,
        serde_json::json!({ "intensity": "lots" }),
    )
    .unwrap_err();
    assert_eq!(wrong_type.kind(), crate::ErrorKind::Config);

    let out_of_range = LayerParams::from_json(
        EffectLayerName::Bloom,
        serde_json::json!({ "threshold": 1.5 }),
    )
    .unwrap_err();
    assert!(out_of_range.to_string().contains("bloom.threshold"));

    let no_samples = LayerParams::from_json(
        EffectLayerName::MotionBlur,
        serde_json::json!({ "samples": 0 }),
    );
    assert!(no_samples.is_err());
}

#[test]
fn grading_wheels_are_structured() {
    let p = LayerParams::from_json(
        EffectLayerName::ColorGrading,
        serde_json::json!({
            "contrast": 1.2,
            "lift": { "r": 0.0, "g": 0.0, "b": 0.05 },
            "gamma": { "r": 1.0, "g": 1.0, "b": 1.0 },
            "gain": { "r": 1.1, "g": 1.0, "b": 0.9 }
        }),
    )
    .unwrap();
    let LayerParams::ColorGrading(g) = p else {
        panic!("expected color grading params");
    };
    assert_eq!(g.contrast, 1.2);
    assert_eq!(g.lift.b, 0.05);
    assert_eq!(g.gain, ColorWheel { r: 1.1, g: 1.0, b: 0.9 });
    assert_eq!(g.saturation, 1.0);
}
