use super::*;

#[test]
fn wire_forms_map_to_variants() {
    let decl: EffectsDecl = serde_json::from_str(
        r#"{
            "preset": "cinematic",
            "vignette": false,
            "filmGrain": true,
            "bloom": "dreamy",
            "colorGrading": { "contrast": 1.1 }
        }"#,
    )
    .unwrap();

    assert_eq!(decl.preset.as_deref(), Some("cinematic"));
    assert_eq!(
        decl.layers[&EffectLayerName::Vignette],
        LayerConfig::Disabled
    );
    assert_eq!(
        decl.layers[&EffectLayerName::FilmGrain],
        LayerConfig::Default
    );
    assert_eq!(
        decl.layers[&EffectLayerName::Bloom],
        LayerConfig::Named("dreamy".to_owned())
    );
    let LayerConfig::Explicit(p) = &decl.layers[&EffectLayerName::ColorGrading] else {
        panic!("expected explicit params");
    };
    assert_eq!(p["contrast"], serde_json::json!(1.1));
}

#[test]
fn unknown_layer_keys_and_bad_values_are_rejected() {
    assert!(serde_json::from_str::<EffectsDecl>(r#"{"sparkle": true}"#).is_err());
    assert!(serde_json::from_str::<EffectsDecl>(r#"{"vignette": 3}"#).is_err());
    assert!(serde_json::from_str::<EffectsDecl>(r#"{"vignette": "  "}"#).is_err());
}

#[test]
fn serializes_back_to_wire_form() {
    let decl = EffectsDecl::new()
        .with_preset("vintage")
        .layer(EffectLayerName::Vignette, LayerConfig::Disabled)
        .layer(EffectLayerName::FilmGrain, LayerConfig::Named("draft".into()));
    let v = serde_json::to_value(&decl).unwrap();
    assert_eq!(
        v,
        serde_json::json!({ "preset": "vintage", "vignette": false, "filmGrain": "draft" })
    );
    let back: EffectsDecl = serde_json::from_value(v).unwrap();
    assert_eq!(back, decl);
}
