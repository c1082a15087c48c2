use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        TimelineError::config("x")
            .to_string()
            .starts_with("config error")
    );
    assert!(
        TimelineError::numeric_instability("x")
            .to_string()
            .starts_with("numeric instability")
    );
    assert!(
        TimelineError::evaluation("x")
            .to_string()
            .starts_with("evaluation error")
    );
    assert!(
        TimelineError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn context_is_attached_once_and_reported() {
    let err = TimelineError::config("bad duration")
        .with_scene("intro")
        .with_scene("ignored")
        .with_frame(FrameIndex(12));
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(err.scene_id(), Some("intro"));
    assert_eq!(err.frame(), Some(FrameIndex(12)));
    assert_eq!(
        err.to_string(),
        "config error (scene 'intro', frame 12): bad duration"
    );
}

#[test]
fn out_of_order_names_both_scenes_and_range() {
    let err = TimelineError::OutOfOrder {
        first: "a".to_owned(),
        second: "b".to_owned(),
        range: FrameRange {
            start: FrameIndex(20),
            end: FrameIndex(30),
        },
    };
    let msg = err.to_string();
    assert!(msg.contains("'a'"));
    assert!(msg.contains("'b'"));
    assert!(msg.contains("[20, 30)"));
    assert_eq!(err.frame(), Some(FrameIndex(20)));
}

#[test]
fn preset_warning_converts_to_unknown_preset() {
    let w = PresetWarning {
        kind: PresetKind::Effect,
        requested: "noir".to_owned(),
        fallback: "standard".to_owned(),
        scene_id: None,
    };
    let err = TimelineError::from(w).with_scene("s1");
    assert_eq!(err.kind(), ErrorKind::UnknownPreset);
    assert_eq!(err.scene_id(), Some("s1"));
    assert!(err.to_string().contains("'noir'"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = TimelineError::Other(anyhow::Error::new(base));
    assert_eq!(err.kind(), ErrorKind::Other);
    assert!(err.to_string().contains("boom"));
}
