use super::*;
use crate::ErrorKind;

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

#[test]
fn sequential_placement_per_track() {
    let decls = vec![
        SceneDecl::visual("a", 30),
        SceneDecl::visual("b", 30),
        SceneDecl::audio("music", 90),
        SceneDecl::visual("c", 15),
        SceneDecl::audio("sting", 10),
    ];
    let idx = plan(&decls, fps30()).unwrap();

    let range = |id: &str| idx.get(id).unwrap().range;
    assert_eq!(range("a"), FrameRange::new(FrameIndex(0), FrameIndex(30)).unwrap());
    assert_eq!(range("b").start, FrameIndex(30));
    assert_eq!(range("c"), FrameRange::new(FrameIndex(60), FrameIndex(75)).unwrap());
    assert_eq!(range("music").start, FrameIndex(0));
    assert_eq!(range("sting").start, FrameIndex(90));
    assert_eq!(idx.total_frames(), 100);
    assert_eq!(idx.len(), 5);
}

#[test]
fn rejects_unvalidated_fps() {
    let decls = vec![SceneDecl {
        id: "s".into(),
        start_seconds: Some(0.0),
        duration_seconds: Some(2.0),
        ..SceneDecl::default()
    }];
    for fps in [Fps { num: 30, den: 0 }, Fps { num: 0, den: 1 }] {
        let err = plan(&decls, fps).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}

#[test]
fn explicit_starts_move_the_cursor() {
    let decls = vec![
        SceneDecl::visual("a", 10).at(20),
        SceneDecl::visual("b", 10),
        SceneDecl::visual("early", 5).at(0),
    ];
    let idx = plan(&decls, fps30()).unwrap();
    assert_eq!(idx.get("b").unwrap().range.start, FrameIndex(30));
    let order: Vec<_> = idx.scenes().iter().map(|s| s.id.as_str()).collect();
    assert_eq!(order, vec!["early", "a", "b"]);
    assert_eq!(idx.get("early").unwrap().decl_index, 2);
}

#[test]
fn seconds_round_to_nearest_frame() {
    let decls = vec![
        SceneDecl {
            id: "s".into(),
            start_seconds: Some(0.049),
            duration_seconds: Some(0.5),
            ..SceneDecl::default()
        },
        SceneDecl {
            id: "t".into(),
            start_seconds: Some(1.0),
            duration_seconds: Some(0.0501),
            ..SceneDecl::default()
        },
    ];
    let idx = plan(&decls, fps30()).unwrap();
    // 1.47 frames rounds down, 0.5s is exactly 15 frames.
    assert_eq!(
        idx.get("s").unwrap().range,
        FrameRange::new(FrameIndex(1), FrameIndex(16)).unwrap()
    );
    // 1.503 frames rounds to 2.
    assert_eq!(
        idx.get("t").unwrap().range,
        FrameRange::new(FrameIndex(30), FrameIndex(32)).unwrap()
    );
}

#[test]
fn malformed_scenes_are_config_errors() {
    let cases = vec![
        SceneDecl::visual("neg", 10).at(-1),
        SceneDecl::visual("zero", 0),
        SceneDecl::visual("negdur", -5),
        SceneDecl::visual("", 10),
        SceneDecl {
            id: "nodur".into(),
            ..SceneDecl::default()
        },
        SceneDecl {
            start_seconds: Some(1.0),
            ..SceneDecl::visual("both_start", 10).at(0)
        },
        SceneDecl {
            duration_seconds: Some(1.0),
            ..SceneDecl::visual("both_dur", 10)
        },
        SceneDecl {
            id: "tiny".into(),
            duration_seconds: Some(0.01),
            ..SceneDecl::default()
        },
        SceneDecl {
            id: "nan".into(),
            duration_seconds: Some(f64::NAN),
            ..SceneDecl::default()
        },
    ];
    for decl in cases {
        let id = decl.id.clone();
        let err = plan(&[decl], fps30()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config, "{id}: {err}");
        if !id.is_empty() {
            assert_eq!(err.scene_id(), Some(id.as_str()), "{err}");
        }
    }
}

#[test]
fn duplicate_ids_are_rejected() {
    let err = plan(
        &[SceneDecl::visual("a", 10), SceneDecl::audio("a", 10)],
        fps30(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Config);
    assert_eq!(err.scene_id(), Some("a"));
}

#[test]
fn visual_overlap_names_both_scenes() {
    let err = plan(
        &[
            SceneDecl::visual("a", 30),
            SceneDecl::visual("b", 30).at(20),
        ],
        fps30(),
    )
    .unwrap_err();
    match &err {
        TimelineError::OutOfOrder {
            first,
            second,
            range,
        } => {
            assert_eq!(first, "a");
            assert_eq!(second, "b");
            assert_eq!(*range, FrameRange::new(FrameIndex(20), FrameIndex(30)).unwrap());
        }
        other => panic!("expected out-of-order error, got {other}"),
    }
    assert_eq!(err.kind(), ErrorKind::OutOfOrder);
    assert!(err.to_string().contains("[20, 30)"));
}

#[test]
fn contained_visual_scene_overlaps() {
    let err = plan(
        &[
            SceneDecl::visual("long", 100),
            SceneDecl::visual("inner", 10).at(40),
        ],
        fps30(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfOrder);
}

#[test]
fn audio_may_overlap_anything() {
    let idx = plan(
        &[
            SceneDecl::visual("v", 60),
            SceneDecl::audio("m1", 60).at(0),
            SceneDecl::audio("m2", 60).at(30),
        ],
        fps30(),
    )
    .unwrap();
    let active: Vec<_> = idx
        .active_at(FrameIndex(45))
        .map(|s| s.id.as_str())
        .collect();
    assert_eq!(active, vec!["v", "m1", "m2"]);
}

#[test]
fn active_at_uses_half_open_ranges() {
    let idx = plan(
        &[SceneDecl::visual("a", 30), SceneDecl::visual("b", 30)],
        fps30(),
    )
    .unwrap();
    let ids = |f: u64| -> Vec<String> {
        idx.active_at(FrameIndex(f))
            .map(|s| s.id.clone())
            .collect()
    };
    assert_eq!(ids(0), vec!["a"]);
    assert_eq!(ids(29), vec!["a"]);
    assert_eq!(ids(30), vec!["b"]);
    assert_eq!(ids(45), vec!["b"]);
    assert!(ids(60).is_empty());
}

#[test]
fn empty_plan_has_no_frames() {
    let idx = plan(&[], fps30()).unwrap();
    assert!(idx.is_empty());
    assert_eq!(idx.total_frames(), 0);
}
