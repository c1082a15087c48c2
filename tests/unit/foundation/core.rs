use super::*;

#[test]
fn frame_range_contains_boundaries() {
    let r = FrameRange::new(FrameIndex(2), FrameIndex(5)).unwrap();
    assert!(!r.contains(FrameIndex(1)));
    assert!(r.contains(FrameIndex(2)));
    assert!(r.contains(FrameIndex(4)));
    assert!(!r.contains(FrameIndex(5)));
}

#[test]
fn frame_range_rejects_inverted_bounds() {
    assert!(FrameRange::new(FrameIndex(5), FrameIndex(2)).is_err());
}

#[test]
fn intersection_is_half_open() {
    let a = FrameRange::from_start_len(FrameIndex(0), 30);
    let b = FrameRange::from_start_len(FrameIndex(30), 30);
    assert_eq!(a.intersection(b), None);

    let c = FrameRange::from_start_len(FrameIndex(20), 30);
    assert_eq!(
        a.intersection(c),
        Some(FrameRange {
            start: FrameIndex(20),
            end: FrameIndex(30),
        })
    );
}

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(30, 0).is_err());
}

#[test]
fn fps_seconds_round_to_nearest_frame() {
    let fps = Fps::new(30000, 1001).unwrap();
    assert_eq!(fps.secs_to_frames_round(1.0), 30);
    let fps = Fps::new(30, 1).unwrap();
    assert_eq!(fps.secs_to_frames_round(1.5), 45);
    assert_eq!(fps.secs_to_frames_round(-1.0), -30);
    assert!((fps.frames_to_secs(15.0) - 0.5).abs() < 1e-12);
}
