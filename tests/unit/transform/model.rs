use super::*;

#[test]
fn default_is_centered_at_initial_scale() {
    let t = Transform::default();
    assert_eq!(t.translate(), Vec2::ZERO);
    assert_eq!(t.scale_x, Transform::INITIAL_SCALE);
    assert_eq!(t.scale_y, Transform::INITIAL_SCALE);
    assert_eq!(t.rotate_deg, 0.0);
}

#[test]
fn scale_increments_never_leave_bounds() {
    let bounds = ScaleBounds::default();
    let mut t = Transform::default();
    for _ in 0..500 {
        t.scale_by(0.05, &bounds);
        assert!(bounds.contains(t.scale_x) && bounds.contains(t.scale_y));
    }
    assert_eq!(t.scale_x, 2.0);

    for _ in 0..500 {
        t.scale_by(-0.05, &bounds);
        assert!(bounds.contains(t.scale_x) && bounds.contains(t.scale_y));
    }
    assert_eq!(t.scale_x, 0.1);
}

#[test]
fn mixed_scale_sequences_stay_clamped() {
    let bounds = ScaleBounds::default();
    let mut t = Transform::default();
    let deltas = [0.7, -3.0, 0.05, 12.0, -0.05, -0.05, 1e9, -1e9, 0.33];
    for d in deltas {
        t.scale_by(d, &bounds);
        assert!(bounds.contains(t.scale_x), "scale_x {} out of range", t.scale_x);
        assert!(bounds.contains(t.scale_y), "scale_y {} out of range", t.scale_y);
    }
}

#[test]
fn non_finite_inputs_leave_state_unchanged() {
    let bounds = ScaleBounds::default();
    let mut t = Transform::default();
    let before = t;
    t.translate_by(Vec2::new(f64::NAN, 1.0));
    t.scale_by(f64::INFINITY, &bounds);
    t.rotate_by(f64::NAN);
    t.set_scale(f64::NAN, 1.0, &bounds);
    assert_eq!(t, before);
}

#[test]
fn position_is_not_clamped() {
    let mut t = Transform::default();
    t.translate_by(Vec2::new(-10_000.0, 25_000.0));
    assert_eq!(t.translate(), Vec2::new(-10_000.0, 25_000.0));
}

#[test]
fn scale_bounds_validation() {
    assert!(ScaleBounds::new(0.1, 2.0).is_ok());
    assert!(ScaleBounds::new(0.0, 2.0).is_err());
    assert!(ScaleBounds::new(2.0, 1.0).is_err());
    assert!(ScaleBounds::new(0.1, f64::INFINITY).is_err());
    assert_eq!(ScaleBounds::default().clamp(f64::NAN), 0.1);
}

#[test]
fn serde_uses_camel_case_and_accepts_rotate_alias() {
    let t: Transform = serde_json::from_str(
        r#"{ "translateX": 4, "translateY": -2, "scaleX": 0.5, "scaleY": 0.5, "rotate": 15 }"#,
    )
    .unwrap();
    assert_eq!(t, Transform::new(Vec2::new(4.0, -2.0), 0.5, 0.5, 15.0));

    let json = serde_json::to_value(t).unwrap();
    assert_eq!(json["rotateDeg"], 15.0);
    assert_eq!(json["translateX"], 4.0);
}
