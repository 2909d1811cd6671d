use super::*;

fn assert_affine_close(a: Affine, b: Affine) {
    for (x, y) in a.as_coeffs().iter().zip(b.as_coeffs().iter()) {
        assert!((x - y).abs() < 1e-9, "{a:?} != {b:?}");
    }
}

#[test]
fn decompose_then_compose_reproduces_rigid_uniform_matrices() {
    let translations = [(0.0, 0.0), (12.5, -40.0), (-300.0, 1e4)];
    let rotations = [-179.0, -90.0, -33.3, 0.0, 5.0, 45.0, 90.0, 135.0, 179.0];
    let scales = [0.1, 0.3, 1.0, 1.75, 2.0];
    for &(tx, ty) in &translations {
        for &deg in &rotations {
            for &s in &scales {
                let m = Affine::translate(Vec2::new(tx, ty))
                    * Affine::rotate(f64::to_radians(deg))
                    * Affine::scale(s);
                let t = decompose(m);
                assert!((t.scale_x - s).abs() < 1e-9);
                assert!((t.scale_y - s).abs() < 1e-9);
                assert!((t.rotate_deg - deg).abs() < 1e-9);
                assert_affine_close(compose(&t), m);
            }
        }
    }
}

#[test]
fn decompose_reads_translation_from_last_column() {
    let t = decompose(Affine::new([1.0, 0.0, 0.0, 1.0, 7.0, -3.0]));
    assert_eq!(t, Transform::new(Vec2::new(7.0, -3.0), 1.0, 1.0, 0.0));
}

#[test]
fn normalize_clamps_scale_and_rejects_non_finite() {
    let bounds = ScaleBounds::default();
    let t = normalize(Affine::scale(5.0), &bounds).unwrap();
    assert_eq!(t.scale_x, 2.0);
    assert_eq!(t.scale_y, 2.0);
    assert!(normalize(Affine::new([f64::NAN, 0.0, 0.0, 1.0, 0.0, 0.0]), &bounds).is_err());
}

#[test]
fn css_matrix_parses_common_forms() {
    assert_eq!(parse_css_matrix("none").unwrap(), Affine::IDENTITY);
    assert_eq!(
        parse_css_matrix("matrix(1, 0, 0, 1, 10, 20)").unwrap(),
        Affine::new([1.0, 0.0, 0.0, 1.0, 10.0, 20.0])
    );
    assert_eq!(
        parse_css_matrix("  matrix(0.5 0 0 0.5 -4px 8px) ").unwrap(),
        Affine::new([0.5, 0.0, 0.0, 0.5, -4.0, 8.0])
    );
}

#[test]
fn css_matrix_rejects_malformed_input() {
    assert!(parse_css_matrix("matrix(1, 0, 0, 1, 10)").is_err());
    assert!(parse_css_matrix("matrix(1, 0, 0, 1, 10, 20, 30)").is_err());
    assert!(parse_css_matrix("matrix3d(1, 0, 0, 1, 10, 20)").is_err());
    assert!(parse_css_matrix("matrix(1, 0, 0, 1, ten, 20)").is_err());
    assert!(parse_css_matrix("matrix(1, 0, 0, 1, inf, 20)").is_err());
}

#[test]
fn css_matrix_format_round_trips_through_parser() {
    let m = compose(&Transform::new(Vec2::new(3.0, 4.0), 0.5, 0.5, 30.0));
    assert_affine_close(parse_css_matrix(&format_css_matrix(m)).unwrap(), m);
}

#[test]
fn overlay_affine_centers_box_on_translated_origin() {
    let t = Transform::new(Vec2::new(10.0, 0.0), 1.0, 1.0, 0.0);
    let m = t.overlay_affine(Vec2::new(100.0, 100.0), Vec2::new(50.0, 20.0));
    let top_left = m * crate::foundation::core::Point::ZERO;
    assert_eq!(top_left, crate::foundation::core::Point::new(85.0, 90.0));
}
