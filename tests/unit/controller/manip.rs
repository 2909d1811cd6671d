use super::*;
use crate::controller::gesture::Handle;

fn controller() -> ManipulationController {
    ManipulationController::new(
        Transform::default(),
        Vec2::new(200.0, 200.0),
        ScaleBounds::default(),
        StepConfig::default(),
        KeyBindings::default(),
    )
}

#[test]
fn five_right_steps_equal_one_25px_drag() {
    let mut keyed = controller();
    for _ in 0..5 {
        assert_eq!(keyed.key_down("ArrowRight"), Some(EditorButton::Right));
        keyed.key_up("ArrowRight");
    }

    let mut dragged = controller();
    assert_eq!(
        dragged.pointer_down(Point::new(0.0, 0.0)),
        Some(HitTarget::Body)
    );
    dragged.pointer_move(Point::new(10.0, 0.0));
    dragged.pointer_move(Point::new(25.0, 0.0));
    dragged.pointer_up();

    assert_eq!(keyed.transform().translate_x, 25.0);
    assert_eq!(keyed.transform(), dragged.transform());
}

#[test]
fn every_pointer_move_is_a_readable_state() {
    let mut c = controller();
    c.pointer_down(Point::new(5.0, 5.0));
    let mut last_rev = c.revision();
    for i in 1..=10 {
        let t = c.pointer_move(Point::new(5.0 + f64::from(i), 5.0)).unwrap();
        assert_eq!(t, c.transform());
        assert_eq!(c.transform().translate_x, f64::from(i));
        assert!(c.revision() > last_rev);
        last_rev = c.revision();
    }
    c.pointer_up();
    assert!(!c.is_gesturing());
    assert_eq!(c.pointer_move(Point::new(100.0, 100.0)), None);
    assert_eq!(c.transform().translate_x, 10.0);
}

#[test]
fn pointer_down_off_the_overlay_starts_nothing() {
    let mut c = controller();
    assert_eq!(c.pointer_down(Point::new(500.0, 500.0)), None);
    assert!(!c.is_gesturing());
}

#[test]
fn pressed_set_tracks_key_down_and_up() {
    let mut c = controller();
    c.key_down("ArrowUp");
    c.key_down("+");
    assert!(c.is_pressed(EditorButton::Up));
    assert!(c.is_pressed(EditorButton::ScaleUp));
    c.key_up("ArrowUp");
    assert!(!c.is_pressed(EditorButton::Up));
    assert_eq!(c.pressed().collect::<Vec<_>>(), vec![EditorButton::ScaleUp]);
    c.key_up("+");
    assert_eq!(c.pressed().count(), 0);
}

#[test]
fn button_stays_pressed_while_another_bound_key_is_held() {
    let mut c = controller();
    c.key_down("+");
    c.key_down("=");
    assert_eq!(c.key_up("="), Some(EditorButton::ScaleUp));
    assert!(c.is_pressed(EditorButton::ScaleUp));
    assert_eq!(c.pressed().collect::<Vec<_>>(), vec![EditorButton::ScaleUp]);
    c.key_up("+");
    assert!(!c.is_pressed(EditorButton::ScaleUp));

    // Auto-repeat holds once; letters release in either case.
    c.key_down("e");
    c.key_down("e");
    c.key_up("E");
    assert!(!c.is_pressed(EditorButton::RotateCw));
    assert_eq!(c.transform().rotate_deg, 10.0);
}

#[test]
fn each_key_down_applies_exactly_one_step() {
    let mut c = controller();
    c.key_down("ArrowDown");
    c.key_down("ArrowDown");
    c.key_down("ArrowLeft");
    c.key_down("e");
    c.key_down("e");
    c.key_down("q");
    c.key_down("-");
    let t = c.transform();
    assert_eq!(t.translate(), Vec2::new(-5.0, 10.0));
    assert_eq!(t.rotate_deg, 5.0);
    assert!((t.scale_x - 0.25).abs() < 1e-12);
    assert_eq!(t.scale_x, t.scale_y);
}

#[test]
fn unbound_keys_change_nothing() {
    let mut c = controller();
    let rev = c.revision();
    assert_eq!(c.key_down("Enter"), None);
    assert_eq!(c.key_up("Enter"), None);
    assert_eq!(c.revision(), rev);
    assert_eq!(c.transform(), Transform::default());
}

#[test]
fn scale_steps_clamp_at_both_ends() {
    let mut c = controller();
    for _ in 0..100 {
        c.press(EditorButton::ScaleUp);
    }
    assert_eq!(c.transform().scale_x, 2.0);
    for _ in 0..100 {
        c.press(EditorButton::ScaleDown);
    }
    assert_eq!(c.transform().scale_x, 0.1);
    assert_eq!(c.transform().scale_y, 0.1);
}

#[test]
fn keyboard_and_pointer_compose_on_one_model() {
    let mut c = controller();
    c.press(EditorButton::RotateCw);
    c.begin_gesture(HitTarget::Body, Point::ZERO);
    c.pointer_move(Point::new(0.0, 40.0));
    c.pointer_up();
    c.press(EditorButton::Left);
    let t = c.transform();
    assert_eq!(t.translate(), Vec2::new(-5.0, 40.0));
    assert_eq!(t.rotate_deg, 5.0);
}

#[test]
fn resize_gesture_through_controller_is_clamped() {
    let mut c = controller();
    let corner = handle_position_for(&c, Handle::BottomRight);
    assert_eq!(
        c.pointer_down(corner),
        Some(HitTarget::Resize(Handle::BottomRight))
    );
    c.pointer_move(Point::new(5_000.0, 5_000.0));
    assert_eq!(c.transform().scale_x, 2.0);
    c.pointer_up();
}

fn handle_position_for(c: &ManipulationController, h: Handle) -> Point {
    crate::controller::gesture::handle_position(&c.transform(), c.overlay_size(), h)
}

#[test]
fn apply_css_matrix_normalizes_into_model() {
    let mut c = controller();
    let t = c
        .apply_css_matrix("matrix(0, 1.5, -1.5, 0, 12, -8)")
        .unwrap();
    assert!((t.scale_x - 1.5).abs() < 1e-12);
    assert!((t.rotate_deg - 90.0).abs() < 1e-12);
    assert_eq!(t.translate(), Vec2::new(12.0, -8.0));

    let before = c.transform();
    assert!(c.apply_css_matrix("matrix(1, 2)").is_err());
    assert_eq!(c.transform(), before);

    let t = c.apply_matrix(Affine::scale(9.0)).unwrap();
    assert_eq!(t.scale_x, 2.0);
}

#[test]
fn reset_restores_initial_and_clears_state() {
    let mut c = controller();
    c.press(EditorButton::Right);
    c.begin_gesture(HitTarget::Body, Point::ZERO);
    c.reset();
    assert_eq!(c.transform(), Transform::default());
    assert!(!c.is_gesturing());
    assert_eq!(c.pressed().count(), 0);
}

#[test]
fn centered_converts_container_local_points() {
    let container = DisplaySize::new(600.0, 400.0);
    assert_eq!(centered(container, Point::new(300.0, 200.0)), Point::ZERO);
    assert_eq!(
        centered(container, Point::new(0.0, 0.0)),
        Point::new(-300.0, -200.0)
    );
}

#[test]
fn display_affine_places_overlay_box_in_container() {
    let mut c = controller();
    c.set_transform(Transform::IDENTITY);
    let m = c.display_affine(DisplaySize::new(400.0, 400.0));
    assert_eq!(m * Point::ZERO, Point::new(100.0, 100.0));
    assert_eq!(m * Point::new(200.0, 200.0), Point::new(300.0, 300.0));
}
