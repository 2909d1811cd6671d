use super::*;

use crate::controller::keys::EditorButton;

#[test]
fn empty_object_yields_defaults() {
    let cfg = EditorConfig::from_reader("{}".as_bytes()).unwrap();
    assert_eq!(cfg, EditorConfig::default());
    cfg.validate().unwrap();
    assert_eq!(cfg.initial.scale_x, 0.3);
    assert_eq!(cfg.load_timeout(), Duration::from_secs(10));
    assert_eq!(cfg.compositor_opts().overlay_display_width, 200.0);
}

#[test]
fn partial_config_overrides_only_named_fields() {
    let json = r#"{
        "steps": { "translate_px": 10 },
        "scale_bounds": { "min": 0.2, "max": 3.0 },
        "initial": { "translateX": 12, "scaleX": 1, "scaleY": 1, "rotate": 15 },
        "fit": "cover",
        "key_bindings": { "w": "up", "r": "rotate_cw" }
    }"#;
    let cfg = EditorConfig::from_reader(json.as_bytes()).unwrap();
    cfg.validate().unwrap();
    assert_eq!(cfg.steps.translate_px, 10.0);
    assert_eq!(cfg.steps.scale, 0.05);
    assert_eq!(cfg.scale_bounds, ScaleBounds { min: 0.2, max: 3.0 });
    assert_eq!(cfg.initial.translate_x, 12.0);
    assert_eq!(cfg.initial.rotate_deg, 15.0);
    assert_eq!(cfg.fit, FitPolicy::Cover);
    assert_eq!(cfg.key_bindings.button_for("w"), Some(EditorButton::Up));
    assert_eq!(cfg.key_bindings.button_for("ArrowUp"), None);
}

#[test]
fn unknown_fields_and_bad_ranges_are_rejected() {
    assert!(EditorConfig::from_reader(r#"{"stepz": {}}"#.as_bytes()).is_err());

    let bounds = EditorConfig {
        scale_bounds: ScaleBounds { min: 2.0, max: 1.0 },
        ..EditorConfig::default()
    };
    assert!(matches!(bounds.validate(), Err(EditorError::Validation(_))));

    let width = EditorConfig {
        overlay_display_width: 0.0,
        ..EditorConfig::default()
    };
    assert!(width.validate().is_err());

    let timeout = EditorConfig {
        load_timeout_ms: 0,
        ..EditorConfig::default()
    };
    assert!(timeout.validate().is_err());
}

#[test]
fn controller_starts_at_initial_transform() {
    let cfg = EditorConfig::default();
    let c = cfg.controller(Vec2::new(200.0, 200.0));
    assert_eq!(c.transform(), cfg.initial);
    assert_eq!(c.bounds(), cfg.scale_bounds);
}

#[test]
fn missing_file_is_a_validation_error() {
    let err = EditorConfig::from_path("target/no/such/editor.json").unwrap_err();
    assert!(err.to_string().contains("open editor config"));
}
