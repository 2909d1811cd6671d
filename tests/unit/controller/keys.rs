use super::*;

#[test]
fn default_bindings_cover_every_button() {
    let keys = KeyBindings::default();
    for button in EditorButton::ALL {
        assert!(
            keys.iter().any(|(_, b)| b == button),
            "{button:?} has no default key"
        );
    }
    assert_eq!(keys.button_for("ArrowRight"), Some(EditorButton::Right));
    assert_eq!(keys.button_for("="), Some(EditorButton::ScaleUp));
    assert_eq!(keys.button_for("Enter"), None);
}

#[test]
fn single_letters_match_either_case() {
    let keys = KeyBindings::default();
    assert_eq!(keys.button_for("E"), Some(EditorButton::RotateCw));
    assert_eq!(keys.button_for("q"), Some(EditorButton::RotateCcw));
    assert_eq!(keys.button_for("arrowright"), None);
}

#[test]
fn rebinding_replaces_previous_button() {
    let mut keys = KeyBindings::empty();
    keys.bind("w", EditorButton::Up);
    keys.bind("w", EditorButton::ScaleUp);
    assert_eq!(keys.button_for("w"), Some(EditorButton::ScaleUp));
    assert_eq!(keys.unbind("w"), Some(EditorButton::ScaleUp));
    assert_eq!(keys.button_for("w"), None);
}

#[test]
fn bindings_serialize_as_plain_map() {
    let keys: KeyBindings =
        serde_json::from_str(r#"{ "h": "left", "l": "right", "]": "rotate_cw" }"#).unwrap();
    assert_eq!(keys.button_for("h"), Some(EditorButton::Left));
    assert_eq!(keys.button_for("]"), Some(EditorButton::RotateCw));
    assert_eq!(keys.button_for("ArrowLeft"), None);
}
