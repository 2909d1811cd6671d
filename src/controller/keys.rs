use std::collections::BTreeMap;

/// Logical editor button, shared by keyboard bindings and on-screen controls.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EditorButton {
    /// Move up.
    Up,
    /// Move down.
    Down,
    /// Move left.
    Left,
    /// Move right.
    Right,
    /// Grow both axes.
    ScaleUp,
    /// Shrink both axes.
    ScaleDown,
    /// Rotate clockwise.
    RotateCw,
    /// Rotate counter-clockwise.
    RotateCcw,
}

impl EditorButton {
    /// All buttons in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Up,
        Self::Down,
        Self::Left,
        Self::Right,
        Self::ScaleUp,
        Self::ScaleDown,
        Self::RotateCw,
        Self::RotateCcw,
    ];
}

/// Map from key names (as reported by the windowing layer, e.g. `ArrowLeft`) to buttons.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    map: BTreeMap<String, EditorButton>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let pairs = [
            ("ArrowUp", EditorButton::Up),
            ("ArrowDown", EditorButton::Down),
            ("ArrowLeft", EditorButton::Left),
            ("ArrowRight", EditorButton::Right),
            ("+", EditorButton::ScaleUp),
            ("=", EditorButton::ScaleUp),
            ("-", EditorButton::ScaleDown),
            ("_", EditorButton::ScaleDown),
            ("e", EditorButton::RotateCw),
            ("q", EditorButton::RotateCcw),
        ];
        Self {
            map: pairs
                .into_iter()
                .map(|(k, b)| (k.to_owned(), b))
                .collect(),
        }
    }
}

impl KeyBindings {
    /// Bindings with no keys bound.
    pub fn empty() -> Self {
        Self {
            map: BTreeMap::new(),
        }
    }

    /// Bind `key` to `button`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: impl Into<String>, button: EditorButton) {
        self.map.insert(key.into(), button);
    }

    /// Remove the binding for `key`.
    pub fn unbind(&mut self, key: &str) -> Option<EditorButton> {
        self.map.remove(key)
    }

    /// Resolve a key name. Single letters match case-insensitively.
    pub fn button_for(&self, key: &str) -> Option<EditorButton> {
        if let Some(b) = self.map.get(key) {
            return Some(*b);
        }
        let mut chars = key.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_alphabetic() => {
                let flipped = if c.is_ascii_uppercase() {
                    c.to_ascii_lowercase()
                } else {
                    c.to_ascii_uppercase()
                };
                self.map.get(flipped.to_string().as_str()).copied()
            }
            _ => None,
        }
    }

    /// Iterate `(key, button)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, EditorButton)> {
        self.map.iter().map(|(k, b)| (k.as_str(), *b))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/controller/keys.rs"]
mod tests;
