use std::collections::{BTreeMap, BTreeSet};

use crate::controller::gesture::{Gesture, HitTarget, hit_test};
use crate::controller::keys::{EditorButton, KeyBindings};
use crate::foundation::core::{Affine, DisplaySize, Point, Vec2};
use crate::foundation::error::{EditorError, EditorResult};
use crate::transform::affine::{normalize, parse_css_matrix};
use crate::transform::model::{ScaleBounds, Transform};

/// Increments applied by one discrete key or button press.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StepConfig {
    /// Translation per directional step, in display pixels.
    pub translate_px: f64,
    /// Scale delta per scale step.
    pub scale: f64,
    /// Rotation per rotate step, in degrees.
    pub rotate_deg: f64,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            translate_px: 5.0,
            scale: 0.05,
            rotate_deg: 5.0,
        }
    }
}

impl StepConfig {
    /// Steps must be finite and positive.
    pub fn validate(&self) -> EditorResult<()> {
        for (name, v) in [
            ("translate_px", self.translate_px),
            ("scale", self.scale),
            ("rotate_deg", self.rotate_deg),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(EditorError::validation(format!(
                    "step {name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}

/// Direct-manipulation state for the overlay.
///
/// Pointer gestures and discrete steps both write the same [`Transform`]; there is no separate
/// commit step, so [`ManipulationController::transform`] is valid after every event.
/// Pointer positions are display pixels relative to the container center (see [`centered`]).
#[derive(Clone, Debug)]
pub struct ManipulationController {
    transform: Transform,
    initial: Transform,
    bounds: ScaleBounds,
    steps: StepConfig,
    keys: KeyBindings,
    overlay_size: Vec2,
    gesture: Option<Gesture>,
    pressed: BTreeSet<EditorButton>,
    held_keys: BTreeMap<String, EditorButton>,
    revision: u64,
}

impl ManipulationController {
    /// Create a controller positioned at `initial` (clamped).
    ///
    /// `overlay_size` is the overlay's display size at scale 1.
    pub fn new(
        initial: Transform,
        overlay_size: Vec2,
        bounds: ScaleBounds,
        steps: StepConfig,
        keys: KeyBindings,
    ) -> Self {
        let initial = initial.clamped(&bounds);
        Self {
            transform: initial,
            initial,
            bounds,
            steps,
            keys,
            overlay_size,
            gesture: None,
            pressed: BTreeSet::new(),
            held_keys: BTreeMap::new(),
            revision: 0,
        }
    }

    /// Current transform (the single source of truth).
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Scale bounds in effect.
    pub fn bounds(&self) -> ScaleBounds {
        self.bounds
    }

    /// Overlay display size at scale 1.
    pub fn overlay_size(&self) -> Vec2 {
        self.overlay_size
    }

    /// Update the overlay display size, e.g. once the overlay's aspect ratio is known.
    pub fn set_overlay_size(&mut self, size: Vec2) {
        if size.is_finite() && size.x > 0.0 && size.y > 0.0 {
            self.overlay_size = size;
        }
    }

    /// Incremented on every change to the transform; renderers redraw when it moves.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Logical buttons currently held, for visual feedback only.
    ///
    /// A button stays pressed while any key bound to it is down or it was pressed directly.
    pub fn pressed(&self) -> impl Iterator<Item = EditorButton> + '_ {
        self.pressed
            .iter()
            .chain(self.held_keys.values())
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
    }

    /// Return `true` when `button` is currently held.
    pub fn is_pressed(&self, button: EditorButton) -> bool {
        self.pressed.contains(&button) || self.held_keys.values().any(|b| *b == button)
    }

    /// Return `true` while a pointer gesture is in flight.
    pub fn is_gesturing(&self) -> bool {
        self.gesture.is_some()
    }

    /// Overlay affine in container space (top-left origin) for drawing a preview.
    pub fn display_affine(&self, container: DisplaySize) -> Affine {
        self.transform
            .overlay_affine(container.center().to_vec2(), self.overlay_size)
    }

    fn commit(&mut self, t: Transform) {
        if t != self.transform {
            self.transform = t;
            self.revision = self.revision.wrapping_add(1);
        }
    }

    /// Hit-test and start a gesture. Returns what was hit, or `None` (no gesture started).
    pub fn pointer_down(&mut self, p: Point) -> Option<HitTarget> {
        let target = hit_test(&self.transform, self.overlay_size, p)?;
        self.begin_gesture(target, p);
        Some(target)
    }

    /// Start a gesture on an explicit target, bypassing hit-testing.
    pub fn begin_gesture(&mut self, target: HitTarget, p: Point) {
        tracing::trace!(?target, x = p.x, y = p.y, "gesture begin");
        self.gesture = Some(Gesture::begin(
            target,
            &self.transform,
            self.overlay_size,
            p,
        ));
    }

    /// Advance the active gesture. Moves without an active gesture are ignored.
    pub fn pointer_move(&mut self, p: Point) -> Option<Transform> {
        if !p.is_finite() {
            return None;
        }
        let size = self.overlay_size;
        let bounds = self.bounds;
        let next = self.gesture.as_mut()?.update(p, size, &bounds);
        self.commit(next);
        Some(self.transform)
    }

    /// End the active gesture. The last move already updated the transform.
    pub fn pointer_up(&mut self) {
        if self.gesture.take().is_some() {
            tracing::trace!("gesture end");
        }
    }

    /// Apply one step for a bound key. Unbound keys return `None` and change nothing.
    ///
    /// Auto-repeat key-downs each apply a step but hold the key only once.
    pub fn key_down(&mut self, key: &str) -> Option<EditorButton> {
        let button = self.keys.button_for(key)?;
        self.held_keys.insert(held_key(key), button);
        self.step(button);
        Some(button)
    }

    /// Release a held key. Its button stays pressed while another key bound to it is down.
    pub fn key_up(&mut self, key: &str) -> Option<EditorButton> {
        self.held_keys
            .remove(&held_key(key))
            .or_else(|| self.keys.button_for(key))
    }

    /// Apply one step for `button` and mark it pressed.
    pub fn press(&mut self, button: EditorButton) {
        self.pressed.insert(button);
        self.step(button);
    }

    /// Clear the pressed state of `button`.
    pub fn release(&mut self, button: EditorButton) {
        self.pressed.remove(&button);
    }

    /// Apply exactly one increment for `button`, without touching the pressed set.
    pub fn step(&mut self, button: EditorButton) {
        let s = self.steps;
        let mut t = self.transform;
        match button {
            EditorButton::Up => t.translate_by(Vec2::new(0.0, -s.translate_px)),
            EditorButton::Down => t.translate_by(Vec2::new(0.0, s.translate_px)),
            EditorButton::Left => t.translate_by(Vec2::new(-s.translate_px, 0.0)),
            EditorButton::Right => t.translate_by(Vec2::new(s.translate_px, 0.0)),
            EditorButton::ScaleUp => t.scale_by(s.scale, &self.bounds),
            EditorButton::ScaleDown => t.scale_by(-s.scale, &self.bounds),
            EditorButton::RotateCw => t.rotate_by(s.rotate_deg),
            EditorButton::RotateCcw => t.rotate_by(-s.rotate_deg),
        }
        self.commit(t);
    }

    /// Normalize an affine emitted by an external manipulation layer into the model.
    pub fn apply_matrix(&mut self, m: Affine) -> EditorResult<Transform> {
        let t = normalize(m, &self.bounds)?;
        self.commit(t);
        Ok(self.transform)
    }

    /// Parse and apply a CSS `matrix(...)` value.
    pub fn apply_css_matrix(&mut self, s: &str) -> EditorResult<Transform> {
        self.apply_matrix(parse_css_matrix(s)?)
    }

    /// Replace the transform (scale clamped).
    pub fn set_transform(&mut self, t: Transform) {
        if t.is_finite() {
            self.commit(t.clamped(&self.bounds));
        }
    }

    /// Return to the initial transform and drop any gesture or pressed state.
    pub fn reset(&mut self) {
        self.gesture = None;
        self.pressed.clear();
        self.held_keys.clear();
        let initial = self.initial;
        self.commit(initial);
    }
}

/// Single letters are held case-insensitively, matching [`KeyBindings::button_for`].
fn held_key(key: &str) -> String {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => c.to_ascii_lowercase().to_string(),
        _ => key.to_owned(),
    }
}

/// Convert a container-local point (top-left origin) into centered display space.
pub fn centered(container: DisplaySize, p: Point) -> Point {
    p - container.center().to_vec2()
}

#[cfg(test)]
#[path = "../../tests/unit/controller/manip.rs"]
mod tests;
