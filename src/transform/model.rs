use crate::foundation::core::Vec2;
use crate::foundation::error::{EditorError, EditorResult};

/// Inclusive range the overlay scale factors are clamped into.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScaleBounds {
    /// Smallest allowed scale factor.
    pub min: f64,
    /// Largest allowed scale factor.
    pub max: f64,
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self { min: 0.1, max: 2.0 }
    }
}

impl ScaleBounds {
    /// Create validated bounds with `0 < min <= max`.
    pub fn new(min: f64, max: f64) -> EditorResult<Self> {
        let b = Self { min, max };
        b.validate()?;
        Ok(b)
    }

    /// Check `0 < min <= max` with finite values.
    pub fn validate(&self) -> EditorResult<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(EditorError::validation("scale bounds must be finite"));
        }
        if self.min <= 0.0 {
            return Err(EditorError::validation("scale bounds min must be > 0"));
        }
        if self.min > self.max {
            return Err(EditorError::validation("scale bounds min must be <= max"));
        }
        Ok(())
    }

    /// Clamp a scale factor. Non-finite input collapses to `min`.
    pub fn clamp(&self, v: f64) -> f64 {
        if v.is_nan() {
            return self.min;
        }
        v.clamp(self.min, self.max)
    }

    /// Return `true` when `v` lies inside the bounds.
    pub fn contains(&self, v: f64) -> bool {
        self.min <= v && v <= self.max
    }
}

/// Placement of the overlay relative to the editor container.
///
/// Translation is measured in display pixels from the container center to the overlay center.
/// Scale multiplies the overlay's display size; rotation is about the overlay's own center.
/// This is the single source of truth read by the compositor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Transform {
    /// Horizontal offset of the overlay center from the container center.
    pub translate_x: f64,
    /// Vertical offset of the overlay center from the container center.
    pub translate_y: f64,
    /// Horizontal scale factor.
    pub scale_x: f64,
    /// Vertical scale factor.
    pub scale_y: f64,
    /// Clockwise rotation in degrees (y axis points down).
    #[serde(alias = "rotate")]
    pub rotate_deg: f64,
}

impl Default for Transform {
    /// Centered, at the initial avatar scale, unrotated.
    fn default() -> Self {
        Self {
            translate_x: 0.0,
            translate_y: 0.0,
            scale_x: Self::INITIAL_SCALE,
            scale_y: Self::INITIAL_SCALE,
            rotate_deg: 0.0,
        }
    }
}

impl Transform {
    /// Scale the editor mounts the overlay at.
    pub const INITIAL_SCALE: f64 = 0.3;

    /// Centered, unscaled, unrotated.
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        rotate_deg: 0.0,
    };

    /// Construct from decomposed fields, unclamped.
    pub fn new(translate: Vec2, scale_x: f64, scale_y: f64, rotate_deg: f64) -> Self {
        Self {
            translate_x: translate.x,
            translate_y: translate.y,
            scale_x,
            scale_y,
            rotate_deg,
        }
    }

    /// Translation as a vector.
    pub fn translate(&self) -> Vec2 {
        Vec2::new(self.translate_x, self.translate_y)
    }

    /// Rotation in radians.
    pub fn rotate_rad(&self) -> f64 {
        self.rotate_deg.to_radians()
    }

    /// Move by a display-pixel delta. Position is never clamped.
    pub fn translate_by(&mut self, delta: Vec2) {
        if !delta.is_finite() {
            return;
        }
        self.translate_x += delta.x;
        self.translate_y += delta.y;
    }

    /// Place the overlay center at an absolute offset from the container center.
    pub fn set_translate(&mut self, t: Vec2) {
        if !t.is_finite() {
            return;
        }
        self.translate_x = t.x;
        self.translate_y = t.y;
    }

    /// Add `delta` to both scale axes, then clamp.
    pub fn scale_by(&mut self, delta: f64, bounds: &ScaleBounds) {
        if !delta.is_finite() {
            return;
        }
        self.scale_x = bounds.clamp(self.scale_x + delta);
        self.scale_y = bounds.clamp(self.scale_y + delta);
    }

    /// Set both axes to the same clamped factor.
    pub fn set_uniform_scale(&mut self, s: f64, bounds: &ScaleBounds) {
        self.set_scale(s, s, bounds);
    }

    /// Set each axis independently, clamped.
    pub fn set_scale(&mut self, sx: f64, sy: f64, bounds: &ScaleBounds) {
        if !sx.is_finite() || !sy.is_finite() {
            return;
        }
        self.scale_x = bounds.clamp(sx);
        self.scale_y = bounds.clamp(sy);
    }

    /// Rotate by `deg` degrees (positive is clockwise on screen).
    pub fn rotate_by(&mut self, deg: f64) {
        if !deg.is_finite() {
            return;
        }
        self.rotate_deg += deg;
    }

    /// Set the absolute rotation in degrees.
    pub fn set_rotation(&mut self, deg: f64) {
        if !deg.is_finite() {
            return;
        }
        self.rotate_deg = deg;
    }

    /// Copy with both scale axes clamped into `bounds`.
    pub fn clamped(mut self, bounds: &ScaleBounds) -> Self {
        self.scale_x = bounds.clamp(self.scale_x);
        self.scale_y = bounds.clamp(self.scale_y);
        self
    }

    /// Return `true` when every field is finite.
    pub fn is_finite(&self) -> bool {
        self.translate_x.is_finite()
            && self.translate_y.is_finite()
            && self.scale_x.is_finite()
            && self.scale_y.is_finite()
            && self.rotate_deg.is_finite()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/model.rs"]
mod tests;
