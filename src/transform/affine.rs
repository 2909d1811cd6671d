//! Conversions between the decomposed [`Transform`] and a combined 2D affine.
//!
//! Browser-side manipulation libraries emit a combined `matrix(a, b, c, d, e, f)`; the editor
//! normalizes that into the decomposed model immediately so only one representation is stored.

use crate::foundation::core::{Affine, Vec2};
use crate::foundation::error::{EditorError, EditorResult};
use crate::transform::model::{ScaleBounds, Transform};

/// Compose `translate · rotate · scale` into one affine `[[a c e] [b d f]]`.
pub fn compose(t: &Transform) -> Affine {
    Affine::translate(t.translate())
        * Affine::rotate(t.rotate_rad())
        * Affine::scale_non_uniform(t.scale_x, t.scale_y)
}

/// Recover decomposed fields from an affine.
///
/// Exact for `translate · rotate · scale` with positive scales; shear is discarded.
pub fn decompose(m: Affine) -> Transform {
    let [a, b, c, d, e, f] = m.as_coeffs();
    Transform {
        translate_x: e,
        translate_y: f,
        scale_x: a.hypot(b),
        scale_y: c.hypot(d),
        rotate_deg: b.atan2(a).to_degrees(),
    }
}

/// Decompose and clamp the scale axes, ready to store as the canonical model.
pub fn normalize(m: Affine, bounds: &ScaleBounds) -> EditorResult<Transform> {
    if !m.is_finite() {
        return Err(EditorError::validation("affine matrix must be finite"));
    }
    Ok(decompose(m).clamped(bounds))
}

/// Parse a CSS `matrix(a, b, c, d, e, f)` value. `none` is the identity.
pub fn parse_css_matrix(s: &str) -> EditorResult<Affine> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("none") {
        return Ok(Affine::IDENTITY);
    }
    let inner = s
        .strip_prefix("matrix(")
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| EditorError::validation(format!("expected matrix(...), got '{s}'")))?;

    let mut coeffs = [0.0f64; 6];
    let mut n = 0usize;
    for part in inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
    {
        if n == 6 {
            return Err(EditorError::validation("matrix() takes exactly 6 values"));
        }
        let part = part.strip_suffix("px").unwrap_or(part);
        coeffs[n] = part
            .parse::<f64>()
            .map_err(|e| EditorError::validation(format!("invalid matrix value '{part}': {e}")))?;
        n += 1;
    }
    if n != 6 {
        return Err(EditorError::validation("matrix() takes exactly 6 values"));
    }
    let m = Affine::new(coeffs);
    if !m.is_finite() {
        return Err(EditorError::validation("matrix() values must be finite"));
    }
    Ok(m)
}

/// Format an affine as a CSS `matrix(...)` value.
pub fn format_css_matrix(m: Affine) -> String {
    let [a, b, c, d, e, f] = m.as_coeffs();
    format!("matrix({a}, {b}, {c}, {d}, {e}, {f})")
}

impl Transform {
    /// See [`compose`].
    pub fn to_affine(&self) -> Affine {
        compose(self)
    }

    /// See [`decompose`].
    pub fn from_affine(m: Affine) -> Self {
        decompose(m)
    }

    /// Affine placing an overlay of `size` (display px) with its center at the transform origin.
    ///
    /// `center` is the container-space point the translation is measured from.
    pub fn overlay_affine(&self, center: Vec2, size: Vec2) -> Affine {
        Affine::translate(center) * compose(self) * Affine::translate(size * -0.5)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
