//! Pointer gesture math. Points are display pixels measured from the container center, the
//! same space as [`Transform`] translation.

use crate::foundation::core::{Point, Vec2};
use crate::transform::model::{ScaleBounds, Transform};

/// Corner resize handle of the overlay box (in the overlay's unrotated frame).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handle {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner.
    BottomRight,
}

impl Handle {
    /// All corner handles.
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomLeft,
        Self::BottomRight,
    ];

    /// Unit direction from the box center towards this corner.
    pub fn sign(self) -> Vec2 {
        match self {
            Self::TopLeft => Vec2::new(-1.0, -1.0),
            Self::TopRight => Vec2::new(1.0, -1.0),
            Self::BottomLeft => Vec2::new(-1.0, 1.0),
            Self::BottomRight => Vec2::new(1.0, 1.0),
        }
    }
}

/// What a pointer-down landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HitTarget {
    /// Overlay body: drag to move.
    Body,
    /// Corner handle: drag to resize (aspect locked).
    Resize(Handle),
    /// Rotation handle above the top edge: drag to rotate.
    Rotate,
}

/// Pick radius around handles, in display pixels.
pub const HANDLE_RADIUS: f64 = 10.0;
/// Distance of the rotation handle above the overlay's top edge.
pub const ROTATE_HANDLE_OFFSET: f64 = 30.0;

/// Overlay box half extents at the transform's scale.
pub(crate) fn half_extents(t: &Transform, base: Vec2) -> Vec2 {
    Vec2::new(base.x * t.scale_x * 0.5, base.y * t.scale_y * 0.5)
}

/// Rotate `v` by `rad` (clockwise on screen, y down).
fn rotate_vec(v: Vec2, rad: f64) -> Vec2 {
    let (sin, cos) = rad.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Corner position of `handle` in centered display space.
pub fn handle_position(t: &Transform, base: Vec2, handle: Handle) -> Point {
    let h = half_extents(t, base);
    let s = handle.sign();
    let local = Vec2::new(s.x * h.x, s.y * h.y);
    (t.translate() + rotate_vec(local, t.rotate_rad())).to_point()
}

/// Rotation handle position in centered display space.
pub fn rotate_handle_position(t: &Transform, base: Vec2) -> Point {
    let h = half_extents(t, base);
    let local = Vec2::new(0.0, -(h.y + ROTATE_HANDLE_OFFSET));
    (t.translate() + rotate_vec(local, t.rotate_rad())).to_point()
}

/// Classify a pointer-down. Handles take priority over the body.
pub fn hit_test(t: &Transform, base: Vec2, p: Point) -> Option<HitTarget> {
    if (p - rotate_handle_position(t, base)).hypot() <= HANDLE_RADIUS {
        return Some(HitTarget::Rotate);
    }
    for handle in Handle::ALL {
        if (p - handle_position(t, base, handle)).hypot() <= HANDLE_RADIUS {
            return Some(HitTarget::Resize(handle));
        }
    }
    let local = rotate_vec(p.to_vec2() - t.translate(), -t.rotate_rad());
    let h = half_extents(t, base);
    if local.x.abs() <= h.x && local.y.abs() <= h.y {
        return Some(HitTarget::Body);
    }
    None
}

/// In-flight pointer gesture, captured at pointer-down.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Gesture {
    Drag {
        start_pointer: Point,
        start: Transform,
    },
    Resize {
        handle: Handle,
        start_pointer: Point,
        start: Transform,
        anchor: Point,
        start_corner: Point,
    },
    Rotate {
        last_angle: f64,
        accumulated_deg: f64,
        start: Transform,
    },
}

impl Gesture {
    pub(crate) fn begin(target: HitTarget, t: &Transform, base: Vec2, p: Point) -> Self {
        match target {
            HitTarget::Body => Self::Drag {
                start_pointer: p,
                start: *t,
            },
            HitTarget::Resize(handle) => {
                let opposite = match handle {
                    Handle::TopLeft => Handle::BottomRight,
                    Handle::TopRight => Handle::BottomLeft,
                    Handle::BottomLeft => Handle::TopRight,
                    Handle::BottomRight => Handle::TopLeft,
                };
                Self::Resize {
                    handle,
                    start_pointer: p,
                    start: *t,
                    anchor: handle_position(t, base, opposite),
                    start_corner: handle_position(t, base, handle),
                }
            }
            HitTarget::Rotate => Self::Rotate {
                last_angle: pointer_angle(t, p),
                accumulated_deg: 0.0,
                start: *t,
            },
        }
    }

    /// Advance the gesture to pointer `p`, returning the transform for this frame.
    pub(crate) fn update(&mut self, p: Point, base: Vec2, bounds: &ScaleBounds) -> Transform {
        match self {
            Self::Drag {
                start_pointer,
                start,
            } => {
                let mut t = *start;
                t.translate_by(p - *start_pointer);
                t
            }
            Self::Resize {
                handle,
                start_pointer,
                start,
                anchor,
                start_corner,
            } => resize(
                start,
                *handle,
                *anchor,
                *start_corner + (p - *start_pointer),
                base,
                bounds,
            ),
            Self::Rotate {
                last_angle,
                accumulated_deg,
                start,
            } => {
                let center = start.translate().to_point();
                if (p - center).hypot() < f64::EPSILON {
                    let mut t = *start;
                    t.rotate_by(*accumulated_deg);
                    return t;
                }
                let angle = pointer_angle(start, p);
                *accumulated_deg += wrap_degrees(angle - *last_angle);
                *last_angle = angle;
                let mut t = *start;
                t.rotate_by(*accumulated_deg);
                t
            }
        }
    }
}

/// Aspect-locked resize keeping the opposite corner fixed.
fn resize(
    start: &Transform,
    handle: Handle,
    anchor: Point,
    corner: Point,
    base: Vec2,
    bounds: &ScaleBounds,
) -> Transform {
    let start_diag = handle_position(start, base, handle) - anchor;
    let len2 = start_diag.hypot2();
    if len2 <= f64::EPSILON {
        return *start;
    }
    let mut ratio = (corner - anchor).dot(start_diag) / len2;

    // Keep both axes inside the bounds with a single shared ratio.
    let lo = (bounds.min / start.scale_x).max(bounds.min / start.scale_y);
    let hi = (bounds.max / start.scale_x).min(bounds.max / start.scale_y);
    if lo <= hi {
        ratio = ratio.clamp(lo, hi);
    }

    let mut t = *start;
    t.set_scale(start.scale_x * ratio, start.scale_y * ratio, bounds);

    let h = half_extents(&t, base);
    let s = handle.sign();
    let anchor_to_center = rotate_vec(Vec2::new(s.x * h.x, s.y * h.y), t.rotate_rad());
    t.set_translate(anchor.to_vec2() + anchor_to_center);
    t
}

/// Angle of `p` around the overlay center, in degrees.
fn pointer_angle(t: &Transform, p: Point) -> f64 {
    let d = p - t.translate().to_point();
    d.y.atan2(d.x).to_degrees()
}

/// Map an angle difference into `(-180, 180]`.
fn wrap_degrees(d: f64) -> f64 {
    let r = d.rem_euclid(360.0);
    if r > 180.0 { r - 360.0 } else { r }
}

#[cfg(test)]
#[path = "../../tests/unit/controller/gesture.rs"]
mod tests;
