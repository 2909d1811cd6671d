//! Mapping between the editor container (display space) and the background's native pixels.
//!
//! The background is shown scaled into a fixed-aspect container while the composite is produced
//! at native resolution. All display-to-native conversions go through [`to_native_pixels`].

use crate::foundation::core::{DisplaySize, PixelSize, Point, Vec2};
use crate::foundation::error::{EditorError, EditorResult};
use crate::transform::model::Transform;

/// How the background is scaled into its container.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitPolicy {
    /// Whole image visible, letterboxed or pillarboxed.
    #[default]
    Contain,
    /// Container fully covered, overflow cropped (offsets go negative).
    Cover,
}

/// Where the background lands inside the container, in display pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayGeometry {
    /// Container the geometry was measured against.
    pub container: DisplaySize,
    /// Displayed background width.
    pub displayed_width: f64,
    /// Displayed background height.
    pub displayed_height: f64,
    /// Left edge of the displayed background relative to the container.
    pub offset_x: f64,
    /// Top edge of the displayed background relative to the container.
    pub offset_y: f64,
    /// Native pixels per display pixel (uniform on both axes).
    pub scale_factor: f64,
}

impl DisplayGeometry {
    /// Fit a `native`-sized background into `container` under `policy`.
    ///
    /// An unmeasured container is a geometry error; callers defer instead of dividing by zero.
    pub fn fit(container: DisplaySize, native: PixelSize, policy: FitPolicy) -> EditorResult<Self> {
        if !container.is_measured() {
            return Err(EditorError::geometry(format!(
                "container is not measured ({}x{})",
                container.width, container.height
            )));
        }
        if native.width == 0 || native.height == 0 {
            return Err(EditorError::geometry("background image has zero size"));
        }

        let nw = f64::from(native.width);
        let nh = f64::from(native.height);
        // Cross-multiplied aspect comparison keeps exact inputs exact.
        let image_is_wider = nw * container.height > container.width * nh;
        let width_constrained = match policy {
            FitPolicy::Contain => image_is_wider,
            FitPolicy::Cover => !image_is_wider,
        };

        let (displayed_width, displayed_height) = if width_constrained {
            (container.width, container.width * nh / nw)
        } else {
            (container.height * nw / nh, container.height)
        };

        Ok(Self {
            container,
            displayed_width,
            displayed_height,
            offset_x: (container.width - displayed_width) * 0.5,
            offset_y: (container.height - displayed_height) * 0.5,
            scale_factor: nw / displayed_width,
        })
    }

    /// Display offset of the background's top-left corner.
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.offset_x, self.offset_y)
    }

    /// Map a container-space point (top-left origin) into native background pixels.
    pub fn to_native(&self, p: Point) -> Point {
        Point::new(
            to_native_pixels(p.x, self.scale_factor, self.offset_x),
            to_native_pixels(p.y, self.scale_factor, self.offset_y),
        )
    }

    /// Inverse of [`DisplayGeometry::to_native`].
    pub fn to_display(&self, p: Point) -> Point {
        Point::new(
            p.x / self.scale_factor + self.offset_x,
            p.y / self.scale_factor + self.offset_y,
        )
    }

    /// Overlay center in native pixels for a transform measured from the container center.
    pub fn overlay_center_native(&self, t: &Transform) -> Point {
        self.to_native(self.container.center() + t.translate())
    }
}

/// Convert one display-space coordinate into native pixels.
pub fn to_native_pixels(display_value: f64, scale_factor: f64, offset: f64) -> f64 {
    (display_value - offset) * scale_factor
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/fit.rs"]
mod tests;
