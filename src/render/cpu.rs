//! CPU compositor: draws the background at native resolution and the transformed overlay on top.

use std::sync::Arc;

use crate::assets::decode::PreparedImage;
use crate::assets::loader::LoadedPair;
use crate::foundation::core::{Affine, DisplaySize, PixelSize, Point, Rect, Vec2};
use crate::foundation::error::{EditorError, EditorResult};
use crate::geometry::fit::{DisplayGeometry, FitPolicy};
use crate::transform::model::Transform;

/// Options for the CPU compositor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompositorOpts {
    /// On-screen width of the overlay at scale 1; height follows the overlay's aspect ratio.
    pub overlay_display_width: f64,
    /// How the background is fitted into the container.
    pub fit: FitPolicy,
    /// Straight-alpha color painted under everything; uncovered pixels stay transparent without it.
    pub clear_rgba: Option<[u8; 4]>,
}

impl Default for CompositorOpts {
    fn default() -> Self {
        Self {
            overlay_display_width: 200.0,
            fit: FitPolicy::Contain,
            clear_rgba: None,
        }
    }
}

/// Flattened raster output.
#[derive(Clone, Debug)]
pub struct CompositeImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8, row-major, tightly packed.
    pub rgba8_premul: Vec<u8>,
}

impl CompositeImage {
    /// Premultiplied pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.rgba8_premul.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Where and how the overlay lands on the output surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayPlacement {
    /// Overlay center in output pixels.
    pub center: Point,
    /// Overlay size on screen at scale 1.
    pub display_size: Vec2,
    /// Overlay size on the output surface before rotation.
    pub drawn_size: Vec2,
    /// Maps overlay native pixel coordinates onto the output surface.
    pub affine: Affine,
    /// Native overlay dimensions.
    pub native: PixelSize,
}

impl OverlayPlacement {
    /// Axis-aligned bounds of the (possibly rotated) overlay on the output surface.
    pub fn bounds(&self) -> Rect {
        let w = f64::from(self.native.width);
        let h = f64::from(self.native.height);
        let corners = [
            self.affine * Point::new(0.0, 0.0),
            self.affine * Point::new(w, 0.0),
            self.affine * Point::new(0.0, h),
            self.affine * Point::new(w, h),
        ];
        let mut r = Rect::from_points(corners[0], corners[1]);
        for c in &corners[2..] {
            r = r.union_pt(*c);
        }
        r
    }
}

/// Display size of an overlay shown `display_width` wide with its native aspect ratio.
pub fn overlay_display_size(native: PixelSize, display_width: f64) -> Vec2 {
    Vec2::new(display_width, display_width / native.aspect())
}

/// Placement math for the overlay, separated from rasterization.
///
/// Center: container center plus translation, mapped to native pixels. Then rotate, scale by
/// `scale · scale_factor`, and draw centered at display size.
pub fn overlay_placement(
    t: &Transform,
    geometry: &DisplayGeometry,
    overlay: PixelSize,
    overlay_display_width: f64,
) -> OverlayPlacement {
    let sf = geometry.scale_factor;
    let center = geometry.overlay_center_native(t);
    let display_size = overlay_display_size(overlay, overlay_display_width);
    let native_to_display = Affine::scale_non_uniform(
        display_size.x / f64::from(overlay.width),
        display_size.y / f64::from(overlay.height),
    );
    let affine = Affine::translate(center.to_vec2())
        * Affine::rotate(t.rotate_rad())
        * Affine::scale_non_uniform(t.scale_x * sf, t.scale_y * sf)
        * Affine::translate(display_size * -0.5)
        * native_to_display;
    OverlayPlacement {
        center,
        display_size,
        drawn_size: Vec2::new(
            display_size.x * t.scale_x * sf,
            display_size.y * t.scale_y * sf,
        ),
        affine,
        native: overlay,
    }
}

/// Offscreen CPU compositor powered by `vello_cpu`. Reuses its render context across calls.
pub struct Compositor {
    opts: CompositorOpts,
    ctx: Option<vello_cpu::RenderContext>,
}

impl Compositor {
    /// Create a compositor.
    pub fn new(opts: CompositorOpts) -> Self {
        Self { opts, ctx: None }
    }

    /// Options in effect.
    pub fn opts(&self) -> CompositorOpts {
        self.opts
    }

    /// Render the composite at the background's native resolution.
    #[tracing::instrument(skip_all, fields(bg_w = pair.background.width, bg_h = pair.background.height))]
    pub fn composite(
        &mut self,
        pair: &LoadedPair,
        t: &Transform,
        container: DisplaySize,
    ) -> EditorResult<CompositeImage> {
        let bg_size = pair.background.size()?;
        let geometry = DisplayGeometry::fit(container, bg_size, self.opts.fit)?;
        let placement = overlay_placement(
            t,
            &geometry,
            pair.overlay.size()?,
            self.opts.overlay_display_width,
        );
        tracing::debug!(
            scale_factor = geometry.scale_factor,
            center_x = placement.center.x,
            center_y = placement.center.y,
            "compositing overlay"
        );
        self.draw(
            bg_size,
            &pair.background,
            Affine::IDENTITY,
            &pair.overlay,
            placement.affine,
        )
    }

    /// Render what the editor shows on screen: the fitted background and overlay at container
    /// resolution. This is the visual projection of the current transform.
    pub fn render_preview(
        &mut self,
        pair: &LoadedPair,
        t: &Transform,
        container: DisplaySize,
    ) -> EditorResult<CompositeImage> {
        let geometry = DisplayGeometry::fit(container, pair.background.size()?, self.opts.fit)?;
        let placement = overlay_placement(
            t,
            &geometry,
            pair.overlay.size()?,
            self.opts.overlay_display_width,
        );
        let native_to_display = Affine::translate(geometry.offset())
            * Affine::scale(1.0 / geometry.scale_factor);
        let out = PixelSize::new(
            container.width.ceil() as u32,
            container.height.ceil() as u32,
        )?;
        self.draw(
            out,
            &pair.background,
            native_to_display,
            &pair.overlay,
            native_to_display * placement.affine,
        )
    }

    fn draw(
        &mut self,
        out: PixelSize,
        background: &PreparedImage,
        background_affine: Affine,
        overlay: &PreparedImage,
        overlay_affine: Affine,
    ) -> EditorResult<CompositeImage> {
        let w: u16 = out
            .width
            .try_into()
            .map_err(|_| EditorError::render("output width exceeds u16"))?;
        let h: u16 = out
            .height
            .try_into()
            .map_err(|_| EditorError::render("output height exceeds u16"))?;

        let bg_paint = image_paint(background)?;
        let fg_paint = image_paint(overlay)?;

        let mut pixmap = vello_cpu::Pixmap::new(w, h);

        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == w && ctx.height() == h => ctx,
            _ => vello_cpu::RenderContext::new(w, h),
        };
        ctx.reset();
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        if let Some([r, g, b, a]) = self.opts.clear_rgba {
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(w),
                f64::from(h),
            ));
        }

        ctx.set_transform(affine_to_cpu(background_affine));
        ctx.set_paint(bg_paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(background.width),
            f64::from(background.height),
        ));

        ctx.set_transform(affine_to_cpu(overlay_affine));
        ctx.set_paint(fg_paint);
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(overlay.width),
            f64::from(overlay.height),
        ));

        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);

        Ok(CompositeImage {
            width: out.width,
            height: out.height,
            rgba8_premul: pixmap.data_as_u8_slice().to_vec(),
        })
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(CompositorOpts::default())
    }
}

fn image_paint(img: &PreparedImage) -> EditorResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(&img.rgba8_premul, img.width, img.height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> EditorResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| EditorError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| EditorError::render("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(EditorError::render("pixmap byte len mismatch"));
    }
    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in bytes.chunks_exact(4) {
        may_have_opacities |= px[3] != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a: px[3],
        });
    }
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
