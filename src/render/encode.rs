use std::io::Cursor;
use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{EditorError, EditorResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::render::cpu::CompositeImage;

/// Encoded composite handed to the save callback.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompositeBlob {
    /// PNG bytes.
    pub bytes: Vec<u8>,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Suggested download name.
    pub file_name: String,
}

/// `mini-me-<job id>.png`, or `mini-me-customized.png` without a job.
pub fn suggested_file_name(job_id: Option<&str>) -> String {
    match job_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) => format!("mini-me-{id}.png"),
        None => "mini-me-customized.png".to_owned(),
    }
}

fn straight_rgba8(img: &CompositeImage) -> EditorResult<Vec<u8>> {
    let expected = (img.width as usize) * (img.height as usize) * 4;
    if img.rgba8_premul.len() != expected {
        return Err(EditorError::render(format!(
            "composite has {} bytes, expected {expected}",
            img.rgba8_premul.len()
        )));
    }
    let mut straight = img.rgba8_premul.clone();
    unpremultiply_rgba8_in_place(&mut straight);
    Ok(straight)
}

/// Encode a composite as straight-alpha RGBA PNG.
pub fn encode_png(img: &CompositeImage) -> EditorResult<Vec<u8>> {
    let straight = straight_rgba8(img)?;
    let mut out = Vec::new();
    image::write_buffer_with_format(
        &mut Cursor::new(&mut out),
        &straight,
        img.width,
        img.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .context("encode png")?;
    Ok(out)
}

/// Encode and wrap with a file name.
pub fn to_blob(img: &CompositeImage, job_id: Option<&str>) -> EditorResult<CompositeBlob> {
    Ok(CompositeBlob {
        bytes: encode_png(img)?,
        width: img.width,
        height: img.height,
        file_name: suggested_file_name(job_id),
    })
}

/// Write a composite to disk as PNG.
pub fn write_png(img: &CompositeImage, path: &Path) -> EditorResult<()> {
    let straight = straight_rgba8(img)?;
    image::save_buffer_with_format(
        path,
        &straight,
        img.width,
        img.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/encode.rs"]
mod tests;
