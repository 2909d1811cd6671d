//! Upload preparation: the checks and downscaling applied to a photo before it is submitted
//! for generation.

use std::io::Cursor;

use anyhow::Context;

use crate::foundation::error::{EditorError, EditorResult};

/// Largest original file accepted before compression.
pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Compression knobs.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CompressionOpts {
    /// Maximum output width in pixels.
    pub max_width: u32,
    /// Maximum output height in pixels.
    pub max_height: u32,
    /// JPEG inputs at or below this size pass through untouched.
    pub max_size_mb: f64,
    /// JPEG quality, 1..=100.
    pub quality: u8,
}

impl Default for CompressionOpts {
    fn default() -> Self {
        Self {
            max_width: 2048,
            max_height: 2048,
            max_size_mb: 5.0,
            quality: 85,
        }
    }
}

/// Result of [`compress_upload`].
#[derive(Clone, Debug)]
pub struct CompressedUpload {
    /// JPEG bytes (or the untouched input when it already qualified).
    pub bytes: Vec<u8>,
    /// Output width.
    pub width: u32,
    /// Output height.
    pub height: u32,
    /// `true` when the input was returned unchanged.
    pub passthrough: bool,
}

/// Accept JPEG, PNG and WebP up to [`MAX_UPLOAD_BYTES`]; returns the sniffed format.
pub fn validate_upload(bytes: &[u8]) -> EditorResult<image::ImageFormat> {
    let format = image::guess_format(bytes).map_err(|_| {
        EditorError::validation("Invalid file type. Please upload JPG, PNG, or WebP images.")
    })?;
    if !matches!(
        format,
        image::ImageFormat::Jpeg | image::ImageFormat::Png | image::ImageFormat::WebP
    ) {
        return Err(EditorError::validation(
            "Invalid file type. Please upload JPG, PNG, or WebP images.",
        ));
    }
    if bytes.len() > MAX_UPLOAD_BYTES {
        let mb = bytes.len() as f64 / 1024.0 / 1024.0;
        return Err(EditorError::validation(format!(
            "File too large ({mb:.1}MB). Maximum size is {}MB.",
            MAX_UPLOAD_BYTES / 1024 / 1024
        )));
    }
    Ok(format)
}

/// Dimensions after fitting `(w, h)` inside `(max_w, max_h)`; never upscales.
pub fn fit_within(w: u32, h: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if w <= max_w && h <= max_h {
        return (w, h);
    }
    let ratio = (f64::from(max_w) / f64::from(w)).min(f64::from(max_h) / f64::from(h));
    let nw = (f64::from(w) * ratio).floor().max(1.0) as u32;
    let nh = (f64::from(h) * ratio).floor().max(1.0) as u32;
    (nw, nh)
}

/// Downscale to fit and re-encode as JPEG.
#[tracing::instrument(skip(bytes), fields(len = bytes.len()))]
pub fn compress_upload(bytes: &[u8], opts: CompressionOpts) -> EditorResult<CompressedUpload> {
    if opts.max_width == 0 || opts.max_height == 0 {
        return Err(EditorError::validation("compression max dimensions must be > 0"));
    }
    if !(1..=100).contains(&opts.quality) {
        return Err(EditorError::validation("jpeg quality must be in 1..=100"));
    }
    let format = validate_upload(bytes)?;
    let img = image::load_from_memory_with_format(bytes, format).context("decode upload")?;

    let size_mb = bytes.len() as f64 / 1024.0 / 1024.0;
    if size_mb <= opts.max_size_mb && format == image::ImageFormat::Jpeg {
        return Ok(CompressedUpload {
            bytes: bytes.to_vec(),
            width: img.width(),
            height: img.height(),
            passthrough: true,
        });
    }

    let (w, h) = fit_within(img.width(), img.height(), opts.max_width, opts.max_height);
    let resized = if (w, h) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(w, h, image::imageops::FilterType::Triangle)
    };
    // JPEG has no alpha channel.
    let rgb = resized.to_rgb8();

    let mut out = Vec::new();
    let encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut out), opts.quality);
    rgb.write_with_encoder(encoder).context("encode jpeg")?;

    tracing::info!(
        before_mb = size_mb,
        after_mb = out.len() as f64 / 1024.0 / 1024.0,
        width = w,
        height = h,
        "upload compressed"
    );
    Ok(CompressedUpload {
        bytes: out,
        width: w,
        height: h,
        passthrough: false,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/assets/compress.rs"]
mod tests;
