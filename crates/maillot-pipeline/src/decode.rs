//! Image decoding to RGBA.
//!
//! Accepts raw image bytes (PNG, JPEG, GIF, WebP) and produces an
//! RGBA image for the rest of the pipeline. Every downstream stage
//! relies on the alpha channel being present, so images without one
//! are promoted here with alpha = 255.
//!
//! This is the first step in the pipeline: raw bytes in, `RgbaImage` out.

use crate::types::{RgbaImage, TemplateError};

/// Decode raw image bytes into an RGBA image.
///
/// Supports PNG, JPEG, GIF, and WebP (whatever the `image` crate can
/// decode with the enabled features). Sources lacking an alpha channel
/// gain one with every pixel fully opaque.
///
/// # Errors
///
/// Returns [`TemplateError::EmptyInput`] if `bytes` is empty.
/// Returns [`TemplateError::ImageDecode`] if the image format is
/// unrecognized or the data is corrupt.
pub fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, TemplateError> {
    if bytes.is_empty() {
        return Err(TemplateError::EmptyInput);
    }

    let img = image::load_from_memory(bytes)?;
    Ok(img.to_rgba8())
}
