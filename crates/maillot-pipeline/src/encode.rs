//! Canvas encoding.
//!
//! The composed template is handed back to the caller as lossless PNG
//! bytes: alpha-capable, non-lossy, printable as-is.

use image::ImageEncoder;

use crate::types::{RgbaImage, TemplateError};

/// Encode an RGBA canvas as PNG bytes.
///
/// # Errors
///
/// Returns [`TemplateError::PngEncode`] if serialization fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, TemplateError> {
    let mut bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut bytes);
    encoder
        .write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|e| TemplateError::PngEncode(e.to_string()))?;
    Ok(bytes)
}
