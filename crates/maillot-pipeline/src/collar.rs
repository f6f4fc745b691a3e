//! Optional collar overlay preparation.
//!
//! The collar graphic is a secondary image drawn over the seam area.
//! It is decoded, uniformly scaled down, and centered horizontally on
//! the canvas; vertical centering happens in the compositor once the
//! final canvas height is known. Absence -- or bytes that fail to
//! decode -- is a valid state and simply skips the overlay.

use crate::decode::decode_rgba;
use crate::types::RgbaImage;

/// Decode and scale an optional collar overlay.
///
/// Both dimensions are multiplied by `scale` and floored (integer
/// truncation, not rounding), then the image is resampled with
/// Lanczos3 to avoid aliasing on the shrink.
///
/// Returns `None` -- never an error -- when the bytes are absent,
/// unreadable, or the scaled size falls below one pixel.
#[must_use]
pub fn prepare_collar(bytes: Option<&[u8]>, scale: f64) -> Option<RgbaImage> {
    let decoded = decode_rgba(bytes?).ok()?;
    scale_overlay(&decoded, scale)
}

/// Uniformly scale an overlay by `scale`, flooring both dimensions.
///
/// Returns `None` when either floored dimension is zero.
fn scale_overlay(image: &RgbaImage, scale: f64) -> Option<RgbaImage> {
    let scaled_w = (f64::from(image.width()) * scale).floor();
    let scaled_h = (f64::from(image.height()) * scale).floor();
    if scaled_w < 1.0 || scaled_h < 1.0 {
        return None;
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (w, h) = (scaled_w as u32, scaled_h as u32);
    Some(image::imageops::resize(
        image,
        w,
        h,
        image::imageops::FilterType::Lanczos3,
    ))
}

/// Offset that centers a span of `inner` pixels within `outer` pixels,
/// flooring the division.
///
/// Uses floor division so an overlay wider than the canvas yields the
/// same negative offset a `Math.floor`-style computation would; the
/// renderer clips whatever falls outside.
#[must_use]
pub fn centered_offset(outer: u32, inner: u32) -> i64 {
    (i64::from(outer) - i64::from(inner)).div_euclid(2)
}
