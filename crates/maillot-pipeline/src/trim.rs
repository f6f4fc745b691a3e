//! Transparent-padding removal.
//!
//! Two-tier strategy. Tier one is a generic uniform-border trim: border
//! rows and columns whose every pixel matches the top-left corner pixel
//! (within a per-channel tolerance) are removed, the way a codec-level
//! autocrop works. That only removes borders uniform with the corner
//! color, which fails for jerseys whose corners are transparent but
//! whose padding varies in its invisible RGB values -- so when tier one
//! changes nothing, tier two crops to the alpha-based content bounds
//! instead.

use image::Rgba;

use crate::bounds::scan_content_bounds;
use crate::types::RgbaImage;

/// Remove padding around the image content, returning the input
/// unchanged when there is nothing to remove.
///
/// Tier one trims border rows/columns uniform with the corner pixel
/// (per-channel RGBA tolerance = `threshold`). If that leaves the
/// dimensions unchanged, tier two scans for content bounds with the
/// same threshold and crops to them. The image passes through
/// unmodified when the fallback finds no content, finds degenerate
/// bounds, or the content already fills the frame.
#[must_use]
pub fn trim_to_content(image: RgbaImage, threshold: u8) -> RgbaImage {
    if image.width() == 0 || image.height() == 0 {
        return image;
    }

    if let Some(trimmed) = trim_uniform_border(&image, threshold) {
        return trimmed;
    }

    let Some(bounds) = scan_content_bounds(&image, threshold) else {
        return image;
    };
    if bounds.is_degenerate() || bounds.fills(image.width(), image.height()) {
        return image;
    }

    image::imageops::crop_imm(&image, bounds.left, bounds.top, bounds.width(), bounds.height())
        .to_image()
}

/// Tier one: trim border rows/columns matching the top-left corner
/// pixel within a per-channel tolerance.
///
/// Returns `None` when nothing would change -- either no border row or
/// column matches the corner, or every pixel does (a fully uniform
/// image has no content rectangle left to keep).
fn trim_uniform_border(image: &RgbaImage, tolerance: u8) -> Option<RgbaImage> {
    let (width, height) = image.dimensions();
    let corner = *image.get_pixel(0, 0);

    let matches = |p: &Rgba<u8>| {
        p.0.iter()
            .zip(corner.0.iter())
            .all(|(&a, &b)| a.abs_diff(b) <= tolerance)
    };
    let row_uniform = |y: u32| (0..width).all(|x| matches(image.get_pixel(x, y)));
    let col_uniform = |x: u32| (0..height).all(|y| matches(image.get_pixel(x, y)));

    // First/last rows and columns that are NOT uniform borders. A fully
    // uniform image has none and is left alone.
    let top = (0..height).find(|&y| !row_uniform(y))?;
    let bottom = (top..height).rev().find(|&y| !row_uniform(y))?;
    let left = (0..width).find(|&x| !col_uniform(x))?;
    let right = (left..width).rev().find(|&x| !col_uniform(x))?;

    if top == 0 && left == 0 && bottom == height - 1 && right == width - 1 {
        return None;
    }

    Some(
        image::imageops::crop_imm(
            image,
            left,
            top,
            right - left + 1,
            bottom - top + 1,
        )
        .to_image(),
    )
}
