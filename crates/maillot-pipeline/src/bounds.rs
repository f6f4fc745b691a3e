//! Content-bounds scanning.
//!
//! Finds the tightest axis-aligned rectangle containing pixels whose
//! alpha value exceeds a threshold. This drives both the trim fallback
//! (loose threshold) and the per-side seam measurement before stacking
//! (precise threshold).

use crate::types::{ContentBounds, RgbaImage};

/// Scan an image for the tightest rectangle of pixels whose alpha is
/// **strictly greater** than `threshold`.
///
/// The scan walks in from each edge in turn: rows top to bottom for
/// `top`, rows bottom to top for `bottom`, then columns left to right
/// and right to left for `left`/`right`, restricted to the rows already
/// known to contain content. All returned indices are inclusive.
///
/// Returns `None` when no pixel qualifies (including zero-sized
/// images) -- never a degenerate zero-sized rectangle.
#[must_use]
pub fn scan_content_bounds(image: &RgbaImage, threshold: u8) -> Option<ContentBounds> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let row_has_content = |y: u32| (0..width).any(|x| image.get_pixel(x, y).0[3] > threshold);

    let top = (0..height).find(|&y| row_has_content(y))?;
    let bottom = (top..height).rev().find(|&y| row_has_content(y))?;

    // Column scans only need to examine rows already known to hold
    // content; any qualifying pixel lies within [top, bottom].
    let col_has_content = |x: u32| (top..=bottom).any(|y| image.get_pixel(x, y).0[3] > threshold);

    let left = (0..width).find(|&x| col_has_content(x))?;
    let right = (left..width).rev().find(|&x| col_has_content(x))?;

    Some(ContentBounds {
        top,
        bottom,
        left,
        right,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::Rgba;

    /// Transparent canvas with a fully opaque rectangle at the given
    /// inclusive coordinates.
    fn opaque_block(
        width: u32,
        height: u32,
        left: u32,
        top: u32,
        right: u32,
        bottom: u32,
    ) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            if x >= left && x <= right && y >= top && y <= bottom {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        })
    }

    #[test]
    fn opaque_rectangle_reports_exact_inclusive_bounds() {
        let img = opaque_block(200, 300, 50, 75, 149, 224);
        let bounds = scan_content_bounds(&img, 5).unwrap();
        assert_eq!(
            bounds,
            ContentBounds {
                top: 75,
                bottom: 224,
                left: 50,
                right: 149,
            },
        );
        assert_eq!(bounds.width(), 100);
        assert_eq!(bounds.height(), 150);
    }

    #[test]
    fn fully_transparent_image_reports_no_content() {
        let img = RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 0]));
        assert_eq!(scan_content_bounds(&img, 0), None);
    }

    #[test]
    fn zero_sized_image_reports_no_content() {
        let img = RgbaImage::new(0, 0);
        assert_eq!(scan_content_bounds(&img, 0), None);
    }

    #[test]
    fn threshold_comparison_is_strict() {
        // A pixel with alpha exactly equal to the threshold does not
        // qualify; one above it does.
        let at = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 5]));
        assert_eq!(scan_content_bounds(&at, 5), None);

        let above = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 6]));
        let bounds = scan_content_bounds(&above, 5).unwrap();
        assert_eq!(
            bounds,
            ContentBounds {
                top: 0,
                bottom: 3,
                left: 0,
                right: 3,
            },
        );
    }

    #[test]
    fn faint_pixels_register_under_precise_threshold() {
        // Alpha 2 is invisible to the loose threshold (5) but must be
        // seen by the precise threshold (1) for seam alignment.
        let mut img = RgbaImage::from_pixel(10, 10, Rgba([0, 0, 0, 0]));
        img.put_pixel(3, 2, Rgba([0, 0, 0, 2]));
        img.put_pixel(7, 8, Rgba([0, 0, 0, 2]));

        assert_eq!(scan_content_bounds(&img, 5), None);
        let bounds = scan_content_bounds(&img, 1).unwrap();
        assert_eq!(
            bounds,
            ContentBounds {
                top: 2,
                bottom: 8,
                left: 3,
                right: 7,
            },
        );
    }

    #[test]
    fn single_pixel_content_collapses_to_that_pixel() {
        let mut img = RgbaImage::from_pixel(9, 9, Rgba([0, 0, 0, 0]));
        img.put_pixel(4, 6, Rgba([1, 2, 3, 255]));
        let bounds = scan_content_bounds(&img, 0).unwrap();
        assert_eq!(
            bounds,
            ContentBounds {
                top: 6,
                bottom: 6,
                left: 4,
                right: 4,
            },
        );
        assert!(bounds.is_degenerate());
    }

    #[test]
    fn content_touching_every_edge_fills_the_frame() {
        let img = opaque_block(8, 5, 0, 0, 7, 4);
        let bounds = scan_content_bounds(&img, 0).unwrap();
        assert!(bounds.fills(8, 5));
    }
}
