//! Back-side mirroring.
//!
//! The back of the template is the trimmed front content flipped
//! top-to-bottom, so the two sides meet at the seam when the printed
//! sheet is folded.

use crate::types::RgbaImage;

/// Produce a vertically flipped copy of `image`: identical dimensions,
/// rows reversed top-to-bottom, every pixel's RGBA values preserved
/// exactly. No resampling, no alpha modification.
///
/// Applying the flip twice reproduces the original byte-for-byte.
#[must_use]
pub fn mirror_vertical(image: &RgbaImage) -> RgbaImage {
    image::imageops::flip_vertical(image)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::Rgba;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([
                u8::try_from(x % 256).unwrap(),
                u8::try_from(y % 256).unwrap(),
                u8::try_from((x + y) % 256).unwrap(),
                u8::try_from((255 - y) % 256).unwrap(),
            ])
        })
    }

    #[test]
    fn dimensions_are_preserved() {
        let img = gradient(17, 31);
        let flipped = mirror_vertical(&img);
        assert_eq!(flipped.dimensions(), (17, 31));
    }

    #[test]
    fn rows_are_reversed() {
        let img = gradient(5, 8);
        let flipped = mirror_vertical(&img);
        for y in 0..8 {
            for x in 0..5 {
                assert_eq!(flipped.get_pixel(x, y), img.get_pixel(x, 7 - y));
            }
        }
    }

    #[test]
    fn mirror_is_an_involution() {
        let img = gradient(23, 11);
        let twice = mirror_vertical(&mirror_vertical(&img));
        assert_eq!(twice.as_raw(), img.as_raw());
    }

    #[test]
    fn alpha_values_survive_exactly() {
        let mut img = RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 0]));
        img.put_pixel(1, 0, Rgba([9, 8, 7, 42]));
        let flipped = mirror_vertical(&img);
        assert_eq!(*flipped.get_pixel(1, 2), Rgba([9, 8, 7, 42]));
    }
}
