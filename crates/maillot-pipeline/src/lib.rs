//! maillot-pipeline: Pure image-geometry pipeline (sans-IO).
//!
//! Derives a printable two-sided jersey template from a single
//! front-facing jersey photo:
//! decode -> trim transparent padding -> mirror for the back side ->
//! measure per-side content bounds -> stack with a signed seam gap
//! (+ optional collar overlay) -> encode PNG.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! byte slices and returns encoded bytes or structured data. File and
//! network interaction lives in the callers (e.g. `maillot-cli`).

pub mod bounds;
pub mod collar;
pub mod compose;
pub mod decode;
pub mod diagnostics;
pub mod encode;
pub mod mirror;
pub mod pipeline;
pub mod trim;
pub mod types;

pub use compose::TemplateLayout;
pub use pipeline::Pipeline;
pub use types::{
    CompositeLayer, ContentBounds, Dimensions, RgbaImage, StagedTemplate, TemplateConfig,
    TemplateError,
};

/// Run the full template pipeline: front image bytes in, composed PNG
/// bytes out.
///
/// `collar_bytes` is the optional collar overlay; its absence -- or
/// bytes that fail to decode -- skips the overlay without error.
///
/// # Pipeline steps
///
/// 1. Decode the front image to RGBA (alpha promoted if missing)
/// 2. Trim transparent padding (uniform-border trim, bounds-scan fallback)
/// 3. Mirror the trimmed content vertically for the back side
/// 4. Measure per-side content bounds with the precise threshold
/// 5. Prepare the optional collar overlay (floor-halved, Lanczos3)
/// 6. Plan the layout: back content at row 0, front content `gap` rows
///    below the back's bottom content edge, canvas sized to fit
/// 7. Composite back -> front -> collar onto a transparent canvas
/// 8. Encode the canvas as lossless PNG
///
/// # Errors
///
/// Returns [`TemplateError::EmptyInput`] if `front_bytes` is empty.
/// Returns [`TemplateError::ImageDecode`] if the front image is
/// unrecognized or corrupt.
/// Returns [`TemplateError::EmptyContent`] if a side has no pixel above
/// the precise threshold, leaving the seam arithmetic undefined.
/// Returns [`TemplateError::CanvasBounds`] if the canvas would not fit
/// in `u32` dimensions.
/// Returns [`TemplateError::PngEncode`] if the final canvas cannot be
/// serialized.
pub fn compose_template(
    front_bytes: &[u8],
    collar_bytes: Option<&[u8]>,
    config: &TemplateConfig,
) -> Result<Vec<u8>, TemplateError> {
    let staged = compose_template_staged(front_bytes, collar_bytes, config)?;
    encode::encode_png(&staged.canvas)
}

/// Run the template pipeline, retaining every intermediate stage
/// output.
///
/// Same steps and failure modes as [`compose_template`] minus the
/// final encode; the returned [`StagedTemplate`] holds the decoded
/// original, the trimmed front, the mirrored back, both sides' bounds,
/// the prepared collar, the layout arithmetic, and the composed
/// canvas, for inspection and tooling.
///
/// # Errors
///
/// See [`compose_template`].
pub fn compose_template_staged(
    front_bytes: &[u8],
    collar_bytes: Option<&[u8]>,
    config: &TemplateConfig,
) -> Result<StagedTemplate, TemplateError> {
    // 1. Decode.
    let original = decode::decode_rgba(front_bytes)?;

    // 2. Trim transparent padding with the loose threshold.
    let front = trim::trim_to_content(original.clone(), config.loose_alpha_threshold);

    // 3. Mirror the trimmed content for the back side.
    let back = mirror::mirror_vertical(&front);

    // 4. Measure both sides with the precise threshold; stacking math
    //    is undefined without content.
    let front_bounds = bounds::scan_content_bounds(&front, config.precise_alpha_threshold)
        .ok_or(TemplateError::EmptyContent { side: "front" })?;
    let back_bounds = bounds::scan_content_bounds(&back, config.precise_alpha_threshold)
        .ok_or(TemplateError::EmptyContent { side: "back" })?;

    // 5. Optional collar overlay.
    let collar = collar::prepare_collar(collar_bytes, config.collar_scale);

    // 6. Plan placements anchored to content edges.
    let layout = compose::plan_layout(front_bounds, back_bounds, front.width(), config.gap)?;

    // 7. Composite back -> front -> collar.
    let layers = compose::build_layers(back.clone(), front.clone(), collar.clone(), &layout);
    let canvas = compose::render(&layout, &layers);

    Ok(StagedTemplate {
        original,
        front,
        back,
        front_bounds,
        back_bounds,
        collar,
        layout,
        canvas,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{ImageEncoder, Rgba};

    /// Encode an in-memory RGBA image as PNG bytes.
    fn to_png(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        encoder
            .write_image(
                img.as_raw(),
                img.width(),
                img.height(),
                image::ExtendedColorType::Rgba8,
            )
            .unwrap();
        buf
    }

    /// 200x300 transparent canvas with a 100x150 opaque block at
    /// (50, 75)-(149, 224).
    fn jersey_fixture() -> Vec<u8> {
        let img = RgbaImage::from_fn(200, 300, |x, y| {
            if (50..=149).contains(&x) && (75..=224).contains(&y) {
                Rgba([180, 20, 20, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        });
        to_png(&img)
    }

    #[test]
    fn empty_front_bytes_fail() {
        let result = compose_template(&[], None, &TemplateConfig::default());
        assert!(matches!(result, Err(TemplateError::EmptyInput)));
    }

    #[test]
    fn corrupt_front_bytes_fail() {
        let result = compose_template(&[0xAA, 0xBB], None, &TemplateConfig::default());
        assert!(matches!(result, Err(TemplateError::ImageDecode(_))));
    }

    #[test]
    fn fully_transparent_front_reports_empty_content() {
        let blank = to_png(&RgbaImage::from_pixel(40, 40, Rgba([0, 0, 0, 0])));
        let result = compose_template(&blank, None, &TemplateConfig::default());
        assert!(matches!(
            result,
            Err(TemplateError::EmptyContent { side: "front" }),
        ));
    }

    #[test]
    fn staged_output_matches_expected_layout() {
        let staged = compose_template_staged(&jersey_fixture(), None, &TemplateConfig::default())
            .unwrap();

        // Trim reduces to the content block.
        assert_eq!(staged.front.dimensions(), (100, 150));
        assert_eq!(staged.back.dimensions(), (100, 150));
        assert_eq!(staged.front_bounds.height(), 150);
        assert_eq!(staged.back_bounds.height(), 150);

        // gap = -18: front content top at row 150 - 18 = 132.
        assert_eq!(staged.layout.back_top, 0);
        assert_eq!(staged.layout.front_top, 132);
        assert_eq!(staged.canvas.dimensions(), (100, 282));
        assert!(staged.collar.is_none());
    }

    #[test]
    fn composed_bytes_decode_to_the_staged_canvas() {
        let config = TemplateConfig::default();
        let fixture = jersey_fixture();
        let staged = compose_template_staged(&fixture, None, &config).unwrap();
        let bytes = compose_template(&fixture, None, &config).unwrap();
        let decoded = decode::decode_rgba(&bytes).unwrap();
        assert_eq!(decoded.as_raw(), staged.canvas.as_raw());
    }

    #[test]
    fn unreadable_collar_is_silently_skipped() {
        let staged = compose_template_staged(
            &jersey_fixture(),
            Some(&[0x00, 0x01, 0x02]),
            &TemplateConfig::default(),
        )
        .unwrap();
        assert!(staged.collar.is_none());
    }

    #[test]
    fn collar_layer_lands_centered() {
        let collar_png = to_png(&RgbaImage::from_pixel(40, 20, Rgba([0, 0, 255, 255])));
        let staged = compose_template_staged(
            &jersey_fixture(),
            Some(&collar_png),
            &TemplateConfig::default(),
        )
        .unwrap();

        let collar = staged.collar.unwrap();
        assert_eq!(collar.dimensions(), (20, 10));
        // Canvas is 100x282; collar center: left 40, top floor(272 / 2) = 136.
        assert_eq!(staged.canvas.get_pixel(40, 136).0, [0, 0, 255, 255]);
        assert_eq!(staged.canvas.get_pixel(59, 145).0, [0, 0, 255, 255]);
        assert_ne!(staged.canvas.get_pixel(39, 136).0, [0, 0, 255, 255]);
    }
}
