//! Shared types for the maillot template pipeline.

use serde::{Deserialize, Serialize};

use crate::compose::TemplateLayout;

/// Re-export `RgbaImage` so downstream crates can reference raster
/// data without depending on `image` directly.
pub use image::RgbaImage;

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// The tightest axis-aligned rectangle containing pixels whose alpha
/// exceeds a scan threshold.
///
/// All four fields are **inclusive** pixel indices. "No content found"
/// is represented by `Option<ContentBounds>::None`, never by a
/// degenerate zero-sized box; when a value exists, `top <= bottom` and
/// `left <= right` hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBounds {
    /// First row containing content.
    pub top: u32,
    /// Last row containing content.
    pub bottom: u32,
    /// First column containing content.
    pub left: u32,
    /// Last column containing content.
    pub right: u32,
}

impl ContentBounds {
    /// Content width in pixels (inclusive span).
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.right - self.left + 1
    }

    /// Content height in pixels (inclusive span).
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.bottom - self.top + 1
    }

    /// Whether cropping to these bounds would be unsafe.
    ///
    /// Single-row or single-column content collapses the rectangle;
    /// callers deciding whether to crop must treat this as "do not
    /// crop" rather than emitting a zero- or negative-sized buffer.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    /// Whether the bounds cover the full frame of an image with the
    /// given dimensions, i.e. there is nothing to trim.
    #[must_use]
    pub const fn fills(&self, width: u32, height: u32) -> bool {
        self.top == 0 && self.left == 0 && self.bottom + 1 == height && self.right + 1 == width
    }
}

/// One layer of the final composite: an image and its placement on the
/// canvas.
///
/// Placement may be negative relative to the canvas origin; the
/// renderer clips anything that falls outside the canvas.
#[derive(Debug, Clone)]
pub struct CompositeLayer {
    /// The layer's pixel data.
    pub image: RgbaImage,
    /// Row of the layer's top edge in canvas space.
    pub top: i64,
    /// Column of the layer's left edge in canvas space.
    pub left: i64,
}

/// Configuration for the template pipeline.
///
/// All parameters have defaults matching the production constants and
/// are exposed as `DEFAULT_*` associated consts so CLI flag defaults
/// cannot silently diverge from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Signed seam distance in pixels between the back side's bottom
    /// content edge and the front side's top content edge. Negative
    /// values overlap the two sides, positive values insert blank
    /// rows, zero makes the content regions touch exactly.
    pub gap: i64,

    /// Alpha threshold for deciding whether the raw upload needs
    /// trimming at all. Loose enough to tolerate near-transparent
    /// anti-aliased edges.
    pub loose_alpha_threshold: u8,

    /// Alpha threshold for measuring per-side content edges before
    /// stacking. Lower than the loose threshold so seam alignment
    /// registers even faint semi-transparent pixels.
    pub precise_alpha_threshold: u8,

    /// Uniform scale factor applied to the collar overlay. Scaled
    /// dimensions are floored, not rounded.
    pub collar_scale: f64,
}

impl TemplateConfig {
    /// Default seam gap: an 18-pixel overlap between back and front.
    pub const DEFAULT_GAP: i64 = -18;

    /// Default alpha threshold for the raw-upload trim decision.
    pub const DEFAULT_LOOSE_ALPHA_THRESHOLD: u8 = 5;

    /// Default alpha threshold for per-side stacking measurement.
    pub const DEFAULT_PRECISE_ALPHA_THRESHOLD: u8 = 1;

    /// Default collar overlay scale factor.
    pub const DEFAULT_COLLAR_SCALE: f64 = 0.5;
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            gap: Self::DEFAULT_GAP,
            loose_alpha_threshold: Self::DEFAULT_LOOSE_ALPHA_THRESHOLD,
            precise_alpha_threshold: Self::DEFAULT_PRECISE_ALPHA_THRESHOLD,
            collar_scale: Self::DEFAULT_COLLAR_SCALE,
        }
    }
}

/// Result of running the template pipeline with all intermediate stage
/// outputs preserved.
///
/// Each field captures the output of one logical pipeline stage,
/// letting tooling inspect every step of the processing chain. Does
/// not derive serde traits because `RgbaImage` does not implement
/// them.
#[derive(Debug, Clone)]
pub struct StagedTemplate {
    /// Stage 0: original decoded RGBA image (pre-trim).
    pub original: RgbaImage,
    /// Stage 1: trimmed front side.
    pub front: RgbaImage,
    /// Stage 2: vertically mirrored copy of the trimmed front.
    pub back: RgbaImage,
    /// Stage 3: front-side content bounds (precise threshold).
    pub front_bounds: ContentBounds,
    /// Stage 3: back-side content bounds (precise threshold).
    pub back_bounds: ContentBounds,
    /// Stage 4: prepared collar overlay (`None` when absent, unreadable,
    /// or scaled below one pixel).
    pub collar: Option<RgbaImage>,
    /// Stage 5: placement arithmetic for the composite.
    pub layout: TemplateLayout,
    /// Stage 5: the composed transparent canvas.
    pub canvas: RgbaImage,
}

impl StagedTemplate {
    /// Dimensions of the composed canvas.
    #[must_use]
    pub fn canvas_dimensions(&self) -> Dimensions {
        Dimensions {
            width: self.canvas.width(),
            height: self.canvas.height(),
        }
    }
}

/// Errors that can occur while composing a template.
///
/// Collar unavailability is deliberately absent: a missing or
/// unreadable collar overlay is recovered locally by skipping the
/// stage and never surfaces to the caller.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The front image byte buffer was empty.
    #[error("input image data is empty")]
    EmptyInput,

    /// Failed to decode the front image bytes.
    #[error("failed to decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    /// A side has no pixel above the stacking threshold, so the seam
    /// alignment arithmetic is undefined.
    #[error("no visible content on the {side} side of the template")]
    EmptyContent {
        /// Which side the measurement failed on (`"front"` or `"back"`).
        side: &'static str,
    },

    /// The computed canvas dimensions are not representable.
    #[error("composite canvas out of range: {0}")]
    CanvasBounds(String),

    /// Failed to serialize the composed canvas as PNG.
    #[error("failed to encode template PNG: {0}")]
    PngEncode(String),
}
