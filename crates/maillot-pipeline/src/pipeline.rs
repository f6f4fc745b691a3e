//! Incremental pipeline: advance stage-by-stage, inspecting each
//! intermediate result before continuing.
//!
//! Unlike [`crate::compose_template_staged`] which runs the entire
//! pipeline in one call, [`Pipeline`] lets the caller drive execution
//! one step at a time:
//!
//! ```rust
//! # use maillot_pipeline::{Pipeline, TemplateConfig, TemplateError};
//! # fn run(png: Vec<u8>) -> Result<(), TemplateError> {
//! let config = TemplateConfig::default();
//! let composed = Pipeline::new(png, None, config)
//!     .decode()?
//!     .trim()
//!     .mirror()
//!     .measure()?
//!     .compose()?;
//!
//! let staged = composed.into_result();
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next pipeline
//! state (or `Result` for fallible stages), carrying all previously
//! computed intermediates. The caller can inspect the current stage's
//! output via accessor methods at any point.
//!
//! # Memory
//!
//! Every stage retains the full raster stack computed so far (the
//! decoded original plus the trimmed and mirrored sides). This is
//! intentional: [`StagedTemplate`] needs every intermediate for
//! inspection and tooling. Callers that only want the encoded bytes
//! should prefer [`crate::compose_template`].

use crate::types::{ContentBounds, RgbaImage, StagedTemplate, TemplateConfig, TemplateError};

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Pipeline state before any processing has occurred.
///
/// The source bytes and config are stored but not yet touched. Call
/// [`decode`](Self::decode) to advance to the next stage.
#[must_use = "pipeline stages are consumed by advancing — call .decode() to continue"]
pub struct Pending {
    config: TemplateConfig,
    front: Vec<u8>,
    collar: Option<Vec<u8>>,
}

impl Pending {
    /// The raw front image bytes.
    #[must_use]
    pub fn front(&self) -> &[u8] {
        &self.front
    }

    /// The raw collar overlay bytes, if provided.
    #[must_use]
    pub fn collar(&self) -> Option<&[u8]> {
        self.collar.as_deref()
    }

    /// Decode the front image and advance to the [`Decoded`] stage.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::EmptyInput`] if the front bytes are
    /// empty, or [`TemplateError::ImageDecode`] if the image format is
    /// unrecognized or the data is corrupt.
    pub fn decode(self) -> Result<Decoded, TemplateError> {
        let original = crate::decode::decode_rgba(&self.front)?;
        Ok(Decoded {
            config: self.config,
            collar: self.collar,
            original,
        })
    }
}

// ───────────────────────── Stage 1: Decoded ──────────────────────────

/// Pipeline state after decoding the front image to RGBA.
///
/// Call [`trim`](Self::trim) to advance to the next stage.
#[must_use = "pipeline stages are consumed by advancing — call .trim() to continue"]
pub struct Decoded {
    config: TemplateConfig,
    collar: Option<Vec<u8>>,
    original: RgbaImage,
}

impl Decoded {
    /// The original decoded RGBA image.
    #[must_use]
    pub const fn original(&self) -> &RgbaImage {
        &self.original
    }

    /// Trim transparent padding and advance to the [`Trimmed`] stage.
    pub fn trim(self) -> Trimmed {
        let front = crate::trim::trim_to_content(
            self.original.clone(),
            self.config.loose_alpha_threshold,
        );
        Trimmed {
            config: self.config,
            collar: self.collar,
            original: self.original,
            front,
        }
    }
}

// ───────────────────────── Stage 2: Trimmed ──────────────────────────

/// Pipeline state after trimming the front side.
///
/// Call [`mirror`](Self::mirror) to advance to the next stage.
#[must_use = "pipeline stages are consumed by advancing — call .mirror() to continue"]
pub struct Trimmed {
    config: TemplateConfig,
    collar: Option<Vec<u8>>,
    original: RgbaImage,
    front: RgbaImage,
}

impl Trimmed {
    /// The trimmed front side.
    #[must_use]
    pub const fn trimmed(&self) -> &RgbaImage {
        &self.front
    }

    /// Whether trimming actually reduced the image.
    #[must_use]
    pub fn applied(&self) -> bool {
        self.front.dimensions() != self.original.dimensions()
    }

    /// Mirror the trimmed content and advance to the [`Mirrored`] stage.
    pub fn mirror(self) -> Mirrored {
        let back = crate::mirror::mirror_vertical(&self.front);
        Mirrored {
            config: self.config,
            collar: self.collar,
            original: self.original,
            front: self.front,
            back,
        }
    }
}

// ───────────────────────── Stage 3: Mirrored ─────────────────────────

/// Pipeline state after mirroring the back side.
///
/// Call [`measure`](Self::measure) to advance to the next stage. This
/// is a fallible step — it returns `Err` when a side has no content.
#[must_use = "pipeline stages are consumed by advancing — call .measure() to continue"]
pub struct Mirrored {
    config: TemplateConfig,
    collar: Option<Vec<u8>>,
    original: RgbaImage,
    front: RgbaImage,
    back: RgbaImage,
}

impl Mirrored {
    /// The mirrored back side.
    #[must_use]
    pub const fn back(&self) -> &RgbaImage {
        &self.back
    }

    /// Measure both sides' content bounds with the precise threshold
    /// and advance to the [`Measured`] stage.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::EmptyContent`] when a side has no pixel
    /// above the precise threshold — the seam arithmetic would be
    /// undefined.
    pub fn measure(self) -> Result<Measured, TemplateError> {
        let front_bounds =
            crate::bounds::scan_content_bounds(&self.front, self.config.precise_alpha_threshold)
                .ok_or(TemplateError::EmptyContent { side: "front" })?;
        let back_bounds =
            crate::bounds::scan_content_bounds(&self.back, self.config.precise_alpha_threshold)
                .ok_or(TemplateError::EmptyContent { side: "back" })?;
        Ok(Measured {
            config: self.config,
            collar: self.collar,
            original: self.original,
            front: self.front,
            back: self.back,
            front_bounds,
            back_bounds,
        })
    }
}

// ───────────────────────── Stage 4: Measured ─────────────────────────

/// Pipeline state after per-side content measurement.
///
/// Call [`compose`](Self::compose) to advance to the final stage.
#[must_use = "pipeline stages are consumed by advancing — call .compose() to continue"]
pub struct Measured {
    config: TemplateConfig,
    collar: Option<Vec<u8>>,
    original: RgbaImage,
    front: RgbaImage,
    back: RgbaImage,
    front_bounds: ContentBounds,
    back_bounds: ContentBounds,
}

impl Measured {
    /// The front side's content bounds.
    #[must_use]
    pub const fn front_bounds(&self) -> ContentBounds {
        self.front_bounds
    }

    /// The back side's content bounds.
    #[must_use]
    pub const fn back_bounds(&self) -> ContentBounds {
        self.back_bounds
    }

    /// Prepare the collar, plan the layout, and render the composite —
    /// the final pipeline step.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::CanvasBounds`] if the canvas would not
    /// fit in `u32` dimensions.
    pub fn compose(self) -> Result<Composed, TemplateError> {
        let collar =
            crate::collar::prepare_collar(self.collar.as_deref(), self.config.collar_scale);
        let layout = crate::compose::plan_layout(
            self.front_bounds,
            self.back_bounds,
            self.front.width(),
            self.config.gap,
        )?;
        let layers = crate::compose::build_layers(
            self.back.clone(),
            self.front.clone(),
            collar.clone(),
            &layout,
        );
        let canvas = crate::compose::render(&layout, &layers);
        Ok(Composed {
            staged: StagedTemplate {
                original: self.original,
                front: self.front,
                back: self.back,
                front_bounds: self.front_bounds,
                back_bounds: self.back_bounds,
                collar,
                layout,
                canvas,
            },
        })
    }
}

// ───────────────────────── Stage 5: Composed ─────────────────────────

/// Pipeline state after composition — the final stage.
///
/// Call [`into_result`](Self::into_result) to extract the
/// [`StagedTemplate`] with all intermediates, or [`encode`](Self::encode)
/// to serialize the canvas directly.
#[must_use = "call .into_result() or .encode() to extract the composed template"]
pub struct Composed {
    staged: StagedTemplate,
}

impl Composed {
    /// The composed transparent canvas.
    #[must_use]
    pub const fn canvas(&self) -> &RgbaImage {
        &self.staged.canvas
    }

    /// The placement arithmetic used for the composite.
    #[must_use]
    pub const fn layout(&self) -> crate::compose::TemplateLayout {
        self.staged.layout
    }

    /// Encode the composed canvas as PNG bytes.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::PngEncode`] if serialization fails.
    pub fn encode(&self) -> Result<Vec<u8>, TemplateError> {
        crate::encode::encode_png(&self.staged.canvas)
    }

    /// Consume the pipeline and return the full [`StagedTemplate`].
    #[must_use]
    pub fn into_result(self) -> StagedTemplate {
        self.staged
    }
}

// ───────────────────── Pipeline entry point ──────────────────────────

/// Entry point for the incremental pipeline.
///
/// Created via [`Pipeline::new`], which stores the source bytes and
/// config in a [`Pending`] stage without doing any work.
pub struct Pipeline;

impl Pipeline {
    /// Start an incremental pipeline over the given front image bytes,
    /// optional collar overlay bytes, and configuration.
    pub fn new(front: Vec<u8>, collar: Option<Vec<u8>>, config: TemplateConfig) -> Pending {
        Pending {
            config,
            front,
            collar,
        }
    }
}
