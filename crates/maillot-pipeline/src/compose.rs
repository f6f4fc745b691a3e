//! Template composition.
//!
//! Stacks the mirrored back side above the trimmed front side,
//! anchored to their detected *content* edges rather than their buffer
//! edges -- residual transparent padding left by an imperfect trim does
//! not widen the seam. A signed gap separates (or overlaps) the two
//! content regions, and an optional collar overlay is centered on the
//! finished canvas.
//!
//! Seam arithmetic, with all placements in canvas rows:
//!
//! - the back side's top content edge lands at row 0;
//! - the front side's top content edge sits `gap` rows below the back
//!   side's bottom content edge (the boundary just past its last
//!   content row), so `gap = 0` makes the regions touch with no
//!   overlap and no blank rows;
//! - the canvas ends one row past the front side's last content row.

use serde::{Deserialize, Serialize};

use crate::collar::centered_offset;
use crate::types::{CompositeLayer, ContentBounds, RgbaImage, TemplateError};

/// Placement arithmetic for one composite, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateLayout {
    /// Canvas width: the trimmed content width shared by both sides.
    pub width: u32,
    /// Canvas height: one row past the front side's last content row.
    pub height: u32,
    /// Row of the back buffer's top edge (usually `-back_bounds.top`).
    pub back_top: i64,
    /// Row of the front buffer's top edge.
    pub front_top: i64,
    /// Seam gap the layout was planned with.
    pub gap: i64,
}

/// Plan the placement of the back and front buffers.
///
/// `width` is the shared buffer width (the back is a mirror of the
/// trimmed front, so both have the trimmed width). Bounds must come
/// from the precise-threshold scan of each side.
///
/// The back buffer is placed so its top content edge lands at canvas
/// row 0, and the front so its top content edge sits `gap` rows below
/// the back's bottom content edge. If a pathologically large negative
/// gap would push the front's content above row 0, the whole stack is
/// shifted down so the topmost content edge is row 0 again before the
/// canvas height is derived.
///
/// # Errors
///
/// Returns [`TemplateError::CanvasBounds`] if the resulting canvas
/// height does not fit in `u32`.
pub fn plan_layout(
    front_bounds: ContentBounds,
    back_bounds: ContentBounds,
    width: u32,
    gap: i64,
) -> Result<TemplateLayout, TemplateError> {
    let mut back_top = -i64::from(back_bounds.top);
    // One past the back side's last content row: its bottom content edge.
    let back_bottom_edge = back_top + i64::from(back_bounds.bottom) + 1;
    let mut front_top = back_bottom_edge + gap - i64::from(front_bounds.top);

    // Topmost content edge: back content starts at 0 by construction,
    // front content starts at back_bottom_edge + gap.
    let shift = (back_bottom_edge + gap).min(0);
    back_top -= shift;
    front_top -= shift;

    let total_height = front_top + i64::from(front_bounds.bottom) + 1;
    let height = u32::try_from(total_height).map_err(|_| {
        TemplateError::CanvasBounds(format!("canvas height {total_height} does not fit in u32"))
    })?;

    Ok(TemplateLayout {
        width,
        height,
        back_top,
        front_top,
        gap,
    })
}

/// Assemble the composite layers in paint order: back, front, then the
/// optional collar.
///
/// The collar is centered on both axes; its vertical offset is
/// computed here, from the final canvas height -- only now is that
/// height known.
#[must_use]
pub fn build_layers(
    back: RgbaImage,
    front: RgbaImage,
    collar: Option<RgbaImage>,
    layout: &TemplateLayout,
) -> Vec<CompositeLayer> {
    let mut layers = vec![
        CompositeLayer {
            image: back,
            top: layout.back_top,
            left: 0,
        },
        CompositeLayer {
            image: front,
            top: layout.front_top,
            left: 0,
        },
    ];

    if let Some(collar) = collar {
        let top = centered_offset(layout.height, collar.height());
        let left = centered_offset(layout.width, collar.width());
        layers.push(CompositeLayer {
            image: collar,
            top,
            left,
        });
    }

    layers
}

/// Render layers onto a fully transparent canvas with standard
/// alpha-over blending, in slice order (later layers over earlier
/// ones). Layer regions outside the canvas are clipped.
#[must_use]
pub fn render(layout: &TemplateLayout, layers: &[CompositeLayer]) -> RgbaImage {
    let mut canvas = RgbaImage::new(layout.width, layout.height);
    for layer in layers {
        image::imageops::overlay(&mut canvas, &layer.image, layer.left, layer.top);
    }
    canvas
}
