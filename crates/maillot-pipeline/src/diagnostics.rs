//! Pipeline diagnostics: timing, counts, and other metrics for each stage.
//!
//! These diagnostics are permanent instrumentation intended for tuning
//! trim thresholds and seam parameters against real uploads. The core
//! stays clock-agnostic through the [`Clock`] trait; callers supply an
//! implementation (the CLI uses [`std::time::Instant`]).
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since [`std::time::Duration`] does not implement
//! serde traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{ContentBounds, StagedTemplate, TemplateConfig, TemplateError};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of monotonic timestamps for stage timing.
///
/// Keeps the core free of a direct clock dependency so embedders can
/// supply whatever time source their platform has.
pub trait Clock {
    /// An opaque instant captured by [`now`](Self::now).
    type Instant;

    /// The current instant.
    fn now(&self) -> Self::Instant;

    /// Elapsed time since a previously captured instant.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Diagnostics collected from a single template composition.
///
/// Each field captures metrics for one logical stage. The collar stage
/// is `None` when no overlay was provided or the provided bytes could
/// not be used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDiagnostics {
    /// Stage 1: front image decoding.
    pub decode: StageDiagnostics,
    /// Stage 2: transparent-padding trim.
    pub trim: StageDiagnostics,
    /// Stage 3: back-side mirroring.
    pub mirror: StageDiagnostics,
    /// Stage 4: per-side content measurement.
    pub measure: StageDiagnostics,
    /// Stage 5: collar preparation (only when an overlay was used).
    pub collar: Option<StageDiagnostics>,
    /// Stage 6: layout planning + canvas rendering.
    pub compose: StageDiagnostics,
    /// Stage 7: PNG encoding.
    pub encode: StageDiagnostics,
    /// Total wall-clock duration of the entire pipeline (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: TemplateSummary,
}

/// Diagnostics for a single pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics (counts, sizes, etc.).
    pub metrics: StageMetrics,
}

/// Stage-specific metrics that vary by pipeline stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Front image decoding metrics.
    Decode {
        /// Size of the input image bytes.
        input_bytes: usize,
        /// Decoded image width in pixels.
        width: u32,
        /// Decoded image height in pixels.
        height: u32,
    },
    /// Trim metrics.
    Trim {
        /// Alpha threshold used for the trim decision.
        threshold: u8,
        /// Width before trimming.
        width_before: u32,
        /// Height before trimming.
        height_before: u32,
        /// Width after trimming.
        width_after: u32,
        /// Height after trimming.
        height_after: u32,
    },
    /// Mirroring metrics.
    Mirror {
        /// Mirrored side width in pixels.
        width: u32,
        /// Mirrored side height in pixels.
        height: u32,
    },
    /// Per-side measurement metrics.
    Measure {
        /// Alpha threshold used for seam measurement.
        threshold: u8,
        /// Front-side content bounds.
        front: ContentBounds,
        /// Back-side content bounds.
        back: ContentBounds,
    },
    /// Collar preparation metrics.
    Collar {
        /// Scale factor applied to the overlay.
        scale: f64,
        /// Scaled overlay width in pixels.
        width: u32,
        /// Scaled overlay height in pixels.
        height: u32,
    },
    /// Composition metrics.
    Compose {
        /// Seam gap the layout was planned with.
        gap: i64,
        /// Canvas row of the back buffer's top edge.
        back_top: i64,
        /// Canvas row of the front buffer's top edge.
        front_top: i64,
        /// Number of layers painted.
        layer_count: usize,
        /// Canvas width in pixels.
        width: u32,
        /// Canvas height in pixels.
        height: u32,
    },
    /// Encoding metrics.
    Encode {
        /// Size of the encoded PNG in bytes.
        output_bytes: usize,
    },
}

/// High-level summary counts for the entire composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSummary {
    /// Source image width in pixels.
    pub input_width: u32,
    /// Source image height in pixels.
    pub input_height: u32,
    /// Composed canvas width in pixels.
    pub canvas_width: u32,
    /// Composed canvas height in pixels.
    pub canvas_height: u32,
    /// Seam gap used.
    pub gap: i64,
    /// Whether a collar overlay made it onto the canvas.
    pub collar_applied: bool,
}

impl TemplateDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Template Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Input: {}x{}  ->  canvas: {}x{} (gap {})",
            self.summary.input_width,
            self.summary.input_height,
            self.summary.canvas_width,
            self.summary.canvas_height,
            self.summary.gap,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<12} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(72));

        let total_ms = duration_ms(self.total_duration);

        let stages: Vec<(&str, &StageDiagnostics)> = {
            let mut s = vec![
                ("Decode", &self.decode),
                ("Trim", &self.trim),
                ("Mirror", &self.mirror),
                ("Measure", &self.measure),
            ];
            if let Some(ref c) = self.collar {
                s.push(("Collar", c));
            }
            s.push(("Compose", &self.compose));
            s.push(("Encode", &self.encode));
            s
        };

        for (name, diag) in &stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<12} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        if self.collar.is_none() {
            lines.push(String::new());
            lines.push("Collar: skipped (absent or unreadable)".to_string());
        }

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Decode {
            input_bytes,
            width,
            height,
        } => format!("{input_bytes} bytes -> {width}x{height}"),
        StageMetrics::Trim {
            threshold,
            width_before,
            height_before,
            width_after,
            height_after,
        } => format!(
            "t={threshold} {width_before}x{height_before} -> {width_after}x{height_after}",
        ),
        StageMetrics::Mirror { width, height } => format!("{width}x{height}"),
        StageMetrics::Measure {
            threshold,
            front,
            back,
        } => format!(
            "t={threshold} front rows {}..={} cols {}..={}, back rows {}..={}",
            front.top, front.bottom, front.left, front.right, back.top, back.bottom,
        ),
        StageMetrics::Collar {
            scale,
            width,
            height,
        } => format!("scale={scale} -> {width}x{height}"),
        StageMetrics::Compose {
            gap,
            back_top,
            front_top,
            layer_count,
            width,
            height,
        } => format!(
            "gap={gap} back_top={back_top} front_top={front_top} {layer_count} layers -> {width}x{height}",
        ),
        StageMetrics::Encode { output_bytes } => format!("{output_bytes} bytes"),
    }
}

/// Run the full pipeline with per-stage timing, returning the encoded
/// PNG, every intermediate, and the collected diagnostics.
///
/// # Errors
///
/// Same failure modes as [`crate::compose_template`].
pub fn compose_with_diagnostics<C: Clock>(
    front_bytes: &[u8],
    collar_bytes: Option<&[u8]>,
    config: &TemplateConfig,
    clock: &C,
) -> Result<(Vec<u8>, StagedTemplate, TemplateDiagnostics), TemplateError> {
    let pipeline_start = clock.now();

    // 1. Decode.
    let start = clock.now();
    let original = crate::decode::decode_rgba(front_bytes)?;
    let decode = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Decode {
            input_bytes: front_bytes.len(),
            width: original.width(),
            height: original.height(),
        },
    };
    let (input_width, input_height) = original.dimensions();

    // 2. Trim.
    let start = clock.now();
    let front = crate::trim::trim_to_content(original.clone(), config.loose_alpha_threshold);
    let trim = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Trim {
            threshold: config.loose_alpha_threshold,
            width_before: input_width,
            height_before: input_height,
            width_after: front.width(),
            height_after: front.height(),
        },
    };

    // 3. Mirror.
    let start = clock.now();
    let back = crate::mirror::mirror_vertical(&front);
    let mirror = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Mirror {
            width: back.width(),
            height: back.height(),
        },
    };

    // 4. Measure.
    let start = clock.now();
    let front_bounds = crate::bounds::scan_content_bounds(&front, config.precise_alpha_threshold)
        .ok_or(TemplateError::EmptyContent { side: "front" })?;
    let back_bounds = crate::bounds::scan_content_bounds(&back, config.precise_alpha_threshold)
        .ok_or(TemplateError::EmptyContent { side: "back" })?;
    let measure = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Measure {
            threshold: config.precise_alpha_threshold,
            front: front_bounds,
            back: back_bounds,
        },
    };

    // 5. Collar (optional).
    let start = clock.now();
    let collar_img = crate::collar::prepare_collar(collar_bytes, config.collar_scale);
    let collar = collar_img.as_ref().map(|c| StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Collar {
            scale: config.collar_scale,
            width: c.width(),
            height: c.height(),
        },
    });

    // 6. Compose.
    let start = clock.now();
    let layout = crate::compose::plan_layout(front_bounds, back_bounds, front.width(), config.gap)?;
    let layers =
        crate::compose::build_layers(back.clone(), front.clone(), collar_img.clone(), &layout);
    let canvas = crate::compose::render(&layout, &layers);
    let compose = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Compose {
            gap: layout.gap,
            back_top: layout.back_top,
            front_top: layout.front_top,
            layer_count: layers.len(),
            width: layout.width,
            height: layout.height,
        },
    };

    // 7. Encode.
    let start = clock.now();
    let png = crate::encode::encode_png(&canvas)?;
    let encode = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Encode {
            output_bytes: png.len(),
        },
    };

    let collar_applied = collar_img.is_some();
    let staged = StagedTemplate {
        original,
        front,
        back,
        front_bounds,
        back_bounds,
        collar: collar_img,
        layout,
        canvas,
    };

    let diagnostics = TemplateDiagnostics {
        decode,
        trim,
        mirror,
        measure,
        collar,
        compose,
        encode,
        total_duration: clock.elapsed(&pipeline_start),
        summary: TemplateSummary {
            input_width,
            input_height,
            canvas_width: staged.canvas.width(),
            canvas_height: staged.canvas.height(),
            gap: config.gap,
            collar_applied,
        },
    };

    Ok((png, staged, diagnostics))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::RgbaImage;
    use image::{ImageEncoder, Rgba};

    /// Zero-cost test clock: every elapsed call returns a fixed tick.
    struct TickClock;

    impl Clock for TickClock {
        type Instant = ();

        fn now(&self) {}

        fn elapsed(&self, _since: &()) -> Duration {
            Duration::from_micros(250)
        }
    }

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

    fn fixture() -> Vec<u8> {
        to_png(&RgbaImage::from_fn(30, 40, |x, y| {
            if (5..=24).contains(&x) && (10..=29).contains(&y) {
                Rgba([200, 200, 0, 255])
            } else {
                Rgba([0, 0, 0, 0])
            }
        }))
    }

    #[test]
    fn diagnostics_capture_every_stage() {
        let (png, staged, diag) = compose_with_diagnostics(
            &fixture(),
            None,
            &TemplateConfig::default(),
            &TickClock,
        )
        .unwrap();

        assert!(!png.is_empty());
        assert!(matches!(diag.decode.metrics, StageMetrics::Decode { .. }));
        assert!(matches!(
            diag.trim.metrics,
            StageMetrics::Trim {
                width_after: 20,
                height_after: 20,
                ..
            },
        ));
        assert!(diag.collar.is_none());
        assert!(!diag.summary.collar_applied);
        assert_eq!(diag.summary.canvas_width, staged.canvas.width());
        assert_eq!(diag.summary.gap, TemplateConfig::DEFAULT_GAP);
        assert!(matches!(
            diag.encode.metrics,
            StageMetrics::Encode { output_bytes } if output_bytes == png.len(),
        ));
    }

    #[test]
    fn collar_stage_appears_when_overlay_is_used() {
        let collar = to_png(&RgbaImage::from_pixel(8, 4, Rgba([0, 0, 0, 255])));
        let (_, staged, diag) = compose_with_diagnostics(
            &fixture(),
            Some(&collar),
            &TemplateConfig::default(),
            &TickClock,
        )
        .unwrap();

        assert!(staged.collar.is_some());
        assert!(diag.summary.collar_applied);
        assert!(matches!(
            diag.collar.unwrap().metrics,
            StageMetrics::Collar {
                width: 4,
                height: 2,
                ..
            },
        ));
    }

    #[test]
    fn diagnostics_match_the_plain_staged_entry_point() {
        let config = TemplateConfig::default();
        let (png, staged, _) =
            compose_with_diagnostics(&fixture(), None, &config, &TickClock).unwrap();
        let plain = crate::compose_template_staged(&fixture(), None, &config).unwrap();
        assert_eq!(staged.canvas.as_raw(), plain.canvas.as_raw());
        assert_eq!(png, crate::compose_template(&fixture(), None, &config).unwrap());
    }

    #[test]
    fn report_produces_nonempty_table() {
        let (_, _, diag) = compose_with_diagnostics(
            &fixture(),
            None,
            &TemplateConfig::default(),
            &TickClock,
        )
        .unwrap();
        let report = diag.report();
        assert!(report.contains("Template Diagnostics Report"));
        assert!(report.contains("Compose"));
        assert!(report.contains("Collar: skipped"));
    }

    #[test]
    fn diagnostics_serde_round_trip() {
        let (_, _, diag) = compose_with_diagnostics(
            &fixture(),
            None,
            &TemplateConfig::default(),
            &TickClock,
        )
        .unwrap();
        let json = serde_json::to_string(&diag).unwrap();
        let deserialized: TemplateDiagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(
            deserialized.summary.canvas_height,
            diag.summary.canvas_height,
        );
        assert_eq!(deserialized.total_duration, diag.total_duration);
    }
}
