//! maillot-cli: compose a printable two-sided jersey template from an
//! image file.
//!
//! Runs the template pipeline on a front-facing jersey photo with
//! configurable seam parameters, writing the composed PNG and printing
//! per-stage diagnostics. Useful for:
//!
//! - Tuning the seam gap and alpha thresholds against real uploads
//! - Checking what the trim actually removed from a photo
//! - Measuring per-stage durations on large inputs
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin maillot-cli -- [OPTIONS] -o out.png <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use maillot_pipeline::TemplateConfig;
use maillot_pipeline::diagnostics::{Clock, compose_with_diagnostics};

/// Compose a printable two-sided jersey template.
///
/// Trims transparent padding from the input photo, mirrors it for the
/// back side, stacks the two sides with a signed seam gap, optionally
/// overlays a half-scale collar graphic, and writes a lossless PNG.
#[derive(Parser)]
#[command(name = "maillot-cli", version)]
struct Cli {
    /// Path to the front jersey image (PNG, JPEG, GIF, WebP).
    image_path: PathBuf,

    /// Output PNG path.
    #[arg(short, long)]
    output: PathBuf,

    /// Optional collar overlay image path.
    ///
    /// A missing or unreadable file skips the overlay with a warning;
    /// the template is still composed.
    #[arg(long)]
    collar: Option<PathBuf>,

    /// Seam gap in pixels: negative overlaps the two sides, positive
    /// inserts blank rows, zero makes them touch exactly.
    #[arg(long, allow_negative_numbers = true, default_value_t = TemplateConfig::DEFAULT_GAP)]
    gap: i64,

    /// Alpha threshold for the trim decision on the raw upload.
    #[arg(long, default_value_t = TemplateConfig::DEFAULT_LOOSE_ALPHA_THRESHOLD)]
    loose_alpha_threshold: u8,

    /// Alpha threshold for per-side seam measurement.
    #[arg(long, default_value_t = TemplateConfig::DEFAULT_PRECISE_ALPHA_THRESHOLD)]
    precise_alpha_threshold: u8,

    /// Uniform scale factor for the collar overlay.
    #[arg(long, default_value_t = TemplateConfig::DEFAULT_COLLAR_SCALE)]
    collar_scale: f64,

    /// Full pipeline config as a JSON string.
    ///
    /// When provided, all other pipeline parameter flags are ignored.
    /// The JSON must be a valid `TemplateConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    /// Output diagnostics as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,
}

/// Build a [`TemplateConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored. Otherwise, a config is
/// assembled from the individual flags.
fn config_from_cli(cli: &Cli) -> Result<TemplateConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(TemplateConfig {
        gap: cli.gap,
        loose_alpha_threshold: cli.loose_alpha_threshold,
        precise_alpha_threshold: cli.precise_alpha_threshold,
        collar_scale: cli.collar_scale,
    })
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let image_bytes = match std::fs::read(&cli.image_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    // A collar that cannot be read is skipped, not fatal -- the
    // pipeline treats unusable overlay bytes the same way.
    let collar_bytes = cli.collar.as_ref().and_then(|path| {
        match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                eprintln!("Warning: skipping collar {}: {e}", path.display());
                None
            }
        }
    });

    eprintln!(
        "Image: {} ({} bytes)",
        cli.image_path.display(),
        image_bytes.len(),
    );
    eprintln!("Config: {config:#?}");

    let (png, staged, diagnostics) = match compose_with_diagnostics(
        &image_bytes,
        collar_bytes.as_deref(),
        &config,
        &StdClock,
    ) {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Pipeline error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = std::fs::write(&cli.output, &png) {
        eprintln!("Error writing {}: {e}", cli.output.display());
        return ExitCode::FAILURE;
    }
    let dims = staged.canvas_dimensions();
    eprintln!(
        "Template written to {} ({}x{}, {} bytes)",
        cli.output.display(),
        dims.width,
        dims.height,
        png.len(),
    );

    if cli.json {
        match serde_json::to_string_pretty(&diagnostics) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing diagnostics: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", diagnostics.report());
    }

    ExitCode::SUCCESS
}
