//! Example: trace and score a vessel skeleton.
//!
//! Loads a skeletonized PNG (non-zero pixels are vessel centerlines), or
//! draws a synthetic one with one straight and one wavy vessel when no input
//! is given. Every traced vessel is scored with all tortuosity estimators and
//! the per-vessel scores plus an image summary are written as JSON.
//!
//! Run from the workspace root:
//!   cargo run -p retina-tortuosity --example score_skeleton -- --help
//!   cargo run -p retina-tortuosity --example score_skeleton

use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use image::ImageReader;
use retina_tortuosity::{
    Image, ImageSummary, PixelCoord, TortuosityParams, TraceConfig, VisitMask, fractal_dimension,
    score_vessels, trace_vessels,
};
use serde::Serialize;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Trace a vessel skeleton and print its tortuosity scores")]
struct Args {
    /// Skeleton PNG; a synthetic 256x256 skeleton is used when omitted
    #[arg(long)]
    input: Option<String>,

    /// Luma values above this are vessel pixels
    #[arg(long, default_value_t = 0)]
    level: u8,

    /// Output JSON path (default: stdout)
    #[arg(long)]
    out: Option<String>,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct VesselDto {
    pixels: usize,
    points: usize,
    inflections: usize,
    tortuous: bool,
    scores: Vec<(String, f64)>,
}

#[derive(Serialize)]
struct ReportDto {
    width: usize,
    height: usize,
    elapsed_ms: f64,
    vessels: Vec<VesselDto>,
    vessel_count: usize,
    tortuous_fraction: f64,
    means: Vec<(String, f64)>,
    image_fractal: f64,
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn synthetic_skeleton() -> Image<u8> {
    let mut img = Image::new_fill(256, 256, 0u8);
    img.paint((20..236).map(|row| PixelCoord::new(row, 60)), 255);
    img.paint(
        (20..236).map(|row| {
            let wobble = ((row as f64) * 0.12).sin() * 6.0;
            PixelCoord::new(row, (170.0 + wobble).round() as usize)
        }),
        255,
    );
    img
}

fn load_binary(path: &str, level: u8) -> Result<Image<u8>> {
    let gray = ImageReader::open(path)
        .with_context(|| format!("opening {path}"))?
        .decode()
        .with_context(|| format!("decoding {path}"))?
        .into_luma8();

    let (width, height) = (gray.width() as usize, gray.height() as usize);
    let data = gray
        .into_raw()
        .into_iter()
        .map(|v| u8::from(v > level))
        .collect();
    Image::from_vec(width, height, data).context("building skeleton Image")
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let img = match &args.input {
        Some(path) => load_binary(path, args.level)?,
        None => synthetic_skeleton(),
    };
    let view = img.as_view();
    let params = TortuosityParams::default();

    let t0 = Instant::now();
    let mut visited = VisitMask::for_view(&view);
    let curves = trace_vessels(&view, &mut visited, &TraceConfig::default())?;
    let scores = score_vessels(&curves, &params)?;
    let summary = ImageSummary::from_scores(&scores, fractal_dimension(&view));
    let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;

    eprintln!(
        "traced {} vessels, scored {} ({elapsed_ms:.2} ms)",
        curves.len(),
        scores.len()
    );

    let vessels = scores
        .iter()
        .map(|s| VesselDto {
            pixels: s.pixel_count,
            points: s.points,
            inflections: s.inflection_points,
            tortuous: s.is_tortuous(),
            scores: s
                .scores
                .iter()
                .map(|t| (t.estimator.to_string(), t.value))
                .collect(),
        })
        .collect();

    let report = ReportDto {
        width: img.width(),
        height: img.height(),
        elapsed_ms,
        vessels,
        vessel_count: summary.vessel_count,
        tortuous_fraction: summary.tortuous_fraction,
        means: summary
            .means
            .iter()
            .map(|(e, v)| (e.to_string(), *v))
            .collect(),
        image_fractal: summary.image_fractal,
    };

    match &args.out {
        Some(path) => {
            let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
            serde_json::to_writer_pretty(file, &report)
                .with_context(|| format!("writing JSON to {path}"))?;
            eprintln!("results written to {path}");
        }
        None => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
