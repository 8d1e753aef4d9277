use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use rt_core::{Image, Roi, RoiMask};
use rt_tortuosity::{Estimator, ImageSummary, TortuosityParams, fractal_dimension, score_vessels};
use rt_trace::{TraceConfig, VesselCurve, VisitMask, trace_vessels};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "rt_score")]
#[command(about = "Trace and score vessels in skeletonized retinal images")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dump traced vessel curves.
    #[command(name = "trace")]
    Trace(TraceArgs),
    /// Score every vessel and summarize the image.
    #[command(name = "score")]
    Score(ScoreArgs),
    /// Box-counting dimension of the whole skeleton.
    #[command(name = "fractal")]
    Fractal(InputArgs),
}

#[derive(Args, Debug, Clone)]
struct InputArgs {
    /// Skeleton PNG image.
    #[arg(long, required = true)]
    input: PathBuf,
    /// Luma values above this are vessel pixels.
    #[arg(long)]
    level: Option<u8>,
    /// JSON output path; stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct TraceArgs {
    #[command(flatten)]
    common: InputArgs,
    #[arg(long, default_value_t = 1)]
    border_margin: usize,
    /// Drop curves with this many projected points or fewer.
    #[arg(long, default_value_t = 0)]
    min_pixels: usize,
}

#[derive(Args, Debug, Clone)]
struct ScoreArgs {
    #[command(flatten)]
    common: InputArgs,
    /// JSON file with `ScoreConfig` fields; flags take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    border_margin: Option<usize>,
    #[arg(long)]
    sampling_size: Option<usize>,
    #[arg(long)]
    r2_threshold: Option<f64>,
    /// Skip vessels with this many projected points or fewer. Raised to 3
    /// when lower, since linear regression needs 4 points.
    #[arg(long)]
    min_pixels: Option<usize>,
    /// Vessels with a distance measure above this are tortuous.
    #[arg(long)]
    distance_threshold: Option<f64>,
    #[arg(long)]
    inflection_count_threshold: Option<f64>,
    #[arg(long)]
    curvature_threshold: Option<f64>,
    /// Vessels with a tortuosity density above this are tortuous.
    #[arg(long)]
    density_threshold: Option<f64>,
    /// Only score vessels touching this `top,left,bottom,right` rectangle.
    /// Repeatable.
    #[arg(long = "roi", value_name = "TOP,LEFT,BOTTOM,RIGHT")]
    rois: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ScoreConfig {
    level: Option<u8>,
    border_margin: Option<usize>,
    sampling_size: Option<usize>,
    r2_threshold: Option<f64>,
    min_pixels_per_vessel: Option<usize>,
    distance_threshold: Option<f64>,
    inflection_count_threshold: Option<f64>,
    curvature_threshold: Option<f64>,
    density_threshold: Option<f64>,
    rois: Vec<RoiConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct RoiConfig {
    name: String,
    #[serde(default)]
    description: String,
    top: usize,
    left: usize,
    bottom: usize,
    right: usize,
}

#[derive(Debug, Clone, Serialize)]
struct CurveDto {
    pixel_count: usize,
    /// Raw pixels as `[row, col]`, in discovery order.
    pixels: Vec<[usize; 2]>,
    xs: Vec<usize>,
    ys: Vec<usize>,
}

#[derive(Debug, Clone, Serialize)]
struct TraceDto {
    width: usize,
    height: usize,
    border_margin: usize,
    curves: Vec<CurveDto>,
}

#[derive(Debug, Clone, Serialize)]
struct ParamsDto {
    level: u8,
    border_margin: usize,
    sampling_size: usize,
    r2_threshold: f64,
    min_pixels_per_vessel: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    distance_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inflection_count_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    curvature_threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    density_threshold: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
struct RoiDto {
    name: String,
    description: String,
    top: usize,
    left: usize,
    bottom: usize,
    right: usize,
}

#[derive(Debug, Clone, Serialize)]
struct VesselDto {
    index: usize,
    pixel_count: usize,
    points: usize,
    inflection_points: usize,
    tortuous: bool,
    scores: Vec<MetricDto>,
}

#[derive(Debug, Clone, Serialize)]
struct MetricDto {
    estimator: &'static str,
    value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    tortuous: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
struct SummaryDto {
    vessel_count: usize,
    tortuous_fraction: f64,
    means: Vec<MetricDto>,
    image_fractal: f64,
}

#[derive(Debug, Clone, Serialize)]
struct ScoreDto {
    width: usize,
    height: usize,
    params: ParamsDto,
    rois: Vec<RoiDto>,
    traced: usize,
    vessels: Vec<VesselDto>,
    summary: SummaryDto,
}

#[derive(Debug, Clone, Serialize)]
struct FractalDto {
    width: usize,
    height: usize,
    fractal_dimension: f64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rt_score=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Trace(args) => run_trace(args),
        Command::Score(args) => run_score(args),
        Command::Fractal(args) => run_fractal(args),
    }
}

fn run_trace(args: TraceArgs) -> Result<()> {
    let img = load_skeleton(&args.common.input, args.common.level.unwrap_or(0))?;
    let cfg = TraceConfig {
        border_margin: args.border_margin,
        min_pixels: args.min_pixels,
    };

    let curves = trace_image(&img, &cfg)?;
    info!(curves = curves.len(), "traced {}", args.common.input.display());

    let dto = TraceDto {
        width: img.width(),
        height: img.height(),
        border_margin: cfg.border_margin,
        curves: curves.iter().map(curve_dto).collect(),
    };
    write_json(args.common.out.as_deref(), &dto)
}

fn run_score(args: ScoreArgs) -> Result<()> {
    let cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => ScoreConfig::default(),
    };

    let level = args.common.level.or(cfg.level).unwrap_or(0);
    let border_margin = args
        .border_margin
        .or(cfg.border_margin)
        .unwrap_or(TraceConfig::default().border_margin);
    let mut params = TortuosityParams::default();
    apply_params_overrides(&mut params, &cfg, &args);

    let img = load_skeleton(&args.common.input, level)?;
    let trace_cfg = TraceConfig {
        border_margin,
        min_pixels: 0,
    };
    let traced = trace_image(&img, &trace_cfg)?;

    let mut rois = cfg
        .rois
        .iter()
        .map(|r| {
            Roi::new(r.name.clone(), r.top, r.left, r.bottom, r.right)
                .map(|roi| roi.with_description(r.description.clone()))
                .with_context(|| format!("config roi '{}'", r.name))
        })
        .collect::<Result<Vec<_>>>()?;
    for (i, text) in args.rois.iter().enumerate() {
        rois.push(parse_roi(&format!("roi{i}"), text)?);
    }

    let curves = if rois.is_empty() {
        traced.clone()
    } else {
        let mask = RoiMask::new(img.width(), img.height(), rois.clone());
        debug!(covered = mask.covered_pixels(), "roi mask built");
        let kept: Vec<VesselCurve> = traced
            .iter()
            .filter(|c| c.touches_roi(&mask))
            .cloned()
            .collect();
        if kept.is_empty() {
            warn!(rois = rois.len(), "no vessel touches the regions of interest");
        }
        kept
    };

    let scores = score_vessels(&curves, &params).context("scoring vessels")?;
    let summary = ImageSummary::from_scores(&scores, fractal_dimension(&img.as_view()));
    info!(
        traced = traced.len(),
        scored = summary.vessel_count,
        tortuous_fraction = summary.tortuous_fraction,
        "scored {}",
        args.common.input.display()
    );

    let vessels = scores
        .iter()
        .enumerate()
        .map(|(index, s)| VesselDto {
            index,
            pixel_count: s.pixel_count,
            points: s.points,
            inflection_points: s.inflection_points,
            tortuous: s.is_tortuous(),
            scores: s
                .scores
                .iter()
                .map(|t| MetricDto {
                    estimator: t.estimator.name(),
                    value: t.value,
                    tortuous: t.tortuous,
                })
                .collect(),
        })
        .collect();

    let dto = ScoreDto {
        width: img.width(),
        height: img.height(),
        params: ParamsDto {
            level,
            border_margin,
            sampling_size: params.sampling_size,
            r2_threshold: params.r2_threshold,
            min_pixels_per_vessel: params.min_pixels_per_vessel,
            distance_threshold: params.distance_threshold,
            inflection_count_threshold: params.inflection_count_threshold,
            curvature_threshold: params.curvature_threshold,
            density_threshold: params.density_threshold,
        },
        rois: rois
            .into_iter()
            .map(|r| RoiDto {
                name: r.name,
                description: r.description,
                top: r.top,
                left: r.left,
                bottom: r.bottom,
                right: r.right,
            })
            .collect(),
        traced: traced.len(),
        vessels,
        summary: SummaryDto {
            vessel_count: summary.vessel_count,
            tortuous_fraction: summary.tortuous_fraction,
            means: summary
                .means
                .iter()
                .map(|&(e, value)| MetricDto {
                    estimator: e.name(),
                    value,
                    tortuous: None,
                })
                .collect(),
            image_fractal: summary.image_fractal,
        },
    };
    write_json(args.common.out.as_deref(), &dto)
}

fn run_fractal(args: InputArgs) -> Result<()> {
    let img = load_skeleton(&args.input, args.level.unwrap_or(0))?;
    let d = fractal_dimension(&img.as_view());
    info!(fractal_dimension = d, "measured {}", args.input.display());

    write_json(
        args.out.as_deref(),
        &FractalDto {
            width: img.width(),
            height: img.height(),
            fractal_dimension: d,
        },
    )
}

fn trace_image(img: &Image<u8>, cfg: &TraceConfig) -> Result<Vec<VesselCurve>> {
    let view = img.as_view();
    let mut visited = VisitMask::for_view(&view);
    trace_vessels(&view, &mut visited, cfg).context("tracing vessels")
}

fn curve_dto(curve: &VesselCurve) -> CurveDto {
    CurveDto {
        pixel_count: curve.pixel_count(),
        pixels: curve.points().iter().map(|p| [p.row, p.col]).collect(),
        xs: curve.xs().to_vec(),
        ys: curve.ys().to_vec(),
    }
}

fn apply_params_overrides(params: &mut TortuosityParams, cfg: &ScoreConfig, args: &ScoreArgs) {
    if let Some(s) = args.sampling_size.or(cfg.sampling_size) {
        params.sampling_size = s;
    }
    if let Some(t) = args.r2_threshold.or(cfg.r2_threshold) {
        params.r2_threshold = t;
    }
    if let Some(m) = args.min_pixels.or(cfg.min_pixels_per_vessel) {
        params.min_pixels_per_vessel = m;
    }
    let floor = Estimator::LinearRegression.min_points() - 1;
    if params.min_pixels_per_vessel < floor {
        warn!(
            requested = params.min_pixels_per_vessel,
            used = floor,
            "min pixels per vessel raised"
        );
        params.min_pixels_per_vessel = floor;
    }

    params.distance_threshold = args.distance_threshold.or(cfg.distance_threshold);
    params.inflection_count_threshold = args
        .inflection_count_threshold
        .or(cfg.inflection_count_threshold);
    params.curvature_threshold = args.curvature_threshold.or(cfg.curvature_threshold);
    params.density_threshold = args.density_threshold.or(cfg.density_threshold);
}

fn parse_roi(name: &str, text: &str) -> Result<Roi> {
    let parts = text
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<usize>()
                .with_context(|| format!("roi '{text}': '{v}' is not a pixel index"))
        })
        .collect::<Result<Vec<_>>>()?;

    let &[top, left, bottom, right] = parts.as_slice() else {
        bail!(
            "roi '{text}': expected top,left,bottom,right, got {} values",
            parts.len()
        );
    };
    Roi::new(name, top, left, bottom, right).with_context(|| format!("roi '{text}'"))
}

/// Loads any decodable image as 8-bit luma and binarizes it: pixels above
/// `level` become 1.
fn load_skeleton(path: &Path, level: u8) -> Result<Image<u8>> {
    ensure_file_exists(path, "input")?;
    let img = load_input_u8(path)?;
    Ok(binarize(&img, level))
}

fn binarize(img: &Image<u8>, level: u8) -> Image<u8> {
    img.as_view().map(|&v| u8::from(v > level))
}

fn load_input_u8(path: &Path) -> Result<Image<u8>> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    let luma = dyn_img.to_luma8();
    let (w, h) = luma.dimensions();
    let data = luma.into_raw();

    Image::from_vec(w as usize, h as usize, data)
        .with_context(|| format!("constructing image from {}", path.display()))
}

fn load_config(path: &Path) -> Result<ScoreConfig> {
    let data = fs::read(path).with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing config {}", path.display()))
}

fn write_json(path: Option<&Path>, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    match path {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("writing json {}", path.display()))
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&bytes).context("writing json to stdout")?;
            writeln!(stdout).context("writing json to stdout")
        }
    }
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use rt_core::{Image, Roi};
    use rt_tortuosity::TortuosityParams;

    use super::{Cli, Command, ScoreConfig, apply_params_overrides, binarize, parse_roi};

    fn score_args(argv: &[&str]) -> super::ScoreArgs {
        let mut full = vec!["rt_score", "score", "--input", "skeleton.png"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).expect("valid arguments").cmd {
            Command::Score(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn parses_roi_rectangles() {
        let roi = parse_roi("roi0", " 2, 3,7,8").expect("valid roi");
        assert_eq!(roi, Roi::new("roi0", 2, 3, 7, 8).expect("valid roi"));

        assert!(parse_roi("bad", "1,2,3").is_err());
        assert!(parse_roi("bad", "1,2,3,x").is_err());
        assert!(parse_roi("empty", "5,5,5,9").is_err());
    }

    #[test]
    fn flags_override_config_which_overrides_defaults() {
        let cfg: ScoreConfig = serde_json::from_str(
            r#"{ "sampling_size": 10, "r2_threshold": 0.9, "rois": [
                 { "name": "disc", "top": 0, "left": 0, "bottom": 4, "right": 4 } ] }"#,
        )
        .expect("valid config");
        assert_eq!(cfg.rois.len(), 1);
        assert_eq!(cfg.min_pixels_per_vessel, None);

        let args = score_args(&["--r2-threshold", "0.5", "--roi", "1,1,3,3", "--roi", "0,0,2,2"]);
        assert_eq!(args.rois.len(), 2);

        let mut params = TortuosityParams::default();
        apply_params_overrides(&mut params, &cfg, &args);
        assert_eq!(params.sampling_size, 10);
        assert_eq!(params.r2_threshold, 0.5);
        assert_eq!(params.min_pixels_per_vessel, 6);
        assert_eq!(params.density_threshold, None);
    }

    #[test]
    fn upper_thresholds_come_from_flags_or_config() {
        let cfg: ScoreConfig =
            serde_json::from_str(r#"{ "density_threshold": 0.4, "curvature_threshold": 2.0 }"#)
                .expect("valid config");
        let args = score_args(&["--density-threshold", "0.7", "--distance-threshold", "1.2"]);

        let mut params = TortuosityParams::default();
        apply_params_overrides(&mut params, &cfg, &args);
        assert_eq!(params.density_threshold, Some(0.7));
        assert_eq!(params.distance_threshold, Some(1.2));
        assert_eq!(params.curvature_threshold, Some(2.0));
        assert_eq!(params.inflection_count_threshold, None);
    }

    #[test]
    fn min_pixels_is_raised_to_regression_minimum() {
        let mut params = TortuosityParams::default();
        let args = score_args(&["--min-pixels", "0"]);
        apply_params_overrides(&mut params, &ScoreConfig::default(), &args);
        assert_eq!(params.min_pixels_per_vessel, 3);

        let cfg: ScoreConfig =
            serde_json::from_str(r#"{ "min_pixels_per_vessel": 10 }"#).expect("valid config");
        apply_params_overrides(&mut params, &cfg, &score_args(&[]));
        assert_eq!(params.min_pixels_per_vessel, 10);
    }

    #[test]
    fn config_rejects_unknown_fields() {
        assert!(serde_json::from_str::<ScoreConfig>(r#"{ "sampling": 3 }"#).is_err());
        assert_eq!(
            serde_json::from_str::<ScoreConfig>("{}").expect("empty config"),
            ScoreConfig::default()
        );
    }

    #[test]
    fn binarizes_above_level() {
        let img = Image::from_vec(4, 1, vec![0u8, 1, 128, 255]).expect("valid image");
        assert_eq!(binarize(&img, 0).data(), &[0, 1, 1, 1]);
        assert_eq!(binarize(&img, 128).data(), &[0, 0, 0, 1]);
    }
}
