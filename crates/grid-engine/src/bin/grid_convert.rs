//! Command-line driver for grid conversion.
//!
//! Loads a scenario (source grid, destination grid, conversion settings),
//! fills the source with a synthetic field, converts it and prints a JSON
//! summary of the result.

use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use serde_json::json;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use grid_engine::{
    ConvertConfig, Grid, GridConverter, InterpMethod, ProgressReporter, ScenarioConfig, VectorField,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FieldKind {
    /// Scalar temperature-like field in Kelvin
    Temperature,
    /// Solid-body eastward wind in m/s
    Wind,
}

#[derive(Parser, Debug)]
#[command(name = "grid-convert")]
#[command(about = "Convert synthetic fields between grids and projections")]
struct Args {
    /// Scenario file path (YAML); the built-in lon/lat to OSI SAF scenario
    /// is used when omitted
    #[arg(short, long)]
    config: Option<String>,

    /// Synthetic field to convert
    #[arg(short, long, value_enum, default_value = "temperature")]
    field: FieldKind,

    /// Interpolation method, overrides the scenario setting
    #[arg(short, long)]
    method: Option<String>,

    /// Number of conversions to run with the same bound tables
    #[arg(long, default_value_t = 1)]
    repeat: usize,

    /// Log level
    #[arg(long, default_value = "info", env = "LOG_LEVEL")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let mut scenario = match &args.config {
        Some(path) => ScenarioConfig::from_yaml_file(path)
            .with_context(|| format!("Failed to load scenario from {}", path))?,
        None => ScenarioConfig::default(),
    };
    if let Some(method) = &args.method {
        scenario.convert.interpolation = method
            .parse::<InterpMethod>()
            .with_context(|| format!("Invalid --method {}", method))?;
    }

    let (src, dst) = scenario.build().context("Failed to build grids")?;
    info!(
        src_points = src.n_points(),
        dst_points = dst.n_points(),
        src_projection = src.projection().name(),
        dst_projection = dst.projection().name(),
        "Built grids"
    );

    let config: ConvertConfig = scenario.convert.clone();
    let method = config.interpolation;
    let converter =
        GridConverter::with_config(&src, &dst, config).context("Failed to bind grids")?;

    let (lon, lat) = geographic_coordinates(&src);
    let repeat = args.repeat.max(1);
    let mut progress = ProgressReporter::new(repeat).with_messages(10);
    let start = Instant::now();

    let mut components = Vec::new();
    for task in 0..repeat {
        components = match args.field {
            FieldKind::Temperature => {
                let field = temperature(&lon, &lat);
                vec![("t", converter.convert_scalar(&field, method)?)]
            }
            FieldKind::Wind => {
                let field = VectorField {
                    u: lat.iter().map(|la| 10.0 * la.to_radians().cos()).collect(),
                    v: vec![0.0; lat.len()],
                };
                let out = converter.convert_vector(&field, method)?;
                vec![("u", out.u), ("v", out.v)]
            }
        };
        progress.update(task);
    }
    let elapsed = start.elapsed();

    let summary = json!({
        "source_points": src.n_points(),
        "destination_points": dst.n_points(),
        "method": method.as_str(),
        "repeat": repeat,
        "elapsed_ms": elapsed.as_millis() as u64,
        "components": components
            .iter()
            .map(|(name, values)| (name.to_string(), stats(values)))
            .collect::<serde_json::Map<_, _>>(),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn init_tracing(args: &Args) -> Result<()> {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.log_json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Longitude and latitude of every grid point.
fn geographic_coordinates(grid: &Grid) -> (Vec<f64>, Vec<f64>) {
    let proj = grid.projection();
    grid.x()
        .iter()
        .zip(grid.y())
        .map(|(&x, &y)| proj.inverse(x, y))
        .unzip()
}

fn temperature(lon: &[f64], lat: &[f64]) -> Vec<f64> {
    lon.iter()
        .zip(lat)
        .map(|(&lo, &la)| {
            let phi = la.to_radians();
            240.0 + 60.0 * phi.cos().powi(2) + 5.0 * (2.0 * lo.to_radians()).cos() * phi.cos()
        })
        .collect()
}

fn stats(values: &[f64]) -> serde_json::Value {
    let valid: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if valid.is_empty() {
        return json!({ "valid": 0 });
    }
    let min = valid.iter().copied().fold(f64::INFINITY, f64::min);
    let max = valid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    json!({ "valid": valid.len(), "min": min, "max": max, "mean": mean })
}
