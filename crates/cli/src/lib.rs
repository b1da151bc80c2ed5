use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use plotcal_core::{
    Axis, Bound, CalibrationSession, Curve, CurveHitTester, DisplayTransform, EngineConfig,
    PageCoordinate, Rotation, ScaleKind, SelectionOutcome,
};
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "plotcal")]
#[command(about = "Calibrate plot axes and convert curve points to data values")]
pub struct Cli {
    /// Engine configuration file (JSON).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Calibrate from a scenario and print converted points as JSON.
    Convert {
        #[arg(value_name = "SCENARIO")]
        scenario: PathBuf,
    },
    /// Print the curve nearest to a raw page position.
    Hit {
        #[arg(value_name = "SCENARIO")]
        scenario: PathBuf,
        #[arg(long, allow_hyphen_values = true)]
        x: f64,
        #[arg(long, allow_hyphen_values = true)]
        y: f64,
        /// Pick radius in display units; overrides the config file.
        #[arg(long)]
        threshold: Option<f64>,
        /// Display units per page unit.
        #[arg(long, default_value_t = 1.0)]
        zoom: f64,
    },
    /// Print CLI version.
    Version,
}

/// Scripted digitizing session
#[derive(Debug, Deserialize)]
struct Scenario {
    /// Page rotation in degrees; falls back to the configured initial rotation
    #[serde(default)]
    rotation: Option<i32>,
    curves: Vec<Curve>,
    x: Option<AxisSpec>,
    y: Option<AxisSpec>,
    #[serde(default)]
    points: Vec<PageCoordinate>,
}

#[derive(Debug, Deserialize)]
struct AxisSpec {
    curve: u32,
    min: f64,
    max: f64,
    #[serde(default)]
    scale: Option<ScaleKind>,
}

#[derive(Debug, Serialize)]
struct ConvertOutput {
    session: String,
    rotation: Rotation,
    values: Vec<PageCoordinate>,
}

#[derive(Debug, Serialize)]
struct HitOutput {
    curve: Option<u32>,
}

pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = Cli::parse_from(args);
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Convert { scenario } => run_convert(&config, &scenario),
        Commands::Hit { scenario, x, y, threshold, zoom } => {
            run_hit(&config, &scenario, PageCoordinate::new(x, y), threshold, zoom)
        }
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            ensure_file_exists(path)?;
            EngineConfig::load(path).context("failed to load config")
        }
        None => Ok(EngineConfig::default()),
    }
}

fn load_scenario(path: &Path) -> Result<Scenario> {
    ensure_file_exists(path)?;

    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario {}", path.display()))?;

    serde_json::from_str(&json).context("failed to parse scenario")
}

fn run_convert(config: &EngineConfig, path: &Path) -> Result<()> {
    let scenario = load_scenario(path)?;

    let mut session = CalibrationSession::with_config(config)?;
    if let Some(degrees) = scenario.rotation {
        session.set_rotation(degrees).context("failed to apply rotation")?;
    }

    for (axis, spec) in [(Axis::X, &scenario.x), (Axis::Y, &scenario.y)] {
        let Some(spec) = spec else {
            anyhow::bail!("scenario has no {axis} axis calibration");
        };

        calibrate_axis(&mut session, axis, spec, &scenario.curves)
            .with_context(|| format!("failed to calibrate {axis} axis"))?;
    }

    let values = scenario
        .points
        .iter()
        .enumerate()
        .map(|(index, p)| {
            session.convert(p.x, p.y).with_context(|| format!("failed to convert point {index}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let payload = ConvertOutput {
        session: session.id().to_string(),
        rotation: session.rotation(),
        values,
    };

    let json = serde_json::to_string_pretty(&payload)?;
    println!("{json}");

    Ok(())
}

fn calibrate_axis(
    session: &mut CalibrationSession,
    axis: Axis,
    spec: &AxisSpec,
    curves: &[Curve],
) -> Result<()> {
    session.begin_calibration(axis);

    match session.select_curve(spec.curve, curves)? {
        SelectionOutcome::AxisCalibrated { .. } => {}
        SelectionOutcome::CalibrationFailed { error, .. } => return Err(error.into()),
        other => anyhow::bail!("unexpected selection outcome: {other:?}"),
    }

    session.set_bound(axis, Bound::Min, spec.min);
    session.set_bound(axis, Bound::Max, spec.max);
    if let Some(kind) = spec.scale {
        session.set_scale_kind(axis, kind);
    }

    Ok(())
}

fn run_hit(
    config: &EngineConfig,
    path: &Path,
    pointer: PageCoordinate,
    threshold: Option<f64>,
    zoom: f64,
) -> Result<()> {
    let scenario = load_scenario(path)?;

    if !zoom.is_finite() || zoom <= 0.0 {
        anyhow::bail!("--zoom must be a finite number > 0");
    }

    let degrees = scenario.rotation.unwrap_or(config.initial_rotation);
    let rotation = Rotation::from_degrees(degrees).context("failed to apply rotation")?;
    let transform = DisplayTransform { zoom, rotation, ..DisplayTransform::default() };

    let mut hit_config = config.hit_test;
    if let Some(threshold) = threshold {
        hit_config.threshold = threshold;
    }

    let tester = CurveHitTester::with_config(hit_config);
    let projected: Vec<Curve> =
        scenario.curves.iter().map(|c| transform.project_curve(c)).collect();
    let hit = tester.hit(&transform.to_display(pointer), &projected);

    log::debug!("hit test at {pointer:?} (zoom {zoom}): {hit:?}");

    let json = serde_json::to_string_pretty(&HitOutput { curve: hit.map(|h| h.curve_id) })?;
    println!("{json}");

    Ok(())
}

fn ensure_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        anyhow::bail!("file does not exist: {}", path.display());
    }

    if !path.is_file() {
        anyhow::bail!("path is not a file: {}", path.display());
    }

    Ok(())
}
