//! attrition-cli: Command-line harness for the attrition engine.
//!
//! Loads rows from a JSON file, runs the full computation, and prints the
//! report as JSON or text. Also exposes the forward projection and rate
//! inference directly. Logs go to stderr; stdout carries only results.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde_json::{json, Value};
use tracing::info;

use attrition_core::normalize::parse_rows;
use attrition_core::traits::AttritionModel;
use attrition_core::types::{Count, DailyLosses, Day, RatePct, Reconciliation};
use attrition_decay::CompoundDecay;
use attrition_rollup::{ComputeOptions, RollupEngine};

mod render;
mod settings;

/// Longest trajectory `project` will print.
const MAX_PROJECTION_DAYS: i64 = 3650;

/// Attrition tracking and combat-power projection.
#[derive(Parser)]
#[command(name = "attrition-cli")]
#[command(version, about = "Project when a unit's combat power falls below a threshold.")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, global = true, default_value = "text")]
    log_format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-row figures and unit/group rollups from a rows file.
    Compute(ComputeArgs),
    /// Project remaining strength forward under a constant daily rate.
    Project(ProjectArgs),
    /// Infer the daily rate from observed daily losses.
    Infer(InferArgs),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PolicyArg {
    /// Final loss is the larger of manual and modeled.
    ManualWins,
    /// Final loss is the modeled figure whenever modeling is on.
    ModelWins,
}

impl From<PolicyArg> for Reconciliation {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::ManualWins => Reconciliation::ManualWins,
            PolicyArg::ModelWins => Reconciliation::ModelWins,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Args)]
struct ComputeArgs {
    /// JSON file holding an array of row objects.
    #[arg(short, long)]
    rows: PathBuf,

    /// Selected day (clamped to 1..=5).
    #[arg(short, long, default_value_t = 1, allow_negative_numbers = true)]
    day: i64,

    /// Disable the attrition model; use manual losses only.
    #[arg(long)]
    no_model: bool,

    /// How manual and modeled losses combine.
    #[arg(short, long, value_enum, default_value = "manual-wins")]
    policy: PolicyArg,

    /// Threshold fraction for day-to-threshold (overrides the config file).
    #[arg(short, long)]
    target_fraction: Option<f64>,

    /// Engine config file (default: $ATTRITION_CONFIG or <config dir>/attrition/engine.json).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,
}

#[derive(Args)]
struct ProjectArgs {
    /// Starting on-hand count.
    #[arg(long)]
    on_hand: f64,

    /// Daily attrition rate in percent (clamped to 0..=100).
    #[arg(long, allow_negative_numbers = true)]
    rate: f64,

    /// Number of days to project (at most 3650).
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(0..=MAX_PROJECTION_DAYS))]
    days: u32,

    /// Threshold fraction for day-to-threshold.
    #[arg(short, long, default_value_t = attrition_core::constants::DEFAULT_TARGET_FRACTION)]
    target_fraction: f64,

    /// Output format.
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Args)]
struct InferArgs {
    /// On-hand count before losses.
    #[arg(long)]
    on_hand: u64,

    /// Daily destroyed counts, comma-separated (missing or invalid entries count as 0).
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    losses: Vec<String>,

    /// Day through which losses are observed (clamped to 1..=5).
    #[arg(short, long, default_value_t = 5, allow_negative_numbers = true)]
    day: i64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_level, &cli.log_format);

    match cli.command {
        Commands::Compute(args) => compute(args),
        Commands::Project(args) => project(args),
        Commands::Infer(args) => infer(args),
    }
}

/// Run the full pipeline over a rows file.
fn compute(args: ComputeArgs) -> Result<()> {
    let config = settings::resolve(args.config, args.target_fraction)?;
    let engine = RollupEngine::compound(config).context("Invalid engine configuration")?;

    let document = std::fs::read_to_string(&args.rows)
        .with_context(|| format!("Failed to read rows file: {}", args.rows.display()))?;
    let raw = parse_rows(&document)
        .with_context(|| format!("Invalid rows file: {}", args.rows.display()))?;

    let options = ComputeOptions::for_day(args.day)
        .with_modeling(!args.no_model)
        .with_policy(args.policy.into());

    info!(
        rows = raw.len(),
        day = options.day.get(),
        modeling = options.modeling,
        policy = %options.policy,
        "computing report"
    );

    let report = engine.compute_raw(&raw, options);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => print!("{}", render::report_text(&report)),
    }
    Ok(())
}

/// Print the forward trajectory and the day-to-threshold for one rate.
fn project(args: ProjectArgs) -> Result<()> {
    let model = CompoundDecay::new();
    let rate = RatePct::new(args.rate);
    let trajectory = model.trajectory(args.on_hand, rate, args.days);
    let threshold = model.days_to_fraction(rate, args.target_fraction);

    match args.format {
        OutputFormat::Json => {
            let out = json!({
                "on_hand": args.on_hand,
                "rate": rate,
                "trajectory": trajectory,
                "target_fraction": args.target_fraction,
                "days_to_threshold": threshold,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        OutputFormat::Text => {
            println!("Projection at {rate} per day from {}", args.on_hand);
            print!("{}", render::trajectory_text(&trajectory));
            println!(
                "Days to {:.0}% strength: {threshold}",
                args.target_fraction * 100.0
            );
        }
    }
    Ok(())
}

/// Print the inferred rate and the remaining count it reproduces.
fn infer(args: InferArgs) -> Result<()> {
    let model = CompoundDecay::new();
    let on_hand = Count::new(args.on_hand);
    let losses = DailyLosses::from_counts(
        args.losses
            .iter()
            .map(|entry| Count::from_value(&Value::String(entry.clone()))),
    );
    let day = Day::new(args.day);

    let rate = model.infer_rate(on_hand, &losses, day);
    let remaining = model.remaining(on_hand.as_f64(), rate, day.get());

    let out = json!({
        "on_hand": on_hand,
        "destroyed_by_day": losses,
        "day": day,
        "observed_destroyed": losses.through(day).at_most(on_hand),
        "rate": rate,
        "remaining": remaining,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value
/// defaults to human-readable text. Both write to stderr.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
