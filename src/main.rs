use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mams_power::{
    GenzIntegrator, IntegratorConfig, PowerOptions, PowerReport, RejectionCounts, TrialDesign,
    conjunctive_power_with, disjunctive_power_with, marginal_power_with,
    rejection_count_distribution_with,
};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum Measure {
    Marginal,
    Disjunctive,
    Conjunctive,
    /// Distribution of the number of rejected arms
    Counts,
    All,
}

impl Measure {
    fn includes(self, other: Measure) -> bool {
        self == Measure::All || self == other
    }
}

/// Power of a multi-arm multi-stage trial design
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Trial design as JSON: J, K, n0, r, delta, sig, e, f
    design: PathBuf,

    #[arg(long, value_enum, default_value_t = Measure::All)]
    measure: Measure,

    /// Base seed for the integrator
    #[arg(long)]
    seed: Option<u64>,

    /// Absolute error tolerance per integral
    #[arg(long)]
    tolerance: Option<f64>,

    /// Report partial sums instead of aborting when a region fails
    #[arg(long, default_value_t = false)]
    best_effort: bool,

    /// Evaluate regions on the calling thread only
    #[arg(long, default_value_t = false)]
    sequential: bool,
}

#[derive(Serialize)]
struct Output {
    design: TrialDesign,
    #[serde(skip_serializing_if = "Option::is_none")]
    marginal: Option<Vec<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disjunctive: Option<PowerReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    conjunctive: Option<PowerReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rejection_counts: Option<RejectionCounts>,
}

fn options(args: &Args) -> PowerOptions {
    let mut integrator = IntegratorConfig::default();
    if let Some(seed) = args.seed {
        integrator = integrator.with_seed(Some(seed));
    }
    if let Some(tolerance) = args.tolerance {
        integrator = integrator.with_tolerance(tolerance);
    }
    let mut options = PowerOptions::default().with_integrator(integrator);
    if args.best_effort {
        options = options.best_effort();
    }
    if args.sequential {
        options = options.sequential();
    }
    options
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let raw = std::fs::read_to_string(&args.design)
        .with_context(|| format!("reading {}", args.design.display()))?;
    let design: TrialDesign = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", args.design.display()))?;
    design.validate()?;

    let options = options(&args);
    let integrator = GenzIntegrator::new(options.integrator.clone());
    info!(J = design.stages, K = design.arms, measure = ?args.measure, "evaluating design");

    let measure = args.measure;
    let mut output = Output {
        design: design.clone(),
        marginal: None,
        disjunctive: None,
        conjunctive: None,
        rejection_counts: None,
    };
    if measure.includes(Measure::Marginal) {
        output.marginal = Some(marginal_power_with(&design, &options, &integrator)?);
    }
    if measure.includes(Measure::Disjunctive) {
        output.disjunctive = Some(disjunctive_power_with(&design, &options, &integrator)?);
    }
    if measure.includes(Measure::Conjunctive) {
        output.conjunctive = Some(conjunctive_power_with(&design, &options, &integrator)?);
    }
    if measure.includes(Measure::Counts) {
        output.rejection_counts =
            Some(rejection_count_distribution_with(&design, &options, &integrator)?);
    }

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
