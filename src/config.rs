//! Configuration for the integrator and the power computations.

use serde::{Deserialize, Serialize};

/// Settings of the randomized lattice integrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Target absolute error per probability (default: 1e-5).
    pub abs_tolerance: f64,

    /// Lattice points per random shift on the first pass (default: 1,000).
    pub min_points: usize,

    /// Cap on lattice points per shift; the count doubles up to here
    /// (default: 256,000).
    pub max_points: usize,

    /// Independent random shifts; their spread gives the error estimate
    /// (default: 12).
    pub shifts: usize,

    /// Error estimate is this many standard errors (default: 3.5).
    pub error_multiplier: f64,

    /// Base seed. With a seed, results are reproducible and independent of
    /// thread count (default: Some(0x5EED)).
    pub seed: Option<u64>,

    /// Retries at `max_points` with fresh shifts after the tolerance is
    /// missed, each accepting `relax_factor` times the previous tolerance
    /// (default: 2).
    pub max_retries: usize,

    /// Tolerance multiplier per retry (default: 10.0).
    pub relax_factor: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            abs_tolerance: 1e-5,
            min_points: 1_000,
            max_points: 256_000,
            shifts: 12,
            error_multiplier: 3.5,
            seed: Some(0x5EED),
            max_retries: 2,
            relax_factor: 10.0,
        }
    }
}

impl IntegratorConfig {
    pub fn with_tolerance(mut self, abs_tolerance: f64) -> Self {
        self.abs_tolerance = abs_tolerance;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_points(mut self, min_points: usize, max_points: usize) -> Self {
        self.min_points = min_points.max(1);
        self.max_points = max_points.max(self.min_points);
        self
    }

    pub fn with_retries(mut self, max_retries: usize, relax_factor: f64) -> Self {
        self.max_retries = max_retries;
        self.relax_factor = relax_factor;
        self
    }
}

/// What to do when a single region fails to integrate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FailureMode {
    /// Abort the whole computation with the region's error.
    #[default]
    Abort,
    /// Sum the regions that did integrate and report the failed ones.
    BestEffort,
}

/// Options for the power computations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerOptions {
    pub integrator: IntegratorConfig,

    /// Default: [`FailureMode::Abort`]. Partial sums are never returned silently.
    pub failure_mode: FailureMode,

    /// Spread patterns over the shared thread pool (default: true). Has no
    /// effect without the `parallel` feature.
    pub parallel: bool,
}

impl Default for PowerOptions {
    fn default() -> Self {
        Self {
            integrator: IntegratorConfig::default(),
            failure_mode: FailureMode::Abort,
            parallel: true,
        }
    }
}

impl PowerOptions {
    pub fn best_effort(mut self) -> Self {
        self.failure_mode = FailureMode::BestEffort;
        self
    }

    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_integrator(mut self, integrator: IntegratorConfig) -> Self {
        self.integrator = integrator;
        self
    }
}
