//----------------------------------------
// power mod types
//----------------------------------------
use serde::Serialize;

/// A region whose integral failed in best-effort mode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternFailure {
    /// Position in the enumeration order
    pub index: usize,
    /// Human-readable pattern, e.g. `(1, 2, 2)`
    pub region: String,
    pub reason: String,
}

/// Aggregate probability together with how it was obtained.
///
/// `failed_regions` is empty unless the computation ran in best-effort mode
/// and some regions could not be integrated. `value` is then a bound, not
/// an estimate: lower for conjunctive power, upper for disjunctive power.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerReport {
    pub value: f64,
    /// Sum over the regions that integrated. For disjunctive power this is
    /// the no-rejection probability, before taking `1 - sum`.
    pub integrated_probability: f64,
    /// Sum of the per-region absolute error estimates
    pub error_estimate: f64,
    pub integrated_regions: usize,
    pub failed_regions: Vec<PatternFailure>,
}

impl PowerReport {
    pub fn is_complete(&self) -> bool {
        self.failed_regions.is_empty()
    }
}

/// `probabilities[s]` is the probability that exactly `s` arms reject.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectionCounts {
    pub probabilities: Vec<f64>,
    pub error_estimate: f64,
    pub integrated_regions: usize,
    pub failed_regions: Vec<PatternFailure>,
}

impl RejectionCounts {
    pub fn is_complete(&self) -> bool {
        self.failed_regions.is_empty()
    }

    /// Probability that at least one arm rejects
    pub fn at_least_one(&self) -> f64 {
        self.probabilities.iter().skip(1).sum()
    }
}
