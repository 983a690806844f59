//----------------------------------------
// Root lib
//----------------------------------------
//! Operating characteristics for multi-arm, multi-stage (MAMS) group
//! sequential trials in which `K` experimental arms share one control arm
//! across `J` analyses.
//!
//! The crate derives the information and correlation structure of the
//! standardized per-arm, per-stage test statistics from sample sizes and
//! allocation ratios, then computes marginal, disjunctive and conjunctive
//! power by integrating the joint normal law of those statistics over
//! enumerated stopping/rejection regions.
//!
//! Statistics are stored flat: arm `k` (1-based) at stage `j` (1-based)
//! lives at position `(k - 1) * J + j`. See [`design::StatisticIndex`].
//!
//! Cost of disjunctive/conjunctive power is `J^K` integrals of dimension up
//! to `J * K`. This grows exponentially in the number of arms and is a hard
//! scaling limit; nothing is approximated away.

/// Validated trial designs and the flat statistic index
pub mod design;
/// Crate error type
pub mod error;
/// Configuration of the integrator and the power computations
pub mod config;
pub mod information;
pub mod covariance;
/// Enumeration of stopping/rejection patterns
pub mod regions;
/// Multivariate normal probabilities
pub mod integration;
/// Marginal, disjunctive and conjunctive power
pub mod power;
#[cfg(feature = "parallel")]
mod thread_pool;

pub use config::{FailureMode, IntegratorConfig, PowerOptions};
pub use covariance::{compute_covariance::covariance, types::CovarianceMatrix};
pub use design::{StatisticIndex, TrialDesign};
pub use error::MamsErr;
pub use information::compute_information::information;
pub use integration::{GenzIntegrator, MvnEstimate, MvnIntegrator, MvnQuery};
pub use power::{
    combined::{
        conjunctive_power, conjunctive_power_with, disjunctive_power, disjunctive_power_with,
        outcome_probability, rejection_count_distribution, rejection_count_distribution_with,
    },
    marginal::{marginal_power, marginal_power_with},
    types::{PatternFailure, PowerReport, RejectionCounts},
};
pub use regions::{ArmOutcome, OutcomePattern, RejectionPattern};
