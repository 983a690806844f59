//----------------------------------------
// Disjunctive/conjunctive power and rejection counts
//----------------------------------------

use tracing::{debug, debug_span, warn};

use crate::config::PowerOptions;
use crate::design::{TrialDesign, validate};
use crate::error::MamsErr;
use crate::integration::{GenzIntegrator, MvnEstimate, MvnIntegrator};
use crate::power::{
    bounds::{check_outcome, outcome_bounds},
    evaluate::integrate_regions,
    models::{DesignModels, region_seed},
    types::{PowerReport, RejectionCounts},
};
use crate::regions::{OutcomePattern, RejectionPattern, outcome_at, pattern_at};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Partition {
    NoRejection,
    AllReject,
}

impl Partition {
    fn outcome(&self, pattern: &RejectionPattern) -> OutcomePattern {
        match self {
            Partition::NoRejection => pattern.as_futility(),
            Partition::AllReject => pattern.as_rejection(),
        }
    }
}

// One integral per pattern, J^K in all
fn partition_sum<I>(
    design: &TrialDesign,
    options: &PowerOptions,
    integrator: &I,
    partition: Partition,
) -> Result<PowerReport, MamsErr>
where
    I: MvnIntegrator + ?Sized,
{
    let models = DesignModels::build(design)?;
    let (stages, arms) = (design.stages, design.arms);
    let count = validate::checked_pattern_count(stages, arms)?;
    debug!(patterns = count, dim = models.index.len(), "enumerating rejection patterns");

    let seed = options.integrator.seed;
    let regions = integrate_regions(
        count,
        options,
        integrator,
        |n| {
            let outcome = partition.outcome(&pattern_at(stages, arms, n));
            let (lower, upper) = outcome_bounds(design, &outcome);
            models.full_query(lower, upper, region_seed(seed, n))
        },
        |n| format!("pattern {}", pattern_at(stages, arms, n)),
    )?;

    let total = regions.total_probability();
    let report = PowerReport {
        value: total,
        integrated_probability: total,
        error_estimate: regions.total_error(),
        integrated_regions: regions.integrated(),
        failed_regions: regions.failures,
    };
    if !report.is_complete() {
        warn!(
            failed = report.failed_regions.len(),
            "power is a partial sum over the regions that integrated"
        );
    }
    Ok(report)
}

/// Probability that at least one arm's null hypothesis is rejected.
#[allow(non_snake_case)]
pub fn disjunctive_power(
    J: usize,
    K: usize,
    f: &[f64],
    e: &[f64],
    delta: f64,
    n0: &[f64],
    r: &[f64],
    sig: f64,
) -> Result<f64, MamsErr> {
    let design = TrialDesign::new(J, K, f.to_vec(), e.to_vec(), delta, n0.to_vec(), r.to_vec(), sig)?;
    let options = PowerOptions::default();
    let integrator = GenzIntegrator::new(options.integrator.clone());
    Ok(disjunctive_power_with(&design, &options, &integrator)?.value)
}

/// `1 - sum_X P(no arm rejects, arm k last seen at stage X[k])`.
///
/// `integrated_probability` is the no-rejection sum itself. When patterns
/// failed in best-effort mode their mass is missing from that sum, so
/// `value` is an upper bound on the power.
pub fn disjunctive_power_with<I>(
    design: &TrialDesign,
    options: &PowerOptions,
    integrator: &I,
) -> Result<PowerReport, MamsErr>
where
    I: MvnIntegrator + ?Sized,
{
    let _span = debug_span!("disjunctive_power", J = design.stages, K = design.arms).entered();
    design.validate()?;
    if !design.closes_at_final_stage() {
        warn!(
            f = ?design.f.last(),
            e = ?design.e.last(),
            "final futility bound is below final efficacy bound; \
            the final-stage band between them is counted as rejection"
        );
    }
    let mut report = partition_sum(design, options, integrator, Partition::NoRejection)?;
    report.value = (1.0 - report.integrated_probability).clamp(0.0, 1.0);
    debug!(power = report.value, error = report.error_estimate, "disjunctive power");
    Ok(report)
}

/// Probability that every arm's null hypothesis is rejected.
#[allow(non_snake_case)]
pub fn conjunctive_power(
    J: usize,
    K: usize,
    f: &[f64],
    e: &[f64],
    delta: f64,
    n0: &[f64],
    r: &[f64],
    sig: f64,
) -> Result<f64, MamsErr> {
    let design = TrialDesign::new(J, K, f.to_vec(), e.to_vec(), delta, n0.to_vec(), r.to_vec(), sig)?;
    let options = PowerOptions::default();
    let integrator = GenzIntegrator::new(options.integrator.clone());
    Ok(conjunctive_power_with(&design, &options, &integrator)?.value)
}

/// `sum_X P(every arm rejects, arm k at stage X[k])`. With failed patterns
/// in best-effort mode, `value` is a lower bound.
pub fn conjunctive_power_with<I>(
    design: &TrialDesign,
    options: &PowerOptions,
    integrator: &I,
) -> Result<PowerReport, MamsErr>
where
    I: MvnIntegrator + ?Sized,
{
    let _span = debug_span!("conjunctive_power", J = design.stages, K = design.arms).entered();
    let mut report = partition_sum(design, options, integrator, Partition::AllReject)?;
    report.value = report.integrated_probability.clamp(0.0, 1.0);
    debug!(power = report.value, error = report.error_estimate, "conjunctive power");
    Ok(report)
}

pub fn outcome_probability<I>(
    design: &TrialDesign,
    outcome: &OutcomePattern,
    integrator: &I,
    seed: Option<u64>,
) -> Result<MvnEstimate, MamsErr>
where
    I: MvnIntegrator + ?Sized,
{
    let models = DesignModels::build(design)?;
    check_outcome(design, outcome)?;
    let (lower, upper) = outcome_bounds(design, outcome);
    integrator
        .integrate(&models.full_query(lower, upper, seed))
        .map_err(|err| err.in_region(format!("outcome {outcome}")).into())
}

pub fn rejection_count_distribution(design: &TrialDesign) -> Result<RejectionCounts, MamsErr> {
    let options = PowerOptions::default();
    let integrator = GenzIntegrator::new(options.integrator.clone());
    rejection_count_distribution_with(design, &options, &integrator)
}

/// Entry `s` is P(exactly `s` arms reject). The entries form a complete
/// partition, and sum to one, when the final futility and efficacy bounds
/// coincide.
pub fn rejection_count_distribution_with<I>(
    design: &TrialDesign,
    options: &PowerOptions,
    integrator: &I,
) -> Result<RejectionCounts, MamsErr>
where
    I: MvnIntegrator + ?Sized,
{
    let _span = debug_span!("rejection_counts", J = design.stages, K = design.arms).entered();
    let models = DesignModels::build(design)?;
    let (stages, arms) = (design.stages, design.arms);
    let count = validate::checked_pattern_count(2 * stages, arms)?;
    if !design.closes_at_final_stage() {
        warn!("final-stage bounds leave a gap; rejection counts will not sum to one");
    }

    let seed = options.integrator.seed;
    let regions = integrate_regions(
        count,
        options,
        integrator,
        |n| {
            let (lower, upper) = outcome_bounds(design, &outcome_at(stages, arms, n));
            models.full_query(lower, upper, region_seed(seed, n))
        },
        |n| format!("outcome {}", outcome_at(stages, arms, n)),
    )?;

    let mut probabilities = vec![0.0; arms + 1];
    for (n, estimate) in regions.estimates.iter().enumerate() {
        if let Some(estimate) = estimate {
            probabilities[outcome_at(stages, arms, n).rejections()] += estimate.probability;
        }
    }
    debug!(?probabilities, "rejection count distribution");
    Ok(RejectionCounts {
        probabilities,
        error_estimate: regions.total_error(),
        integrated_regions: regions.integrated(),
        failed_regions: regions.failures,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::config::IntegratorConfig;
    use crate::integration::{MvnQuery, error::NumericIntegrationError, std_normal::std_normal_cdf};
    use crate::regions::ArmOutcome;

    // Product of univariate probabilities, ignoring correlation
    #[derive(Default)]
    struct ClosedFormStub {
        seen: Mutex<Vec<(Vec<f64>, Vec<f64>)>>,
    }

    impl MvnIntegrator for ClosedFormStub {
        fn integrate(&self, query: &MvnQuery) -> Result<MvnEstimate, NumericIntegrationError> {
            self.seen
                .lock()
                .unwrap()
                .push((query.lower.clone(), query.upper.clone()));
            let p = (0..query.dim())
                .map(|i| {
                    std_normal_cdf(query.upper[i] - query.mean[i])
                        - std_normal_cdf(query.lower[i] - query.mean[i])
                })
                .product();
            Ok(MvnEstimate::exact(p))
        }
    }

    fn single_stage(arms: usize) -> TrialDesign {
        TrialDesign::new(
            1,
            arms,
            vec![2.0],
            vec![2.0],
            0.4,
            vec![50.0],
            vec![1.0],
            1.0,
        )
        .unwrap()
    }

    fn two_stage(arms: usize) -> TrialDesign {
        TrialDesign::new(
            2,
            arms,
            vec![0.0, 2.086],
            vec![2.782, 2.086],
            0.545,
            vec![47.0, 94.0],
            vec![0.5, 0.5],
            1.0,
        )
        .unwrap()
    }

    fn integrator() -> GenzIntegrator {
        GenzIntegrator::new(IntegratorConfig::default().with_tolerance(1e-5))
    }

    #[test]
    fn single_stage_with_stub() {
        let design = single_stage(3);
        let mu = 0.4 * 25f64.sqrt();
        let stub = ClosedFormStub::default();
        let options = PowerOptions::default().sequential();

        let disjunctive = disjunctive_power_with(&design, &options, &stub).unwrap();
        let none = std_normal_cdf(2.0 - mu).powi(3);
        assert!((disjunctive.value - (1.0 - none)).abs() < 1e-12);
        assert_eq!(disjunctive.integrated_regions, 1);

        let conjunctive = conjunctive_power_with(&design, &options, &stub).unwrap();
        let all = (1.0 - std_normal_cdf(2.0 - mu)).powi(3);
        assert!((conjunctive.value - all).abs() < 1e-12);

        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen[0].1, vec![2.0; 3]);
        assert_eq!(seen[1].0, vec![2.0; 3]);
    }

    #[test]
    fn one_arm_one_stage_matches_marginal() {
        let design = single_stage(1);
        let options = PowerOptions::default();
        let disjunctive = disjunctive_power_with(&design, &options, &integrator()).unwrap();
        let conjunctive = conjunctive_power_with(&design, &options, &integrator()).unwrap();
        let marginal =
            crate::power::marginal::marginal_power_with(&design, &options, &integrator()).unwrap();
        assert!((disjunctive.value - marginal[0]).abs() < 1e-12);
        assert!((conjunctive.value - marginal[0]).abs() < 1e-12);
    }

    #[test]
    fn stub_sees_every_pattern_once() {
        let design = two_stage(3);
        let stub = ClosedFormStub::default();
        conjunctive_power_with(&design, &PowerOptions::default(), &stub).unwrap();
        let seen = stub.seen.lock().unwrap();
        assert_eq!(seen.len(), 8);
        // Every query constrains each arm's stage 1 statistic
        for (lower, upper) in seen.iter() {
            for arm in 0..3 {
                assert!(lower[2 * arm].is_finite());
                assert!(lower[2 * arm] < upper[2 * arm]);
            }
        }
    }

    #[test]
    fn disjunctive_at_least_conjunctive() {
        let design = two_stage(2);
        let options = PowerOptions::default();
        let disjunctive = disjunctive_power_with(&design, &options, &integrator()).unwrap();
        let conjunctive = conjunctive_power_with(&design, &options, &integrator()).unwrap();
        assert!(disjunctive.is_complete() && conjunctive.is_complete());
        assert!(disjunctive.value >= conjunctive.value);
        assert!((0.0..=1.0).contains(&disjunctive.value));
        assert!((0.0..=1.0).contains(&conjunctive.value));
    }

    #[test]
    fn rejection_counts_partition_outcome_space() {
        let design = two_stage(2);
        let options = PowerOptions::default();
        let counts = rejection_count_distribution_with(&design, &options, &integrator()).unwrap();
        assert_eq!(counts.probabilities.len(), 3);
        assert_eq!(counts.integrated_regions, 16);
        let total: f64 = counts.probabilities.iter().sum();
        assert!((total - 1.0).abs() < 1e-3, "partition sums to {total}");

        let disjunctive = disjunctive_power_with(&design, &options, &integrator()).unwrap();
        let conjunctive = conjunctive_power_with(&design, &options, &integrator()).unwrap();
        assert!((counts.at_least_one() - disjunctive.value).abs() < 1e-3);
        assert!((counts.probabilities[2] - conjunctive.value).abs() < 1e-3);
    }

    #[test]
    fn parallel_matches_sequential() {
        let design = two_stage(3);
        let parallel =
            conjunctive_power_with(&design, &PowerOptions::default(), &integrator()).unwrap();
        let sequential =
            conjunctive_power_with(&design, &PowerOptions::default().sequential(), &integrator())
                .unwrap();
        assert_eq!(parallel.value, sequential.value);
    }

    #[test]
    fn outcome_probability_of_mixed_outcome() {
        let design = two_stage(2);
        let outcome = OutcomePattern(vec![ArmOutcome::Reject(1), ArmOutcome::Futility(2)]);
        let est = outcome_probability(&design, &outcome, &integrator(), Some(1)).unwrap();
        assert!(est.probability > 0.0 && est.probability < 1.0);

        let bad = OutcomePattern(vec![ArmOutcome::Reject(3), ArmOutcome::Futility(1)]);
        assert!(outcome_probability(&design, &bad, &integrator(), Some(1)).is_err());
    }

    #[test]
    fn best_effort_reports_failed_patterns() {
        /// Fails whenever arm 1 stops at stage 2
        struct FailsLate;
        impl MvnIntegrator for FailsLate {
            fn integrate(&self, query: &MvnQuery) -> Result<MvnEstimate, NumericIntegrationError> {
                if query.lower[0].is_finite() && query.upper[0].is_finite() {
                    Err(NumericIntegrationError::NonFiniteEstimate)
                } else {
                    Ok(MvnEstimate::exact(0.01))
                }
            }
        }
        let design = two_stage(2);
        let report =
            disjunctive_power_with(&design, &PowerOptions::default().best_effort(), &FailsLate)
                .unwrap();
        assert_eq!(report.integrated_regions, 2);
        assert_eq!(report.failed_regions.len(), 2);
        assert_eq!(report.failed_regions[0].region, "pattern (2, 1)");
        // Only the two integrated no-rejection cells are known
        assert!((report.integrated_probability - 0.02).abs() < 1e-12);
        assert!((report.value - 0.98).abs() < 1e-12);
        assert!(!report.is_complete());

        let conjunctive =
            conjunctive_power_with(&design, &PowerOptions::default().best_effort(), &FailsLate)
                .unwrap();
        assert_eq!(conjunctive.value, conjunctive.integrated_probability);
        assert!((conjunctive.value - 0.02).abs() < 1e-12);

        let err = disjunctive_power_with(&design, &PowerOptions::default(), &FailsLate).unwrap_err();
        assert_eq!(
            format!("{err}"),
            "while integrating multivariate normal: pattern (2, 1): \
            integrator returned a non-finite estimate"
        );
    }

    #[test]
    fn configuration_checked_before_integration() {
        let err = conjunctive_power(2, 3, &[0.0, 2.0], &[2.5], 0.5, &[10.0, 20.0], &[1.0, 1.0], 1.0)
            .unwrap_err();
        assert!(err.is_configuration());
    }
}
