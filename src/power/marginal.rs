use tracing::{debug, debug_span};

use crate::config::{FailureMode, PowerOptions};
use crate::design::TrialDesign;
use crate::error::MamsErr;
use crate::integration::{
    GenzIntegrator, MvnIntegrator, MvnQuery, std_normal::std_normal_sf,
};
use crate::power::{
    evaluate::integrate_regions,
    models::{DesignModels, region_seed},
};

/// Probability that each arm's null hypothesis is rejected, regardless of
/// the other arms.
#[allow(non_snake_case)]
pub fn marginal_power(
    J: usize,
    K: usize,
    f: &[f64],
    e: &[f64],
    delta: f64,
    n0: &[f64],
    r: &[f64],
    sig: f64,
) -> Result<Vec<f64>, MamsErr> {
    let design = TrialDesign::new(J, K, f.to_vec(), e.to_vec(), delta, n0.to_vec(), r.to_vec(), sig)?;
    let options = PowerOptions::default();
    let integrator = GenzIntegrator::new(options.integrator.clone());
    marginal_power_with(&design, &options, &integrator)
}

// f <= Z <= e through stage j - 1, then Z_j > e_j, on the arm's own block
fn first_crossing_query(
    design: &TrialDesign,
    models: &DesignModels,
    arm: usize,
    stage: usize,
    seed: Option<u64>,
) -> MvnQuery {
    let positions: Vec<usize> = (0..=stage).map(|j| models.index.flat(arm, j)).collect();
    let mut lower: Vec<f64> = design.f[..stage].to_vec();
    let mut upper: Vec<f64> = design.e[..stage].to_vec();
    lower.push(design.e[stage]);
    upper.push(f64::INFINITY);
    models.sub_query(&positions, lower, upper, seed)
}

/// Marginal power with explicit options and integrator.
///
/// An arm can only reject once, at the first stage its statistic crosses
/// efficacy while having stayed within the continuation band before, so
/// the per-stage probabilities are disjoint and add up. Stage 1 is the
/// normal survival function; later stages go through `integrator`.
/// Integration failures always abort here, whatever the failure mode.
#[allow(non_snake_case)]
pub fn marginal_power_with<I>(
    design: &TrialDesign,
    options: &PowerOptions,
    integrator: &I,
) -> Result<Vec<f64>, MamsErr>
where
    I: MvnIntegrator + ?Sized,
{
    let _span = debug_span!("marginal_power", J = design.stages, K = design.arms).entered();
    let models = DesignModels::build(design)?;
    let (J, K) = (design.stages, design.arms);

    // Regions for stages 2..J of every arm, enumerated arm-major
    let later = J - 1;
    let abort = PowerOptions {
        failure_mode: FailureMode::Abort,
        ..options.clone()
    };
    let seed = options.integrator.seed;
    let regions = integrate_regions(
        K * later,
        &abort,
        integrator,
        |n| {
            let (arm, stage) = (n / later, n % later + 1);
            first_crossing_query(design, &models, arm, stage, region_seed(seed, n))
        },
        |n| format!("arm {} stages 1..={}", n / later + 1, n % later + 2),
    )?;

    let power: Vec<f64> = (0..K)
        .map(|arm| {
            let first = models.index.flat(arm, 0);
            let stage_1 = std_normal_sf(design.e[0] - models.mean[first]);
            let later_stages: f64 = regions.estimates[arm * later..(arm + 1) * later]
                .iter()
                .flatten()
                .map(|est| est.probability)
                .sum();
            (stage_1 + later_stages).clamp(0.0, 1.0)
        })
        .collect();

    debug!(?power, error = regions.total_error(), "marginal power");
    Ok(power)
}
