//----------------------------------------
// Integration bounds for outcome regions
//----------------------------------------
use crate::design::{TrialDesign, error::ConfigurationError};
use crate::error::MamsErr;
use crate::regions::{ArmOutcome, OutcomePattern};

/// Lower and upper bounds over the flat statistic vector for a joint arm
/// outcome. For an arm leaving at stage `m`:
/// - stages before `m` keep the statistic in the continuation band `[f, e]`,
/// - stage `m` is `(-inf, f[m])` for futility or `(e[m], inf)` for rejection,
/// - later stages are unconstrained.
pub(crate) fn outcome_bounds(design: &TrialDesign, outcome: &OutcomePattern) -> (Vec<f64>, Vec<f64>) {
    let index = design.index();
    let mut lower = vec![f64::NEG_INFINITY; index.len()];
    let mut upper = vec![f64::INFINITY; index.len()];
    for (arm, arm_outcome) in outcome.0.iter().enumerate() {
        let last = arm_outcome.stage() - 1;
        for stage in 0..last {
            let p = index.flat(arm, stage);
            lower[p] = design.f[stage];
            upper[p] = design.e[stage];
        }
        let p = index.flat(arm, last);
        match arm_outcome {
            ArmOutcome::Futility(_) => upper[p] = design.f[last],
            ArmOutcome::Reject(_) => lower[p] = design.e[last],
        }
    }
    (lower, upper)
}

/// One entry per arm, stages within `1..=J`
pub(crate) fn check_outcome(design: &TrialDesign, outcome: &OutcomePattern) -> Result<(), MamsErr> {
    let fits = outcome.arms() == design.arms
        && outcome
            .0
            .iter()
            .all(|o| (1..=design.stages).contains(&o.stage()));
    if !fits {
        return Err(ConfigurationError::PatternOutOfRange {
            pattern: outcome.to_string(),
            stages: design.stages,
            arms: design.arms,
        }
        .into());
    }
    Ok(())
}
