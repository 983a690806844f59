//----------------------------------------
// Region integration: parallel map, sequential reduction
//----------------------------------------
use tracing::{trace, warn};

use crate::config::{FailureMode, PowerOptions};
use crate::error::MamsErr;
use crate::integration::{MvnEstimate, MvnIntegrator, MvnQuery, error::NumericIntegrationError};
use crate::power::types::PatternFailure;

type RegionResult = Result<MvnEstimate, NumericIntegrationError>;

#[cfg(feature = "parallel")]
fn integrate_all<I, Q>(count: usize, parallel: bool, integrator: &I, query_at: Q) -> Vec<RegionResult>
where
    I: MvnIntegrator + ?Sized,
    Q: Fn(usize) -> MvnQuery + Sync,
{
    use rayon::prelude::*;

    if parallel && count > 1 {
        crate::thread_pool::install(|| {
            (0..count)
                .into_par_iter()
                .map(|n| integrator.integrate(&query_at(n)))
                .collect()
        })
    } else {
        (0..count).map(|n| integrator.integrate(&query_at(n))).collect()
    }
}

#[cfg(not(feature = "parallel"))]
fn integrate_all<I, Q>(count: usize, _parallel: bool, integrator: &I, query_at: Q) -> Vec<RegionResult>
where
    I: MvnIntegrator + ?Sized,
    Q: Fn(usize) -> MvnQuery + Sync,
{
    (0..count).map(|n| integrator.integrate(&query_at(n))).collect()
}

pub(crate) struct RegionEstimates {
    pub estimates: Vec<Option<MvnEstimate>>,
    pub failures: Vec<PatternFailure>,
}

impl RegionEstimates {
    pub(crate) fn integrated(&self) -> usize {
        self.estimates.iter().filter(|e| e.is_some()).count()
    }

    pub(crate) fn total_error(&self) -> f64 {
        self.estimates.iter().flatten().map(|e| e.error).sum()
    }

    pub(crate) fn total_probability(&self) -> f64 {
        self.estimates.iter().flatten().map(|e| e.probability).sum()
    }
}

// Results are gathered in index order before any summation
pub(crate) fn integrate_regions<I, Q, L>(
    count: usize,
    options: &PowerOptions,
    integrator: &I,
    query_at: Q,
    label: L,
) -> Result<RegionEstimates, MamsErr>
where
    I: MvnIntegrator + ?Sized,
    Q: Fn(usize) -> MvnQuery + Sync,
    L: Fn(usize) -> String,
{
    let results = integrate_all(count, options.parallel, integrator, query_at);

    let mut estimates = Vec::with_capacity(count);
    let mut failures = vec![];
    for (n, result) in results.into_iter().enumerate() {
        match result {
            Ok(estimate) => {
                trace!(region = %label(n), ?estimate, "integrated region");
                estimates.push(Some(estimate));
            }
            Err(err) => match options.failure_mode {
                FailureMode::Abort => return Err(err.in_region(label(n)).into()),
                FailureMode::BestEffort => {
                    let region = label(n);
                    warn!(%region, error = %err, "dropping region that failed to integrate");
                    failures.push(PatternFailure {
                        index: n,
                        region,
                        reason: err.to_string(),
                    });
                    estimates.push(None);
                }
            },
        }
    }
    Ok(RegionEstimates { estimates, failures })
}
