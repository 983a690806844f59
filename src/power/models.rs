//----------------------------------------
// Per-call statistical model of a design
//----------------------------------------
use crate::covariance::{compute_covariance::covariance, types::CovarianceMatrix};
use crate::design::{StatisticIndex, TrialDesign};
use crate::error::MamsErr;
use crate::information::compute_information::information;
use crate::integration::{MvnQuery, lattice::counter_rng_seed};

/// Mean vector `delta * sqrt(I)` and covariance of the flat statistics,
/// built once per public call.
#[derive(Debug, Clone)]
pub(crate) struct DesignModels {
    pub index: StatisticIndex,
    pub mean: Vec<f64>,
    pub cov: CovarianceMatrix,
}

impl DesignModels {
    #[allow(non_snake_case)]
    pub(crate) fn build(design: &TrialDesign) -> Result<Self, MamsErr> {
        design.validate()?;
        let I = information(design.stages, design.arms, &design.n0, &design.r, design.sig)?;
        let cov = covariance(design.stages, design.arms, &design.r, &design.n0)?;
        let mean = I.iter().map(|I_i| design.delta * I_i.sqrt()).collect();
        Ok(DesignModels {
            index: design.index(),
            mean,
            cov,
        })
    }

    /// Query over the full statistic vector
    pub(crate) fn full_query(&self, lower: Vec<f64>, upper: Vec<f64>, seed: Option<u64>) -> MvnQuery {
        MvnQuery {
            lower,
            upper,
            mean: self.mean.clone(),
            covariance: self.cov.as_matrix().clone(),
            seed,
        }
    }

    /// Query restricted to the given flat positions
    pub(crate) fn sub_query(
        &self,
        positions: &[usize],
        lower: Vec<f64>,
        upper: Vec<f64>,
        seed: Option<u64>,
    ) -> MvnQuery {
        MvnQuery {
            lower,
            upper,
            mean: positions.iter().map(|&p| self.mean[p]).collect(),
            covariance: self.cov.select(positions),
            seed,
        }
    }
}

/// Seed of region `n`, stable across thread counts
pub(crate) fn region_seed(base: Option<u64>, n: usize) -> Option<u64> {
    base.map(|seed| counter_rng_seed(seed, n as u64))
}
