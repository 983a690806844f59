//----------------------------------------
// integration mod types
//----------------------------------------
use nalgebra::DMatrix;
use serde::Serialize;

use crate::integration::error::NumericIntegrationError;

/// Rectangle probability `P(lower < X < upper)` for `X ~ N(mean, covariance)`.
/// Infinite bounds are allowed.
#[derive(Debug, Clone, PartialEq)]
pub struct MvnQuery {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub mean: Vec<f64>,
    pub covariance: DMatrix<f64>,
    /// Seed for randomized integrators; `None` draws a fresh one
    pub seed: Option<u64>,
}

/// Probability estimate with its estimated absolute error
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MvnEstimate {
    pub probability: f64,
    pub error: f64,
}

impl MvnEstimate {
    pub fn exact(probability: f64) -> Self {
        MvnEstimate {
            probability,
            error: 0.0,
        }
    }
}

/// The multivariate normal probability capability the power computations
/// are written against.
pub trait MvnIntegrator: Send + Sync {
    fn integrate(&self, query: &MvnQuery) -> Result<MvnEstimate, NumericIntegrationError>;
}

/// A query with unconstrained coordinates marginalized out and bounds
/// centred on the mean.
#[derive(Debug, Clone)]
pub(crate) struct CenteredRegion {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
    pub covariance: DMatrix<f64>,
}

impl MvnQuery {
    pub fn dim(&self) -> usize {
        self.mean.len()
    }

    pub fn check(&self) -> Result<(), NumericIntegrationError> {
        let d = self.mean.len();
        if self.lower.len() != d
            || self.upper.len() != d
            || self.covariance.nrows() != d
            || self.covariance.ncols() != d
        {
            return Err(NumericIntegrationError::DimensionMismatch {
                lower: self.lower.len(),
                upper: self.upper.len(),
                mean: d,
                rows: self.covariance.nrows(),
                cols: self.covariance.ncols(),
            });
        }
        let nan = (0..d).find(|&i| {
            self.lower[i].is_nan() || self.upper[i].is_nan() || !self.mean[i].is_finite()
        });
        if let Some(i) = nan {
            return Err(NumericIntegrationError::NotANumber(i));
        }
        Ok(())
    }

    /// Whether some coordinate has an empty interval
    pub fn is_empty(&self) -> bool {
        self.lower.iter().zip(self.upper.iter()).any(|(l, u)| l >= u)
    }

    /// Drops coordinates bounded by `(-inf, inf)`; exact for the normal law
    pub(crate) fn centered(&self) -> CenteredRegion {
        let keep: Vec<usize> = (0..self.dim())
            .filter(|&i| self.lower[i] > f64::NEG_INFINITY || self.upper[i] < f64::INFINITY)
            .collect();
        CenteredRegion {
            lower: keep.iter().map(|&i| self.lower[i] - self.mean[i]).collect(),
            upper: keep.iter().map(|&i| self.upper[i] - self.mean[i]).collect(),
            covariance: DMatrix::from_fn(keep.len(), keep.len(), |a, b| {
                self.covariance[(keep[a], keep[b])]
            }),
        }
    }
}
