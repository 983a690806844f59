//----------------------------------------
// Genz separation-of-variables integrator on a randomized lattice
//----------------------------------------
use nalgebra::DMatrix;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{trace, warn};

use crate::config::IntegratorConfig;
use crate::covariance::stability::cholesky_with_jitter;
use crate::integration::{
    error::NumericIntegrationError,
    lattice::{lattice_point, richtmyer_generators},
    std_normal::{std_normal_cdf, std_normal_quantile_clamped},
    types::{CenteredRegion, MvnEstimate, MvnIntegrator, MvnQuery},
};

/// Default [`MvnIntegrator`]. Each random shift of the lattice gives an
/// unbiased estimate; the spread over shifts gives the error.
#[derive(Debug, Clone, Default)]
pub struct GenzIntegrator {
    config: IntegratorConfig,
}

#[derive(Debug, Default)]
struct ShiftEstimates {
    values: Vec<f64>,
}

impl ShiftEstimates {
    fn estimate(&self, error_multiplier: f64) -> MvnEstimate {
        let m = self.values.len() as f64;
        let mean = self.values.iter().sum::<f64>() / m;
        let var = if self.values.len() > 1 {
            self.values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (m * (m - 1.0))
        } else {
            f64::INFINITY
        };
        MvnEstimate {
            probability: mean.clamp(0.0, 1.0),
            error: error_multiplier * var.sqrt(),
        }
    }
}

// prod_i (e_i - d_i) with the conditioning values y_j = Phi^-1(d_j + w_j (e_j - d_j))
fn integrand(l: &DMatrix<f64>, region: &CenteredRegion, w: &[f64], y: &mut [f64]) -> f64 {
    let d = region.lower.len();
    let mut f = 1.0;
    for i in 0..d {
        let s: f64 = (0..i).map(|j| l[(i, j)] * y[j]).sum();
        let l_ii = l[(i, i)];
        let d_i = std_normal_cdf((region.lower[i] - s) / l_ii);
        let e_i = std_normal_cdf((region.upper[i] - s) / l_ii);
        let width = e_i - d_i;
        if width <= 0.0 {
            return 0.0;
        }
        f *= width;
        if i + 1 < d {
            y[i] = std_normal_quantile_clamped(d_i + w[i] * width);
        }
    }
    f
}

impl GenzIntegrator {
    pub fn new(config: IntegratorConfig) -> Self {
        GenzIntegrator { config }
    }

    fn shifted_mean(
        &self,
        l: &DMatrix<f64>,
        region: &CenteredRegion,
        generators: &[f64],
        shift: &[f64],
        n: usize,
    ) -> f64 {
        let d = region.lower.len();
        let mut w = vec![0.0; d - 1];
        let mut y = vec![0.0; d];
        let total: f64 = (1..=n)
            .map(|i| {
                lattice_point(i, generators, shift, &mut w);
                integrand(l, region, &w, &mut y)
            })
            .sum();
        total / n as f64
    }

    fn add_shifts(
        &self,
        estimates: &mut ShiftEstimates,
        rng: &mut Xoshiro256PlusPlus,
        l: &DMatrix<f64>,
        region: &CenteredRegion,
        generators: &[f64],
        n: usize,
    ) {
        let d = region.lower.len();
        for _ in 0..self.config.shifts.max(2) {
            let shift: Vec<f64> = (0..d - 1).map(|_| rng.gen_range(0.0..1.0)).collect();
            estimates
                .values
                .push(self.shifted_mean(l, region, generators, &shift, n));
        }
    }

    fn lattice(&self, region: &CenteredRegion, seed: u64) -> Result<MvnEstimate, NumericIntegrationError> {
        let d = region.lower.len();
        let (l, jitter) = cholesky_with_jitter(&region.covariance)
            .ok_or(NumericIntegrationError::Cholesky { dim: d })?;
        if jitter > 0.0 {
            trace!(jitter, dim = d, "regularized covariance before integrating");
        }
        let generators = richtmyer_generators(d - 1);
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
        let cfg = &self.config;
        let multiplier = cfg.error_multiplier;

        let mut n = cfg.min_points.max(1);
        let mut estimates;
        loop {
            estimates = ShiftEstimates::default();
            self.add_shifts(&mut estimates, &mut rng, &l, region, &generators, n);
            let estimate = estimates.estimate(multiplier);
            if !estimate.probability.is_finite() {
                return Err(NumericIntegrationError::NonFiniteEstimate);
            }
            if estimate.error <= cfg.abs_tolerance {
                trace!(dim = d, points = n, ?estimate, "lattice converged");
                return Ok(estimate);
            }
            if n >= cfg.max_points {
                break;
            }
            n = (n * 2).min(cfg.max_points);
        }

        // Pool fresh shifts at the point cap and accept a looser tolerance
        let mut tolerance = cfg.abs_tolerance;
        let mut attempts = 1;
        for _ in 0..cfg.max_retries {
            tolerance *= cfg.relax_factor;
            attempts += 1;
            self.add_shifts(&mut estimates, &mut rng, &l, region, &generators, n);
            let estimate = estimates.estimate(multiplier);
            warn!(
                dim = d,
                attempt = attempts,
                error = estimate.error,
                tolerance,
                "retrying integration with relaxed tolerance"
            );
            if estimate.error <= tolerance {
                return Ok(estimate);
            }
        }

        let estimate = estimates.estimate(multiplier);
        Err(NumericIntegrationError::ToleranceExceeded {
            estimate: estimate.probability,
            error: estimate.error,
            tolerance,
            attempts,
        })
    }
}

impl MvnIntegrator for GenzIntegrator {
    fn integrate(&self, query: &MvnQuery) -> Result<MvnEstimate, NumericIntegrationError> {
        query.check()?;
        if query.is_empty() {
            return Ok(MvnEstimate::exact(0.0));
        }
        let region = query.centered();
        match region.lower.len() {
            0 => Ok(MvnEstimate::exact(1.0)),
            1 => {
                let sd = region.covariance[(0, 0)].sqrt();
                if !(sd > 0.0) {
                    return Err(NumericIntegrationError::Cholesky { dim: 1 });
                }
                let p = std_normal_cdf(region.upper[0] / sd) - std_normal_cdf(region.lower[0] / sd);
                Ok(MvnEstimate::exact(p.max(0.0)))
            }
            _ => {
                let seed = query.seed.unwrap_or_else(rand::random);
                self.lattice(&region, seed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::integration::std_normal::std_normal_sf;

    fn integrator() -> GenzIntegrator {
        GenzIntegrator::new(IntegratorConfig::default().with_tolerance(1e-5))
    }

    fn equicorrelated(d: usize, rho: f64) -> DMatrix<f64> {
        DMatrix::from_fn(d, d, |i, j| if i == j { 1.0 } else { rho })
    }

    #[test]
    fn one_dimensional_is_exact() {
        let q = MvnQuery {
            lower: vec![1.0],
            upper: vec![f64::INFINITY],
            mean: vec![0.5],
            covariance: DMatrix::from_element(1, 1, 4.0),
            seed: Some(3),
        };
        let est = integrator().integrate(&q).unwrap();
        assert_eq!(est.error, 0.0);
        assert!((est.probability - std_normal_sf(0.25)).abs() < 1e-12);
    }

    #[test]
    fn independent_orthant_is_product() {
        let q = MvnQuery {
            lower: vec![0.0; 3],
            upper: vec![f64::INFINITY; 3],
            mean: vec![0.0; 3],
            covariance: DMatrix::identity(3, 3),
            seed: Some(11),
        };
        let est = integrator().integrate(&q).unwrap();
        assert!((est.probability - 0.125).abs() < 1e-4);
    }

    #[test]
    fn equicorrelated_orthant() {
        // P(X1 > 0, X2 > 0, X3 > 0) with rho = 1/2 is 1/4
        let q = MvnQuery {
            lower: vec![0.0; 3],
            upper: vec![f64::INFINITY; 3],
            mean: vec![0.0; 3],
            covariance: equicorrelated(3, 0.5),
            seed: Some(5),
        };
        let est = integrator().integrate(&q).unwrap();
        assert!((est.probability - 0.25).abs() < 1e-4);
        assert!(est.error < 1e-4);
    }

    #[test]
    fn bivariate_orthant_closed_form() {
        // P(X1 > 0, X2 > 0) = 1/4 + asin(rho) / (2 pi)
        let rho: f64 = 0.3;
        let q = MvnQuery {
            lower: vec![0.0, 0.0],
            upper: vec![f64::INFINITY, f64::INFINITY],
            mean: vec![0.0, 0.0],
            covariance: equicorrelated(2, rho),
            seed: Some(9),
        };
        let est = integrator().integrate(&q).unwrap();
        let want = 0.25 + rho.asin() / (2.0 * std::f64::consts::PI);
        assert!((est.probability - want).abs() < 1e-5);
    }

    #[test]
    fn unbounded_coordinates_are_marginalized() {
        let q = MvnQuery {
            lower: vec![f64::NEG_INFINITY, 1.0, f64::NEG_INFINITY],
            upper: vec![f64::INFINITY, f64::INFINITY, f64::INFINITY],
            mean: vec![0.0, 0.0, 0.0],
            covariance: equicorrelated(3, 0.9),
            seed: None,
        };
        let est = integrator().integrate(&q).unwrap();
        assert_eq!(est.error, 0.0);
        assert!((est.probability - std_normal_sf(1.0)).abs() < 1e-12);
    }

    #[test]
    fn empty_interval_is_zero() {
        let q = MvnQuery {
            lower: vec![0.0, 2.0],
            upper: vec![1.0, 2.0],
            mean: vec![0.0, 0.0],
            covariance: DMatrix::identity(2, 2),
            seed: Some(1),
        };
        assert_eq!(integrator().integrate(&q).unwrap().probability, 0.0);
    }

    #[test]
    fn same_seed_same_answer() {
        let q = MvnQuery {
            lower: vec![-1.0, 0.0, 0.5],
            upper: vec![1.0, 2.0, f64::INFINITY],
            mean: vec![0.1, 0.2, 0.3],
            covariance: equicorrelated(3, 0.4),
            seed: Some(42),
        };
        let a = integrator().integrate(&q).unwrap();
        let b = integrator().integrate(&q).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn indefinite_covariance_fails() {
        let q = MvnQuery {
            lower: vec![0.0, 0.0],
            upper: vec![1.0, 1.0],
            mean: vec![0.0, 0.0],
            covariance: equicorrelated(2, 1.5),
            seed: Some(1),
        };
        assert_eq!(
            integrator().integrate(&q),
            Err(NumericIntegrationError::Cholesky { dim: 2 })
        );
    }

    #[test]
    fn impossible_tolerance_reports_failure() {
        let config = IntegratorConfig::default()
            .with_tolerance(1e-15)
            .with_points(16, 32)
            .with_retries(1, 2.0);
        let q = MvnQuery {
            lower: vec![-0.5, -0.5, -0.5],
            upper: vec![0.5, 0.5, 0.5],
            mean: vec![0.0; 3],
            covariance: equicorrelated(3, 0.3),
            seed: Some(1),
        };
        match GenzIntegrator::new(config).integrate(&q) {
            Err(NumericIntegrationError::ToleranceExceeded { attempts, .. }) => {
                assert_eq!(attempts, 2)
            }
            other => panic!("expected tolerance failure, got {other:?}"),
        }
    }
}
