use nalgebra::DMatrix;
use tracing::warn;

use crate::covariance::{error::DomainError, stability::cholesky_with_jitter, types::CovarianceMatrix};
use crate::design::{StatisticIndex, validate};
use crate::error::MamsErr;

/// Cumulative control size, cumulative active size and their ratio by stage
#[allow(non_snake_case)]
fn cumulative_allocation(r: &[f64], n0: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n0_tilde: Vec<f64> = n0
        .iter()
        .scan(0.0, |acc, &n| {
            *acc += n;
            Some(*acc)
        })
        .collect();
    let nk_tilde = r.iter().zip(n0.iter()).scan(0.0, |acc, (&r_j, &n_j)| {
        *acc += r_j * n_j;
        Some(*acc)
    });
    let r_tilde = nk_tilde
        .zip(n0_tilde.iter())
        .map(|(nk, &n0_j)| nk / n0_j)
        .collect();
    (n0_tilde, r_tilde)
}

/// Correlation of the statistics at `(k1, j1)` and `(k2, j2)`.
///
/// The stage pair is ordered before use: the numerator always takes the
/// earlier stage, the denominator the later one.
fn entry(n0_tilde: &[f64], r_tilde: &[f64], same_arm: bool, j1: usize, j2: usize) -> f64 {
    let (early, late) = (j1.min(j2), j1.max(j2));
    let (r_e, r_l) = (r_tilde[early], r_tilde[late]);
    let shared = (n0_tilde[early] * r_e * r_l / (n0_tilde[late] * (r_e + 1.0) * (r_l + 1.0))).sqrt();
    let own = if same_arm { 1.0 / r_l } else { 0.0 };
    shared * (1.0 + own)
}

/// Covariance of all `J * K` standardized statistics.
///
/// `r` and `n0` are per-stage increments; they are accumulated here. Arms
/// are correlated only through the shared control arm. The result is
/// checked for positive semi-definiteness (Cholesky, with a jitter retry).
#[allow(non_snake_case)]
pub fn covariance(J: usize, K: usize, r: &[f64], n0: &[f64]) -> Result<CovarianceMatrix, MamsErr> {
    validate::check_dimensions(J, K)?;
    validate::check_positive_stages("n0", n0, J)?;
    validate::check_positive_stages("r", r, J)?;

    let (n0_tilde, r_tilde) = cumulative_allocation(r, n0);
    let index = StatisticIndex::new(J, K);
    let mut matrix = DMatrix::zeros(index.len(), index.len());
    for k1 in 0..K {
        for k2 in k1..K {
            for j1 in 0..J {
                for j2 in 0..J {
                    let value = entry(&n0_tilde, &r_tilde, k1 == k2, j1, j2);
                    let (a, b) = (index.flat(k1, j1), index.flat(k2, j2));
                    matrix[(a, b)] = value;
                    matrix[(b, a)] = value;
                }
            }
        }
    }

    let cov = CovarianceMatrix::from_matrix(index, matrix);
    check_positive_semidefinite(&cov)?;
    Ok(cov)
}

/// Fails with a [`DomainError`] unless `cov` is symmetric and factors
/// (possibly after jitter).
pub fn check_positive_semidefinite(cov: &CovarianceMatrix) -> Result<(), MamsErr> {
    let m = cov.as_matrix();
    let n = cov.dim();
    if let Some((row, col, diff)) = cov.first_asymmetry(1e-12) {
        return Err(DomainError::Asymmetric { row, col, diff }.into());
    }
    match cholesky_with_jitter(m) {
        Some((_, jitter)) => {
            if jitter > 0.0 {
                warn!(jitter, dim = n, "covariance needed diagonal jitter to factor");
            }
            Ok(())
        }
        None => Err(DomainError::NotPositiveSemiDefinite {
            jitter: crate::covariance::stability::diagonal_jitter(m),
            min_diagonal: m.diagonal().min(),
        }
        .into()),
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn unit_diagonal() {
        let cov = covariance(3, 2, &[0.5, 1.0, 2.0], &[10.0, 15.0, 30.0]).unwrap();
        for a in 0..cov.dim() {
            assert!((cov.get(a, a) - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn constant_ratio_same_arm_is_root_information_fraction() {
        // With constant r the within-arm correlation reduces to
        // sqrt(n0_tilde[j1] / n0_tilde[j2])
        let cov = covariance(2, 3, &[0.75, 0.75], &[28.9, 57.8]).unwrap();
        let expected = (28.9_f64 / (28.9 + 57.8)).sqrt();
        assert!((cov.get(0, 1) - expected).abs() < 1e-12);
        assert!((cov.get(4, 5) - expected).abs() < 1e-12);
    }

    #[test]
    fn shared_control_between_arms() {
        // Same stage, different arms: r / (r + 1)
        let cov = covariance(2, 2, &[0.5, 0.5], &[40.0, 40.0]).unwrap();
        let index = cov.index();
        let same_stage = cov.get(index.flat(0, 1), index.flat(1, 1));
        assert!((same_stage - 0.5 / 1.5).abs() < 1e-12);
        // Different arms, stages 1 and 2: r/(r+1) * sqrt(n0_tilde[1] / n0_tilde[2])
        let across = cov.get(index.flat(0, 0), index.flat(1, 1));
        assert!((across - 0.5 / 1.5 * 0.5_f64.sqrt()).abs() < 1e-12);
        assert_eq!(across, cov.get(index.flat(1, 1), index.flat(0, 0)));
        assert_eq!(across, cov.get(index.flat(0, 1), index.flat(1, 0)));
    }

    #[test]
    fn varying_ratio_uses_cumulative_sizes() {
        let (r, n0) = ([1.0, 3.0], [20.0, 20.0]);
        let cov = covariance(2, 1, &r, &n0).unwrap();
        let n0_t: [f64; 2] = [20.0, 40.0];
        let r_t: [f64; 2] = [1.0, 80.0 / 40.0];
        let want = (n0_t[0] * r_t[0] * r_t[1] / (n0_t[1] * (r_t[0] + 1.0) * (r_t[1] + 1.0))).sqrt()
            * (1.0 + 1.0 / r_t[1]);
        assert!((cov.get(0, 1) - want).abs() < 1e-12);
        assert!((cov.get(1, 0) - want).abs() < 1e-12);
    }

    #[test]
    fn arm_block_matches_full_matrix() {
        let cov = covariance(3, 2, &[1.0, 1.0, 1.0], &[10.0, 10.0, 10.0]).unwrap();
        let block = cov.arm_block(1);
        for j1 in 0..3 {
            for j2 in 0..3 {
                assert_eq!(block[(j1, j2)], cov.get(3 + j1, 3 + j2));
            }
        }
    }

    #[test]
    fn rejects_negative_sample_size() {
        let err = covariance(2, 2, &[1.0, 1.0], &[10.0, -5.0]).unwrap_err();
        assert_eq!(
            format!("{err}"),
            "invalid trial design: n0[1] should be positive and finite; got -5"
        );
    }

    #[test]
    fn indefinite_matrix_is_domain_error() {
        let index = StatisticIndex::new(2, 1);
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 1.5, 1.5, 1.0]);
        let err = check_positive_semidefinite(&CovarianceMatrix::from_matrix(index, m)).unwrap_err();
        assert!(matches!(err, MamsErr::Domain(DomainError::NotPositiveSemiDefinite { .. })));
    }

    #[test]
    fn asymmetric_matrix_is_domain_error() {
        let index = StatisticIndex::new(3, 1);
        let mut m = DMatrix::identity(3, 3);
        m[(1, 2)] = 0.2;
        m[(2, 1)] = 0.1;
        let err = check_positive_semidefinite(&CovarianceMatrix::from_matrix(index, m)).unwrap_err();
        assert!(matches!(
            err,
            MamsErr::Domain(DomainError::Asymmetric { row: 1, col: 2, .. })
        ));
    }

    proptest! {
        #[test]
        fn symmetric_for_valid_inputs(
            stages in prop::collection::vec((1.0f64..200.0, 0.1f64..4.0), 1..4),
            K in 1usize..4,
        ) {
            let J = stages.len();
            let n0: Vec<f64> = stages.iter().map(|s| s.0).collect();
            let r: Vec<f64> = stages.iter().map(|s| s.1).collect();
            let cov = covariance(J, K, &r, &n0).unwrap();
            for a in 0..cov.dim() {
                for b in 0..cov.dim() {
                    prop_assert_eq!(cov.get(a, b), cov.get(b, a));
                }
                prop_assert!((cov.get(a, a) - 1.0).abs() < 1e-9);
            }
        }
    }
}
