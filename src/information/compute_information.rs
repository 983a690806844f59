use crate::design::{StatisticIndex, validate};
use crate::error::MamsErr;

// I[(k-1)*J + j] = 1 / (sig^2 / n0[j] + sig^2 / (n0[j] * r[j])); n0 is not
// accumulated here, unlike in the covariance
#[allow(non_snake_case)]
pub fn information(
    J: usize,
    K: usize,
    n0: &[f64],
    r: &[f64],
    sig: f64,
) -> Result<Vec<f64>, MamsErr> {
    validate::check_dimensions(J, K)?;
    validate::check_positive_stages("n0", n0, J)?;
    validate::check_positive_stages("r", r, J)?;
    validate::check_sigma(sig)?;

    let var = sig * sig;
    let per_stage: Vec<f64> = n0
        .iter()
        .zip(r.iter())
        .map(|(&n0_j, &r_j)| 1.0 / (var / n0_j + var / (n0_j * r_j)))
        .collect();

    let index = StatisticIndex::new(J, K);
    let mut I = vec![0.0; index.len()];
    for arm in 0..K {
        for (stage, &I_j) in per_stage.iter().enumerate() {
            I[index.flat(arm, stage)] = I_j;
        }
    }
    Ok(I)
}
