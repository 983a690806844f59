//----------------------------------------
// Cholesky factorization with diagonal jitter fallback
//----------------------------------------
use nalgebra::{Cholesky, DMatrix};

/// Data-adaptive diagonal jitter: a fixed floor plus a small multiple of the
/// mean variance.
pub(crate) fn diagonal_jitter(matrix: &DMatrix<f64>) -> f64 {
    let n = matrix.nrows().max(1) as f64;
    let base_jitter = 1e-10;
    let adaptive_jitter = (matrix.trace() / n) * 1e-8;
    base_jitter + adaptive_jitter
}

/// Lower Cholesky factor of `matrix`, retrying once with jitter on the
/// diagonal. Returns the factor and the jitter that was needed (0 if none).
pub(crate) fn cholesky_with_jitter(matrix: &DMatrix<f64>) -> Option<(DMatrix<f64>, f64)> {
    if let Some(chol) = Cholesky::new(matrix.clone()) {
        return Some((chol.l(), 0.0));
    }
    let jitter = diagonal_jitter(matrix);
    let mut regularized = matrix.clone();
    for i in 0..regularized.nrows() {
        regularized[(i, i)] += jitter;
    }
    Cholesky::new(regularized).map(|chol| (chol.l(), jitter))
}
