//----------------------------------------
// covariance errors
//----------------------------------------
use crate::error::MamsErr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error(
        "matrix is not positive semi-definite (Cholesky failed after adding jitter {jitter:e}; \
        smallest diagonal {min_diagonal})"
    )]
    NotPositiveSemiDefinite { jitter: f64, min_diagonal: f64 },
    #[error("matrix is not symmetric at ({row}, {col}); difference {diff:e}")]
    Asymmetric { row: usize, col: usize, diff: f64 },
}

impl Into<MamsErr> for DomainError {
    fn into(self) -> MamsErr {
        MamsErr::Domain(self)
    }
}
