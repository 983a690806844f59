//----------------------------------------
// integration errors
//----------------------------------------
use crate::error::MamsErr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericIntegrationError {
    #[error(
        "query dimensions disagree (lower {lower}, upper {upper}, mean {mean}, \
        covariance {rows}x{cols})"
    )]
    DimensionMismatch {
        lower: usize,
        upper: usize,
        mean: usize,
        rows: usize,
        cols: usize,
    },
    #[error("query contains NaN at position {0}")]
    NotANumber(usize),
    #[error("covariance of dimension {dim} could not be factored, even with jitter")]
    Cholesky { dim: usize },
    #[error(
        "estimated error {error:e} exceeds tolerance {tolerance:e} after {attempts} attempt(s) \
        (estimate {estimate})"
    )]
    ToleranceExceeded {
        estimate: f64,
        error: f64,
        tolerance: f64,
        attempts: usize,
    },
    #[error("integrator returned a non-finite estimate")]
    NonFiniteEstimate,
    #[error("{region}: {source}")]
    Region {
        region: String,
        source: Box<NumericIntegrationError>,
    },
}

impl NumericIntegrationError {
    /// Tags the error with the region (pattern, arm block) being integrated
    pub fn in_region(self, region: impl Into<String>) -> Self {
        NumericIntegrationError::Region {
            region: region.into(),
            source: Box::new(self),
        }
    }
}

impl Into<MamsErr> for NumericIntegrationError {
    fn into(self) -> MamsErr {
        MamsErr::NumericIntegration(self)
    }
}
