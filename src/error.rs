//----------------------------------------
// Crate error type
//----------------------------------------
use crate::covariance::error::DomainError;
use crate::design::error::ConfigurationError;
use crate::integration::error::NumericIntegrationError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MamsErr {
    #[error("invalid trial design: {0}")]
    Configuration(ConfigurationError),
    #[error("while building covariance: {0}")]
    Domain(DomainError),
    #[error("while integrating multivariate normal: {0}")]
    NumericIntegration(NumericIntegrationError),
}

impl MamsErr {
    /// True for errors raised before any numeric work was attempted
    pub fn is_configuration(&self) -> bool {
        matches!(self, MamsErr::Configuration(_))
    }
}
