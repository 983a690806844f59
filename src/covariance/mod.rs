//----------------------------------------
// covariance mod
//----------------------------------------
//! Joint correlation of the standardized statistics of all arms at all
//! stages, induced by cumulative sample sizes and the shared control arm.
pub mod compute_covariance;
pub mod error;
pub(crate) mod stability;
pub mod types;
