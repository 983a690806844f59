//----------------------------------------
// design mod
//----------------------------------------
pub mod error;
pub mod index;
pub mod types;
pub(crate) mod validate;

pub use index::StatisticIndex;
pub use types::TrialDesign;
