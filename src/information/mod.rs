//----------------------------------------
// information mod
//----------------------------------------
//! Fisher information of each arm's standardized statistic at each stage.
pub mod compute_information;
