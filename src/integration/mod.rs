//----------------------------------------
// integration mod
//----------------------------------------
pub mod error;
pub mod genz;
pub mod lattice;
pub mod std_normal;
pub mod types;

pub use genz::GenzIntegrator;
pub use types::{MvnEstimate, MvnIntegrator, MvnQuery};
