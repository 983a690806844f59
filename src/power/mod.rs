//----------------------------------------
// power mod
//----------------------------------------
pub(crate) mod bounds;
pub mod combined;
pub(crate) mod evaluate;
pub mod marginal;
pub(crate) mod models;
pub mod types;
