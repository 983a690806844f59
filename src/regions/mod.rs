//----------------------------------------
// regions mod
//----------------------------------------
pub mod enumerate;
pub(crate) mod odometer;
pub mod types;

pub use enumerate::{OutcomeIter, PatternIter, enumerate_outcomes, enumerate_patterns};
pub(crate) use enumerate::{outcome_at, pattern_at};
pub use types::{ArmOutcome, OutcomePattern, RejectionPattern};
