//----------------------------------------
// design errors
//----------------------------------------
use crate::error::MamsErr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("number of stages must be at least 1")]
    NoStages,
    #[error("number of experimental arms must be at least 1")]
    NoArms,
    #[error("length of {name} should equal the number of stages ({expected}); got {got}")]
    LengthMismatch {
        name: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("{name}[{index}] should be positive and finite; got {value}")]
    NonPositive {
        name: &'static str,
        index: usize,
        value: f64,
    },
    #[error("standard deviation should be positive and finite; got {0}")]
    NonPositiveSigma(f64),
    #[error("effect size should be finite; got {0}")]
    NonFiniteEffect(f64),
    #[error("{name}[{index}] is NaN")]
    NanBoundary { name: &'static str, index: usize },
    #[error("futility bound ({futility}) exceeds efficacy bound ({efficacy}) at stage {stage}")]
    BoundaryOrder {
        stage: usize,
        futility: f64,
        efficacy: f64,
    },
    #[error("pattern {pattern} does not fit a design with {stages} stage(s) and {arms} arm(s)")]
    PatternOutOfRange {
        pattern: String,
        stages: usize,
        arms: usize,
    },
    #[error("{stages}^{arms} outcome patterns cannot be enumerated")]
    TooManyPatterns { stages: usize, arms: usize },
}

impl Into<MamsErr> for ConfigurationError {
    fn into(self) -> MamsErr {
        MamsErr::Configuration(self)
    }
}
