//----------------------------------------
// regions mod types
//----------------------------------------
use std::fmt;

use serde::Serialize;

/// For each arm, the 1-based stage at which that arm was last observed
/// (stopped for futility, rejected, or reached the final analysis).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RejectionPattern(pub Vec<usize>);

/// How one arm leaves the trial. Stages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArmOutcome {
    /// Continued through earlier stages, then fell below futility at this
    /// stage without ever crossing efficacy.
    Futility(usize),
    /// Continued through earlier stages, then crossed efficacy at this stage.
    Reject(usize),
}

impl ArmOutcome {
    pub fn stage(&self) -> usize {
        match *self {
            ArmOutcome::Futility(m) | ArmOutcome::Reject(m) => m,
        }
    }

    pub fn rejects(&self) -> bool {
        matches!(self, ArmOutcome::Reject(_))
    }
}

/// Joint outcome of all arms, one entry per arm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OutcomePattern(pub Vec<ArmOutcome>);

impl OutcomePattern {
    pub fn arms(&self) -> usize {
        self.0.len()
    }

    pub fn rejections(&self) -> usize {
        self.0.iter().filter(|o| o.rejects()).count()
    }
}

impl RejectionPattern {
    pub fn arms(&self) -> usize {
        self.0.len()
    }

    /// Every arm stops without rejecting at its last observed stage
    pub fn as_futility(&self) -> OutcomePattern {
        OutcomePattern(self.0.iter().map(|&m| ArmOutcome::Futility(m)).collect())
    }

    /// Every arm rejects at its last observed stage
    pub fn as_rejection(&self) -> OutcomePattern {
        OutcomePattern(self.0.iter().map(|&m| ArmOutcome::Reject(m)).collect())
    }
}

impl fmt::Display for RejectionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, m) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{m}")?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for ArmOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArmOutcome::Futility(m) => write!(f, "F{m}"),
            ArmOutcome::Reject(m) => write!(f, "R{m}"),
        }
    }
}

impl fmt::Display for OutcomePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, o) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{o}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_forms() {
        let pattern = RejectionPattern(vec![1, 2, 2]);
        assert_eq!(pattern.to_string(), "(1, 2, 2)");
        assert_eq!(pattern.as_rejection().to_string(), "(R1, R2, R2)");
        assert_eq!(pattern.as_futility().to_string(), "(F1, F2, F2)");
    }

    #[test]
    fn counts_rejections() {
        let outcome = OutcomePattern(vec![
            ArmOutcome::Reject(1),
            ArmOutcome::Futility(2),
            ArmOutcome::Reject(2),
        ]);
        assert_eq!(outcome.rejections(), 2);
        assert_eq!(outcome.0[1].stage(), 2);
    }
}
