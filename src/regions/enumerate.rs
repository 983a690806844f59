use crate::design::validate;
use crate::error::MamsErr;
use crate::regions::{
    odometer::Odometer,
    types::{ArmOutcome, OutcomePattern, RejectionPattern},
};

/// Lazy enumeration of all `J^K` rejection patterns.
#[derive(Debug, Clone)]
pub struct PatternIter {
    odometer: Odometer,
}

impl Iterator for PatternIter {
    type Item = RejectionPattern;

    fn next(&mut self) -> Option<RejectionPattern> {
        self.odometer
            .next()
            .map(|digits| RejectionPattern(digits.into_iter().map(|d| d + 1).collect()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.odometer.size_hint()
    }
}

impl ExactSizeIterator for PatternIter {}

/// All tuples in `{1..J}^K`, each exactly once, first arm varying fastest.
/// A fresh call restarts the same enumeration.
#[allow(non_snake_case)]
pub fn enumerate_patterns(J: usize, K: usize) -> Result<PatternIter, MamsErr> {
    validate::check_dimensions(J, K)?;
    let count = validate::checked_pattern_count(J, K)?;
    Ok(PatternIter {
        odometer: Odometer::new(J, K, count),
    })
}

/// The `n`-th pattern of [`enumerate_patterns`]. `J` must be at least 1.
#[allow(non_snake_case)]
pub(crate) fn pattern_at(J: usize, K: usize, n: usize) -> RejectionPattern {
    RejectionPattern(Odometer::digits_at(J, K, n).into_iter().map(|d| d + 1).collect())
}

/// Lazy enumeration of all `(2J)^K` joint arm outcomes.
#[derive(Debug, Clone)]
pub struct OutcomeIter {
    stages: usize,
    odometer: Odometer,
}

fn outcome_from_digit(stages: usize, digit: usize) -> ArmOutcome {
    if digit < stages {
        ArmOutcome::Futility(digit + 1)
    } else {
        ArmOutcome::Reject(digit - stages + 1)
    }
}

impl Iterator for OutcomeIter {
    type Item = OutcomePattern;

    fn next(&mut self) -> Option<OutcomePattern> {
        let stages = self.stages;
        self.odometer.next().map(|digits| {
            OutcomePattern(
                digits
                    .into_iter()
                    .map(|d| outcome_from_digit(stages, d))
                    .collect(),
            )
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.odometer.size_hint()
    }
}

impl ExactSizeIterator for OutcomeIter {}

/// Every arm independently either stops for futility or rejects, at any of
/// the `J` stages.
#[allow(non_snake_case)]
pub fn enumerate_outcomes(J: usize, K: usize) -> Result<OutcomeIter, MamsErr> {
    validate::check_dimensions(J, K)?;
    let count = validate::checked_pattern_count(2 * J, K)?;
    Ok(OutcomeIter {
        stages: J,
        odometer: Odometer::new(2 * J, K, count),
    })
}

/// The `n`-th outcome of [`enumerate_outcomes`]. `J` must be at least 1.
#[allow(non_snake_case)]
pub(crate) fn outcome_at(J: usize, K: usize, n: usize) -> OutcomePattern {
    OutcomePattern(
        Odometer::digits_at(2 * J, K, n)
            .into_iter()
            .map(|d| outcome_from_digit(J, d))
            .collect(),
    )
}
