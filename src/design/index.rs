use std::ops::Range;

use serde::Serialize;

/// Flat layout of the per-arm, per-stage statistics.
///
/// Arm `k` and stage `j`, both 1-based, sit at position `(k - 1) * J + j`.
/// Everything in this crate addresses statistics through [`StatisticIndex::flat`],
/// the zero-based form of that mapping: `arm * J + stage`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatisticIndex {
    pub stages: usize,
    pub arms: usize,
}

impl StatisticIndex {
    pub fn new(stages: usize, arms: usize) -> Self {
        StatisticIndex { stages, arms }
    }

    /// Zero-based position of `(arm, stage)`; both arguments are zero-based.
    #[inline]
    pub fn flat(&self, arm: usize, stage: usize) -> usize {
        debug_assert!(arm < self.arms && stage < self.stages);
        arm * self.stages + stage
    }

    /// Positions belonging to one arm, in stage order
    pub fn arm_block(&self, arm: usize) -> Range<usize> {
        self.flat(arm, 0)..self.flat(arm, 0) + self.stages
    }

    pub fn len(&self) -> usize {
        self.stages * self.arms
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
