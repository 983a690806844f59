//----------------------------------------
// design mod types
//----------------------------------------
use serde::{Deserialize, Serialize};

use crate::design::{index::StatisticIndex, validate};
use crate::error::MamsErr;

/// A candidate MAMS design together with the effect it is evaluated at.
///
/// `n0` and `r` are per-stage: `n0[j]` is the control sample size entering
/// at stage `j` and `r[j]` the active:control allocation ratio for that
/// stage. `e` and `f` are efficacy and futility boundaries on the Z scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialDesign {
    /// Number of analyses, `J`
    #[serde(alias = "J")]
    pub stages: usize,
    /// Number of experimental arms, `K`
    #[serde(alias = "K")]
    pub arms: usize,
    pub n0: Vec<f64>,
    pub r: Vec<f64>,
    pub delta: f64,
    pub sig: f64,
    pub e: Vec<f64>,
    pub f: Vec<f64>,
}

impl TrialDesign {
    #[allow(non_snake_case)]
    pub fn new(
        J: usize,
        K: usize,
        f: Vec<f64>,
        e: Vec<f64>,
        delta: f64,
        n0: Vec<f64>,
        r: Vec<f64>,
        sig: f64,
    ) -> Result<Self, MamsErr> {
        let design = TrialDesign {
            stages: J,
            arms: K,
            n0,
            r,
            delta,
            sig,
            e,
            f,
        };
        design.validate()?;
        Ok(design)
    }

    /// Checks every shape and sign constraint; deserialized designs must be
    /// validated before use.
    pub fn validate(&self) -> Result<(), MamsErr> {
        validate::check_dimensions(self.stages, self.arms)?;
        validate::check_positive_stages("n0", &self.n0, self.stages)?;
        validate::check_positive_stages("r", &self.r, self.stages)?;
        validate::check_sigma(self.sig)?;
        validate::check_effect(self.delta)?;
        validate::check_boundaries(&self.f, &self.e, self.stages)?;
        Ok(())
    }

    pub fn index(&self) -> StatisticIndex {
        StatisticIndex::new(self.stages, self.arms)
    }

    /// Whether the last analysis leaves no gap between futility and efficacy.
    /// When it does, "never rejected" patterns do not cover the band
    /// `f[J] < Z < e[J]` at the final stage.
    pub fn closes_at_final_stage(&self) -> bool {
        match (self.f.last(), self.e.last()) {
            (Some(f), Some(e)) => f >= e,
            _ => false,
        }
    }
}
