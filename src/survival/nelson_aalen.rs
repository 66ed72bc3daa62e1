//! Nelson-Aalen cumulative hazard of default

use super::step::{risk_table, RiskRow, StepCurve, StepPoint};
use crate::error::EstimationError;
use serde::{Deserialize, Serialize};

/// Fitted cumulative hazard curve for one population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HazardEstimate {
    points: Vec<StepPoint>,
    table: Vec<RiskRow>,
}

impl HazardEstimate {
    /// Fit from (duration, event) pairs: `H(t) = H(t-) + d_t / n_t`
    pub fn fit<I>(observations: I) -> Result<Self, EstimationError>
    where
        I: IntoIterator<Item = (f64, bool)>,
    {
        let table = risk_table(observations)?;

        let mut hazard = 0.0_f64;
        let points = table
            .iter()
            .map(|row| {
                if row.events > 0 {
                    hazard += row.events as f64 / row.at_risk as f64;
                }
                StepPoint { time: row.time, value: hazard }
            })
            .collect();

        Ok(Self { points, table })
    }

    /// Cumulative hazard at `t` (right-continuous lookup)
    pub fn cumulative_hazard_at(&self, t: f64) -> f64 {
        self.value_at(t)
    }

    pub fn risk_table(&self) -> &[RiskRow] {
        &self.table
    }
}

impl StepCurve for HazardEstimate {
    fn initial_value(&self) -> f64 {
        0.0
    }

    fn points(&self) -> &[StepPoint] {
        &self.points
    }
}
