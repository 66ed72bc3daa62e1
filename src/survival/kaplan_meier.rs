//! Kaplan-Meier estimate of the probability of not having defaulted by time t

use super::step::{risk_table, RiskRow, StepCurve, StepPoint};
use crate::error::EstimationError;
use serde::{Deserialize, Serialize};

/// Two-sided 95% standard normal quantile
const Z_95: f64 = 1.959_963_984_540_054;

/// Pointwise 95% confidence band at one breakpoint (display only)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceBand {
    pub lower: f64,
    pub upper: f64,
}

/// Fitted survival curve for one population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalEstimate {
    points: Vec<StepPoint>,
    table: Vec<RiskRow>,
    bands: Vec<ConfidenceBand>,
}

impl SurvivalEstimate {
    /// Fit from (duration, event) pairs.
    ///
    /// `S(t) = S(t-) * (1 - d_t / n_t)` at each distinct time. Empty input is
    /// an error; callers should check population size first.
    pub fn fit<I>(observations: I) -> Result<Self, EstimationError>
    where
        I: IntoIterator<Item = (f64, bool)>,
    {
        let table = risk_table(observations)?;

        let mut points = Vec::with_capacity(table.len());
        let mut bands = Vec::with_capacity(table.len());
        let mut survival = 1.0_f64;
        // Greenwood sum of d / (n (n - d)); infinite once S hits zero
        let mut greenwood = 0.0_f64;

        for row in &table {
            if row.events > 0 {
                let n = row.at_risk as f64;
                let d = row.events as f64;
                survival *= 1.0 - d / n;
                if row.at_risk > row.events {
                    greenwood += d / (n * (n - d));
                } else {
                    greenwood = f64::INFINITY;
                }
            }
            points.push(StepPoint { time: row.time, value: survival });
            bands.push(log_log_band(survival, greenwood));
        }

        Ok(Self { points, table, bands })
    }

    /// Survival probability at `t` (right-continuous lookup)
    pub fn survival_at(&self, t: f64) -> f64 {
        self.value_at(t)
    }

    /// Probability of default by `t`
    pub fn default_probability_at(&self, t: f64) -> f64 {
        1.0 - self.survival_at(t)
    }

    /// First time at which survival drops to 0.5 or below
    pub fn median_survival_time(&self) -> Option<f64> {
        self.points.iter().find(|p| p.value <= 0.5).map(|p| p.time)
    }

    pub fn risk_table(&self) -> &[RiskRow] {
        &self.table
    }

    /// Confidence bands aligned with `points()`
    pub fn confidence_bands(&self) -> &[ConfidenceBand] {
        &self.bands
    }

    /// Number of observations the curve was fitted on
    pub fn population(&self) -> usize {
        self.table.first().map(|r| r.at_risk).unwrap_or(0)
    }

    pub fn event_count(&self) -> usize {
        self.table.iter().map(|r| r.events).sum()
    }
}

impl StepCurve for SurvivalEstimate {
    fn initial_value(&self) -> f64 {
        1.0
    }

    fn points(&self) -> &[StepPoint] {
        &self.points
    }
}

/// Exponential Greenwood band: symmetric on log(-log S)
fn log_log_band(survival: f64, greenwood: f64) -> ConfidenceBand {
    if survival >= 1.0 {
        return ConfidenceBand { lower: 1.0, upper: 1.0 };
    }
    if survival <= 0.0 || !greenwood.is_finite() {
        return ConfidenceBand { lower: 0.0, upper: 0.0 };
    }

    let log_s = survival.ln();
    let centre = (-log_s).ln();
    let spread = Z_95 * greenwood.sqrt() / log_s;
    let a = (-(centre + spread).exp()).exp();
    let b = (-(centre - spread).exp()).exp();

    ConfidenceBand { lower: a.min(b), upper: a.max(b) }
}
