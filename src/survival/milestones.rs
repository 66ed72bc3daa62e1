//! Sample fitted curves at fixed horizons

use super::kaplan_meier::SurvivalEstimate;
use super::step::StepCurve;
use serde::{Deserialize, Serialize};

/// Months at which the baseline statistics table is sampled
pub const BASELINE_MILESTONES: [f64; 6] = [6.0, 12.0, 18.0, 24.0, 30.0, 36.0];

/// Months reported in the segment comparison table
pub const SUMMARY_MILESTONES: [f64; 3] = [12.0, 24.0, 36.0];

/// A curve value at one milestone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MilestoneValue {
    pub month: f64,
    pub value: f64,
}

/// Evaluate any fitted step curve at each milestone, in the order given
pub fn evaluate<C: StepCurve + ?Sized>(curve: &C, milestones: &[f64]) -> Vec<MilestoneValue> {
    milestones
        .iter()
        .map(|&month| MilestoneValue { month, value: curve.value_at(month) })
        .collect()
}

/// Default probability (1 - survival) at each milestone
pub fn default_probabilities(estimate: &SurvivalEstimate, milestones: &[f64]) -> Vec<MilestoneValue> {
    milestones
        .iter()
        .map(|&month| MilestoneValue { month, value: estimate.default_probability_at(month) })
        .collect()
}
