//! Whole-portfolio survival, default and hazard statistics at fixed months

use super::assembler::median;
use crate::survival::{milestones, HazardEstimate, SurvivalEstimate, SurvivalObservation};
use serde::{Deserialize, Serialize};

/// Portfolio curves sampled at one month; all `None` for an empty portfolio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaselineRow {
    pub month: f64,
    pub survival: Option<f64>,
    pub default_probability: Option<f64>,
    pub cumulative_hazard: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineStatistics {
    pub population: usize,
    pub defaults: usize,
    pub rows: Vec<BaselineRow>,
    /// Median duration among loans that defaulted
    pub median_time_to_default: Option<f64>,
    /// First month at which portfolio survival falls to 50% or below
    pub median_survival_time: Option<f64>,
}

/// Fit Kaplan-Meier and Nelson-Aalen on the whole population and sample both
/// at `months`.
pub fn baseline_statistics(population: &[SurvivalObservation], months: &[f64]) -> BaselineStatistics {
    let pairs = || population.iter().map(|o| o.as_pair());

    let fits = if population.is_empty() {
        None
    } else {
        match (SurvivalEstimate::fit(pairs()), HazardEstimate::fit(pairs())) {
            (Ok(km), Ok(na)) => Some((km, na)),
            (Err(e), _) | (_, Err(e)) => {
                log::warn!("Baseline curves could not be fitted: {}", e);
                None
            }
        }
    };

    let rows = match &fits {
        Some((km, na)) => {
            let survival = milestones::evaluate(km, months);
            let defaults = milestones::default_probabilities(km, months);
            let hazard = milestones::evaluate(na, months);
            survival
                .iter()
                .zip(&defaults)
                .zip(&hazard)
                .map(|((s, d), h)| BaselineRow {
                    month: s.month,
                    survival: Some(s.value),
                    default_probability: Some(d.value),
                    cumulative_hazard: Some(h.value),
                })
                .collect()
        }
        None => months
            .iter()
            .map(|&month| BaselineRow {
                month,
                survival: None,
                default_probability: None,
                cumulative_hazard: None,
            })
            .collect(),
    };

    let mut event_durations: Vec<f64> = population
        .iter()
        .filter(|o| o.event)
        .map(|o| o.duration)
        .collect();

    BaselineStatistics {
        population: population.len(),
        defaults: event_durations.len(),
        rows,
        median_time_to_default: median(&mut event_durations),
        median_survival_time: fits.as_ref().and_then(|(km, _)| km.median_survival_time()),
    }
}
