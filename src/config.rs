//! Analysis configuration
//!
//! Defaults reproduce the standard portfolio view: observation date
//! 01-31-2025, rate periods split at 2022-04-01, post-increase loans by every
//! score tier. Any field can be overridden from a JSON file.

use crate::error::DataError;
use crate::loan::default_rate_period_cutoff;
use crate::segment::{PartitionRequest, SegmentPalette};
use crate::summary::SummaryRequest;
use crate::survival::{ObservationWindow, BASELINE_MILESTONES, SUMMARY_MILESTONES};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default observation cutoff (`MM-DD-YYYY`)
pub const DEFAULT_OBSERVATION_DATE: &str = "01-31-2025";

fn default_observation_date() -> String {
    DEFAULT_OBSERVATION_DATE.to_string()
}

fn default_rate_periods() -> Vec<String> {
    vec!["Post-Fed Rate Increase".to_string()]
}

fn default_score_tiers() -> Vec<String> {
    ["Prime", "Super-Prime", "Subprime", "Near-Prime"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_baseline_milestones() -> Vec<f64> {
    BASELINE_MILESTONES.to_vec()
}

fn default_summary_milestones() -> Vec<f64> {
    SUMMARY_MILESTONES.to_vec()
}

/// Configuration for an analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Observation cutoff in `MM-DD-YYYY`
    #[serde(default = "default_observation_date")]
    pub observation_date: String,

    /// Loans opened before this date are pre-increase
    #[serde(default = "default_rate_period_cutoff")]
    pub rate_period_cutoff: NaiveDate,

    /// Selected rate periods (outer dimension); empty means not partitioned
    #[serde(default = "default_rate_periods")]
    pub rate_periods: Vec<String>,

    /// Selected score tiers (inner dimension); empty means not partitioned
    #[serde(default = "default_score_tiers")]
    pub score_tiers: Vec<String>,

    /// Overlay the whole-portfolio curve on segment plots
    pub include_baseline: bool,

    /// Months for the baseline statistics table
    #[serde(default = "default_baseline_milestones")]
    pub baseline_milestones: Vec<f64>,

    /// Months for the segment comparison table
    #[serde(default = "default_summary_milestones")]
    pub summary_milestones: Vec<f64>,

    pub palette: SegmentPalette,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            observation_date: default_observation_date(),
            rate_period_cutoff: default_rate_period_cutoff(),
            rate_periods: default_rate_periods(),
            score_tiers: default_score_tiers(),
            include_baseline: false,
            baseline_milestones: default_baseline_milestones(),
            summary_milestones: default_summary_milestones(),
            palette: SegmentPalette::default(),
        }
    }
}

impl AnalysisConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn window(&self) -> Result<ObservationWindow, DataError> {
        ObservationWindow::parse(&self.observation_date)
    }

    /// Rate period x score tier partition from the selections
    pub fn partition_request(&self) -> PartitionRequest {
        PartitionRequest::rate_and_score(self.rate_periods.clone(), self.score_tiers.clone())
    }

    pub fn summary_request(&self) -> SummaryRequest {
        SummaryRequest {
            partition: self.partition_request(),
            milestones: self.summary_milestones.clone(),
            include_baseline: self.include_baseline,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(
            config.window().unwrap().cutoff,
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap()
        );
        assert_eq!(config.partition_request().segment_count(), 4);
        assert_eq!(config.summary_request().milestones, vec![12.0, 24.0, 36.0]);
        assert!(!config.include_baseline);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = AnalysisConfig::from_json_str(
            r#"{ "observation_date": "06-30-2024", "score_tiers": [], "include_baseline": true }"#,
        )
        .unwrap();

        assert_eq!(config.observation_date, "06-30-2024");
        assert!(config.score_tiers.is_empty());
        assert!(config.include_baseline);
        assert_eq!(config.rate_periods, default_rate_periods());
        assert_eq!(config.rate_period_cutoff, default_rate_period_cutoff());
        assert_eq!(config.baseline_milestones.len(), 6);
        assert_eq!(config.palette, SegmentPalette::default());
    }

    #[test]
    fn test_bad_inputs_are_errors() {
        assert!(matches!(
            AnalysisConfig::from_json_str("{ not json"),
            Err(DataError::Json(_))
        ));

        let config = AnalysisConfig {
            observation_date: "2025-01-31".into(),
            ..Default::default()
        };
        assert!(matches!(config.window(), Err(DataError::InvalidDate { .. })));
    }
}
