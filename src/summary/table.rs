//! Display tables: percentages as strings, undefined cells spelled out

use super::assembler::SurvivalSummary;
use super::baseline::BaselineStatistics;
use serde::Serialize;

/// Cell text for a statistic that has no value (e.g. an empty segment)
pub const UNDEFINED: &str = "undefined";

/// Format a fraction as a percentage with `decimals` places, e.g. `97.25%`
pub fn format_percent(fraction: Option<f64>, decimals: usize) -> String {
    match fraction {
        Some(f) => format!("{:.*}%", decimals, f * 100.0),
        None => UNDEFINED.to_string(),
    }
}

/// Format a plain number with `decimals` places
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", decimals, v),
        None => UNDEFINED.to_string(),
    }
}

/// Month label without a trailing `.0` for whole months
pub fn format_month(month: f64) -> String {
    format!("{}", month)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaselineTableRow {
    #[serde(rename = "Months")]
    pub months: String,
    #[serde(rename = "Survival Probability")]
    pub survival: String,
    #[serde(rename = "Default Probability")]
    pub default_probability: String,
    #[serde(rename = "Cumulative Hazard")]
    pub cumulative_hazard: String,
}

/// Baseline statistics with every value as a 2-decimal percentage
pub fn baseline_table(stats: &BaselineStatistics) -> Vec<BaselineTableRow> {
    stats
        .rows
        .iter()
        .map(|row| BaselineTableRow {
            months: format_month(row.month),
            survival: format_percent(row.survival, 2),
            default_probability: format_percent(row.default_probability, 2),
            cumulative_hazard: format_percent(row.cumulative_hazard, 2),
        })
        .collect()
}

/// A formatted row of the segment comparison table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentTableRow {
    pub risk_segment: String,
    pub default_rate: String,
    pub median_time_to_default: String,
    /// One cell per summary milestone, in milestone order
    pub milestone_survival: Vec<String>,
    pub defaults: usize,
    pub loans: usize,
}

impl SegmentTableRow {
    pub fn cells(&self) -> Vec<String> {
        let mut cells = vec![
            self.risk_segment.clone(),
            self.default_rate.clone(),
            self.median_time_to_default.clone(),
        ];
        cells.extend(self.milestone_survival.iter().cloned());
        cells.push(self.defaults.to_string());
        cells.push(self.loans.to_string());
        cells
    }
}

/// Column headers for a segment table sampled at `months`
pub fn segment_table_headers(months: &[f64]) -> Vec<String> {
    let mut headers = vec![
        "Risk Segment".to_string(),
        "Default Rate (%)".to_string(),
        "Median Time to Default (months)".to_string(),
    ];
    headers.extend(
        months
            .iter()
            .map(|m| format!("{} Month Survival Rate (%)", format_month(*m))),
    );
    headers.push("Number of Defaults".to_string());
    headers.push("Number of Loans".to_string());
    headers
}

/// Segment summary with rates at 1 decimal place
pub fn segment_table(summary: &SurvivalSummary) -> Vec<SegmentTableRow> {
    summary
        .segments
        .iter()
        .map(|s| SegmentTableRow {
            risk_segment: s.label.clone(),
            default_rate: format_percent(s.default_rate, 1),
            median_time_to_default: format_number(s.median_time_to_default, 1),
            milestone_survival: s
                .milestone_survival
                .iter()
                .map(|m| format_percent(m.survival, 1))
                .collect(),
            defaults: s.defaults,
            loans: s.population,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{BaselineRow, MilestoneSurvival, SegmentSummary};

    #[test]
    fn test_percent_formatting() {
        assert_eq!(format_percent(Some(0.97254), 2), "97.25%");
        assert_eq!(format_percent(Some(1.0), 2), "100.00%");
        assert_eq!(format_percent(Some(0.125), 1), "12.5%");
        assert_eq!(format_percent(None, 1), UNDEFINED);
        assert_eq!(format_number(Some(13.04), 1), "13.0");
        assert_eq!(format_month(12.0), "12");
        assert_eq!(format_month(1.5), "1.5");
    }

    #[test]
    fn test_baseline_table() {
        let stats = BaselineStatistics {
            population: 10,
            defaults: 1,
            rows: vec![BaselineRow {
                month: 6.0,
                survival: Some(0.9),
                default_probability: Some(0.1),
                cumulative_hazard: Some(0.10536),
            }],
            median_time_to_default: Some(4.0),
            median_survival_time: None,
        };
        let table = baseline_table(&stats);
        assert_eq!(
            table[0],
            BaselineTableRow {
                months: "6".into(),
                survival: "90.00%".into(),
                default_probability: "10.00%".into(),
                cumulative_hazard: "10.54%".into(),
            }
        );
    }

    #[test]
    fn test_segment_table_with_undefined_cells() {
        let summary = SurvivalSummary {
            segments: vec![SegmentSummary {
                label: "Near-Prime, Pre-Fed Rate Increase".into(),
                population: 0,
                defaults: 0,
                default_rate: None,
                median_time_to_default: None,
                milestone_survival: vec![MilestoneSurvival { month: 12.0, survival: None }],
            }],
            series: Vec::new(),
            baseline: None,
        };

        let rows = segment_table(&summary);
        assert_eq!(
            rows[0].cells(),
            vec![
                "Near-Prime, Pre-Fed Rate Increase",
                UNDEFINED,
                UNDEFINED,
                UNDEFINED,
                "0",
                "0"
            ]
        );
        assert_eq!(segment_table_headers(&[12.0]).len(), rows[0].cells().len());
    }
}
