//! Portfolio analyzer for repeated segment comparisons
//!
//! Derives the observation population once, then answers many partition
//! requests against it without re-reading or re-deriving anything.

use crate::config::AnalysisConfig;
use crate::error::DataError;
use crate::loan::{load_loans, load_loans_from_reader, LoanRecord};
use crate::segment::SegmentPalette;
use crate::summary::{baseline_statistics, build_summary, BaselineStatistics, SummaryRequest, SurvivalSummary};
use crate::survival::{derive_observations, ObservationWindow, SurvivalObservation};
use std::path::Path;

/// Pre-derived population plus the display palette
///
/// # Example
/// ```ignore
/// let analyzer = PortfolioAnalyzer::from_csv_path("loan_data.csv", &config)?;
///
/// for tiers in [vec!["Prime"], vec!["Subprime", "Near-Prime"]] {
///     let request = SummaryRequest { partition: PartitionRequest::rate_and_score(vec![], tiers), ..Default::default() };
///     let summary = analyzer.summarize(&request);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PortfolioAnalyzer {
    window: ObservationWindow,
    observations: Vec<SurvivalObservation>,
    /// Loans dropped for opening after the cutoff
    rejected: usize,
    /// Rows dropped at load for a non-positive rate
    excluded_at_load: usize,
    palette: SegmentPalette,
}

impl PortfolioAnalyzer {
    /// Derive observations from already-loaded loans
    pub fn new(loans: &[LoanRecord], window: ObservationWindow, palette: SegmentPalette) -> Self {
        let report = derive_observations(loans, &window);
        Self {
            window,
            observations: report.observations,
            rejected: report.rejected,
            excluded_at_load: 0,
            palette,
        }
    }

    /// Load the portfolio file and derive observations per `config`
    pub fn from_csv_path<P: AsRef<Path>>(path: P, config: &AnalysisConfig) -> Result<Self, DataError> {
        let window = config.window()?;
        let loaded = load_loans(path, config.rate_period_cutoff)?;
        let mut analyzer = Self::new(&loaded.loans, window, config.palette.clone());
        analyzer.excluded_at_load = loaded.excluded_non_positive_rate;
        Ok(analyzer)
    }

    /// Same as `from_csv_path` for any reader
    pub fn from_reader<R: std::io::Read>(reader: R, config: &AnalysisConfig) -> Result<Self, DataError> {
        let window = config.window()?;
        let loaded = load_loans_from_reader(reader, config.rate_period_cutoff)?;
        let mut analyzer = Self::new(&loaded.loans, window, config.palette.clone());
        analyzer.excluded_at_load = loaded.excluded_non_positive_rate;
        Ok(analyzer)
    }

    pub fn window(&self) -> &ObservationWindow {
        &self.window
    }

    pub fn observations(&self) -> &[SurvivalObservation] {
        &self.observations
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    pub fn excluded_at_load(&self) -> usize {
        self.excluded_at_load
    }

    /// Whole-portfolio statistics at `months`
    pub fn baseline(&self, months: &[f64]) -> BaselineStatistics {
        baseline_statistics(&self.observations, months)
    }

    /// Segment comparison for one request
    pub fn summarize(&self, request: &SummaryRequest) -> SurvivalSummary {
        build_summary(&self.observations, request, &self.palette)
    }

    /// Segment comparisons for several requests against the same population
    pub fn summarize_many(&self, requests: &[SummaryRequest]) -> Vec<SurvivalSummary> {
        requests.iter().map(|r| self.summarize(r)).collect()
    }
}
