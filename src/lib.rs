//! Loan Survival - time-to-default analysis for unsecured loan portfolios
//!
//! This library provides:
//! - Portfolio CSV loading with rate, score and amount bucketing
//! - Duration/event derivation against an observation cutoff
//! - Kaplan-Meier survival and Nelson-Aalen cumulative hazard estimation
//! - Segment partitioning by rate period and score tier
//! - Milestone tables, plot series and CSV/JSON output

pub mod error;
pub mod loan;
pub mod survival;
pub mod segment;
pub mod summary;
pub mod config;
pub mod analyzer;
pub mod output;

// Re-export commonly used types
pub use error::{DataError, EstimationError};
pub use loan::{LoanRecord, LoanStatus, RatePeriod, ScoreTier, RateTier, AmountTier};
pub use survival::{SurvivalEstimate, HazardEstimate, ObservationWindow, SurvivalObservation, StepCurve};
pub use segment::{partition, PartitionRequest, Segment, SegmentPalette};
pub use summary::{build_summary, baseline_statistics, SummaryRequest, SurvivalSummary};
pub use config::AnalysisConfig;
pub use analyzer::PortfolioAnalyzer;
