//! Non-parametric time-to-default estimation
//!
//! - Duration/event derivation from loan records against a cutoff
//! - Kaplan-Meier survival and Nelson-Aalen cumulative hazard curves
//! - Milestone sampling of any fitted step curve
//!
//! Both estimators share one risk table: at each distinct duration `t`,
//! `n_t` counts observations with duration >= t and `d_t` counts defaults at
//! `t`. Censored loans stay in the risk set at their own time and leave it
//! immediately after.

mod kaplan_meier;
pub mod milestones;
mod nelson_aalen;
mod observation;
mod step;

pub use kaplan_meier::{ConfidenceBand, SurvivalEstimate};
pub use milestones::{MilestoneValue, BASELINE_MILESTONES, SUMMARY_MILESTONES};
pub use nelson_aalen::HazardEstimate;
pub use observation::{derive_observations, DerivationReport, ObservationWindow, SurvivalObservation};
pub use step::{risk_table, RiskRow, StepCurve, StepPoint};
