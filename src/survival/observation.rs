//! Derive (duration, event) observations from loan records

use crate::error::DataError;
use crate::loan::{AmountTier, LoanRecord, RatePeriod, RateTier, ScoreTier, DAYS_PER_MONTH};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Expected format of externally supplied cutoff dates
pub const WINDOW_DATE_FORMAT: &str = "%m-%d-%Y";

/// The "now" against which every duration is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationWindow {
    pub cutoff: NaiveDate,
}

impl ObservationWindow {
    pub fn new(cutoff: NaiveDate) -> Self {
        Self { cutoff }
    }

    /// Parse a `MM-DD-YYYY` cutoff
    pub fn parse(raw: &str) -> Result<Self, DataError> {
        NaiveDate::parse_from_str(raw.trim(), WINDOW_DATE_FORMAT)
            .map(Self::new)
            .map_err(|_| DataError::InvalidDate {
                value: raw.to_string(),
                expected: "MM-DD-YYYY",
            })
    }

    /// Signed calendar days from `open_date` to the cutoff
    pub fn elapsed_days(&self, open_date: NaiveDate) -> i64 {
        (self.cutoff - open_date).num_days()
    }

    /// Months from `open_date` to the cutoff, rounded half-to-even to 2 decimals
    pub fn elapsed_months(&self, open_date: NaiveDate) -> f64 {
        round_to_hundredths(self.elapsed_days(open_date) as f64 / DAYS_PER_MONTH)
    }
}

fn round_to_hundredths(x: f64) -> f64 {
    (x * 100.0).round_ties_even() / 100.0
}

/// One loan's contribution to a survival fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalObservation {
    pub loan_id: u64,
    /// Months from origination to the observation cutoff, >= 0
    pub duration: f64,
    /// True iff the loan defaulted; every other status is censored
    pub event: bool,
    pub rate_period: RatePeriod,
    pub score_tier: Option<ScoreTier>,
    pub rate_tier: Option<RateTier>,
    pub amount_tier: Option<AmountTier>,
}

impl SurvivalObservation {
    /// Derive from a loan, or `None` when the loan opened after the cutoff
    pub fn from_loan(loan: &LoanRecord, window: &ObservationWindow) -> Option<Self> {
        if window.elapsed_days(loan.open_date) < 0 {
            return None;
        }

        Some(Self {
            loan_id: loan.loan_id,
            duration: window.elapsed_months(loan.open_date),
            event: loan.status.is_default(),
            rate_period: loan.rate_period,
            score_tier: loan.score_tier,
            rate_tier: loan.rate_tier,
            amount_tier: loan.amount_tier,
        })
    }

    /// The pair fed to the estimators
    pub fn as_pair(&self) -> (f64, bool) {
        (self.duration, self.event)
    }
}

/// Observations derived for one window, plus the data-quality drops
#[derive(Debug, Clone, Default)]
pub struct DerivationReport {
    pub observations: Vec<SurvivalObservation>,
    /// Loans originated after the cutoff
    pub rejected: usize,
}

impl DerivationReport {
    pub fn event_count(&self) -> usize {
        self.observations.iter().filter(|o| o.event).count()
    }
}

/// Convert loans into survival observations for `window`.
///
/// Loans with a negative elapsed time are dropped and counted, never clamped.
pub fn derive_observations(loans: &[LoanRecord], window: &ObservationWindow) -> DerivationReport {
    let mut report = DerivationReport::default();

    for loan in loans {
        match SurvivalObservation::from_loan(loan, window) {
            Some(observation) => report.observations.push(observation),
            None => report.rejected += 1,
        }
    }

    log_derivation(&report, window);
    report
}

fn log_derivation(report: &DerivationReport, window: &ObservationWindow) {
    let total = report.observations.len();
    log::info!("Observation date: {}", window.cutoff.format("%Y-%m-%d"));
    log::info!("Total loans: {}", total);

    if total > 0 {
        let events = report.event_count();
        let censored = total - events;
        let pct = |count: usize| count as f64 / total as f64 * 100.0;
        let durations = report.observations.iter().map(|o| o.duration);
        let mean = durations.clone().sum::<f64>() / total as f64;
        let min = durations.clone().fold(f64::INFINITY, f64::min);
        let max = durations.fold(f64::NEG_INFINITY, f64::max);

        log::info!("Default events: {} ({:.1}%)", events, pct(events));
        log::info!("Censored observations: {} ({:.1}%)", censored, pct(censored));
        log::info!("Average duration: {:.1} months", mean);
        log::info!("Duration range: {:.1} to {:.1} months", min, max);
    }

    if report.rejected > 0 {
        log::warn!(
            "Dropped {} loans originated after the observation date",
            report.rejected
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{default_rate_period_cutoff, LoanStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan(id: u64, open: NaiveDate, status: &str) -> LoanRecord {
        LoanRecord::new(
            id,
            open,
            700,
            None,
            12.0,
            10_000.0,
            36,
            LoanStatus::parse(status),
            default_rate_period_cutoff(),
        )
    }

    #[test]
    fn test_duration_example() {
        let window = ObservationWindow::parse("04-01-2023").unwrap();
        assert_eq!(window.elapsed_days(date(2023, 1, 1)), 90);
        assert_eq!(window.elapsed_months(date(2023, 1, 1)), 2.96);
    }

    #[test]
    fn test_same_day_is_zero_duration() {
        let window = ObservationWindow::new(date(2025, 1, 31));
        let obs = SurvivalObservation::from_loan(&loan(1, date(2025, 1, 31), "OPEN"), &window).unwrap();
        assert_eq!(obs.duration, 0.0);
    }

    #[test]
    fn test_event_mapping() {
        let window = ObservationWindow::new(date(2025, 1, 31));
        let loans = vec![
            loan(1, date(2023, 1, 1), "DEFAULT"),
            loan(2, date(2023, 1, 1), "OPEN"),
            loan(3, date(2023, 1, 1), "CLOSED"),
            loan(4, date(2023, 1, 1), "Default"),
            loan(5, date(2023, 1, 1), "CHARGED_OFF"),
        ];
        let report = derive_observations(&loans, &window);

        let events: Vec<bool> = report.observations.iter().map(|o| o.event).collect();
        assert_eq!(events, vec![true, false, false, false, false]);
        assert_eq!(report.event_count(), 1);
    }

    #[test]
    fn test_future_originations_are_dropped() {
        let window = ObservationWindow::new(date(2025, 1, 31));
        let loans = vec![
            loan(1, date(2024, 12, 1), "OPEN"),
            loan(2, date(2025, 2, 1), "DEFAULT"),
            loan(3, date(2025, 1, 30), "DEFAULT"),
        ];
        let report = derive_observations(&loans, &window);

        assert_eq!(report.rejected, 1);
        let ids: Vec<u64> = report.observations.iter().map(|o| o.loan_id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(report.observations.iter().all(|o| o.duration >= 0.0));
        // 1 day / 30.44 = 0.0328... -> 0.03
        assert_eq!(report.observations[1].duration, 0.03);
    }

    #[test]
    fn test_window_parse_rejects_other_formats() {
        assert!(ObservationWindow::parse("2025-01-31").is_err());
        assert_eq!(
            ObservationWindow::parse("01-31-2025").unwrap().cutoff,
            date(2025, 1, 31)
        );
    }
}
