//! Risk tables and right-continuous step functions shared by both estimators

use crate::error::EstimationError;
use serde::{Deserialize, Serialize};

/// Counts at one distinct observed time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskRow {
    pub time: f64,
    /// Observations with duration >= time (at risk just before `time`)
    pub at_risk: usize,
    /// Defaults observed exactly at `time`
    pub events: usize,
    /// Censored observations exactly at `time`
    pub censored: usize,
}

/// A single breakpoint of a fitted curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepPoint {
    pub time: f64,
    pub value: f64,
}

/// Build the event table for a set of (duration, event) observations.
///
/// Rows are ordered by time, one per distinct duration, with a leading row at
/// time 0 when no observation sits exactly there. Censored observations are
/// counted in the risk set of their own time and leave it afterwards.
pub fn risk_table<I>(observations: I) -> Result<Vec<RiskRow>, EstimationError>
where
    I: IntoIterator<Item = (f64, bool)>,
{
    let mut data: Vec<(f64, bool)> = observations.into_iter().collect();
    if data.is_empty() {
        return Err(EstimationError::EmptyPopulation);
    }
    if let Some(&(bad, _)) = data.iter().find(|(d, _)| !d.is_finite() || *d < 0.0) {
        return Err(EstimationError::InvalidDuration(bad));
    }

    data.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut rows = Vec::new();
    let mut at_risk = data.len();

    if data[0].0 > 0.0 {
        rows.push(RiskRow { time: 0.0, at_risk, events: 0, censored: 0 });
    }

    let mut i = 0;
    while i < data.len() {
        let time = data[i].0;
        let mut events = 0;
        let mut censored = 0;
        while i < data.len() && data[i].0 == time {
            if data[i].1 {
                events += 1;
            } else {
                censored += 1;
            }
            i += 1;
        }

        rows.push(RiskRow { time, at_risk, events, censored });
        at_risk -= events + censored;
    }

    Ok(rows)
}

/// A fitted right-continuous step function of time
pub trait StepCurve {
    /// Value before the first breakpoint
    fn initial_value(&self) -> f64;

    /// Breakpoints in ascending time order
    fn points(&self) -> &[StepPoint];

    /// Value at the latest breakpoint with time <= `t`; the initial value
    /// before the first breakpoint, flat after the last one.
    fn value_at(&self, t: f64) -> f64 {
        let points = self.points();
        let idx = points.partition_point(|p| p.time <= t);
        if idx == 0 {
            self.initial_value()
        } else {
            points[idx - 1].value
        }
    }

    /// Distinct times at which the curve is defined
    fn timeline(&self) -> Vec<f64> {
        self.points().iter().map(|p| p.time).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_table_counts() {
        let rows = risk_table(vec![(5.0, false), (10.0, true), (10.0, true), (20.0, false)]).unwrap();

        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0], RiskRow { time: 0.0, at_risk: 4, events: 0, censored: 0 });
        assert_eq!(rows[1], RiskRow { time: 5.0, at_risk: 4, events: 0, censored: 1 });
        assert_eq!(rows[2], RiskRow { time: 10.0, at_risk: 3, events: 2, censored: 0 });
        assert_eq!(rows[3], RiskRow { time: 20.0, at_risk: 1, events: 0, censored: 1 });
    }

    #[test]
    fn test_censored_tie_stays_at_risk() {
        // Censored at 3 alongside an event at 3: both count in n_3
        let rows = risk_table(vec![(3.0, true), (3.0, false), (4.0, true)]).unwrap();
        let at_3 = rows.iter().find(|r| r.time == 3.0).unwrap();
        assert_eq!(at_3.at_risk, 3);
        assert_eq!(at_3.events, 1);
        assert_eq!(at_3.censored, 1);
        let at_4 = rows.iter().find(|r| r.time == 4.0).unwrap();
        assert_eq!(at_4.at_risk, 1);
    }

    #[test]
    fn test_zero_duration_has_no_extra_origin_row() {
        let rows = risk_table(vec![(0.0, false), (1.0, true)]).unwrap();
        assert_eq!(rows[0].time, 0.0);
        assert_eq!(rows[0].censored, 1);
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_rejects_empty_and_invalid() {
        assert_eq!(risk_table(Vec::new()), Err(EstimationError::EmptyPopulation));
        assert_eq!(
            risk_table(vec![(1.0, true), (-0.5, false)]),
            Err(EstimationError::InvalidDuration(-0.5))
        );
        assert!(matches!(
            risk_table(vec![(f64::NAN, true)]),
            Err(EstimationError::InvalidDuration(_))
        ));
    }
}
