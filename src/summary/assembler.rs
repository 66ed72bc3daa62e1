//! Per-segment fits merged into one comparison table plus plot series

use crate::segment::{partition, PartitionRequest, Segment, SegmentPalette, BASELINE_COLOR};
use crate::survival::{SurvivalEstimate, SurvivalObservation, StepCurve, SUMMARY_MILESTONES};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Legend label of the whole-portfolio reference curve
pub const BASELINE_SERIES_LABEL: &str = "Baseline Survival Rate";

/// What to summarize and how
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRequest {
    pub partition: PartitionRequest,
    /// Months at which segment survival is reported
    pub milestones: Vec<f64>,
    /// Also fit the whole unfiltered population as a reference curve
    pub include_baseline: bool,
}

impl Default for SummaryRequest {
    fn default() -> Self {
        Self {
            partition: PartitionRequest::whole_population(),
            milestones: SUMMARY_MILESTONES.to_vec(),
            include_baseline: false,
        }
    }
}

/// Survival at one reporting month; `None` for an empty segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MilestoneSurvival {
    pub month: f64,
    pub survival: Option<f64>,
}

/// One row of the segment comparison table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentSummary {
    pub label: String,
    pub population: usize,
    pub defaults: usize,
    /// defaults / population as a fraction
    pub default_rate: Option<f64>,
    /// Median duration among defaulted members only
    pub median_time_to_default: Option<f64>,
    pub milestone_survival: Vec<MilestoneSurvival>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineStyle {
    Solid,
    Dashed,
}

/// One breakpoint of a plotted survival curve, with its display band
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub time: f64,
    pub survival: f64,
    pub lower: f64,
    pub upper: f64,
}

/// Everything a chart needs to draw one curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSeries {
    pub label: String,
    pub legend: String,
    pub color: String,
    pub style: LineStyle,
    pub points: Vec<SeriesPoint>,
}

impl PlotSeries {
    fn from_estimate(label: String, legend: String, color: String, style: LineStyle, estimate: Option<&SurvivalEstimate>) -> Self {
        let points = estimate
            .map(|km| {
                km.points()
                    .iter()
                    .zip(km.confidence_bands())
                    .map(|(p, band)| SeriesPoint {
                        time: p.time,
                        survival: p.value,
                        lower: band.lower,
                        upper: band.upper,
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self { label, legend, color, style, points }
    }
}

/// Comparison table rows and plot series, in partition order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurvivalSummary {
    pub segments: Vec<SegmentSummary>,
    pub series: Vec<PlotSeries>,
    pub baseline: Option<PlotSeries>,
}

/// Median of a sample, averaging the two middle values for even counts
pub fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

fn fit_segment(segment: &Segment) -> Option<SurvivalEstimate> {
    if segment.is_empty() {
        return None;
    }
    match SurvivalEstimate::fit(segment.pairs()) {
        Ok(estimate) => Some(estimate),
        Err(e) => {
            log::warn!("Segment '{}' could not be fitted: {}", segment.label, e);
            None
        }
    }
}

fn summarize_segment(segment: &Segment, milestones: &[f64], palette: &SegmentPalette) -> (SegmentSummary, PlotSeries) {
    let population = segment.len();
    let defaults = segment.event_count();
    let default_rate = (population > 0).then(|| defaults as f64 / population as f64);

    let mut event_durations: Vec<f64> = segment
        .members
        .iter()
        .filter(|o| o.event)
        .map(|o| o.duration)
        .collect();
    let median_time_to_default = median(&mut event_durations);

    let estimate = fit_segment(segment);

    let milestone_survival = milestones
        .iter()
        .map(|&month| MilestoneSurvival {
            month,
            survival: estimate.as_ref().map(|km| km.survival_at(month)),
        })
        .collect();

    let legend = match default_rate {
        Some(rate) => format!("{} ({} defaults | {:.1}%)", segment.label, defaults, rate * 100.0),
        None => format!("{} (0 defaults | undefined)", segment.label),
    };
    let series = PlotSeries::from_estimate(
        segment.label.clone(),
        legend,
        palette.color_for(&segment.label).to_string(),
        LineStyle::Solid,
        estimate.as_ref(),
    );

    let summary = SegmentSummary {
        label: segment.label.clone(),
        population,
        defaults,
        default_rate,
        median_time_to_default,
        milestone_survival,
    };

    (summary, series)
}

/// Fit the whole unfiltered population as a dashed reference curve
pub fn baseline_series(population: &[SurvivalObservation]) -> PlotSeries {
    let estimate = if population.is_empty() {
        None
    } else {
        SurvivalEstimate::fit(population.iter().map(|o| o.as_pair())).ok()
    };

    PlotSeries::from_estimate(
        BASELINE_SERIES_LABEL.to_string(),
        BASELINE_SERIES_LABEL.to_string(),
        BASELINE_COLOR.to_string(),
        LineStyle::Dashed,
        estimate.as_ref(),
    )
}

/// Partition `population`, fit each segment independently and assemble the
/// comparison table and series.
///
/// Segments are fitted in parallel but results keep partition order. Empty
/// segments yield a row of undefined statistics and an empty series; nothing
/// is dropped.
pub fn build_summary(
    population: &[SurvivalObservation],
    request: &SummaryRequest,
    palette: &SegmentPalette,
) -> SurvivalSummary {
    let segments = partition(population, &request.partition);
    log::debug!("Summarizing {} segments", segments.len());

    let (segments, series): (Vec<SegmentSummary>, Vec<PlotSeries>) = segments
        .par_iter()
        .map(|segment| summarize_segment(segment, &request.milestones, palette))
        .collect::<Vec<_>>()
        .into_iter()
        .unzip();

    let baseline = request.include_baseline.then(|| baseline_series(population));

    SurvivalSummary { segments, series, baseline }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{RatePeriod, ScoreTier};
    use crate::segment::FALLBACK_COLOR;
    use approx::assert_relative_eq;

    fn obs(id: u64, duration: f64, event: bool, period: RatePeriod, tier: ScoreTier) -> SurvivalObservation {
        SurvivalObservation {
            loan_id: id,
            duration,
            event,
            rate_period: period,
            score_tier: Some(tier),
            rate_tier: None,
            amount_tier: None,
        }
    }

    fn population() -> Vec<SurvivalObservation> {
        use RatePeriod::*;
        use ScoreTier::*;
        vec![
            obs(1, 5.0, false, PostIncrease, Prime),
            obs(2, 10.0, true, PostIncrease, Prime),
            obs(3, 10.0, true, PostIncrease, Prime),
            obs(4, 20.0, false, PostIncrease, Prime),
            obs(5, 8.0, true, PostIncrease, Subprime),
            obs(6, 30.0, false, PreIncrease, Prime),
            obs(7, 14.0, true, PreIncrease, Subprime),
            obs(8, 40.0, false, PreIncrease, Subprime),
        ]
    }

    fn request(rates: Vec<&str>, scores: Vec<&str>, include_baseline: bool) -> SummaryRequest {
        SummaryRequest {
            partition: PartitionRequest::rate_and_score(rates, scores),
            milestones: SUMMARY_MILESTONES.to_vec(),
            include_baseline,
        }
    }

    #[test]
    fn test_segment_statistics() {
        let pop = population();
        let summary = build_summary(
            &pop,
            &request(vec!["Post-Fed Rate Increase"], vec!["Prime"], false),
            &SegmentPalette::default(),
        );

        assert_eq!(summary.segments.len(), 1);
        let row = &summary.segments[0];
        assert_eq!(row.label, "Prime, Post-Fed Rate Increase");
        assert_eq!(row.population, 4);
        assert_eq!(row.defaults, 2);
        assert_relative_eq!(row.default_rate.unwrap(), 0.5);
        assert_eq!(row.median_time_to_default, Some(10.0));
        assert_relative_eq!(row.milestone_survival[0].survival.unwrap(), 1.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(row.milestone_survival[2].survival.unwrap(), 1.0 / 3.0, epsilon = 1e-12);

        let series = &summary.series[0];
        assert_eq!(series.color, "#e04441");
        assert_eq!(series.legend, "Prime, Post-Fed Rate Increase (2 defaults | 50.0%)");
        assert_eq!(series.points.len(), 4);
        assert!(summary.baseline.is_none());
    }

    #[test]
    fn test_empty_segment_is_reported_as_undefined() {
        let pop = population();
        let summary = build_summary(
            &pop,
            &request(vec!["Pre-Fed Rate Increase"], vec!["Near-Prime", "Subprime"], false),
            &SegmentPalette::default(),
        );

        assert_eq!(summary.segments.len(), 2);
        let empty = &summary.segments[0];
        assert_eq!(empty.label, "Near-Prime, Pre-Fed Rate Increase");
        assert_eq!(empty.population, 0);
        assert_eq!(empty.default_rate, None);
        assert_eq!(empty.median_time_to_default, None);
        assert!(empty.milestone_survival.iter().all(|m| m.survival.is_none()));
        assert!(summary.series[0].points.is_empty());

        let subprime = &summary.segments[1];
        assert_eq!(subprime.population, 2);
        assert_eq!(subprime.median_time_to_default, Some(14.0));
    }

    #[test]
    fn test_segment_without_defaults_has_no_median() {
        let pop = population();
        let summary = build_summary(
            &pop,
            &request(vec!["Pre-Fed Rate Increase"], vec!["Prime"], false),
            &SegmentPalette::default(),
        );
        let row = &summary.segments[0];
        assert_eq!(row.default_rate, Some(0.0));
        assert_eq!(row.median_time_to_default, None);
        assert_eq!(row.milestone_survival[1].survival, Some(1.0));
    }

    #[test]
    fn test_baseline_uses_unfiltered_population() {
        let pop = population();
        let summary = build_summary(
            &pop,
            &request(vec![], vec!["Subprime"], true),
            &SegmentPalette::default(),
        );

        let baseline = summary.baseline.expect("baseline requested");
        assert_eq!(baseline.style, LineStyle::Dashed);
        assert_eq!(baseline.color, BASELINE_COLOR);
        let expected = SurvivalEstimate::fit(pop.iter().map(|o| o.as_pair())).unwrap();
        assert_eq!(baseline.points.len(), expected.points().len());
        assert_eq!(summary.series[0].label, "Subprime");
    }

    #[test]
    fn test_unmapped_label_uses_fallback_color() {
        let pop = population();
        let summary = build_summary(&pop, &SummaryRequest::default(), &SegmentPalette::default());
        assert_eq!(summary.segments[0].population, pop.len());
        assert_eq!(summary.series[0].color, FALLBACK_COLOR);
    }

    #[test]
    fn test_repeat_runs_are_identical() {
        let pop = population();
        let req = request(
            vec!["Post-Fed Rate Increase", "Pre-Fed Rate Increase"],
            vec!["Prime", "Subprime", "Super-Prime"],
            true,
        );
        let palette = SegmentPalette::default();
        let first = build_summary(&pop, &req, &palette);
        let second = build_summary(&pop, &req, &palette);

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_median_even_and_odd() {
        assert_eq!(median(&mut []), None);
        assert_eq!(median(&mut [3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&mut [4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }
}
