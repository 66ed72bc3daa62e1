//! CSV and JSON writers for analysis results

use crate::error::DataError;
use crate::summary::table::{baseline_table, segment_table, segment_table_headers};
use crate::summary::{BaselineStatistics, PlotSeries, SurvivalSummary};
use csv::Writer;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub const BASELINE_TABLE_FILE: &str = "baseline_statistics.csv";
pub const SEGMENT_TABLE_FILE: &str = "segment_summary.csv";
pub const SERIES_FILE: &str = "survival_curves.csv";
pub const SUMMARY_JSON_FILE: &str = "survival_summary.json";

/// Baseline statistics table, one row per milestone
pub fn write_baseline_table<W: Write>(writer: W, stats: &BaselineStatistics) -> Result<(), DataError> {
    let mut csv = Writer::from_writer(writer);
    for row in baseline_table(stats) {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

/// Segment comparison table with one survival column per summary milestone
pub fn write_segment_table<W: Write>(
    writer: W,
    summary: &SurvivalSummary,
    months: &[f64],
) -> Result<(), DataError> {
    let mut csv = Writer::from_writer(writer);
    csv.write_record(segment_table_headers(months))?;
    for row in segment_table(summary) {
        csv.write_record(row.cells())?;
    }
    csv.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct SeriesRecord<'a> {
    series: &'a str,
    time: f64,
    survival: f64,
    lower: f64,
    upper: f64,
}

/// Plot series in long format: `series,time,survival,lower,upper`
///
/// The baseline curve, when present, comes last.
pub fn write_series<W: Write>(writer: W, summary: &SurvivalSummary) -> Result<(), DataError> {
    let mut csv = Writer::from_writer(writer);
    let all: Vec<&PlotSeries> = summary.series.iter().chain(summary.baseline.as_ref()).collect();
    for series in all {
        for point in &series.points {
            csv.serialize(SeriesRecord {
                series: &series.label,
                time: point.time,
                survival: point.survival,
                lower: point.lower,
                upper: point.upper,
            })?;
        }
    }
    csv.flush()?;
    Ok(())
}

pub fn write_json<W: Write, T: Serialize>(writer: W, value: &T) -> Result<(), DataError> {
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

/// Write every output file into `dir`, creating it if needed
pub fn write_all<P: AsRef<Path>>(
    dir: P,
    baseline: &BaselineStatistics,
    summary: &SurvivalSummary,
    months: &[f64],
) -> Result<(), DataError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    write_baseline_table(File::create(dir.join(BASELINE_TABLE_FILE))?, baseline)?;
    write_segment_table(File::create(dir.join(SEGMENT_TABLE_FILE))?, summary, months)?;
    write_series(File::create(dir.join(SERIES_FILE))?, summary)?;
    write_json(File::create(dir.join(SUMMARY_JSON_FILE))?, summary)?;

    log::info!("Wrote results to {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{
        BaselineRow, LineStyle, MilestoneSurvival, SegmentSummary, SeriesPoint,
    };

    fn summary() -> SurvivalSummary {
        SurvivalSummary {
            segments: vec![SegmentSummary {
                label: "Prime, Post-Fed Rate Increase".into(),
                population: 4,
                defaults: 1,
                default_rate: Some(0.25),
                median_time_to_default: Some(3.5),
                milestone_survival: vec![MilestoneSurvival { month: 12.0, survival: Some(0.75) }],
            }],
            series: vec![PlotSeries {
                label: "Prime, Post-Fed Rate Increase".into(),
                legend: "Prime, Post-Fed Rate Increase (1 defaults | 25.0%)".into(),
                color: "#1f77b4".into(),
                style: LineStyle::Solid,
                points: vec![
                    SeriesPoint { time: 0.0, survival: 1.0, lower: 1.0, upper: 1.0 },
                    SeriesPoint { time: 3.5, survival: 0.75, lower: 0.13, upper: 0.96 },
                ],
            }],
            baseline: None,
        }
    }

    #[test]
    fn test_segment_table_csv() {
        let mut buf = Vec::new();
        write_segment_table(&mut buf, &summary(), &[12.0]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Risk Segment,Default Rate (%),Median Time to Default (months),12 Month Survival Rate (%),Number of Defaults,Number of Loans"
        );
        assert_eq!(lines[1], "\"Prime, Post-Fed Rate Increase\",25.0%,3.5,75.0%,1,4");
    }

    #[test]
    fn test_baseline_table_csv() {
        let stats = BaselineStatistics {
            population: 2,
            defaults: 0,
            rows: vec![BaselineRow {
                month: 6.0,
                survival: Some(1.0),
                default_probability: Some(0.0),
                cumulative_hazard: Some(0.0),
            }],
            median_time_to_default: None,
            median_survival_time: None,
        };
        let mut buf = Vec::new();
        write_baseline_table(&mut buf, &stats).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert_eq!(
            text,
            "Months,Survival Probability,Default Probability,Cumulative Hazard\n6,100.00%,0.00%,0.00%\n"
        );
    }

    #[test]
    fn test_series_long_format() {
        let mut buf = Vec::new();
        write_series(&mut buf, &summary()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "series,time,survival,lower,upper");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "\"Prime, Post-Fed Rate Increase\",3.5,0.75,0.13,0.96");
    }
}
