//! Segment comparison summaries, portfolio baseline statistics and their
//! display tables

mod assembler;
mod baseline;
pub mod table;

pub use assembler::{
    baseline_series, build_summary, median, LineStyle, MilestoneSurvival, PlotSeries,
    SegmentSummary, SeriesPoint, SummaryRequest, SurvivalSummary, BASELINE_SERIES_LABEL,
};
pub use baseline::{baseline_statistics, BaselineRow, BaselineStatistics};
pub use table::{baseline_table, segment_table, segment_table_headers, UNDEFINED};
