//! Loan Survival CLI
//!
//! Fits portfolio and segment survival curves from a loan CSV and writes the
//! comparison tables.

use anyhow::{Context, Result};
use clap::Parser;
use loan_survival::output;
use loan_survival::summary::table::{baseline_table, segment_table, segment_table_headers};
use loan_survival::{AnalysisConfig, PortfolioAnalyzer};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "loan-survival",
    about = "Kaplan-Meier time-to-default analysis by rate period and score tier"
)]
struct Cli {
    /// Portfolio CSV file
    #[arg(long, default_value = "loan_data.csv")]
    data: PathBuf,

    /// JSON configuration; unset fields take defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Observation cutoff, MM-DD-YYYY
    #[arg(long, value_name = "MM-DD-YYYY")]
    observation_date: Option<String>,

    /// Rate period to include (repeatable)
    #[arg(long = "rate-period", value_name = "PERIOD")]
    rate_periods: Vec<String>,

    /// Score tier to include (repeatable)
    #[arg(long = "score-tier", value_name = "TIER")]
    score_tiers: Vec<String>,

    /// Compare the whole portfolio as a single segment
    #[arg(long, conflicts_with_all = ["rate_periods", "score_tiers"])]
    whole_portfolio: bool,

    /// Overlay the baseline survival curve
    #[arg(long)]
    baseline: bool,

    /// Directory for CSV and JSON results
    #[arg(long, default_value = "survival_output")]
    out_dir: PathBuf,
}

impl Cli {
    fn resolve_config(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::from_json_path(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => AnalysisConfig::default(),
        };

        if let Some(date) = &self.observation_date {
            config.observation_date = date.clone();
        }
        if self.whole_portfolio {
            config.rate_periods.clear();
            config.score_tiers.clear();
        }
        if !self.rate_periods.is_empty() {
            config.rate_periods = self.rate_periods.clone();
        }
        if !self.score_tiers.is_empty() {
            config.score_tiers = self.score_tiers.clone();
        }
        if self.baseline {
            config.include_baseline = true;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.resolve_config()?;

    println!("Loan Survival Analysis v{}", env!("CARGO_PKG_VERSION"));
    println!("============================\n");

    let start = Instant::now();
    let analyzer = PortfolioAnalyzer::from_csv_path(&cli.data, &config)
        .with_context(|| format!("Failed to load {}", cli.data.display()))?;

    println!(
        "Loaded {} loans from {} in {:?}",
        analyzer.observations().len(),
        cli.data.display(),
        start.elapsed()
    );
    println!("  Observation date: {}", analyzer.window().cutoff);
    println!("  Excluded (rate <= 0): {}", analyzer.excluded_at_load());
    println!("  Rejected (opened after cutoff): {}", analyzer.rejected());
    println!();

    let baseline = analyzer.baseline(&config.baseline_milestones);
    println!("Portfolio Baseline ({} loans, {} defaults):", baseline.population, baseline.defaults);
    println!("{:>8} {:>22} {:>22} {:>20}", "Months", "Survival Probability", "Default Probability", "Cumulative Hazard");
    println!("{}", "-".repeat(75));
    for row in baseline_table(&baseline) {
        println!(
            "{:>8} {:>22} {:>22} {:>20}",
            row.months, row.survival, row.default_probability, row.cumulative_hazard
        );
    }
    if let Some(median) = baseline.median_time_to_default {
        println!("  Median time to default: {:.1} months", median);
    }
    println!();

    let request = config.summary_request();
    let start = Instant::now();
    let summary = analyzer.summarize(&request);
    println!("Segment comparison ({} segments in {:?}):", summary.segments.len(), start.elapsed());

    let headers = segment_table_headers(&request.milestones);
    println!("{}", headers.join(" | "));
    println!("{}", "-".repeat(110));
    for row in segment_table(&summary) {
        println!("{}", row.cells().join(" | "));
    }

    output::write_all(&cli.out_dir, &baseline, &summary, &request.milestones)
        .with_context(|| format!("Failed to write results to {}", cli.out_dir.display()))?;
    println!("\nFull results written to: {}", cli.out_dir.display());

    Ok(())
}
