//! Load loan records from the raw portfolio CSV

use super::{LoanRecord, LoanStatus};
use crate::error::DataError;
use chrono::NaiveDate;
use csv::{Reader, StringRecord};
use std::path::Path;

/// First loan id; ids are assigned by row position from here
pub const LOAN_ID_OFFSET: u64 = 1000;

/// Columns that must be present in the portfolio file
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "OPEN_DATE",
    "CREDIT_SCORE_AT_ORIG",
    "RATE",
    "LOAN_AMOUNT",
    "TERM",
    "STATUS",
];

const OPEN_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y-%m-%d %H:%M:%S"];

/// Raw CSV row matching the portfolio file columns
///
/// Numeric fields stay as text here so a bad cell can be reported by column.
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "OPEN_DATE")]
    open_date: String,
    #[serde(rename = "CREDIT_SCORE_AT_ORIG")]
    credit_score: String,
    #[serde(rename = "6_MOS_SCORE_CHG", default)]
    score_change_6m: Option<String>,
    #[serde(rename = "RATE")]
    rate: String,
    #[serde(rename = "LOAN_AMOUNT")]
    loan_amount: String,
    #[serde(rename = "TERM")]
    term: String,
    #[serde(rename = "STATUS")]
    status: String,
}

fn invalid(row: usize, column: &'static str, value: &str) -> DataError {
    DataError::InvalidValue {
        row,
        column,
        value: value.to_string(),
    }
}

fn parse_f64(row: usize, column: &'static str, value: &str) -> Result<f64, DataError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| invalid(row, column, value))
}

/// Whole-number columns are sometimes exported as floats ("720.0")
fn parse_whole(row: usize, column: &'static str, value: &str) -> Result<i64, DataError> {
    let v = parse_f64(row, column, value)?;
    if v.fract() != 0.0 {
        return Err(invalid(row, column, value));
    }
    Ok(v as i64)
}

fn parse_open_date(row: usize, value: &str) -> Result<NaiveDate, DataError> {
    let trimmed = value.trim();
    OPEN_DATE_FORMATS
        .iter()
        .find_map(|fmt| {
            NaiveDate::parse_from_str(trimmed, fmt)
                .ok()
                .or_else(|| {
                    chrono::NaiveDateTime::parse_from_str(trimmed, fmt)
                        .ok()
                        .map(|dt| dt.date())
                })
        })
        .ok_or_else(|| invalid(row, "OPEN_DATE", value))
}

impl CsvRow {
    fn to_loan(self, row: usize, rate_period_cutoff: NaiveDate) -> Result<LoanRecord, DataError> {
        let open_date = parse_open_date(row, &self.open_date)?;
        let credit_score = i32::try_from(parse_whole(row, "CREDIT_SCORE_AT_ORIG", &self.credit_score)?)
            .map_err(|_| invalid(row, "CREDIT_SCORE_AT_ORIG", &self.credit_score))?;

        let score_change_6m = match self.score_change_6m.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                i32::try_from(parse_whole(row, "6_MOS_SCORE_CHG", raw)?)
                    .map_err(|_| invalid(row, "6_MOS_SCORE_CHG", raw))?,
            ),
        };

        let rate = parse_f64(row, "RATE", &self.rate)?;
        let orig_amount = parse_f64(row, "LOAN_AMOUNT", &self.loan_amount)?;
        let term = u32::try_from(parse_whole(row, "TERM", &self.term)?)
            .map_err(|_| invalid(row, "TERM", &self.term))?;

        Ok(LoanRecord::new(
            LOAN_ID_OFFSET + row as u64,
            open_date,
            credit_score,
            score_change_6m,
            rate,
            orig_amount,
            term,
            LoanStatus::parse(self.status.trim()),
            rate_period_cutoff,
        ))
    }
}

/// Loans read from a file plus the rows excluded on the way
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub loans: Vec<LoanRecord>,
    /// Rows dropped because their rate was zero or negative
    pub excluded_non_positive_rate: usize,
}

fn check_headers(headers: &StringRecord) -> Result<(), DataError> {
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h.trim() == column) {
            return Err(DataError::MissingColumn(column));
        }
    }
    Ok(())
}

/// Load loans from any reader (e.g., string buffer, network stream)
pub fn load_loans_from_reader<R: std::io::Read>(
    reader: R,
    rate_period_cutoff: NaiveDate,
) -> Result<LoadReport, DataError> {
    let mut csv_reader = Reader::from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    check_headers(&headers)?;

    let mut report = LoadReport::default();

    for (row, result) in csv_reader.deserialize().enumerate() {
        let raw: CsvRow = result?;
        let loan = raw.to_loan(row, rate_period_cutoff)?;
        if loan.rate > 0.0 {
            report.loans.push(loan);
        } else {
            report.excluded_non_positive_rate += 1;
        }
    }

    if report.excluded_non_positive_rate > 0 {
        log::warn!(
            "Excluded {} loans with non-positive rate",
            report.excluded_non_positive_rate
        );
    }
    log::info!("Loaded {} loans", report.loans.len());

    Ok(report)
}

/// Load all loans from a CSV file
pub fn load_loans<P: AsRef<Path>>(
    path: P,
    rate_period_cutoff: NaiveDate,
) -> Result<LoadReport, DataError> {
    let file = std::fs::File::open(path)?;
    load_loans_from_reader(file, rate_period_cutoff)
}
