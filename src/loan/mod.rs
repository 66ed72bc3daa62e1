//! Loan data structures and portfolio loading

mod data;
pub mod loader;

pub use data::{
    default_rate_period_cutoff, AmountTier, LoanRecord, LoanStatus, RatePeriod, RateTier,
    ScoreTier, DAYS_PER_MONTH,
};
pub use loader::{load_loans, load_loans_from_reader, LoadReport};
