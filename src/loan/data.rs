//! Loan records and the categorical tiers attached to them at load time

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Mean days per month, used for every day/month conversion in the crate
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Start of the Fed rate increase cycle used to split the book into rate periods
pub fn default_rate_period_cutoff() -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 4, 1).expect("valid calendar date")
}

/// Current status of a loan as reported in the source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoanStatus {
    Open,
    Closed,
    Default,
    /// Any status string outside the known set; treated as censored
    Other(String),
}

impl LoanStatus {
    /// Parse a status string. Matching is exact and case-sensitive.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "OPEN" => LoanStatus::Open,
            "CLOSED" => LoanStatus::Closed,
            "DEFAULT" => LoanStatus::Default,
            other => LoanStatus::Other(other.to_string()),
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, LoanStatus::Default)
    }

    pub fn as_str(&self) -> &str {
        match self {
            LoanStatus::Open => "OPEN",
            LoanStatus::Closed => "CLOSED",
            LoanStatus::Default => "DEFAULT",
            LoanStatus::Other(s) => s,
        }
    }
}

/// Interest rate tier, bucketed on right-inclusive percent bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateTier {
    /// (0, 10]
    Low,
    /// (10, 13]
    LowMed,
    /// (13, 16]
    Medium,
    /// (16, 19]
    MedHigh,
    /// (19, 22]
    High,
}

impl RateTier {
    pub const ALL: [RateTier; 5] = [
        RateTier::Low,
        RateTier::LowMed,
        RateTier::Medium,
        RateTier::MedHigh,
        RateTier::High,
    ];

    /// Bucket a rate in percent. Rates outside (0, 22] have no tier.
    pub fn from_rate(rate: f64) -> Option<Self> {
        if rate <= 0.0 {
            None
        } else if rate <= 10.0 {
            Some(RateTier::Low)
        } else if rate <= 13.0 {
            Some(RateTier::LowMed)
        } else if rate <= 16.0 {
            Some(RateTier::Medium)
        } else if rate <= 19.0 {
            Some(RateTier::MedHigh)
        } else if rate <= 22.0 {
            Some(RateTier::High)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RateTier::Low => "Low",
            RateTier::LowMed => "Low-Med",
            RateTier::Medium => "Medium",
            RateTier::MedHigh => "Med-High",
            RateTier::High => "High",
        }
    }
}

/// Credit score tier at origination
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScoreTier {
    /// (-1, 599]
    Subprime,
    /// (599, 649]
    NearPrime,
    /// (649, 729]
    Prime,
    /// (729, 900]
    SuperPrime,
}

impl ScoreTier {
    pub const ALL: [ScoreTier; 4] = [
        ScoreTier::Subprime,
        ScoreTier::NearPrime,
        ScoreTier::Prime,
        ScoreTier::SuperPrime,
    ];

    pub fn from_score(score: i32) -> Option<Self> {
        match score {
            0..=599 => Some(ScoreTier::Subprime),
            600..=649 => Some(ScoreTier::NearPrime),
            650..=729 => Some(ScoreTier::Prime),
            730..=900 => Some(ScoreTier::SuperPrime),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTier::Subprime => "Subprime",
            ScoreTier::NearPrime => "Near-Prime",
            ScoreTier::Prime => "Prime",
            ScoreTier::SuperPrime => "Super-Prime",
        }
    }
}

/// Original principal tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AmountTier {
    /// (0, 5000]
    VeryLow,
    /// (5000, 10000]
    Low,
    /// (10000, 20000]
    Medium,
    /// (20000, 30000]
    High,
    /// (30000, 50000]
    VeryHigh,
}

impl AmountTier {
    pub fn from_amount(amount: f64) -> Option<Self> {
        if amount <= 0.0 {
            None
        } else if amount <= 5_000.0 {
            Some(AmountTier::VeryLow)
        } else if amount <= 10_000.0 {
            Some(AmountTier::Low)
        } else if amount <= 20_000.0 {
            Some(AmountTier::Medium)
        } else if amount <= 30_000.0 {
            Some(AmountTier::High)
        } else if amount <= 50_000.0 {
            Some(AmountTier::VeryHigh)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AmountTier::VeryLow => "Very Low",
            AmountTier::Low => "Low",
            AmountTier::Medium => "Medium",
            AmountTier::High => "High",
            AmountTier::VeryHigh => "Very High",
        }
    }
}

/// Whether a loan was originated before or after the rate period cutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatePeriod {
    PreIncrease,
    PostIncrease,
}

impl RatePeriod {
    pub const ALL: [RatePeriod; 2] = [RatePeriod::PostIncrease, RatePeriod::PreIncrease];

    /// Loans opened strictly before the cutoff are pre-increase
    pub fn classify(open_date: NaiveDate, cutoff: NaiveDate) -> Self {
        if open_date < cutoff {
            RatePeriod::PreIncrease
        } else {
            RatePeriod::PostIncrease
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RatePeriod::PreIncrease => "Pre-Fed Rate Increase",
            RatePeriod::PostIncrease => "Post-Fed Rate Increase",
        }
    }
}

/// A single loan from the portfolio file, with tiers attached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRecord {
    /// Unique loan identifier
    pub loan_id: u64,

    /// Origination date
    pub open_date: NaiveDate,

    /// Credit score at origination
    pub credit_score: i32,

    /// Change in credit score over the first six months, when reported
    #[serde(default)]
    pub score_change_6m: Option<i32>,

    /// Interest rate in percent
    pub rate: f64,

    /// Original principal
    pub orig_amount: f64,

    /// Contractual term in months
    pub term: u32,

    /// Current status
    pub status: LoanStatus,

    pub rate_tier: Option<RateTier>,
    pub score_tier: Option<ScoreTier>,
    pub amount_tier: Option<AmountTier>,
    pub rate_period: RatePeriod,
}

impl LoanRecord {
    /// Build a record and bucket its attributes.
    ///
    /// `rate_period_cutoff` is fixed for the life of a process; tiers never
    /// change after construction.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        loan_id: u64,
        open_date: NaiveDate,
        credit_score: i32,
        score_change_6m: Option<i32>,
        rate: f64,
        orig_amount: f64,
        term: u32,
        status: LoanStatus,
        rate_period_cutoff: NaiveDate,
    ) -> Self {
        Self {
            loan_id,
            open_date,
            credit_score,
            score_change_6m,
            rate,
            orig_amount,
            term,
            status,
            rate_tier: RateTier::from_rate(rate),
            score_tier: ScoreTier::from_score(credit_score),
            amount_tier: AmountTier::from_amount(orig_amount),
            rate_period: RatePeriod::classify(open_date, rate_period_cutoff),
        }
    }

    /// Contractual maturity: open date plus term at 30.44 days per month
    pub fn maturity_date(&self) -> NaiveDate {
        let days = (self.term as f64 * DAYS_PER_MONTH).round() as u64;
        self.open_date
            .checked_add_days(Days::new(days))
            .unwrap_or(NaiveDate::MAX)
    }

    /// Origination month as `YYYY-MM`
    pub fn open_month(&self) -> String {
        format!("{:04}-{:02}", self.open_date.year(), self.open_date.month())
    }

    /// Risk segment label combining score tier and rate period
    pub fn risk_rate_segment(&self) -> Option<String> {
        self.score_tier
            .map(|tier| format!("{}, {}", tier.as_str(), self.rate_period.as_str()))
    }
}
