use serde::{Deserialize, Serialize};

/// One row of the historical replay table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalYearEntry {
    pub year: i32,

    /// USD price on January 1 of `year` (or the hardcoded seed price)
    pub historical_price_usd: f64,

    /// Coins the investment would have bought: investment / historical price
    pub asset_amount: f64,

    /// asset_amount × current price
    pub current_value: f64,

    /// current_value / investment
    pub multiplier: f64,

    /// Names of the luxury items priced at or below `current_value`,
    /// in catalog order
    pub affordable_items: Vec<String>,

    /// True when the price came from the hardcoded early-years table
    pub seeded: bool,
}

/// Why a year produced no row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// The service answered but had no price for that date
    NoPriceData,
    /// Network error, non-2xx status or an unreadable body
    RequestFailed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::NoPriceData => write!(f, "no price data"),
            SkipReason::RequestFailed(msg) => write!(f, "request failed: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedYear {
    pub year: i32,
    pub reason: SkipReason,
}

/// Output of one full historical run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalReport {
    pub asset_id: String,
    pub investment: f64,

    /// Reference price every `current_value` is computed against
    pub current_price_usd: f64,

    /// Resolved years, most recent first
    pub entries: Vec<HistoricalYearEntry>,

    /// Years without a row, ascending
    pub skipped: Vec<SkippedYear>,
}

impl HistoricalReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_for(&self, year: i32) -> Option<&HistoricalYearEntry> {
        self.entries.iter().find(|e| e.year == year)
    }

    /// Highest multiplier across all resolved years.
    pub fn best_entry(&self) -> Option<&HistoricalYearEntry> {
        self.entries.iter().max_by(|a, b| {
            a.multiplier
                .partial_cmp(&b.multiplier)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}
