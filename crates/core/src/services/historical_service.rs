use chrono::NaiveDate;
use std::sync::Arc;
use std::time::Duration;

use crate::errors::CoreError;
use crate::models::historical::{HistoricalReport, HistoricalYearEntry, SkipReason, SkippedYear};
use crate::models::luxury::affordable_items;
use crate::models::settings::FetchPolicy;
use crate::providers::traits::PriceProvider;

/// Illustrative prices for the years before the service has data.
pub const SEEDED_PRICES: [(i32, f64); 2] = [(2009, 0.05), (2010, 0.10)];

/// Years up to and including this one never hit the network.
pub const LAST_SEEDED_YEAR: i32 = 2010;

/// Shown when a run resolves no year at all.
pub const EMPTY_HISTORY_MESSAGE: &str = "Unable to load historical data. The price service may be rate limiting requests; please try again in a minute.";

pub fn seeded_price(year: i32) -> Option<f64> {
    SEEDED_PRICES
        .iter()
        .find(|(y, _)| *y == year)
        .map(|(_, price)| *price)
}

/// Build one table row from a resolved historical price.
pub fn year_entry(
    year: i32,
    historical_price_usd: f64,
    investment: f64,
    current_price_usd: f64,
    seeded: bool,
) -> HistoricalYearEntry {
    let asset_amount = investment / historical_price_usd;
    let current_value = asset_amount * current_price_usd;
    let multiplier = current_value / investment;

    HistoricalYearEntry {
        year,
        historical_price_usd,
        asset_amount,
        current_value,
        multiplier,
        affordable_items: affordable_items(current_value)
            .into_iter()
            .map(|item| item.name.to_string())
            .collect(),
        seeded,
    }
}

/// Replays "what if I had invested X on January 1 of every year".
///
/// Requests go out strictly one after another, each preceded by the policy
/// delay. A year that fails or has no price is recorded as skipped and the
/// loop moves on; only the initial current-price fetch can fail the run.
#[derive(Clone)]
pub struct HistoricalService {
    provider: Arc<dyn PriceProvider>,
    asset_id: String,
    first_year: i32,
    policy: FetchPolicy,
}

impl HistoricalService {
    pub fn new(
        provider: Arc<dyn PriceProvider>,
        asset_id: impl Into<String>,
        first_year: i32,
        policy: FetchPolicy,
    ) -> Self {
        Self {
            provider,
            asset_id: asset_id.into(),
            first_year,
            policy,
        }
    }

    /// Run the full sequence from `first_year` through `last_year`.
    ///
    /// Entries come back most recent first; skipped years ascending.
    pub async fn build(&self, investment: f64, last_year: i32) -> Result<HistoricalReport, CoreError> {
        tracing::info!(
            "Building {} history {}..={} for ${}",
            self.asset_id,
            self.first_year,
            last_year,
            investment
        );

        let current_price_usd = self.provider.get_quote(&self.asset_id).await?.price_usd;

        let mut entries = Vec::new();
        let mut skipped = Vec::new();

        for year in self.first_year..=last_year {
            if year <= LAST_SEEDED_YEAR {
                match seeded_price(year) {
                    Some(price) => {
                        entries.push(year_entry(year, price, investment, current_price_usd, true));
                    }
                    None => skipped.push(SkippedYear {
                        year,
                        reason: SkipReason::NoPriceData,
                    }),
                }
                continue;
            }

            sleep_for(self.policy.request_delay()).await;

            match self.fetch_year(year).await {
                Ok(Some(price)) => {
                    entries.push(year_entry(year, price, investment, current_price_usd, false));
                }
                Ok(None) => {
                    tracing::warn!("No {} price for {}, skipping", self.asset_id, year);
                    skipped.push(SkippedYear {
                        year,
                        reason: SkipReason::NoPriceData,
                    });
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch {} price for {}: {}", self.asset_id, year, e);
                    skipped.push(SkippedYear {
                        year,
                        reason: SkipReason::RequestFailed(e.to_string()),
                    });
                }
            }
        }

        entries.reverse();

        tracing::info!(
            "History for {} complete: {} years resolved, {} skipped",
            self.asset_id,
            entries.len(),
            skipped.len()
        );

        Ok(HistoricalReport {
            asset_id: self.asset_id.clone(),
            investment,
            current_price_usd,
            entries,
            skipped,
        })
    }

    /// Fetch the January 1 price for `year`, retrying per the policy.
    async fn fetch_year(&self, year: i32) -> Result<Option<f64>, CoreError> {
        let date = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| CoreError::ValidationError(format!("Invalid year {year}")))?;

        let mut attempt = 0;
        loop {
            match self.provider.get_historical_price(&self.asset_id, date).await {
                Err(e) if attempt < self.policy.max_retries() => {
                    let wait = self.policy.backoff_delay(attempt);
                    tracing::debug!(
                        "Attempt {} for {} {} failed ({}), retrying in {:?}",
                        attempt + 1,
                        self.asset_id,
                        year,
                        e,
                        wait
                    );
                    sleep_for(wait).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

async fn sleep_for(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
