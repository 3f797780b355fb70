use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::quote::Quote;
use crate::models::settings::Settings;
use super::traits::PriceProvider;

const PROVIDER_NAME: &str = "CoinGecko";
const API_KEY_HEADER: &str = "x-cg-demo-api-key";

/// CoinGecko API provider.
///
/// - **Free tier**: no key required, but aggressively rate limited.
/// - **Endpoints**: `/coins/markets`, `/simple/price`, `/coins/{id}/history`
///
/// Ids are CoinGecko's own slugs ("bitcoin", "usd-coin"). All prices are
/// requested in USD.
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CoinGeckoProvider {
    pub fn new(settings: &Settings) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` with `query` and return the body of a 2xx response.
    async fn get_text(&self, path: &str, query: &[(&str, &str)]) -> Result<String, CoreError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .query(query);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("{} {} returned {}", PROVIDER_NAME, path, status);
            return Err(CoreError::Api {
                provider: PROVIDER_NAME.into(),
                message: format!("{path} returned {status}: {}", truncate(&body, 200)),
            });
        }

        Ok(response.text().await?)
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// The history endpoint wants `DD-MM-YYYY`.
pub fn history_date_param(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

// ── CoinGecko API response types ────────────────────────────────────

#[derive(Deserialize)]
struct MarketEntry {
    id: String,
    name: String,
    symbol: String,
    market_cap_rank: Option<u32>,
}

#[derive(Deserialize)]
struct SimplePriceEntry {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
}

#[derive(Deserialize)]
struct HistoryResponse {
    market_data: Option<HistoryMarketData>,
}

#[derive(Deserialize)]
struct HistoryMarketData {
    current_price: Option<HashMap<String, f64>>,
}

/// Decode a `/coins/markets` body, keeping upstream order.
pub fn parse_markets(body: &str) -> Result<Vec<Asset>, CoreError> {
    let entries: Vec<MarketEntry> = serde_json::from_str(body)?;
    Ok(entries
        .into_iter()
        .map(|e| Asset::new(e.id, e.name, e.symbol, e.market_cap_rank))
        .collect())
}

/// Decode a `/simple/price` body for one asset id.
pub fn parse_simple_price(asset_id: &str, body: &str) -> Result<Quote, CoreError> {
    let mut prices: HashMap<String, SimplePriceEntry> = serde_json::from_str(body)?;
    let entry = prices.remove(asset_id).ok_or_else(|| CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message: format!("No quote returned for {asset_id}"),
    })?;

    let price_usd = entry.usd.ok_or_else(|| CoreError::Api {
        provider: PROVIDER_NAME.into(),
        message: format!("No USD price for {asset_id}"),
    })?;
    if !price_usd.is_finite() || price_usd <= 0.0 {
        return Err(CoreError::Api {
            provider: PROVIDER_NAME.into(),
            message: format!("Invalid price returned for {asset_id}: {price_usd} (must be finite and positive)"),
        });
    }

    Ok(Quote {
        asset_id: asset_id.to_string(),
        price_usd,
        change_24h_percent: entry.usd_24h_change.filter(|c| c.is_finite()),
    })
}

/// Decode a `/coins/{id}/history` body.
///
/// A missing `market_data.current_price.usd`, or a price that is not a
/// positive finite number, yields `None`.
pub fn parse_history(body: &str) -> Result<Option<f64>, CoreError> {
    let resp: HistoryResponse = serde_json::from_str(body)?;
    Ok(resp
        .market_data
        .and_then(|m| m.current_price)
        .and_then(|prices| prices.get("usd").copied())
        .filter(|p| p.is_finite() && *p > 0.0))
}

#[async_trait]
impl PriceProvider for CoinGeckoProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn list_assets(&self, limit: u32) -> Result<Vec<Asset>, CoreError> {
        let per_page = limit.to_string();
        tracing::debug!("Fetching up to {} assets from {}", limit, PROVIDER_NAME);

        let body = self
            .get_text(
                "/coins/markets",
                &[
                    ("vs_currency", "usd"),
                    ("order", "market_cap_desc"),
                    ("per_page", per_page.as_str()),
                    ("page", "1"),
                    ("sparkline", "false"),
                ],
            )
            .await?;

        parse_markets(&body)
    }

    async fn get_quote(&self, asset_id: &str) -> Result<Quote, CoreError> {
        tracing::debug!("Fetching quote for {}", asset_id);

        let body = self
            .get_text(
                "/simple/price",
                &[
                    ("ids", asset_id),
                    ("vs_currencies", "usd"),
                    ("include_24hr_change", "true"),
                ],
            )
            .await?;

        parse_simple_price(asset_id, &body)
    }

    async fn get_historical_price(
        &self,
        asset_id: &str,
        date: NaiveDate,
    ) -> Result<Option<f64>, CoreError> {
        let date_param = history_date_param(date);
        tracing::debug!("Fetching {} price on {}", asset_id, date_param);

        let body = self
            .get_text(
                &format!("/coins/{asset_id}/history"),
                &[("date", date_param.as_str()), ("localization", "false")],
            )
            .await?;

        parse_history(&body)
    }
}
