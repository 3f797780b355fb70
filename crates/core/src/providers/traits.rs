use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::asset::Asset;
use crate::models::quote::Quote;

/// Trait abstraction over the price-quote service.
///
/// The calculator talks to exactly one provider. Services only see this
/// trait, so tests swap in scripted providers and a different upstream only
/// needs a new implementation.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// List up to `limit` assets, market cap descending, in upstream order.
    async fn list_assets(&self, limit: u32) -> Result<Vec<Asset>, CoreError>;

    /// Current USD price and 24h change of one asset.
    async fn get_quote(&self, asset_id: &str) -> Result<Quote, CoreError>;

    /// USD price of an asset on a specific date.
    ///
    /// `Ok(None)` means the service answered but has no usable price for that
    /// date; transport and decoding problems are `Err`.
    async fn get_historical_price(
        &self,
        asset_id: &str,
        date: NaiveDate,
    ) -> Result<Option<f64>, CoreError>;
}
