use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::asset::Catalog;
use crate::models::quote::AssetQuote;
use crate::providers::traits::PriceProvider;

/// Fetches the current quote for an asset picked from the catalog.
#[derive(Clone)]
pub struct QuoteService {
    provider: Arc<dyn PriceProvider>,
}

impl QuoteService {
    pub fn new(provider: Arc<dyn PriceProvider>) -> Self {
        Self { provider }
    }

    /// Resolve `asset_id` against `catalog`, then fetch its quote.
    ///
    /// The id must be non-empty and present in the catalog; both are checked
    /// before any request goes out.
    pub async fn fetch(&self, catalog: &Catalog, asset_id: &str) -> Result<AssetQuote, CoreError> {
        let id = asset_id.trim();
        if id.is_empty() {
            return Err(CoreError::ValidationError("Asset id must not be empty".into()));
        }
        let asset = catalog
            .get(id)
            .cloned()
            .ok_or_else(|| CoreError::UnknownAsset(id.to_string()))?;

        let quote = self.provider.get_quote(id).await?;

        tracing::debug!(
            "Quote for {}: ${} ({:?}% 24h)",
            asset.id,
            quote.price_usd,
            quote.change_24h_percent
        );

        Ok(AssetQuote { asset, quote })
    }
}
