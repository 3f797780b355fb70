use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::asset::Catalog;
use crate::providers::traits::PriceProvider;

/// Loads the list of selectable assets from the price service.
///
/// One request, no retry, no partial results: either the whole listing
/// decodes or the load fails.
#[derive(Clone)]
pub struct CatalogService {
    provider: Arc<dyn PriceProvider>,
    catalog_size: u32,
}

impl CatalogService {
    pub fn new(provider: Arc<dyn PriceProvider>, catalog_size: u32) -> Self {
        Self {
            provider,
            catalog_size,
        }
    }

    pub async fn load(&self) -> Result<Catalog, CoreError> {
        tracing::info!(
            "Loading asset catalog (up to {}) from {}",
            self.catalog_size,
            self.provider.name()
        );

        let assets = self.provider.list_assets(self.catalog_size).await?;

        tracing::info!("Loaded {} assets", assets.len());
        Ok(Catalog::new(assets))
    }
}
