use serde::{Deserialize, Serialize};

use super::asset::Asset;

/// Current USD price and 24h change for one asset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub asset_id: String,

    /// Always positive and finite; providers reject anything else.
    pub price_usd: f64,

    /// 24-hour change in percent, when the service reports it
    pub change_24h_percent: Option<f64>,
}

/// A quote merged with the catalog entry it was requested for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetQuote {
    pub asset: Asset,
    pub quote: Quote,
}

impl AssetQuote {
    pub fn price_usd(&self) -> f64 {
        self.quote.price_usd
    }
}
