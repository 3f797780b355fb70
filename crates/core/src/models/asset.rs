use serde::{Deserialize, Serialize};

/// A tradable cryptocurrency as listed by the price service.
///
/// **Equality and hashing** are based solely on `id`. The price service
/// guarantees ids are unique; names and symbols are not (several tokens
/// share the symbol "ETH" on different chains, for instance).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Opaque upstream identifier (e.g., "bitcoin", "usd-coin")
    pub id: String,

    /// Human-readable name (e.g., "Bitcoin")
    pub name: String,

    /// Ticker symbol as returned upstream, usually lowercase (e.g., "btc")
    pub symbol: String,

    /// Position by market capitalization, if the service ranks the asset
    pub market_cap_rank: Option<u32>,
}

impl PartialEq for Asset {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Asset {}

impl std::hash::Hash for Asset {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Asset {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        symbol: impl Into<String>,
        market_cap_rank: Option<u32>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            symbol: symbol.into(),
            market_cap_rank,
        }
    }

    /// Label used by selection lists: "Bitcoin (BTC)".
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.symbol.to_uppercase())
    }

    /// Case-insensitive match against name, symbol or id.
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.symbol.to_lowercase().contains(needle)
            || self.id.to_lowercase().contains(needle)
    }
}

impl std::fmt::Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_label())
    }
}

/// The ordered list of assets loaded from the market listing.
///
/// Order is exactly what the service returned (market cap descending);
/// nothing here re-sorts it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    assets: Vec<Asset>,
}

impl Catalog {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self { assets }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    /// Look up an asset by its exact id.
    pub fn get(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Filter the catalog for a selection list.
    ///
    /// A blank query returns every asset. Results keep catalog order and are
    /// truncated to `limit` when given.
    pub fn search(&self, query: &str, limit: Option<usize>) -> Vec<&Asset> {
        let needle = query.trim().to_lowercase();
        let matches = self
            .assets
            .iter()
            .filter(|a| needle.is_empty() || a.matches(&needle));
        match limit {
            Some(n) => matches.take(n).collect(),
            None => matches.collect(),
        }
    }
}
