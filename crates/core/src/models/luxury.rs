use serde::Serialize;

/// Something expensive a historical investment could have paid for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LuxuryItem {
    pub name: &'static str,
    pub price_usd: f64,
    pub emoji: &'static str,
}

impl LuxuryItem {
    /// "🏎️ Lamborghini Aventador"
    pub fn label(&self) -> String {
        format!("{} {}", self.emoji, self.name)
    }
}

/// Fixed catalog, ascending by price.
pub static LUXURY_ITEMS: [LuxuryItem; 6] = [
    LuxuryItem {
        name: "Lamborghini Aventador",
        price_usd: 500_000.0,
        emoji: "🏎️",
    },
    LuxuryItem {
        name: "Manhattan Penthouse",
        price_usd: 2_000_000.0,
        emoji: "🏙️",
    },
    LuxuryItem {
        name: "Superyacht",
        price_usd: 10_000_000.0,
        emoji: "🛥️",
    },
    LuxuryItem {
        name: "Private Island",
        price_usd: 20_000_000.0,
        emoji: "🏝️",
    },
    LuxuryItem {
        name: "Beverly Hills Mansion",
        price_usd: 50_000_000.0,
        emoji: "🏰",
    },
    LuxuryItem {
        name: "Gulfstream G650 Private Jet",
        price_usd: 65_000_000.0,
        emoji: "✈️",
    },
];

/// Every catalog item priced at or below `value_usd`, in catalog order.
pub fn affordable_items(value_usd: f64) -> Vec<&'static LuxuryItem> {
    LUXURY_ITEMS
        .iter()
        .filter(|item| item.price_usd <= value_usd)
        .collect()
}
