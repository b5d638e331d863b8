use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What to match: a location (exact) and a product (case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchQuery {
    #[serde(alias = "konum")]
    pub location: String,
    #[serde(rename = "productName", alias = "product_name", alias = "urun_adi")]
    pub product: String,
    /// Requested amount; echoed back, does not filter.
    #[serde(default, alias = "miktar")]
    pub quantity: Option<u32>,
}

impl MatchQuery {
    pub fn new(location: impl Into<String>, product: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            product: product.into(),
            quantity: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }
}

/// One entry's stake in the matched product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedEntry {
    pub id: String,
    pub name: Option<String>,
    pub quantity: u32,
    pub priority: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTotals {
    pub supply: u64,
    pub demand: u64,
}

/// Supply and demand for one product at one location, in store order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub location: String,
    pub product: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested: Option<u32>,
    pub supply: Vec<MatchedEntry>,
    pub demand: Vec<MatchedEntry>,
    pub totals: MatchTotals,
}
