use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entry::{AidEntry, EntryError, EntryFilter, EntryStatus, EntryStore};

/// Location to lowercased product name to balance.
pub type StockBalance = BTreeMap<String, BTreeMap<String, ProductBalance>>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBalance {
    pub supply: u64,
    pub demand: u64,
    /// supply - demand
    pub net: i64,
}

/// Supply versus demand per location and product over active entries.
///
/// Product names are grouped case-insensitively, the same way matching
/// compares them.
pub fn stock_balance(store: &dyn EntryStore) -> Result<StockBalance, EntryError> {
    let entries = store.list(&EntryFilter::new().with_status(EntryStatus::Active))?;
    Ok(balance(&entries))
}

fn balance(entries: &[AidEntry]) -> StockBalance {
    let mut result = StockBalance::new();

    for entry in entries.iter().filter(|e| e.status == EntryStatus::Active) {
        let products = result
            .entry(entry.analysis.location_or_unknown().to_string())
            .or_default();

        for item in &entry.analysis.items {
            let line = products.entry(item.name.to_lowercase()).or_default();
            if entry.analysis.need {
                line.demand += item.quantity as u64;
            } else {
                line.supply += item.quantity as u64;
            }
            line.net = line.supply as i64 - line.demand as i64;
        }
    }

    result
}
