use crate::entry::{AidEntry, EntryError, EntryFilter, EntryStatus, EntryStore};

use super::{MatchQuery, MatchResult, MatchTotals, MatchedEntry};

/// Query the store for active entries at the location and partition them.
pub fn match_entries(
    store: &dyn EntryStore,
    query: &MatchQuery,
) -> Result<MatchResult, EntryError> {
    let entries = store.list(&EntryFilter::active_at(&query.location))?;
    let result = partition_entries(query, &entries);

    tracing::debug!(
        location = %query.location,
        product = %query.product,
        supply = result.supply.len(),
        demand = result.demand.len(),
        "Matched entries"
    );

    Ok(result)
}

/// Split `entries` into supply and demand for the queried product.
///
/// Entries that are not active or not at exactly the queried location are
/// skipped, so callers may pass an unfiltered list. Each matching item
/// contributes one record; order follows `entries`.
pub fn partition_entries(query: &MatchQuery, entries: &[AidEntry]) -> MatchResult {
    let mut supply = Vec::new();
    let mut demand = Vec::new();

    for entry in entries
        .iter()
        .filter(|e| e.status == EntryStatus::Active && e.is_at(&query.location))
    {
        for item in entry
            .analysis
            .items
            .iter()
            .filter(|i| i.is_product(&query.product))
        {
            let matched = MatchedEntry {
                id: entry.id.clone(),
                name: entry.name.clone(),
                quantity: item.quantity,
                priority: entry.analysis.priority.clone(),
                timestamp: entry.timestamp,
            };
            if entry.analysis.need {
                demand.push(matched);
            } else {
                supply.push(matched);
            }
        }
    }

    let totals = MatchTotals {
        supply: supply.iter().map(|m| m.quantity as u64).sum(),
        demand: demand.iter().map(|m| m.quantity as u64).sum(),
    };

    MatchResult {
        location: query.location.clone(),
        product: query.product.clone(),
        requested: query.quantity,
        supply,
        demand,
        totals,
    }
}
