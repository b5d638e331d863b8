use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Deserialize, Serialize};

use crate::entry::{AidEntry, EntryError, EntryFilter, EntryStore};

/// Location name to its tally.
pub type StockSummary = BTreeMap<String, LocationStock>;

/// Raw materials tally for one location.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationStock {
    /// Product name to total quantity, needs and offers added together.
    pub supplies: BTreeMap<String, u64>,
    /// Trucks mentioned in the entries' free text. Not authoritative.
    pub fleet_count_hint: u64,
    pub entries: Vec<SummaryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryEntry {
    pub name: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Tally every entry, in any status, grouped by location.
///
/// Entries without a location are grouped under `unknown`.
pub fn stock_summary(store: &dyn EntryStore) -> Result<StockSummary, EntryError> {
    let entries = store.list(&EntryFilter::new())?;
    Ok(summarize(&entries))
}

pub(crate) fn summarize(entries: &[AidEntry]) -> StockSummary {
    let mut summary = StockSummary::new();

    for entry in entries {
        let group = summary
            .entry(entry.analysis.location_or_unknown().to_string())
            .or_default();

        for item in &entry.analysis.items {
            *group.supplies.entry(item.name.clone()).or_insert(0) += item.quantity as u64;
        }

        group.fleet_count_hint += best_effort_fleet_hint(&entry.original_text) as u64;

        group.entries.push(SummaryEntry {
            name: entry.display_name().to_string(),
            text: entry.original_text.clone(),
            timestamp: entry.timestamp,
        });
    }

    summary
}

static FLEET_MENTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*(?:tır|tir|truck)").unwrap());

/// Best-effort guess at a truck count mentioned in free text.
///
/// Looks for the first "<number> tır" / "<number> truck" phrase. Returns 0
/// when there is none or the number does not fit.
pub fn best_effort_fleet_hint(text: &str) -> u32 {
    let lowered = text.to_lowercase();
    FLEET_MENTION
        .captures(&lowered)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}
