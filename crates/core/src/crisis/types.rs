use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entry::{EntryError, Priority};
use crate::lookup::Dispatch;

#[derive(Debug, Error)]
pub enum CrisisError {
    #[error(transparent)]
    Store(#[from] EntryError),
}

/// A high or urgent need found at the escalated location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrgentNeed {
    pub id: String,
    pub name: Option<String>,
    pub product: String,
    pub quantity: u32,
    pub priority: String,
}

impl UrgentNeed {
    pub fn rank(&self) -> Option<Priority> {
        Priority::parse(&self.priority)
    }
}

/// Market capacity a nearby city can contribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSupport {
    pub city: String,
    pub markets: usize,
    pub capacity: u32,
}

/// Everything one escalation found and set in motion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EscalationReport {
    pub message: String,
    pub location: String,
    pub timestamp: DateTime<Utc>,
    /// Entries touched by the status update.
    pub transitioned: usize,
    /// Product to units offered by active entries at the location.
    pub available_resources: BTreeMap<String, u64>,
    pub urgent_needs: Vec<UrgentNeed>,
    pub logistics_support: Vec<Dispatch>,
    pub market_support: Vec<MarketSupport>,
    pub status_updates: Vec<String>,
}

impl EscalationReport {
    pub fn total_resources(&self) -> u64 {
        self.available_resources.values().sum()
    }
}

/// Request sent to a submitter outside the disaster zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub to: String,
    pub city: String,
    pub message: String,
}
