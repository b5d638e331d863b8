//! Core entry data types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Grouping key for entries whose analysis carries no location.
pub const UNKNOWN_LOCATION: &str = "unknown";

// ============================================================================
// Analysis
// ============================================================================

/// Structured result of classifying one free-text submission.
///
/// Field names follow the English schema the classifier is asked for, with
/// aliases for the Turkish schema (`ihtiyac_var`, `konum`, `urunler`,
/// `öncelik`) that earlier prompts produced, so both decode identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// True when the submitter is asking for aid, false when offering it.
    #[serde(alias = "ihtiyac_var")]
    pub need: bool,
    /// Free-text place name; join key for matching and aggregation.
    #[serde(default, alias = "konum")]
    pub location: Option<String>,
    #[serde(alias = "urunler")]
    pub items: Vec<Item>,
    /// Priority exactly as the classifier returned it. See [`Priority`].
    #[serde(alias = "öncelik")]
    pub priority: String,
}

impl Analysis {
    /// An entry that is not a need is pure supply.
    pub fn is_supply(&self) -> bool {
        !self.need
    }

    pub fn priority_level(&self) -> Option<Priority> {
        Priority::parse(&self.priority)
    }

    /// Location used for grouping, with the `unknown` sentinel for missing values.
    pub fn location_or_unknown(&self) -> &str {
        match self.location.as_deref() {
            Some(location) if !location.is_empty() => location,
            _ => UNKNOWN_LOCATION,
        }
    }
}

/// One requested or offered product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    #[serde(alias = "urun_adi")]
    pub name: String,
    #[serde(default, alias = "miktar")]
    pub quantity: u32,
    #[serde(default, alias = "birim")]
    pub unit: String,
}

impl Item {
    pub fn new(name: impl Into<String>, quantity: u32, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
        }
    }

    /// Product names compare case-insensitively.
    pub fn is_product(&self, product: &str) -> bool {
        self.name.to_lowercase() == product.to_lowercase()
    }
}

// ============================================================================
// Priority
// ============================================================================

/// Known priority levels, ordered from least to most pressing.
///
/// The classifier's priority string is stored verbatim; this type is only
/// used to interpret it. Both English and Turkish labels are understood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "low" | "düşük" | "dusuk" => Some(Priority::Low),
            "medium" | "orta" => Some(Priority::Medium),
            "high" | "yüksek" | "yuksek" => Some(Priority::High),
            "urgent" | "acil" => Some(Priority::Urgent),
            _ => None,
        }
    }

    /// High and urgent needs are the ones a crisis escalation tries to source.
    pub fn is_urgent(value: &str) -> bool {
        matches!(Self::parse(value), Some(Priority::High | Priority::Urgent))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }
}

// ============================================================================
// Entry
// ============================================================================

/// Entry lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    Active,
    /// Set in bulk by crisis escalation; never reverts.
    CrisisMode,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Active => "active",
            EntryStatus::CrisisMode => "crisis_mode",
        }
    }

    pub fn all() -> [EntryStatus; 2] {
        [EntryStatus::Active, EntryStatus::CrisisMode]
    }
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntryStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(EntryStatus::Active),
            "crisis_mode" => Ok(EntryStatus::CrisisMode),
            other => Err(format!("unknown entry status: {}", other)),
        }
    }
}

/// One persisted aid report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AidEntry {
    /// Assigned by the store at insert time.
    pub id: String,
    /// Optional display label of the submitter.
    pub name: Option<String>,
    pub original_text: String,
    pub analysis: Analysis,
    pub status: EntryStatus,
    /// Creation time.
    pub timestamp: DateTime<Utc>,
    /// First time the entry's location was escalated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crisis_activated_at: Option<DateTime<Utc>>,
}

impl AidEntry {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("anonymous")
    }

    pub fn is_at(&self, location: &str) -> bool {
        self.analysis.location.as_deref() == Some(location)
    }
}

/// Data needed to persist a new entry.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub name: Option<String>,
    pub original_text: String,
    pub analysis: Analysis,
}
