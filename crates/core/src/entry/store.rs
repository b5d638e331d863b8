//! Entry storage trait and types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{AidEntry, EntryStatus, NewEntry};

/// Error type for entry store operations.
#[derive(Debug, Error)]
pub enum EntryError {
    #[error("Entry not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<rusqlite::Error> for EntryError {
    fn from(e: rusqlite::Error) -> Self {
        EntryError::Database(e.to_string())
    }
}

/// Filter for querying entries.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Exact, case-sensitive location match.
    pub location: Option<String>,
    pub status: Option<EntryStatus>,
    /// Maximum number of results (None = all).
    pub limit: Option<i64>,
    pub offset: i64,
}

impl EntryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_status(mut self, status: EntryStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Shorthand for the active entries at one location.
    pub fn active_at(location: impl Into<String>) -> Self {
        Self::new()
            .with_location(location)
            .with_status(EntryStatus::Active)
    }
}

/// Result of a bulk crisis transition.
#[derive(Debug, Clone)]
pub struct EscalationSnapshot {
    /// Entries that were active at the location immediately before the transition.
    pub active_entries: Vec<AidEntry>,
    /// Rows touched by the update, including entries already in crisis mode.
    pub transitioned: usize,
    pub activated_at: DateTime<Utc>,
}

/// Trait for entry storage backends.
pub trait EntryStore: Send + Sync {
    /// Persist a new entry with status `active`; the store assigns id and timestamp.
    fn insert(&self, entry: NewEntry) -> Result<AidEntry, EntryError>;

    /// Get an entry by ID.
    fn get(&self, id: &str) -> Result<Option<AidEntry>, EntryError>;

    /// List entries matching the filter, in insertion order.
    fn list(&self, filter: &EntryFilter) -> Result<Vec<AidEntry>, EntryError>;

    /// Count entries matching the filter (limit/offset ignored).
    fn count(&self, filter: &EntryFilter) -> Result<i64, EntryError>;

    /// Move every entry at `location` into crisis mode.
    ///
    /// The read of currently active entries and the status update happen
    /// atomically; the returned snapshot is exactly what was transitioned
    /// out of `active`. Entries already in crisis mode are matched again and
    /// keep their original activation time.
    fn escalate_location(
        &self,
        location: &str,
        at: DateTime<Utc>,
    ) -> Result<EscalationSnapshot, EntryError>;
}
