//! Aid entries: submitted free-text reports and their classified attributes.

mod sqlite_store;
mod store;
mod types;

pub use sqlite_store::SqliteEntryStore;
pub use store::{EntryError, EntryFilter, EntryStore, EscalationSnapshot};
pub use types::{AidEntry, Analysis, EntryStatus, Item, NewEntry, Priority, UNKNOWN_LOCATION};
