//! Market and logistics lookup tables.

mod catalog;
mod types;

pub use catalog::{LookupCatalog, AVERAGE_SPEED_KMH, DEFAULT_DISTANCE_KM};
pub use types::{ActiveRoute, Dispatch, DispatchOutcome, Fleet, FleetStatus, Market, Route};
