//! Per-location aggregation over stored entries.

mod balance;
mod summary;

pub use balance::{stock_balance, ProductBalance, StockBalance};
pub use summary::{
    best_effort_fleet_hint, stock_summary, LocationStock, StockSummary, SummaryEntry,
};
