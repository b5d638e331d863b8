//! Supply/demand matching for one product at one location.

mod engine;
mod types;

pub use engine::{match_entries, partition_entries};
pub use types::{MatchQuery, MatchResult, MatchTotals, MatchedEntry};
