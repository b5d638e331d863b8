//! Crisis ("earthquake mode") escalation and aid dispatch.

mod coordinator;
mod types;

pub use coordinator::CrisisCoordinator;
pub use types::{CrisisError, EscalationReport, MarketSupport, Notification, UrgentNeed};
