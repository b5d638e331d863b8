use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuditEvent {
    // System events
    ServiceStarted {
        version: String,
        config_hash: String,
    },
    ServiceStopped {
        reason: String,
    },

    // Intake
    /// A classified entry was persisted.
    EntrySubmitted {
        entry_id: String,
        /// Submitter label, if one was given
        name: Option<String>,
        location: Option<String>,
        need: bool,
        priority: String,
        items: u32,
    },

    // Crisis
    /// A location was put into crisis mode.
    CrisisEscalated {
        location: String,
        /// Rows touched by the status update
        transitioned: u32,
        urgent_needs: u32,
        /// Total units of supply available at the location
        available_units: u64,
        /// Candidate cities that sent trucks
        dispatched_from: Vec<String>,
    },
    /// A simulated shipment left a city.
    AidDispatched {
        from: String,
        to: String,
        product: String,
        amount: u32,
        company: String,
        distance_km: u32,
    },
    /// A dispatch request was refused.
    DispatchRejected {
        from: String,
        to: String,
        product: String,
        amount: u32,
        /// "no_truck_available" or "insufficient_stock"
        status: String,
        message: String,
    },
}

impl AuditEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::ServiceStarted { .. } => "service_started",
            Self::ServiceStopped { .. } => "service_stopped",
            Self::EntrySubmitted { .. } => "entry_submitted",
            Self::CrisisEscalated { .. } => "crisis_escalated",
            Self::AidDispatched { .. } => "aid_dispatched",
            Self::DispatchRejected { .. } => "dispatch_rejected",
        }
    }

    /// Get the entry ID if this event is about a single entry
    pub fn entry_id(&self) -> Option<&str> {
        match self {
            Self::EntrySubmitted { entry_id, .. } => Some(entry_id),
            _ => None,
        }
    }

    /// Get the location the event concerns.
    ///
    /// Dispatches are filed under their destination.
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::EntrySubmitted { location, .. } => location.as_deref(),
            Self::CrisisEscalated { location, .. } => Some(location),
            Self::AidDispatched { to, .. } | Self::DispatchRejected { to, .. } => Some(to),
            Self::ServiceStarted { .. } | Self::ServiceStopped { .. } => None,
        }
    }
}

/// Stored audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entry_id: Option<String>,
    pub location: Option<String>,
    pub data: AuditEvent,
}
