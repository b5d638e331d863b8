//! Market, fleet and route records served by the lookup catalog.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A market in a city, with stock already scaled by its fill level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub name: String,
    /// District within the city.
    pub location: String,
    /// Distance from the city centre, km.
    pub distance: u32,
    /// Number of people the market can supply.
    pub capacity: u32,
    /// Product name to units in stock.
    pub products: BTreeMap<String, u32>,
}

/// Fleet availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FleetStatus {
    Available,
    Busy,
}

/// A logistics company's trucks stationed in a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    pub company: String,
    pub trucks: u32,
    pub capacity_per_truck: u32,
    pub status: FleetStatus,
    /// Depot the trucks leave from.
    pub location: String,
}

impl Fleet {
    pub fn is_available(&self) -> bool {
        self.status == FleetStatus::Available
    }

    pub fn total_capacity(&self) -> u64 {
        self.trucks as u64 * self.capacity_per_truck as u64
    }
}

/// Road distance and travel time between two cities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// km
    pub distance: u32,
    /// Hours at the average truck speed.
    pub travel_time: f64,
    /// Human-readable form of `travel_time`, e.g. "5 h 37 min".
    pub estimated_arrival: String,
}

/// A simulated shipment that left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dispatch {
    pub company: String,
    pub from: String,
    pub to: String,
    pub product: String,
    pub amount: u32,
    pub route: Route,
    pub message: String,
}

/// Outcome of a dispatch request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Dispatched(Dispatch),
    NoTruckAvailable {
        message: String,
    },
    /// Source markets cannot cover the request; nothing was sent.
    InsufficientStock {
        message: String,
        available: u32,
        requested: u32,
    },
}

impl DispatchOutcome {
    /// Status label, as used in metrics and audit events.
    pub fn status(&self) -> &'static str {
        match self {
            DispatchOutcome::Dispatched(_) => "dispatched",
            DispatchOutcome::NoTruckAvailable { .. } => "no_truck_available",
            DispatchOutcome::InsufficientStock { .. } => "insufficient_stock",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DispatchOutcome::Dispatched(d) => &d.message,
            DispatchOutcome::NoTruckAvailable { message }
            | DispatchOutcome::InsufficientStock { message, .. } => message,
        }
    }
}

/// Shipment currently on the road (sample data).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveRoute {
    pub from: String,
    pub to: String,
    pub product: String,
    pub amount: u32,
    pub status: String,
    /// Percent of the route covered.
    pub progress: u8,
}
