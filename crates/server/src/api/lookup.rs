//! Read-only views over the market and logistics catalog.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use relief_core::lookup::{ActiveRoute, Fleet, Market};

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct MarketStatusResponse {
    pub city: String,
    pub markets: Vec<Market>,
    /// Σ market capacity
    pub total_capacity: u32,
}

#[derive(Debug, Serialize)]
pub struct TruckStatusResponse {
    pub city: String,
    pub fleets: Vec<Fleet>,
    /// Σ trucks × capacity per truck
    pub total_capacity: u64,
}

#[derive(Debug, Serialize)]
pub struct ActiveRoutesResponse {
    pub routes: Vec<ActiveRoute>,
}

pub async fn market_status(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
) -> Json<MarketStatusResponse> {
    let catalog = state.catalog();
    Json(MarketStatusResponse {
        markets: catalog.available_markets(&city),
        total_capacity: catalog.market_capacity(&city),
        city,
    })
}

pub async fn truck_status(
    State(state): State<Arc<AppState>>,
    Path(city): Path<String>,
) -> Json<TruckStatusResponse> {
    let catalog = state.catalog();
    Json(TruckStatusResponse {
        fleets: catalog.fleets(&city).to_vec(),
        total_capacity: catalog.fleet_capacity(&city),
        city,
    })
}

pub async fn active_routes(State(state): State<Arc<AppState>>) -> Json<ActiveRoutesResponse> {
    Json(ActiveRoutesResponse {
        routes: state.catalog().active_routes().to_vec(),
    })
}
