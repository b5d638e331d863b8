use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::middleware::metrics_middleware;
use super::{advisor, audit, crisis, entries, handlers, lookup, matching};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Liveness, config and metrics
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .route("/metrics", get(handlers::metrics))
        // Intake
        .route("/analyze", post(entries::analyze))
        .route("/submit-entry", post(entries::submit_entry))
        .route("/entries", get(entries::list_entries))
        // Matching and reports
        .route("/match", post(matching::match_supply))
        .route("/stock-summary", get(matching::get_stock_summary))
        .route("/stock-balance", get(matching::get_stock_balance))
        // Crisis
        .route("/simulate-earthquake", post(crisis::simulate_earthquake))
        .route("/dispatch-help", post(crisis::dispatch_help))
        .route("/get-notifications", post(crisis::get_notifications))
        // Lookup
        .route("/market-status/{city}", get(lookup::market_status))
        .route("/truck-status/{city}", get(lookup::truck_status))
        .route("/active-routes", get(lookup::active_routes))
        // Advisor
        .route("/ai-smart-matching", post(advisor::smart_matching))
        .route("/ai-risk-analysis", post(advisor::risk_analysis))
        // Audit
        .route("/audit", get(audit::query_audit))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
