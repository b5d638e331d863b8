use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use relief_core::{AuditFilter, AuditRecord};

use super::error::ApiResult;
use crate::state::AppState;

/// Maximum allowed limit for audit queries
const MAX_LIMIT: i64 = 1000;

/// Default limit for audit queries
const DEFAULT_LIMIT: i64 = 100;

/// Query parameters for audit endpoint
#[derive(Debug, Deserialize)]
pub struct AuditQueryParams {
    pub entry_id: Option<String>,
    /// Filter by the location an event concerns
    pub location: Option<String>,
    pub event_type: Option<String>,
    /// Events at or after this timestamp (ISO 8601)
    pub from: Option<DateTime<Utc>>,
    /// Events at or before this timestamp (ISO 8601)
    pub to: Option<DateTime<Utc>>,
    /// Default 100, max 1000
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct AuditQueryResponse {
    pub events: Vec<AuditRecord>,
    /// Matching events ignoring limit/offset
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Query audit events, newest first
pub async fn query_audit(
    State(state): State<Arc<AppState>>,
    params: Result<Query<AuditQueryParams>, QueryRejection>,
) -> ApiResult<Json<AuditQueryResponse>> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);

    let mut base_filter = AuditFilter::new();

    if let Some(ref entry_id) = params.entry_id {
        base_filter = base_filter.with_entry_id(entry_id);
    }

    if let Some(ref location) = params.location {
        base_filter = base_filter.with_location(location);
    }

    if let Some(ref event_type) = params.event_type {
        base_filter = base_filter.with_event_type(event_type);
    }

    if params.from.is_some() || params.to.is_some() {
        base_filter = base_filter.with_time_range(params.from, params.to);
    }

    let query_filter = base_filter.clone().with_limit(limit).with_offset(offset);

    let events = state.audit_store().query(&query_filter)?;
    let total = state.audit_store().count(&base_filter)?;

    Ok(Json(AuditQueryResponse {
        events,
        total,
        limit,
        offset,
    }))
}
