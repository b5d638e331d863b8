//! Earthquake mode, aid dispatch and supplier notifications.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use relief_core::{DispatchOutcome, EscalationReport, Notification};

use super::error::ApiResult;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LocationParams {
    #[serde(alias = "konum")]
    pub location: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchParams {
    #[serde(alias = "from_city")]
    pub from_city: String,
    #[serde(alias = "to_city")]
    pub to_city: String,
    pub product: String,
    pub amount: u32,
}

#[derive(Debug, Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
}

pub async fn simulate_earthquake(
    State(state): State<Arc<AppState>>,
    params: Result<Query<LocationParams>, QueryRejection>,
) -> ApiResult<Json<EscalationReport>> {
    let Query(params) = params?;
    let report = state.crisis().escalate(&params.location).await?;
    Ok(Json(report))
}

pub async fn dispatch_help(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DispatchParams>, QueryRejection>,
) -> ApiResult<Json<DispatchOutcome>> {
    let Query(params) = params?;
    let outcome = state
        .crisis()
        .dispatch_help(
            &params.from_city,
            &params.to_city,
            &params.product,
            params.amount,
        )
        .await;
    Ok(Json(outcome))
}

pub async fn get_notifications(
    State(state): State<Arc<AppState>>,
    params: Result<Query<LocationParams>, QueryRejection>,
) -> ApiResult<Json<NotificationsResponse>> {
    let Query(params) = params?;
    let notifications = state.crisis().notifications(&params.location)?;
    Ok(Json(NotificationsResponse { notifications }))
}
