//! LLM-backed recommendations.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use relief_core::{Advisor, RiskAnalysis, SmartMatch};

use super::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmartMatchParams {
    #[serde(alias = "konum")]
    pub location: String,
    #[serde(alias = "product_name", alias = "urun_adi")]
    pub product_name: String,
}

pub async fn smart_matching(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SmartMatchParams>, QueryRejection>,
) -> ApiResult<Json<SmartMatch>> {
    let Query(params) = params?;
    let result = advisor(&state)?
        .smart_match(&params.location, &params.product_name)
        .await?;
    Ok(Json(result))
}

pub async fn risk_analysis(State(state): State<Arc<AppState>>) -> ApiResult<Json<RiskAnalysis>> {
    let result = advisor(&state)?.risk_analysis().await?;
    Ok(Json(result))
}

fn advisor(state: &AppState) -> Result<&Advisor, ApiError> {
    state
        .advisor()
        .map(Arc::as_ref)
        .ok_or_else(|| ApiError::new("classifier not configured"))
}
