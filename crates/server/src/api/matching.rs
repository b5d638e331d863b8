//! Matching and per-location reports.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use std::sync::Arc;

use relief_core::{
    match_entries, stock_balance, stock_summary, MatchQuery, MatchResult, StockBalance,
    StockSummary,
};

use super::error::ApiResult;
use crate::state::AppState;

pub async fn match_supply(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MatchQuery>, JsonRejection>,
) -> ApiResult<Json<MatchResult>> {
    let Json(query) = payload?;
    Ok(Json(match_entries(state.entries(), &query)?))
}

pub async fn get_stock_summary(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StockSummary>> {
    Ok(Json(stock_summary(state.entries())?))
}

pub async fn get_stock_balance(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<StockBalance>> {
    Ok(Json(stock_balance(state.entries())?))
}
