//! Intake: classification and entry submission.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use relief_core::{AidEntry, Analysis, AuditEvent, ClassificationError, EntryFilter, NewEntry};

use super::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct AnalyzeBody {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitEntryBody {
    pub text: String,
    /// Optional submitter label
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubmitEntryResponse {
    pub message: String,
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct ListEntriesResponse {
    pub entries: Vec<AidEntry>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Classify text without storing anything.
pub async fn analyze(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AnalyzeBody>, JsonRejection>,
) -> ApiResult<Json<Analysis>> {
    let Json(body) = payload?;
    let analysis = classify(&state, &body.text).await?;
    Ok(Json(analysis))
}

/// Classify text and persist it as an active entry.
pub async fn submit_entry(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubmitEntryBody>, JsonRejection>,
) -> ApiResult<Json<SubmitEntryResponse>> {
    let Json(body) = payload?;
    let analysis = classify(&state, &body.text).await?;

    let entry = state.entries().insert(NewEntry {
        name: body.name,
        original_text: body.text,
        analysis,
    })?;

    tracing::info!(
        entry_id = %entry.id,
        location = %entry.analysis.location_or_unknown(),
        need = entry.analysis.need,
        "Entry submitted"
    );

    state.audit().try_emit(AuditEvent::EntrySubmitted {
        entry_id: entry.id.clone(),
        name: entry.name.clone(),
        location: entry.analysis.location.clone(),
        need: entry.analysis.need,
        priority: entry.analysis.priority.clone(),
        items: entry.analysis.items.len() as u32,
    });

    Ok(Json(SubmitEntryResponse {
        message: "Entry saved".to_string(),
        id: entry.id,
    }))
}

/// Every stored entry, unfiltered.
pub async fn list_entries(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ListEntriesResponse>> {
    let entries = state.entries().list(&EntryFilter::new())?;
    Ok(Json(ListEntriesResponse { entries }))
}

async fn classify(state: &AppState, text: &str) -> Result<Analysis, ApiError> {
    let classifier = state
        .classifier()
        .ok_or(ClassificationError::NotConfigured)?;
    Ok(classifier.classify(text).await?)
}
