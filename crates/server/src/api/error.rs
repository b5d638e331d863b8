//! Error rendering shared by every handler.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use relief_core::{AdvisorError, AuditError, ClassificationError, CrisisError, EntryError};

/// Any failure while serving a request. Always rendered as HTTP 500.
#[derive(Debug)]
pub struct ApiError(String);

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    pub fn message(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(detail = %self.0, "Request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody { detail: self.0 }),
        )
            .into_response()
    }
}

impl From<ClassificationError> for ApiError {
    fn from(e: ClassificationError) -> Self {
        Self(e.to_string())
    }
}

impl From<EntryError> for ApiError {
    fn from(e: EntryError) -> Self {
        Self(e.to_string())
    }
}

impl From<CrisisError> for ApiError {
    fn from(e: CrisisError) -> Self {
        Self(e.to_string())
    }
}

impl From<AdvisorError> for ApiError {
    fn from(e: AdvisorError) -> Self {
        Self(e.to_string())
    }
}

impl From<AuditError> for ApiError {
    fn from(e: AuditError) -> Self {
        Self(e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self(e.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
