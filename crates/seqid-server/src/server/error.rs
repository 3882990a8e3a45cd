//! Mapping of allocation errors onto HTTP responses.
//!
//! Internal detail (prefixes, attempt counts, store faults) is logged, never
//! returned. Clients see a status code and a short message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Wrapper turning [`seqid::Error`] into a response.
#[derive(Debug)]
pub struct ApiError(pub seqid::Error);

impl From<seqid::Error> for ApiError {
    fn from(err: seqid::Error) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            seqid::Error::Configuration { .. } => StatusCode::NOT_FOUND,
            seqid::Error::Malformed { .. } => StatusCode::BAD_REQUEST,
            seqid::Error::Conflict { .. } | seqid::Error::DuplicateAllocation { .. } => {
                StatusCode::CONFLICT
            }
            seqid::Error::PersistenceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        crate::server::telemetry::increment_request_errors();

        let message = match &self.0 {
            seqid::Error::Configuration { .. } => "unknown entity type",
            other => other.user_message(),
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::info!(error = %self.0, "request rejected");
        }

        (status, Json(json!({ "error": message }))).into_response()
    }
}
