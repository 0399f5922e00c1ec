//! Error responses
//!
//! Engine errors render as `{"error": "<description>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::NestError;

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Status code for an engine error.
#[must_use]
pub fn status_for(error: &NestError) -> StatusCode {
    match error {
        NestError::Validation(_) | NestError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
        NestError::HospitalNotFound(_)
        | NestError::ProductsNotFound(_)
        | NestError::FlightNotFound(_) => StatusCode::NOT_FOUND,
        NestError::CapacityExceeded { .. }
        | NestError::InsufficientStock(_)
        | NestError::InvalidStateTransition { .. } => StatusCode::FORBIDDEN,
    }
}

impl IntoResponse for NestError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        tracing::warn!(status = status.as_u16(), error = %self, "request rejected");

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
