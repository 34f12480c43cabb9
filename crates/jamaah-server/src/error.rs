//! Error types for the dashboard HTTP API.
//!
//! [`ApiError`] is converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. Bodies
//! always have the shape `{"error": string, "filename"?: string}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur in the dashboard API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested data file is absent, not `.json`, or outside the
    /// data directory.
    #[error("data file not found: {filename}")]
    DataFileNotFound {
        /// The name the client asked for.
        filename: String,
    },

    /// A data file passed the existence check but could not be read.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::DataFileNotFound { filename } => (
                StatusCode::NOT_FOUND,
                serde_json::json!({
                    "error": "File not found",
                    "filename": filename,
                }),
            ),
            Self::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": message }),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
