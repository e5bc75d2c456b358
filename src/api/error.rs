//! Mapping from service errors to HTTP responses.

use crate::errors::Error;
use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

/// Error returned by handlers; renders as `{ "error": "<message>" }`.
#[derive(Debug)]
pub enum ApiError {
    /// No record matched; carries the message to show
    NotFound(&'static str),
    /// The request could not be parsed
    BadRequest(String),
    /// A repository or configuration error
    Service(Error),
}

/// Convenience `Result` type for handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<Error> for ApiError {
    fn from(value: Error) -> Self {
        Self::Service(value)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::BadRequest(value.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Service(Error::Validation { .. }) => StatusCode::BAD_REQUEST,
            Self::Service(Error::Conflict { .. }) => StatusCode::CONFLICT,
            Self::Service(Error::StorageUnavailable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Service(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::NotFound(message) => message.to_string(),
            Self::BadRequest(message) => message,
            Self::Service(err) => {
                if status.is_server_error() {
                    error!(error = %err, "Request failed");
                }
                err.to_string()
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
