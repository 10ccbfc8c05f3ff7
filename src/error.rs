//! Typed failures for budget and expense operations, and their HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub(crate) type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub(crate) enum ApiError {
    /// No credential on the request.
    #[error("No token")]
    MissingCredential,

    /// Credential present but malformed, expired or badly signed.
    #[error("Invalid token")]
    InvalidCredential,

    /// A required field is missing or unusable.
    #[error("{0}")]
    Validation(String),

    /// Budget or expense absent, or not owned by the caller.
    #[error("{0}")]
    NotFound(String),

    /// Stored amounts add up to more than a decimal can hold.
    #[error("Totals for {0} are out of range")]
    OutOfRange(String),

    /// The persistence layer failed. Details are logged, never returned.
    #[error("Internal error")]
    Storage(#[from] anyhow::Error),
}

impl ApiError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub(crate) fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub(crate) fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingCredential => StatusCode::UNAUTHORIZED,
            Self::InvalidCredential => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::OutOfRange(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Storage(ref e) = self {
            tracing::error!(error = ?e, "storage failure");
        }
        let status = self.status_code();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
