use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::db::DbPoolError;

/// Error taxonomy for the API surface.
///
/// Uniqueness conflicts (duplicate like/follow) are deliberately absent:
/// they resolve to benign "already done" success responses in the handlers.
/// Relay failures never reach this type either; they are logged and dropped
/// off the request path.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed input, rejected before any write.
    #[error("{0}")]
    Validation(String),

    /// Target row absent or outside the caller's ownership scope.
    #[error("{0}")]
    NotFound(String),

    /// Caller identity missing from the request.
    #[error("authentication required")]
    Unauthorized,

    /// Primary store failure during a write or read.
    #[error("storage error: {0}")]
    Storage(#[from] diesel::result::Error),

    /// Could not obtain a pooled connection.
    #[error("connection pool error: {0}")]
    Pool(#[from] DbPoolError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Storage(_) | ApiError::Pool(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(
            ApiError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("missing".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Storage(diesel::result::Error::RollbackTransaction).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn diesel_errors_convert_to_storage() {
        let err: ApiError = diesel::result::Error::RollbackTransaction.into();
        assert!(matches!(err, ApiError::Storage(_)));
    }
}
