//! Server error types.

use align_store::StoreError;
use api_protocol::{ApiError, ErrorResponse, ValidationError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use blueprint_engine::EngineError;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Malformed or invalid request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Duplicate write of a unique record.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Authentication error.
    #[error("Auth error: {0}")]
    Auth(#[from] auth::AuthError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(StoreError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Creates a not found error for an entity name such as `"Habit"`.
    pub fn not_found(entity: impl Into<String>) -> Self {
        Self::NotFound(entity.into())
    }
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { entity_type, .. } => Self::NotFound(entity_type.to_string()),
            e @ StoreError::AlreadyExists { .. } => Self::Conflict(e.to_string()),
            StoreError::ForeignKeyViolation(msg) => Self::InvalidRequest(msg),
            other => Self::Database(other),
        }
    }
}

impl From<EngineError> for ServerError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Validation(msg) => Self::InvalidRequest(msg),
        }
    }
}

impl From<ValidationError> for ServerError {
    fn from(e: ValidationError) -> Self {
        Self::InvalidRequest(e.to_string())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let error = match &self {
            ServerError::InvalidRequest(msg) => ApiError::invalid_request(msg.clone()),
            ServerError::NotFound(_) => ApiError::not_found(self.to_string()),
            ServerError::Conflict(msg) => ApiError::conflict(msg.clone()),
            ServerError::Auth(e) => ApiError::unauthorized(e.to_string()),
            ServerError::Database(_) | ServerError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                ApiError::internal_error("Unexpected error")
            }
        };
        let status = StatusCode::from_u16(error.code.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(ErrorResponse::from(error))).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_mapping() {
        let not_found: ServerError = StoreError::not_found("Habit", "42").into();
        assert!(matches!(not_found, ServerError::NotFound(ref e) if e == "Habit"));

        let duplicate: ServerError = StoreError::already_exists("DailyCheckin", "2025-01-30").into();
        assert!(matches!(duplicate, ServerError::Conflict(_)));

        let orphan: ServerError = StoreError::missing_user("u1").into();
        assert!(matches!(orphan, ServerError::InvalidRequest(_)));

        let corrupt: ServerError = StoreError::InvalidData("bad date".to_string()).into();
        assert!(matches!(corrupt, ServerError::Database(_)));
    }

    #[test]
    fn test_status_codes() {
        let status = |e: ServerError| e.into_response().status();
        assert_eq!(status(ServerError::InvalidRequest("x".into())), StatusCode::BAD_REQUEST);
        assert_eq!(status(ServerError::not_found("Blueprint")), StatusCode::NOT_FOUND);
        assert_eq!(status(ServerError::Conflict("x".into())), StatusCode::CONFLICT);
        assert_eq!(
            status(ServerError::Auth(auth::AuthError::MissingToken)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status(ServerError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
