//! API error envelope

use serde::{Deserialize, Serialize};

/// Error codes carried in the error envelope, one per HTTP status the API
/// returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The body, query or path failed to decode or validate
    InvalidRequest,
    /// Authentication required
    Unauthorized,
    /// The requested resource was not found
    NotFound,
    /// The request conflicts with an existing record
    Conflict,
    /// Unexpected server-side failure
    InternalError,
}

impl ErrorCode {
    /// HTTP status code that carries this error
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest => 400,
            Self::Unauthorized => 401,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::InternalError => 500,
        }
    }
}

/// Error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code
    pub code: ErrorCode,
    /// Error message
    pub message: String,
}

impl ApiError {
    /// Creates a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Creates an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Creates an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Creates an unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Creates a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Creates a conflict error
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code.http_status(), self.message)
    }
}

impl std::error::Error for ApiError {}

/// Body of every error response: `{"error": {"code", "message"}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ApiError,
}

impl From<ApiError> for ErrorResponse {
    fn from(error: ApiError) -> Self {
        Self { error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let body = ErrorResponse::from(ApiError::conflict("Already checked in today"));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["error"]["code"], "conflict");
        assert_eq!(json["error"]["message"], "Already checked in today");

        let parsed: ErrorResponse = serde_json::from_value(json).unwrap();
        assert_eq!(parsed.error.code, ErrorCode::Conflict);
    }

    #[test]
    fn test_codes_follow_http_status() {
        assert_eq!(ErrorCode::InvalidRequest.http_status(), 400);
        assert_eq!(ErrorCode::Unauthorized.http_status(), 401);
        assert_eq!(ErrorCode::NotFound.http_status(), 404);
        assert_eq!(ErrorCode::Conflict.http_status(), 409);
        assert_eq!(ErrorCode::InternalError.http_status(), 500);
        assert_eq!(ApiError::not_found("Habit not found").to_string(), "[404] Habit not found");
    }
}
