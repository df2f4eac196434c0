//! Type-safe error codes for API responses.
//!
//! Each code has a client-facing identifier (`as_str`), an integer for logs and
//! dashboards (`code`), and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::ValidationError;
//! assert_eq!(code.as_str(), "VALIDATION_ERROR");
//! assert_eq!(code.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    ValidationError,
    InvalidUuid,
    JsonExtraction,
    NotFound,
    BadRequest,
    Unauthorized,
    Forbidden,
    Conflict,
    MethodNotAllowed,

    // Server errors (1500-1599)
    InternalError,
    ServiceUnavailable,
    BadGateway,

    // Storage errors (2000-2999)
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::BadRequest => "BAD_REQUEST",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Conflict => "CONFLICT",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::InternalError => "INTERNAL_ERROR",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::BadGateway => "BAD_GATEWAY",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// Integer code used as the `error_code` field in structured logs.
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::BadRequest => 1005,
            Self::Unauthorized => 1006,
            Self::Forbidden => 1007,
            Self::Conflict => 1008,
            Self::MethodNotAllowed => 1009,
            Self::InternalError => 1500,
            Self::ServiceUnavailable => 1503,
            Self::BadGateway => 1502,
            Self::DatabaseError => 2001,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::BadRequest => "Bad request",
            Self::Unauthorized => "Authentication required",
            Self::Forbidden => "Access forbidden",
            Self::Conflict => "Resource already exists",
            Self::MethodNotAllowed => "The HTTP method is not allowed for this resource",
            Self::InternalError => "An internal server error occurred",
            Self::ServiceUnavailable => "Service is temporarily unavailable",
            Self::BadGateway => "Upstream service failed",
            Self::DatabaseError => "An internal server error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_string_representation() {
        assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
        assert_eq!(ErrorCode::BadGateway.as_str(), "BAD_GATEWAY");
        assert_eq!(ErrorCode::ServiceUnavailable.to_string(), "SERVICE_UNAVAILABLE");
    }

    #[test]
    fn test_error_codes_are_unique() {
        let all = [
            ErrorCode::ValidationError,
            ErrorCode::InvalidUuid,
            ErrorCode::JsonExtraction,
            ErrorCode::NotFound,
            ErrorCode::BadRequest,
            ErrorCode::Unauthorized,
            ErrorCode::Forbidden,
            ErrorCode::Conflict,
            ErrorCode::MethodNotAllowed,
            ErrorCode::InternalError,
            ErrorCode::ServiceUnavailable,
            ErrorCode::BadGateway,
            ErrorCode::DatabaseError,
        ];
        let codes: std::collections::HashSet<i32> = all.iter().map(ErrorCode::code).collect();
        assert_eq!(codes.len(), all.len());
    }

    #[test]
    fn test_error_code_serde_matches_as_str() {
        let json = serde_json::to_string(&ErrorCode::BadGateway).unwrap();
        assert_eq!(json, "\"BAD_GATEWAY\"");
        let code: ErrorCode = serde_json::from_str("\"NOT_FOUND\"").unwrap();
        assert_eq!(code, ErrorCode::NotFound);
    }

    #[test]
    fn test_database_error_message_does_not_leak_detail() {
        assert_eq!(
            ErrorCode::DatabaseError.default_message(),
            ErrorCode::InternalError.default_message()
        );
    }
}
