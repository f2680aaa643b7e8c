//! HTTP error envelope shared by all handlers.
//!
//! Typed module errors ([`crate::utils::url_validator::ValidationError`],
//! [`crate::domain::registry::RegistryError`],
//! [`crate::application::services::RedirectError`]) are converted into
//! [`AppError`] at the handler boundary, which renders a JSON body with a
//! machine-readable `code` and a human message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::application::services::RedirectError;
use crate::domain::registry::RegistryError;
use crate::utils::url_validator::ValidationError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload included in every error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation {
        code: &'static str,
        message: String,
        details: Value,
    },
    NotFound {
        message: String,
        details: Value,
    },
    Gone {
        message: String,
        details: Value,
    },
    Conflict {
        message: String,
        details: Value,
    },
    Internal {
        message: String,
        details: Value,
    },
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            code,
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn gone(message: impl Into<String>, details: Value) -> Self {
        Self::Gone {
            message: message.into(),
            details,
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Flattens the error into its wire representation.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            AppError::Validation {
                code,
                message,
                details,
            } => (*code, message.clone(), details.clone()),
            AppError::NotFound { message, details } => {
                ("not_found", message.clone(), details.clone())
            }
            AppError::Gone { message, details } => ("expired", message.clone(), details.clone()),
            AppError::Conflict { message, details } => {
                ("conflict", message.clone(), details.clone())
            }
            AppError::Internal { message, details } => {
                ("internal_error", message.clone(), details.clone())
            }
        };

        ErrorInfo {
            code,
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Gone { .. } => StatusCode::GONE,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        let code = match e {
            ValidationError::TooLong { .. } => "url_too_long",
            ValidationError::MalformedUrl(_) => "malformed_url",
            ValidationError::BlockedHost(_) => "blocked_host",
        };

        AppError::bad_request(code, e.to_string(), json!({}))
    }
}

impl From<RedirectError> for AppError {
    fn from(e: RedirectError) -> Self {
        match e {
            // An obviously malformed code is indistinguishable from an unknown
            // one as far as the client is concerned.
            RedirectError::InvalidFormat { .. } | RedirectError::NotFound { .. } => {
                AppError::not_found("Short URL not found", json!({}))
            }
            RedirectError::Expired { code } => {
                AppError::gone("This short URL has expired", json!({ "code": code }))
            }
        }
    }
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::CodeCollision { .. } => {
                AppError::conflict("Short code already in use", json!({}))
            }
            RegistryError::NotFound { code } => {
                AppError::not_found("Short URL not found", json!({ "code": code }))
            }
            RegistryError::ExhaustedKeyspace { attempts } => AppError::internal(
                "Failed to allocate a unique short code",
                json!({ "attempts": attempts }),
            ),
            // Never leak backend detail to the client; the cause is logged
            // where the error is produced.
            RegistryError::Unavailable(_) => AppError::internal("Storage error", json!({})),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::bad_request(
            "validation_error",
            "Request validation failed",
            json!({ "fields": e.to_string() }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_kinds_map_to_codes() {
        let err: AppError = ValidationError::BlockedHost("localhost".to_string()).into();
        assert_eq!(err.to_error_info().code, "blocked_host");

        let err: AppError = ValidationError::TooLong { length: 3000 }.into();
        assert_eq!(err.to_error_info().code, "url_too_long");
    }

    #[test]
    fn test_expired_maps_to_gone() {
        let err: AppError = RedirectError::Expired {
            code: "abc123".to_string(),
        }
        .into();
        assert_eq!(err.to_error_info().code, "expired");
        assert!(matches!(err, AppError::Gone { .. }));
    }

    #[test]
    fn test_invalid_format_maps_to_not_found() {
        let err: AppError = RedirectError::InvalidFormat {
            code: "!".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[test]
    fn test_registry_unavailable_does_not_leak_detail() {
        let err: AppError = RegistryError::Unavailable("connection refused".to_string()).into();
        let info = err.to_error_info();
        assert_eq!(info.code, "internal_error");
        assert!(!info.message.contains("connection refused"));
    }
}
