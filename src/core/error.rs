use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error categories surfaced to callers.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed payload, query or DTO field
    Validation,
    /// A reference field points at a document that does not exist
    ReferenceIntegrity,
    NotFound,
    Conflict,
    Unavailable,
    /// Store or runtime failure, propagated with its original message
    System,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::ReferenceIntegrity => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::System => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    // Common error constructors
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// `field` holds `value`, which is not an `_id` in `collection`
    pub fn reference(field: &str, collection: &str, value: &str) -> Self {
        Self::new(
            ErrorKind::ReferenceIntegrity,
            format!("Invalid reference in field '{}'", field),
        )
        .with_details(format!(
            "{} = '{}' does not match any document in '{}'",
            field, value, collection
        ))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Conflict, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unavailable, message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::System, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{:?}: {} ({})", self.kind, self.message, details),
            None => write!(f, "{:?}: {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for AppError {}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::not_found("Resource not found"),

            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                Self::conflict("Duplicate _id").with_details(err.to_string())
            }

            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Self::service_unavailable("Database unavailable").with_details(err.to_string())
            }

            _ => Self::internal_server_error("Database error").with_details(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::validation("Malformed payload").with_details(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::validation("Validation error").with_details(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_error_names_field_and_value() {
        let err = AppError::reference("worldId", "worlds", "nonexistent");
        assert_eq!(err.kind, ErrorKind::ReferenceIntegrity);
        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let details = err.details.unwrap();
        assert!(details.contains("worldId"));
        assert!(details.contains("nonexistent"));
        assert!(details.contains("worlds"));
    }

    #[test]
    fn test_sqlx_errors_keep_original_message() {
        let err = AppError::from(sqlx::Error::Protocol("boom".to_string()));
        assert_eq!(err.kind, ErrorKind::System);
        assert!(err.details.unwrap().contains("boom"));

        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_serialized_shape() {
        let err = AppError::not_found("missing");
        let value = serde_json::to_value(&err).unwrap();
        assert_eq!(value["kind"], "NotFound");
        assert_eq!(value["message"], "missing");
        assert!(value.get("details").is_none());
    }
}
