//! # API Error Type
//!
//! Unified error type for register commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Till                                   │
//! │                                                                         │
//! │  Screen line "delete 9"                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command Function → Result<T, ApiError>                          │  │
//! │  │         │                                                        │  │
//! │  │         ├── CoreError::ItemIndexOutOfRange ──► REGISTER_ERROR    │  │
//! │  │         ├── SessionError::TransactionNotFound ► NOT_FOUND        │  │
//! │  │         ├── DbError::* ──────────────────────► DATABASE_ERROR    │  │
//! │  │         ├── ExportError::* ──────────────────► EXPORT_ERROR      │  │
//! │  │         └── ConfigError::* ──────────────────► VALIDATION_ERROR  │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Screen prints "Error: <message>" and keeps running                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use till_core::CoreError;
use till_db::DbError;
use till_export::ExportError;

use crate::state::{ConfigError, SessionError};

/// Error returned from register commands.
///
/// ## Serialization
/// ```json
/// {
///   "code": "REGISTER_ERROR",
///   "message": "Item index 5 is out of range (register has 2 items)"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Referenced transaction does not exist
    NotFound,

    /// Input or configuration validation failed
    ValidationError,

    /// Database operation failed
    DatabaseError,

    /// Document rendering or writing failed
    ExportError,

    /// Register contract violation (bad item index)
    RegisterError,

    /// Internal error
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: impl std::fmt::Display) -> Self {
        ApiError::new(
            ErrorCode::NotFound,
            format!("{} not found: {}", resource, id),
        )
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::ConnectionFailed(_) => {
                ApiError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Migration failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                // Log the actual error but return a generic message
                tracing::error!("Database query failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Serialization(e) => {
                tracing::error!("Transaction log serialization failed: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Could not encode transaction log")
            }
            DbError::PoolExhausted => {
                ApiError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemIndexOutOfRange { .. } => {
                ApiError::new(ErrorCode::RegisterError, err.to_string())
            }
        }
    }
}

/// Converts export errors to API errors.
impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        tracing::error!("Export failed: {}", err);
        ApiError::new(ErrorCode::ExportError, err.to_string())
    }
}

/// Converts configuration errors to API errors.
impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::validation(err.to_string())
    }
}

/// Converts session errors to API errors.
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Core(e) => e.into(),
            SessionError::Db(e) => e.into(),
            SessionError::Export(e) => e.into(),
            SessionError::TransactionNotFound { index, .. } => {
                ApiError::not_found("Transaction", index + 1)
            }
            SessionError::InvalidTimestampFormat(format) => {
                ApiError::validation(format!("Invalid timestamp format: {}", format))
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_screaming_code() {
        let err = ApiError::new(ErrorCode::RegisterError, "bad index");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "REGISTER_ERROR");
        assert_eq!(json["message"], "bad index");
    }

    #[test]
    fn test_core_error_mapping() {
        let err: ApiError = CoreError::ItemIndexOutOfRange { index: 4, len: 2 }.into();
        assert_eq!(err.code, ErrorCode::RegisterError);
        assert!(err.message.contains("out of range"));
    }

    #[test]
    fn test_db_error_hides_details() {
        let err: ApiError = DbError::QueryFailed("disk I/O error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }

    #[test]
    fn test_session_not_found_is_one_based() {
        let err: ApiError = SessionError::TransactionNotFound { index: 2, len: 1 }.into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Transaction not found: 3");
    }

    #[test]
    fn test_export_and_config_mapping() {
        let err: ApiError = ExportError::Xlsx("boom".into()).into();
        assert_eq!(err.code, ErrorCode::ExportError);

        let err: ApiError = ConfigError::Invalid("no formats".into()).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.to_string(), "[ValidationError] Invalid configuration: no formats");
    }
}
