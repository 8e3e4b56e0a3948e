//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Register contract violations                   │
//! │  └── ValidationError  - Advisory input checks                          │
//! │                                                                         │
//! │  till-db errors       └── DbError      - Storage failures              │
//! │  till-export errors   └── ExportError  - Document rendering failures   │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── ApiError         - What the screen shows                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (index, length, field)
//! 3. Errors are enum variants, never String

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Register state errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// An edit or delete referenced a slot that does not exist.
    ///
    /// ## When This Occurs
    /// The screen is expected to pass only indexes it rendered, so this is a
    /// caller contract violation rather than a recoverable state:
    /// ```text
    /// in_progress_items = [Coffee, Cake]     (len 2)
    ///      │
    ///      ▼
    /// begin_edit(5)
    ///      │
    ///      ▼
    /// ItemIndexOutOfRange { index: 5, len: 2 }
    /// ```
    #[error("Item index {index} is out of range (register has {len} items)")]
    ItemIndexOutOfRange { index: usize, len: usize },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation findings.
///
/// The register accepts every submission; these are surfaced as warnings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::ItemIndexOutOfRange { index: 5, len: 2 };
        assert_eq!(
            err.to_string(),
            "Item index 5 is out of range (register has 2 items)"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Negative {
            field: "price".to_string(),
        };
        assert_eq!(err.to_string(), "price must not be negative");
    }
}
