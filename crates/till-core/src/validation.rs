//! # Validation Module
//!
//! Advisory checks on submitted line items.
//!
//! The register never refuses a submission (empty names, zero quantities and
//! negative prices are all recorded as typed). These checks exist so the
//! caller can log or display a warning next to a suspicious line.

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::LineItem;
use crate::MAX_ITEM_NAME_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Checks an item name: non-blank and not absurdly long.
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_item_name;
///
/// assert!(validate_item_name("Coffee").is_ok());
/// assert!(validate_item_name("   ").is_err());
/// ```
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_ITEM_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_ITEM_NAME_LEN,
        });
    }

    Ok(())
}

/// Checks a quantity: must be greater than zero.
pub fn validate_quantity(quantity: Decimal) -> ValidationResult<()> {
    if quantity <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

/// Checks a unit price: zero is allowed (giveaways), negative is not.
pub fn validate_unit_price(price: Decimal) -> ValidationResult<()> {
    if price < Decimal::ZERO {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }
    Ok(())
}

/// Runs every check on an item and collects all findings.
///
/// ## Example
/// ```rust
/// use till_core::{validation::validate_line_item, LineItem};
///
/// let item = LineItem::from_input("", "0", "-1");
/// assert_eq!(validate_line_item(&item).len(), 3);
/// ```
pub fn validate_line_item(item: &LineItem) -> Vec<ValidationError> {
    [
        validate_item_name(&item.name),
        validate_quantity(item.quantity),
        validate_unit_price(item.unit_price),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
