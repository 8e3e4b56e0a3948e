//! # Domain Types
//!
//! Core domain types used throughout Till.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   EntryForm     │   │    LineItem     │   │  Transaction    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name (text)    │──►│  name           │──►│  items          │       │
//! │  │  quantity (text)│   │  quantity       │   │  timestamp      │       │
//! │  │  price (text)   │   │  unit_price     │   │  total()        │       │
//! │  └─────────────────┘   │  line_total()   │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Derived Totals
//! Line totals and transaction totals are never stored: they are computed
//! from quantity and unit price every time they are read, so an edited item
//! can never carry a stale total.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::number::coerce_decimal;

// =============================================================================
// Line Item
// =============================================================================

/// A line rung up on the register.
///
/// ## Persisted Shape
/// ```json
/// { "name": "Coffee", "quantity": "2", "unitPrice": "3.50" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Display name typed by the operator.
    pub name: String,

    /// Quantity sold (may be fractional for weighed goods).
    pub quantity: Decimal,

    /// Unit price in major units, exactly as entered.
    pub unit_price: Decimal,
}

impl LineItem {
    /// Creates a line item from already-parsed values.
    pub fn new(name: impl Into<String>, quantity: Decimal, unit_price: Decimal) -> Self {
        LineItem {
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// Creates a line item from raw form text, coercing non-numbers to zero.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::LineItem;
    ///
    /// let item = LineItem::from_input("Coffee", "2", "3.50");
    /// assert_eq!(item.line_total().cents(), 700);
    ///
    /// let junk = LineItem::from_input("Mystery", "lots", "");
    /// assert!(junk.line_total().is_zero());
    /// ```
    pub fn from_input(name: &str, quantity: &str, price: &str) -> Self {
        LineItem {
            name: name.to_string(),
            quantity: coerce_decimal(quantity),
            unit_price: coerce_decimal(price),
        }
    }

    /// Unit price as Money, for display.
    #[inline]
    pub fn price(&self) -> Money {
        Money::new(self.unit_price)
    }

    /// Exact line total (quantity × unit price).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price().times(self.quantity)
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A committed sale: a frozen list of line items plus its commit time.
///
/// ## Persisted Shape
/// ```json
/// { "items": [ ... ], "timestamp": "16/10/2026, 09:30:00" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Items, in the order they were rung up.
    pub items: Vec<LineItem>,

    /// Commit time, already rendered for display.
    pub timestamp: String,
}

impl Transaction {
    /// Creates a transaction from a snapshot of items.
    pub fn new(items: Vec<LineItem>, timestamp: impl Into<String>) -> Self {
        Transaction {
            items,
            timestamp: timestamp.into(),
        }
    }

    /// Sum of all line totals.
    pub fn total(&self) -> Money {
        self.items.iter().map(LineItem::line_total).sum()
    }

    /// Number of lines in the transaction.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Whether the transaction was committed without items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// =============================================================================
// Entry Form
// =============================================================================

/// The transient text of the entry fields.
///
/// Kept as raw text: the operator may type anything, and coercion happens
/// only on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryForm {
    pub name: String,
    pub quantity: String,
    pub price: String,
}

impl EntryForm {
    /// Creates a form pre-filled with the given text.
    pub fn new(
        name: impl Into<String>,
        quantity: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        EntryForm {
            name: name.into(),
            quantity: quantity.into(),
            price: price.into(),
        }
    }

    /// Fills the form from an existing item (used when editing).
    pub fn from_item(item: &LineItem) -> Self {
        EntryForm {
            name: item.name.clone(),
            quantity: item.quantity.normalize().to_string(),
            price: item.unit_price.normalize().to_string(),
        }
    }

    /// Empties every field.
    pub fn clear(&mut self) {
        self.name.clear();
        self.quantity.clear();
        self.price.clear();
    }

    /// Whether every field is empty.
    pub fn is_blank(&self) -> bool {
        self.name.is_empty() && self.quantity.is_empty() && self.price.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
