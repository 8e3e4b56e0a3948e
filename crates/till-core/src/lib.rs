//! # till-core: Pure Register Logic for Till
//!
//! This crate is the **heart** of Till. It holds the register state machine
//! (line items being rung up, the committed transaction log, the edit cursor)
//! as plain data with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Till Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Terminal Screen (apps/till)                  │   │
//! │  │      Entry form ──► Current items ──► Transactions ──► Export   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ register  │  │  number   │  │   │
//! │  │   │ LineItem  │  │   Money   │  │ Register  │  │ coercion  │  │   │
//! │  │   │Transaction│  │           │  │   State   │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE STATE TRANSITIONS      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          till-db (log mirror) / till-export (documents)         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, Transaction, EntryForm)
//! - [`money`] - Money type over exact decimals (no floating point!)
//! - [`number`] - Lenient coercion of operator text into numbers
//! - [`register`] - The register state manager
//! - [`error`] - Domain error types
//! - [`validation`] - Advisory checks on submitted items
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::RegisterState;
//!
//! let mut register = RegisterState::new();
//! register.submit_item("Coffee", "2", "3.50");
//! register.submit_item("Cake", "1", "5.00");
//!
//! let committed = register.commit_transaction("16/10/2026, 09:30:00");
//! assert_eq!(committed.total().cents(), 1200);
//! assert!(register.in_progress_items().is_empty());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod number;
pub mod register;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use register::{RegisterState, SubmitOutcome};
pub use types::*;

// Re-exported so dependents can name quantities without a direct dependency.
pub use rust_decimal::Decimal;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of an item name before advisory validation complains.
pub const MAX_ITEM_NAME_LEN: usize = 200;
