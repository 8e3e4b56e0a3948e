//! # Commands Module
//!
//! Every operation the screen can trigger.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs          ◄─── You are here (exports, shared helpers)
//! ├── register.rs     ◄─── Entry form and in-progress items
//! └── transaction.rs  ◄─── Commit, report, ticket, close day
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Screen                                                                │
//! │  ──────                                                                │
//! │  "edit 2"  ──► Action::Edit(2)                                         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands::register::begin_edit(                                       │
//! │      &mut session,   ◄── exclusively owned by the screen               │
//! │      &config,        ◄── for currency formatting                       │
//! │      2,              ◄── 1-based position as shown on screen           │
//! │  ) -> Result<RegisterView, ApiError>                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Screen renders the view                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Positions in commands are 1-based; the core works with 0-based indexes.

pub mod register;
pub mod transaction;

use crate::error::ApiError;

/// Converts an on-screen position into a core index.
pub(crate) fn position_to_index(position: usize) -> Result<usize, ApiError> {
    position
        .checked_sub(1)
        .ok_or_else(|| ApiError::validation("Positions start at 1"))
}
