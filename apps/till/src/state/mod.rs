//! # State Module
//!
//! Application state for the register.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │       RegisterSession        │   │         ConfigState          │   │
//! │  │                              │   │                              │   │
//! │  │  RegisterState (till-core)   │   │  store_name                  │   │
//! │  │  TransactionLogMirror (db)   │   │  currency_symbol             │   │
//! │  │  DocumentExporter (export)   │   │  paths, formats              │   │
//! │  └──────────────────────────────┘   └──────────────────────────────┘   │
//! │                                                                         │
//! │  OWNERSHIP:                                                            │
//! │  • RegisterSession: owned by the screen loop (single writer)           │
//! │  • ConfigState: read-only after initialization                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod session;

pub use config::{ConfigError, ConfigState, DEFAULT_TIMESTAMP_FORMAT};
pub use session::{RegisterSession, SessionError, SessionResult};
