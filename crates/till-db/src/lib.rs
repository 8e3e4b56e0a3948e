//! # till-db: Storage Layer for Till
//!
//! Durable storage for the register. It uses SQLite with sqlx for async
//! operations and keeps a single JSON document per key.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Data Flow                                 │
//! │                                                                         │
//! │  commit_transaction / close_day (apps/till)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     till-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │ TransactionLog│    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│    Mirror     │    │  (embedded)  │  │   │
//! │  │   │               │    │      │        │    │              │  │   │
//! │  │   │ SqlitePool    │    │      ▼        │    │ 001_kv_store │  │   │
//! │  │   │               │◄───│ KvRepository  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  SQLite: kv_store["till.transactions"] = "[{...}, {...}]"       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Key-value repository
//! - [`mirror`] - Transaction log mirror
//!
//! ## Usage
//!
//! ```rust,ignore
//! use till_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("till.db")).await?;
//!
//! let log = db.transaction_log().load().await?;
//! db.transaction_log().save(&log).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod mirror;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use mirror::{TransactionLogMirror, TRANSACTION_LOG_KEY};
pub use pool::{Database, DbConfig};

pub use repository::kv::KvRepository;
