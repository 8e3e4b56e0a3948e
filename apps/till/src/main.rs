//! # Till Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              till                                       │
//! │                                                                         │
//! │  main.rs ────► tokio runtime, exit code                                │
//! │  lib.rs ─────► logging, config, database, session, screen              │
//! │                                                                         │
//! │  stdin ──► screen ──► stdout          logs ──► stderr                  │
//! │                                                                         │
//! │  till.db (SQLite, WAL)       exports/*.pdf, exports/*.xlsx             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // The actual setup is in lib.rs for better testability
    match till_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("till: {}", err);
            ExitCode::FAILURE
        }
    }
}
