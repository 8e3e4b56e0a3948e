//! # Till Library
//!
//! The single-screen register: configuration, session, commands and the
//! terminal screen that drives them.
//!
//! ## Module Organization
//! ```text
//! till_lib/
//! ├── lib.rs              ◄─── You are here (startup & run)
//! ├── screen.rs           ◄─── Line commands, rendering, run loop
//! ├── state/
//! │   ├── mod.rs          ◄─── State type exports
//! │   ├── config.rs       ◄─── ConfigState (defaults → TOML → env)
//! │   └── session.rs      ◄─── RegisterSession (state + mirror + exporter)
//! ├── commands/
//! │   ├── mod.rs          ◄─── Command exports
//! │   ├── register.rs     ◄─── Entry form & in-progress items
//! │   └── transaction.rs  ◄─── Commit, report, ticket, close day
//! └── error.rs            ◄─── API error type for commands
//! ```

pub mod commands;
pub mod error;
pub mod screen;
pub mod state;

use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use error::ApiError;
use screen::Screen;
use state::{ConfigState, RegisterSession};
use till_db::Database;
use till_export::FileExporter;

/// Runs the register on stdin/stdout.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Application Startup                               │
/// │                                                                         │
/// │  1. Initialize Logging ──────────► stderr, RUST_LOG overrides          │
/// │  2. Load Configuration ──────────► defaults → till.toml → TILL_*       │
/// │  3. Create Directories ──────────► database dir, export dir            │
/// │  4. Connect to Database ─────────► SQLite (WAL), run migrations        │
/// │  5. Open Session ────────────────► rehydrate the transaction log       │
/// │  6. Run Screen ──────────────────► until "quit" or end of input        │
/// │  7. Close Database                                                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), ApiError> {
    init_tracing();
    info!("Starting Till register");

    let config = ConfigState::load(None)?;
    config.ensure_dirs()?;
    info!(
        db_path = %config.database_path.display(),
        export_dir = %config.export_dir.display(),
        "Configuration loaded"
    );

    let db = Database::new(config.db_config()).await?;
    info!("Database connected and migrations applied");

    let exporter = FileExporter::new(config.export_settings());
    let session = RegisterSession::open(&db, exporter, config.timestamp_format.clone()).await?;

    let mut screen = Screen::new(session, config);
    let outcome = screen
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await;

    db.close().await;
    outcome.map_err(|e| ApiError::internal(format!("Terminal I/O failed: {}", e)))
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=till=trace` - Show trace for till crates only
/// - Default: `info,till=debug,sqlx=warn`
///
/// Logs go to stderr; stdout belongs to the screen.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,till=debug,sqlx=warn"));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
