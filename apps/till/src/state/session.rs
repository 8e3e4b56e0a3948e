//! # Register Session
//!
//! Ties the pure register state to its persistence mirror and exporter.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Operations                                   │
//! │                                                                         │
//! │  Operation              State change              Side effect           │
//! │  ─────────              ────────────              ───────────           │
//! │                                                                         │
//! │  submit / edit /  ────► in-progress items ──────► (none)               │
//! │  delete / cancel                                                        │
//! │                                                                         │
//! │  commit  ─────────────► log += snapshot ────────► mirror.save(log)     │
//! │                         (rolled back if the save fails)                 │
//! │                                                                         │
//! │  export report ───────► (none) ─────────────────► exporter.report      │
//! │  print ticket  ───────► (none) ─────────────────► exporter.ticket      │
//! │                                                                         │
//! │  close day ───────────► exporter.report ──► mirror.clear ──► log = []  │
//! │                         (any failure leaves the log in place)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! The session is owned by the screen loop; there is exactly one writer, so
//! no locking is involved.

use chrono::Local;
use std::fmt::Write as _;
use thiserror::Error;
use tracing::{debug, info, warn};

use till_core::{CoreError, EntryForm, LineItem, RegisterState, SubmitOutcome, Transaction};
use till_db::{Database, DbError, TransactionLogMirror};
use till_export::{DocumentExporter, ExportError, ExportedDocument, FileExporter, ReportFormat};

// =============================================================================
// Session Error
// =============================================================================

/// Failures of session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Register contract violation (bad item index).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Mirror read/write failed.
    #[error(transparent)]
    Db(#[from] DbError),

    /// Rendering or writing a document failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// A ticket was requested for a transaction that does not exist.
    #[error("Transaction {index} not found (log has {len} transactions)")]
    TransactionNotFound { index: usize, len: usize },

    /// The configured timestamp format could not be rendered.
    #[error("Invalid timestamp format: {0}")]
    InvalidTimestampFormat(String),
}

/// Result type for session operations.
pub type SessionResult<T> = Result<T, SessionError>;

// =============================================================================
// Register Session
// =============================================================================

/// One operator's register: state, durable log, document output.
pub struct RegisterSession<E = FileExporter> {
    state: RegisterState,
    mirror: TransactionLogMirror,
    exporter: E,
    timestamp_format: String,
}

impl<E: DocumentExporter> RegisterSession<E> {
    /// Opens a session over `db`, rehydrating the committed log.
    pub async fn open(
        db: &Database,
        exporter: E,
        timestamp_format: impl Into<String>,
    ) -> SessionResult<Self> {
        Self::with_mirror(db.transaction_log(), exporter, timestamp_format).await
    }

    /// Opens a session over an explicit mirror.
    pub async fn with_mirror(
        mirror: TransactionLogMirror,
        exporter: E,
        timestamp_format: impl Into<String>,
    ) -> SessionResult<Self> {
        let log = mirror.load().await?;
        info!(transactions = log.len(), "Register session opened");

        Ok(RegisterSession {
            state: RegisterState::with_log(log),
            mirror,
            exporter,
            timestamp_format: timestamp_format.into(),
        })
    }

    /// Read access to the register state.
    pub fn state(&self) -> &RegisterState {
        &self.state
    }

    /// The exporter documents go through.
    pub fn exporter(&self) -> &E {
        &self.exporter
    }

    // -------------------------------------------------------------------------
    // Line-item editing (memory only)
    // -------------------------------------------------------------------------

    /// Mutable access to the entry form.
    pub fn form_mut(&mut self) -> &mut EntryForm {
        self.state.form_mut()
    }

    pub fn submit_item(&mut self, name: &str, quantity: &str, price: &str) -> SubmitOutcome {
        self.state.submit_item(name, quantity, price)
    }

    pub fn submit_form(&mut self) -> SubmitOutcome {
        self.state.submit_form()
    }

    pub fn begin_edit(&mut self, index: usize) -> SessionResult<()> {
        Ok(self.state.begin_edit(index)?)
    }

    pub fn cancel_edit(&mut self) {
        self.state.cancel_edit();
    }

    pub fn delete_item(&mut self, index: usize) -> SessionResult<LineItem> {
        Ok(self.state.delete_item(index)?)
    }

    // -------------------------------------------------------------------------
    // Committing
    // -------------------------------------------------------------------------

    /// Commits the in-progress items stamped with the current local time.
    pub async fn commit_transaction(&mut self) -> SessionResult<Transaction> {
        let timestamp = self.now_timestamp()?;
        self.commit_transaction_at(timestamp).await
    }

    /// Commits with an explicit timestamp.
    ///
    /// If the mirror write fails the register is restored to exactly what it
    /// was before the call and the error is returned.
    pub async fn commit_transaction_at(
        &mut self,
        timestamp: impl Into<String>,
    ) -> SessionResult<Transaction> {
        let before = self.state.clone();
        let committed = self.state.commit_transaction(timestamp).clone();

        let saved = self.mirror.save(self.state.committed_transactions()).await;
        if let Err(e) = saved {
            warn!(error = %e, "Mirror write failed, rolling back commit");
            self.state = before;
            return Err(e.into());
        }

        info!(
            items = committed.item_count(),
            total = %committed.total(),
            timestamp = %committed.timestamp,
            "Transaction committed"
        );
        Ok(committed)
    }

    fn now_timestamp(&self) -> SessionResult<String> {
        let mut rendered = String::new();
        write!(rendered, "{}", Local::now().format(&self.timestamp_format))
            .map_err(|_| SessionError::InvalidTimestampFormat(self.timestamp_format.clone()))?;
        Ok(rendered)
    }

    // -------------------------------------------------------------------------
    // Documents
    // -------------------------------------------------------------------------

    /// Exports the committed log without changing it.
    pub fn export_report(&self) -> SessionResult<Vec<ExportedDocument>> {
        let log = self.state.committed_transactions();
        debug!(transactions = log.len(), "Exporting report");
        Ok(self.exporter.export_report(log)?)
    }

    /// Exports the committed log in a single format.
    pub fn export_report_as(&self, format: ReportFormat) -> SessionResult<ExportedDocument> {
        let log = self.state.committed_transactions();
        debug!(%format, transactions = log.len(), "Exporting report");
        Ok(self.exporter.export_report_as(log, format)?)
    }

    /// Exports a ticket for the committed transaction at `index`.
    pub fn print_ticket(&self, index: usize) -> SessionResult<ExportedDocument> {
        let log = self.state.committed_transactions();
        let transaction = log.get(index).ok_or(SessionError::TransactionNotFound {
            index,
            len: log.len(),
        })?;
        Ok(self.exporter.export_ticket(transaction)?)
    }

    /// Ends the day: report, forget the stored log, empty the log.
    ///
    /// Nothing is cleared unless the report was written and the stored key
    /// removed.
    pub async fn close_day(&mut self) -> SessionResult<Vec<ExportedDocument>> {
        let documents = self.export_report()?;
        self.mirror.clear().await?;

        let closed = self.state.take_log();
        info!(
            transactions = closed.len(),
            files = documents.len(),
            "Day closed"
        );
        Ok(documents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::path::PathBuf;
    use till_db::{DbConfig, TRANSACTION_LOG_KEY};
    use till_export::{ExportResult, ExportSettings};

    /// Counts calls and optionally fails.
    #[derive(Default)]
    struct StubExporter {
        fail: bool,
        reports: Cell<usize>,
        tickets: Cell<usize>,
    }

    impl StubExporter {
        fn failing() -> Self {
            StubExporter {
                fail: true,
                ..Self::default()
            }
        }

        fn document(&self) -> ExportResult<ExportedDocument> {
            if self.fail {
                return Err(ExportError::Pdf("stub failure".into()));
            }
            Ok(ExportedDocument {
                format: ReportFormat::Pdf,
                file_path: PathBuf::from("stub.pdf"),
                file_size_bytes: 1,
            })
        }
    }

    impl DocumentExporter for StubExporter {
        fn export_report(&self, _: &[Transaction]) -> ExportResult<Vec<ExportedDocument>> {
            self.reports.set(self.reports.get() + 1);
            Ok(vec![self.document()?])
        }

        fn export_report_as(
            &self,
            _: &[Transaction],
            _: ReportFormat,
        ) -> ExportResult<ExportedDocument> {
            self.reports.set(self.reports.get() + 1);
            self.document()
        }

        fn export_ticket(&self, _: &Transaction) -> ExportResult<ExportedDocument> {
            self.tickets.set(self.tickets.get() + 1);
            self.document()
        }
    }

    async fn memory_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn session(db: &Database, exporter: StubExporter) -> RegisterSession<StubExporter> {
        RegisterSession::open(db, exporter, "%d/%m/%Y, %H:%M:%S")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_commit_persists_log() {
        let db = memory_db().await;
        let mut session = session(&db, StubExporter::default()).await;

        session.submit_item("Coffee", "2", "3.50");
        session.submit_item("Cake", "1", "5.00");
        let committed = session
            .commit_transaction_at("16/10/2026, 09:30:00")
            .await
            .unwrap();

        assert_eq!(committed.total().cents(), 1200);
        assert!(session.state().in_progress_items().is_empty());
        assert_eq!(db.transaction_log().load().await.unwrap(), vec![committed]);
    }

    #[tokio::test]
    async fn test_commit_uses_configured_format() {
        let db = memory_db().await;
        let mut session = RegisterSession::open(&db, StubExporter::default(), "%Y")
            .await
            .unwrap();

        let committed = session.commit_transaction().await.unwrap();
        assert_eq!(committed.timestamp.len(), 4);
        assert!(committed.timestamp.chars().all(|c| c.is_ascii_digit()));
    }

    #[tokio::test]
    async fn test_commit_rolls_back_when_mirror_fails() {
        let db = memory_db().await;
        let mut session = session(&db, StubExporter::default()).await;
        session.submit_item("Tea", "1", "2.00");
        session.begin_edit(0).unwrap();

        db.close().await;
        let err = session.commit_transaction_at("t").await.unwrap_err();

        assert!(matches!(err, SessionError::Db(_)));
        assert_eq!(session.state().in_progress_items().len(), 1);
        assert!(session.state().committed_transactions().is_empty());
        assert_eq!(session.state().editing_index(), Some(0));
    }

    #[tokio::test]
    async fn test_session_restores_log_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("till.db");

        {
            let db = Database::new(DbConfig::new(&path)).await.unwrap();
            let mut session = session(&db, StubExporter::default()).await;
            session.submit_item("Tea", "2", "2.00");
            session.commit_transaction_at("first").await.unwrap();
            db.close().await;
        }

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let session = session(&db, StubExporter::default()).await;
        let log = session.state().committed_transactions();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].timestamp, "first");
        assert_eq!(log[0].total().cents(), 400);
    }

    #[tokio::test]
    async fn test_close_day_exports_then_clears() {
        let db = memory_db().await;
        let mut session = session(&db, StubExporter::default()).await;
        session.commit_transaction_at("a").await.unwrap();
        session.commit_transaction_at("b").await.unwrap();

        let docs = session.close_day().await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(session.exporter().reports.get(), 1);
        assert!(session.state().committed_transactions().is_empty());
        assert_eq!(db.kv().get(TRANSACTION_LOG_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_close_day_on_empty_log() {
        let db = memory_db().await;
        let mut session = session(&db, StubExporter::default()).await;

        // Nothing ever persisted.
        session.close_day().await.unwrap();
        assert!(session.state().committed_transactions().is_empty());
        assert_eq!(db.kv().get(TRANSACTION_LOG_KEY).await.unwrap(), None);

        // Persisted, closed, then closed again once empty.
        session.commit_transaction_at("a").await.unwrap();
        assert!(db.kv().get(TRANSACTION_LOG_KEY).await.unwrap().is_some());
        session.close_day().await.unwrap();
        session.close_day().await.unwrap();

        assert!(session.state().committed_transactions().is_empty());
        assert_eq!(db.kv().get(TRANSACTION_LOG_KEY).await.unwrap(), None);
        assert!(db.transaction_log().load().await.unwrap().is_empty());
        assert_eq!(session.exporter().reports.get(), 3);
    }

    #[tokio::test]
    async fn test_close_day_keeps_log_when_export_fails() {
        let db = memory_db().await;
        let mut session = session(&db, StubExporter::failing()).await;
        session.commit_transaction_at("a").await.unwrap();

        let err = session.close_day().await.unwrap_err();
        assert!(matches!(err, SessionError::Export(_)));
        assert_eq!(session.state().committed_transactions().len(), 1);
        assert!(db.kv().get(TRANSACTION_LOG_KEY).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_close_day_keeps_log_when_storage_fails() {
        let db = memory_db().await;
        let mut session = session(&db, StubExporter::default()).await;
        session.commit_transaction_at("a").await.unwrap();

        db.close().await;
        assert!(matches!(session.close_day().await, Err(SessionError::Db(_))));
        assert_eq!(session.state().committed_transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_export_single_format_keeps_log() {
        let db = memory_db().await;
        let mut session = session(&db, StubExporter::default()).await;
        session.commit_transaction_at("a").await.unwrap();

        session.export_report_as(ReportFormat::Pdf).unwrap();
        assert_eq!(session.exporter().reports.get(), 1);
        assert_eq!(session.state().committed_transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_print_ticket() {
        let db = memory_db().await;
        let mut session = session(&db, StubExporter::default()).await;
        session.commit_transaction_at("a").await.unwrap();

        session.print_ticket(0).unwrap();
        assert_eq!(session.exporter().tickets.get(), 1);

        assert!(matches!(
            session.print_ticket(1),
            Err(SessionError::TransactionNotFound { index: 1, len: 1 })
        ));
    }

    #[tokio::test]
    async fn test_edit_errors_are_surfaced() {
        let db = memory_db().await;
        let mut session = session(&db, StubExporter::default()).await;

        assert!(matches!(session.begin_edit(0), Err(SessionError::Core(_))));
        assert!(matches!(session.delete_item(0), Err(SessionError::Core(_))));
    }

    #[tokio::test]
    async fn test_with_file_exporter() {
        let dir = tempfile::tempdir().unwrap();
        let db = memory_db().await;
        let exporter = FileExporter::new(ExportSettings::new(dir.path()));
        let mut session = RegisterSession::open(&db, exporter, "%d/%m/%Y, %H:%M:%S")
            .await
            .unwrap();

        session.submit_item("Coffee", "2", "3.50");
        session.commit_transaction_at("16/10/2026, 09:30:00").await.unwrap();

        let ticket = session.print_ticket(0).unwrap();
        assert!(ticket.file_path.ends_with("ticket_16_10_2026__09_30_00.pdf"));

        let docs = session.close_day().await.unwrap();
        assert_eq!(docs.len(), 2);
        assert!(dir.path().join("reporte_transacciones.xlsx").exists());
    }
}
