//! # Transaction Commands
//!
//! Committing the in-progress items and producing documents from the log.
//!
//! ## Commands
//! ```text
//! commit_transaction  → TransactionView   (log += 1, mirrored)
//! list_transactions   → Vec<TransactionView>
//! export_report       → Vec<DocumentView> (configured formats)
//! export_report_as    → DocumentView      (one format)
//! print_ticket(n)     → DocumentView
//! close_day           → CloseDayResponse  (report, then log emptied)
//! ```

use serde::Serialize;
use tracing::debug;

use till_core::Transaction;
use till_export::{DocumentExporter, ExportedDocument, ReportFormat};

use super::position_to_index;
use super::register::LineItemView;
use crate::error::ApiError;
use crate::state::{ConfigState, RegisterSession};

// =============================================================================
// Views
// =============================================================================

/// A committed transaction as shown on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionView {
    /// 1-based position in the log.
    pub number: usize,
    pub items: Vec<LineItemView>,
    pub total: String,
    pub timestamp: String,
}

impl TransactionView {
    pub fn new(index: usize, transaction: &Transaction, config: &ConfigState) -> Self {
        TransactionView {
            number: index + 1,
            items: transaction
                .items
                .iter()
                .enumerate()
                .map(|(i, item)| LineItemView::new(i, item, config, false))
                .collect(),
            total: config.format_currency(transaction.total()),
            timestamp: transaction.timestamp.clone(),
        }
    }
}

/// A written file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentView {
    pub format: ReportFormat,
    pub path: String,
    pub size_bytes: u64,
}

impl From<ExportedDocument> for DocumentView {
    fn from(doc: ExportedDocument) -> Self {
        DocumentView {
            format: doc.format,
            path: doc.file_path.display().to_string(),
            size_bytes: doc.file_size_bytes,
        }
    }
}

/// Result of closing the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CloseDayResponse {
    pub documents: Vec<DocumentView>,
    pub closed_transactions: usize,
}

// =============================================================================
// Commands
// =============================================================================

/// Commits the in-progress items, stamped with the current time.
pub async fn commit_transaction<E: DocumentExporter>(
    session: &mut RegisterSession<E>,
    config: &ConfigState,
) -> Result<TransactionView, ApiError> {
    debug!("commit_transaction command");
    let committed = session.commit_transaction().await?;
    let index = session.state().committed_transactions().len().saturating_sub(1);
    Ok(TransactionView::new(index, &committed, config))
}

/// Lists the committed log, oldest first.
pub fn list_transactions<E: DocumentExporter>(
    session: &RegisterSession<E>,
    config: &ConfigState,
) -> Vec<TransactionView> {
    session
        .state()
        .committed_transactions()
        .iter()
        .enumerate()
        .map(|(i, t)| TransactionView::new(i, t, config))
        .collect()
}

/// Writes the report in every configured format.
pub fn export_report<E: DocumentExporter>(
    session: &RegisterSession<E>,
) -> Result<Vec<DocumentView>, ApiError> {
    debug!("export_report command");
    let documents = session.export_report()?;
    Ok(documents.into_iter().map(DocumentView::from).collect())
}

/// Writes the report in one format.
pub fn export_report_as<E: DocumentExporter>(
    session: &RegisterSession<E>,
    format: ReportFormat,
) -> Result<DocumentView, ApiError> {
    debug!(%format, "export_report_as command");
    Ok(session.export_report_as(format)?.into())
}

/// Writes a ticket for transaction `number` (1-based).
pub fn print_ticket<E: DocumentExporter>(
    session: &RegisterSession<E>,
    number: usize,
) -> Result<DocumentView, ApiError> {
    debug!(number, "print_ticket command");
    Ok(session.print_ticket(position_to_index(number)?)?.into())
}

/// Writes the report and empties the log.
pub async fn close_day<E: DocumentExporter>(
    session: &mut RegisterSession<E>,
) -> Result<CloseDayResponse, ApiError> {
    debug!("close_day command");
    let closed_transactions = session.state().committed_transactions().len();
    let documents = session.close_day().await?;
    Ok(CloseDayResponse {
        documents: documents.into_iter().map(DocumentView::from).collect(),
        closed_transactions,
    })
}
