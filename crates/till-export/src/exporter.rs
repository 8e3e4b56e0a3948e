//! # Document Exporter
//!
//! The contract the register session exports through, and the implementation
//! that writes files into a directory.
//!
//! ## Contract
//! ```text
//! export_report(&[Transaction])            → one document per configured format
//! export_report_as(&[Transaction], format) → one document in `format`
//! export_ticket(&Transaction)              → one PDF
//! ```
//! The session depends on the trait only, so tests can swap in an exporter
//! that records calls or fails on demand.

use std::fs;
use std::path::{Path, PathBuf};
use till_core::Transaction;
use tracing::{debug, info};

use crate::error::ExportResult;
use crate::format::{ExportedDocument, ReportFormat};
use crate::naming::{report_file_name, ticket_file_name};
use crate::pdf::{self, PdfStyle};
use crate::xlsx;

/// Renders transactions into documents.
pub trait DocumentExporter {
    /// Exports the whole log as a report, once per configured format.
    fn export_report(&self, transactions: &[Transaction]) -> ExportResult<Vec<ExportedDocument>>;

    /// Exports the whole log in one explicit format.
    fn export_report_as(
        &self,
        transactions: &[Transaction],
        format: ReportFormat,
    ) -> ExportResult<ExportedDocument>;

    /// Exports a single transaction as a ticket.
    fn export_ticket(&self, transaction: &Transaction) -> ExportResult<ExportedDocument>;
}

/// What the file exporter writes and where.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
    pub formats: Vec<ReportFormat>,
    pub store_name: String,
    pub currency_symbol: String,
}

impl ExportSettings {
    /// Both formats, default labels.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        ExportSettings {
            output_dir: output_dir.into(),
            formats: ReportFormat::ALL.to_vec(),
            store_name: "Punto de Venta".to_string(),
            currency_symbol: "$".to_string(),
        }
    }

    /// Restricts the report to the given formats.
    pub fn formats(mut self, formats: Vec<ReportFormat>) -> Self {
        self.formats = formats;
        self
    }
}

/// Writes documents into `output_dir`, overwriting files of the same name.
#[derive(Debug, Clone)]
pub struct FileExporter {
    settings: ExportSettings,
}

impl FileExporter {
    pub fn new(settings: ExportSettings) -> Self {
        FileExporter { settings }
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    fn style(&self) -> PdfStyle<'_> {
        PdfStyle {
            store_name: &self.settings.store_name,
            currency_symbol: &self.settings.currency_symbol,
        }
    }

    fn prepare_dir(&self) -> ExportResult<&Path> {
        fs::create_dir_all(&self.settings.output_dir)?;
        Ok(&self.settings.output_dir)
    }

    fn write_one(
        &self,
        format: ReportFormat,
        transactions: &[Transaction],
    ) -> ExportResult<ExportedDocument> {
        let path = self.prepare_dir()?.join(report_file_name(format));

        match format {
            ReportFormat::Pdf => {
                let output = pdf::render_report(transactions, self.style())?;
                fs::write(&path, &output.bytes)?;
                debug!(pages = output.page_count, "Report PDF rendered");
            }
            ReportFormat::Xlsx => {
                let rows = xlsx::write_report(&path, transactions)?;
                debug!(rows, "Report workbook written");
            }
        }

        finished(format, path)
    }
}

impl DocumentExporter for FileExporter {
    fn export_report(&self, transactions: &[Transaction]) -> ExportResult<Vec<ExportedDocument>> {
        let documents = self
            .settings
            .formats
            .iter()
            .map(|format| self.write_one(*format, transactions))
            .collect::<ExportResult<Vec<_>>>()?;

        info!(
            transactions = transactions.len(),
            files = documents.len(),
            "Report exported"
        );
        Ok(documents)
    }

    fn export_report_as(
        &self,
        transactions: &[Transaction],
        format: ReportFormat,
    ) -> ExportResult<ExportedDocument> {
        let document = self.write_one(format, transactions)?;
        info!(%format, transactions = transactions.len(), "Report exported");
        Ok(document)
    }

    fn export_ticket(&self, transaction: &Transaction) -> ExportResult<ExportedDocument> {
        let path = self
            .prepare_dir()?
            .join(ticket_file_name(&transaction.timestamp));

        let output = pdf::render_ticket(transaction, self.style())?;
        fs::write(&path, &output.bytes)?;

        let document = finished(ReportFormat::Pdf, path)?;
        info!(path = %document.file_path.display(), "Ticket exported");
        Ok(document)
    }
}

fn finished(format: ReportFormat, file_path: PathBuf) -> ExportResult<ExportedDocument> {
    let file_size_bytes = fs::metadata(&file_path)?.len();
    Ok(ExportedDocument {
        format,
        file_path,
        file_size_bytes,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use till_core::LineItem;

    fn sample() -> Transaction {
        Transaction::new(
            vec![
                LineItem::from_input("Coffee", "2", "3.50"),
                LineItem::from_input("Cake", "1", "5.00"),
            ],
            "16/10/2026, 09:30:00",
        )
    }

    #[test]
    fn test_report_writes_every_format() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(ExportSettings::new(dir.path()));

        let docs = exporter.export_report(&[sample()]).unwrap();
        assert_eq!(docs.len(), 2);

        assert_eq!(docs[0].format, ReportFormat::Pdf);
        assert_eq!(docs[0].file_path, dir.path().join("reporte_transacciones.pdf"));
        assert!(fs::read(&docs[0].file_path).unwrap().starts_with(b"%PDF"));

        assert_eq!(docs[1].format, ReportFormat::Xlsx);
        assert_eq!(docs[1].file_path, dir.path().join("reporte_transacciones.xlsx"));
        assert!(fs::read(&docs[1].file_path).unwrap().starts_with(b"PK"));

        for doc in &docs {
            assert_eq!(doc.file_size_bytes, fs::metadata(&doc.file_path).unwrap().len());
            assert!(doc.file_size_bytes > 0);
        }
    }

    #[test]
    fn test_report_respects_configured_formats() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ExportSettings::new(dir.path()).formats(vec![ReportFormat::Xlsx]);
        let docs = FileExporter::new(settings).export_report(&[]).unwrap();

        assert_eq!(docs.len(), 1);
        assert!(!dir.path().join("reporte_transacciones.pdf").exists());
    }

    #[test]
    fn test_report_in_single_format() {
        let dir = tempfile::tempdir().unwrap();
        let settings = ExportSettings::new(dir.path()).formats(vec![ReportFormat::Pdf]);
        let exporter = FileExporter::new(settings);

        let doc = exporter
            .export_report_as(&[sample()], ReportFormat::Xlsx)
            .unwrap();
        assert_eq!(doc.file_path, dir.path().join("reporte_transacciones.xlsx"));
        assert!(!dir.path().join("reporte_transacciones.pdf").exists());
    }

    #[test]
    fn test_creates_missing_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("today");
        let exporter = FileExporter::new(ExportSettings::new(&nested));

        let doc = exporter.export_ticket(&sample()).unwrap();
        assert!(doc.file_path.starts_with(&nested));
    }

    #[test]
    fn test_ticket_name_and_format() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = FileExporter::new(ExportSettings::new(dir.path()));

        let doc = exporter.export_ticket(&sample()).unwrap();
        assert_eq!(doc.format, ReportFormat::Pdf);
        assert_eq!(
            doc.file_path,
            dir.path().join("ticket_16_10_2026__09_30_00.pdf")
        );
        assert!(fs::read(&doc.file_path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_unwritable_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, b"x").unwrap();

        let exporter = FileExporter::new(ExportSettings::new(blocker.join("sub")));
        assert!(exporter.export_ticket(&sample()).is_err());
    }
}
