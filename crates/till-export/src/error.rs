//! # Export Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Document export errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Creating the output directory or writing a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The PDF library rejected the document.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// The spreadsheet library rejected the workbook.
    #[error("XLSX error: {0}")]
    Xlsx(String),

    /// The output path cannot be handed to the spreadsheet library.
    ///
    /// ## When This Occurs
    /// The export directory contains bytes that are not valid UTF-8.
    #[error("Invalid output path: {}", .0.display())]
    InvalidPath(PathBuf),

    /// A report format name was not recognized.
    #[error("Unsupported report format: '{0}' (expected pdf or xlsx)")]
    UnsupportedFormat(String),
}

impl From<printpdf::Error> for ExportError {
    fn from(err: printpdf::Error) -> Self {
        ExportError::Pdf(err.to_string())
    }
}

impl From<xlsxwriter::XlsxError> for ExportError {
    fn from(err: xlsxwriter::XlsxError) -> Self {
        ExportError::Xlsx(err.to_string())
    }
}

/// Result type for export operations.
pub type ExportResult<T> = Result<T, ExportError>;
