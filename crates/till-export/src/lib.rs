//! # till-export: Document Exporter for Till
//!
//! Turns committed transactions into files an operator can print or open in
//! a spreadsheet. Rendering is delegated to `printpdf` and `xlsxwriter`; this
//! crate decides what goes on the page and where the file lands.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  RegisterSession (apps/till)                                           │
//! │       │  export_report(&log) / export_ticket(&txn)                     │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  till-export (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   DocumentExporter (trait)                                      │   │
//! │  │        │                                                        │   │
//! │  │        └── FileExporter ──► pdf::render_report / render_ticket  │   │
//! │  │                        └──► xlsx::write_report                  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  <export_dir>/reporte_transacciones.{pdf,xlsx}, ticket_<...>.pdf       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`exporter`] - The `DocumentExporter` contract and the file-backed exporter
//! - [`format`] - Report formats and the exported-document record
//! - [`naming`] - Output file names
//! - [`pdf`] - PDF layout
//! - [`xlsx`] - Spreadsheet layout
//! - [`error`] - Export error types

pub mod error;
pub mod exporter;
pub mod format;
pub mod naming;
pub mod pdf;
pub mod xlsx;

pub use error::{ExportError, ExportResult};
pub use exporter::{DocumentExporter, ExportSettings, FileExporter};
pub use format::{ExportedDocument, ReportFormat};
