//! # Output File Names
//!
//! ```text
//! report  → reporte_transacciones.pdf / reporte_transacciones.xlsx
//! ticket  → "16/10/2026, 09:30:00" → ticket_16_10_2026__09_30_00.pdf
//! ```

use crate::format::ReportFormat;

/// Base name shared by every report file.
pub const REPORT_BASENAME: &str = "reporte_transacciones";

/// File name of the day report in `format`.
pub fn report_file_name(format: ReportFormat) -> String {
    format!("{}.{}", REPORT_BASENAME, format.extension())
}

/// File name of the ticket for a transaction committed at `timestamp`.
pub fn ticket_file_name(timestamp: &str) -> String {
    format!("ticket_{}.pdf", sanitize(timestamp))
}

/// Replaces anything outside `[A-Za-z0-9.-]` with `_`.
fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
