//! # Spreadsheet Layout
//!
//! One sheet, one row per line item, flattened across transactions:
//!
//! ```text
//! Sheet "Transacciones"
//! ┌──────────┬──────────┬────────┬───────┬──────────────────────┐
//! │ Producto │ Cantidad │ Precio │ Total │ Fecha                │
//! ├──────────┼──────────┼────────┼───────┼──────────────────────┤
//! │ Coffee   │ 2        │ 3.5    │ 7     │ 16/10/2026, 09:30:00 │
//! │ Cake     │ 1        │ 5      │ 5     │ 16/10/2026, 09:30:00 │
//! │ Tea      │ 2        │ 2      │ 4     │ 16/10/2026, 09:45:12 │
//! └──────────┴──────────┴────────┴───────┴──────────────────────┘
//! ```
//!
//! Numbers are written as numeric cells so the sheet can sum them.

use rust_decimal::prelude::ToPrimitive;
use std::path::Path;
use till_core::Transaction;
use xlsxwriter::{Format, Workbook};

use crate::error::{ExportError, ExportResult};

/// Name of the only worksheet.
pub const SHEET_NAME: &str = "Transacciones";

const HEADERS: [&str; 5] = ["Producto", "Cantidad", "Precio", "Total", "Fecha"];

/// Writes the report workbook to `path`. Returns the number of item rows.
pub fn write_report(path: &Path, transactions: &[Transaction]) -> ExportResult<u32> {
    let path_str = path
        .to_str()
        .ok_or_else(|| ExportError::InvalidPath(path.to_path_buf()))?;

    let workbook = Workbook::new(path_str)?;
    let rows = {
        let mut sheet = workbook.add_worksheet(Some(SHEET_NAME))?;

        let mut header_format = Format::new();
        header_format.set_bold();

        for (col, header) in (0u16..).zip(HEADERS) {
            sheet.write_string(0, col, header, Some(&header_format))?;
        }

        let mut row: u32 = 0;
        for txn in transactions {
            for item in &txn.items {
                row += 1;
                sheet.write_string(row, 0, &item.name, None)?;
                sheet.write_number(row, 1, item.quantity.to_f64().unwrap_or(0.0), None)?;
                sheet.write_number(row, 2, item.unit_price.to_f64().unwrap_or(0.0), None)?;
                sheet.write_number(row, 3, item.line_total().to_f64(), None)?;
                sheet.write_string(row, 4, &txn.timestamp, None)?;
            }
        }
        row
    };
    workbook.close()?;

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use till_core::LineItem;

    #[test]
    fn test_writes_one_row_per_item() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.xlsx");
        let log = vec![
            Transaction::new(
                vec![
                    LineItem::from_input("Coffee", "2", "3.50"),
                    LineItem::from_input("Cake", "1", "5.00"),
                ],
                "16/10/2026, 09:30:00",
            ),
            Transaction::new(vec![LineItem::from_input("Tea", "2", "2.00")], "16/10/2026, 09:45:12"),
        ];

        let rows = write_report(&path, &log).unwrap();
        assert_eq!(rows, 3);

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_empty_log_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        assert_eq!(write_report(&path, &[]).unwrap(), 0);
        assert!(path.exists());
    }
}
