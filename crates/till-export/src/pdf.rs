//! # PDF Layout
//!
//! Lays out the day report and single-sale tickets on A4 pages using the
//! PDF builtin fonts (no font files to ship).
//!
//! ## Report Layout
//! ```text
//! ┌────────────────────────────────────────────┐
//! │ Reporte de Transacciones                   │
//! │ <store name>                               │
//! │                                            │
//! │ Transacción 1                              │
//! │ Producto     Cantidad   Precio    Total    │
//! │ Coffee       2          $3.50     $7.00    │
//! │ Cake         1          $5.00     $5.00    │
//! │ Total: $12.00                              │
//! │ Fecha: 16/10/2026, 09:30:00                │
//! │                                            │
//! │ Transacción 2 ...        (new page on fill)│
//! └────────────────────────────────────────────┘
//! ```

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use till_core::{LineItem, Money, Transaction};

use crate::error::ExportResult;

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 15.0;
const LINE_HEIGHT: f32 = 6.0;

const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;

/// Left edge of each report table column, in mm.
const COLUMNS: [f32; 4] = [MARGIN, 95.0, 125.0, 160.0];

const REPORT_TITLE: &str = "Reporte de Transacciones";
const TICKET_TITLE: &str = "Ticket de Compra";
const TABLE_HEADERS: [&str; 4] = ["Producto", "Cantidad", "Precio", "Total"];

/// A rendered PDF.
#[derive(Debug, Clone)]
pub struct PdfOutput {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Text shared by every page a document prints.
#[derive(Debug, Clone, Copy)]
pub struct PdfStyle<'a> {
    pub store_name: &'a str,
    pub currency_symbol: &'a str,
}

impl PdfStyle<'_> {
    fn money(&self, amount: Money) -> String {
        amount.format_with_symbol(self.currency_symbol)
    }
}

// =============================================================================
// Report
// =============================================================================

/// Renders the whole log: one block per transaction, 1-based numbering.
pub fn render_report(transactions: &[Transaction], style: PdfStyle<'_>) -> ExportResult<PdfOutput> {
    let mut page = PageWriter::new(REPORT_TITLE)?;
    page.title(REPORT_TITLE, style.store_name);

    for (index, txn) in transactions.iter().enumerate() {
        // Heading, table header, rows, total, date, spacer.
        page.ensure_room(txn.items.len() + 5);

        page.text(&format!("Transacción {}", index + 1), HEADING_SIZE, true);
        page.row(&TABLE_HEADERS.map(String::from), true);

        for item in &txn.items {
            page.ensure_room(1);
            page.row(&item_cells(item, style), false);
        }

        page.ensure_room(2);
        page.text(&format!("Total: {}", style.money(txn.total())), BODY_SIZE, true);
        page.text(&format!("Fecha: {}", txn.timestamp), BODY_SIZE, false);
        page.skip(1);
    }

    page.finish()
}

fn item_cells(item: &LineItem, style: PdfStyle<'_>) -> [String; 4] {
    [
        item.name.clone(),
        item.quantity.normalize().to_string(),
        style.money(item.price()),
        style.money(item.line_total()),
    ]
}

// =============================================================================
// Ticket
// =============================================================================

/// Renders a receipt for one transaction.
pub fn render_ticket(transaction: &Transaction, style: PdfStyle<'_>) -> ExportResult<PdfOutput> {
    let mut page = PageWriter::new(TICKET_TITLE)?;
    page.title(TICKET_TITLE, style.store_name);

    for item in &transaction.items {
        page.ensure_room(5);
        page.text(&format!("Producto: {}", item.name), BODY_SIZE, true);
        page.text(
            &format!("Cantidad: {}", item.quantity.normalize()),
            BODY_SIZE,
            false,
        );
        page.text(&format!("Precio: {}", style.money(item.price())), BODY_SIZE, false);
        page.text(&format!("Total: {}", style.money(item.line_total())), BODY_SIZE, false);
        page.skip(1);
    }

    page.ensure_room(2);
    page.text(
        &format!("Total de la Transacción: {}", style.money(transaction.total())),
        HEADING_SIZE,
        true,
    );
    page.text(&format!("Fecha: {}", transaction.timestamp), BODY_SIZE, false);

    page.finish()
}

// =============================================================================
// Page Writer
// =============================================================================

/// A top-down text cursor that opens a new page when the current one fills.
struct PageWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
    page_count: usize,
}

impl PageWriter {
    fn new(title: &str) -> ExportResult<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        Ok(PageWriter {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT - MARGIN,
            page_count: 1,
        })
    }

    fn lines_left(&self) -> usize {
        ((self.y - MARGIN) / LINE_HEIGHT).max(0.0) as usize
    }

    /// Starts a new page unless `lines` more lines fit on this one.
    fn ensure_room(&mut self, lines: usize) {
        if self.lines_left() >= lines {
            return;
        }
        // A block taller than a page is split instead of looping forever.
        if self.y >= PAGE_HEIGHT - MARGIN {
            return;
        }
        self.page_count += 1;
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Layer {}", self.page_count),
        );
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn font(&self, bold: bool) -> &IndirectFontRef {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }

    fn title(&mut self, title: &str, subtitle: &str) {
        self.text(title, TITLE_SIZE, true);
        if !subtitle.is_empty() {
            self.text(subtitle, BODY_SIZE, false);
        }
        self.skip(1);
    }

    fn text(&mut self, text: &str, size: f32, bold: bool) {
        self.ensure_room(1);
        self.layer
            .use_text(text, size, Mm(MARGIN), Mm(self.y), self.font(bold));
        self.y -= LINE_HEIGHT;
    }

    fn row(&mut self, cells: &[String; 4], bold: bool) {
        self.ensure_room(1);
        for (cell, x) in cells.iter().zip(COLUMNS) {
            self.layer
                .use_text(cell.as_str(), BODY_SIZE, Mm(x), Mm(self.y), self.font(bold));
        }
        self.y -= LINE_HEIGHT;
    }

    fn skip(&mut self, lines: usize) {
        self.y -= LINE_HEIGHT * lines as f32;
    }

    fn finish(self) -> ExportResult<PdfOutput> {
        let page_count = self.page_count;
        let bytes = self.doc.save_to_bytes()?;
        Ok(PdfOutput { bytes, page_count })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
