//! # Terminal Screen
//!
//! The single register screen, driven by one command per input line.
//!
//! ## Loop
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   stdin line ──► parse_action ──► Screen::handle ──► Reply ──► stdout   │
//! │                       │                 │                               │
//! │                       │                 └── commands::* (session)       │
//! │                       │                                                 │
//! │                       └── bad input ──► "Error: ..." (loop continues)   │
//! │                                                                         │
//! │   "close" ──► confirmation prompt ──► "si" ──► close_day                │
//! │                                  └──► anything else ──► cancelled       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Positions typed by the operator are the 1-based numbers shown on screen.

use std::fmt;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info};

use till_export::{DocumentExporter, ReportFormat};

use crate::commands::register::{self, FormField, RegisterView};
use crate::commands::transaction::{self, DocumentView, TransactionView};
use crate::error::ApiError;
use crate::state::{ConfigState, RegisterSession};

const PROMPT: &str = "> ";

const HELP: &str = "\
Comandos:
  add <nombre>; <cantidad>; <precio>   Agregar producto (o guardar la edición)
  name <texto> | qty <texto> | price <texto>
                                        Escribir en el formulario
  submit                                Agregar lo escrito en el formulario
  edit <n>                              Editar el producto n
  cancel                                Cancelar la edición
  delete <n>                            Eliminar el producto n
  save                                  Guardar la transacción
  pdf | excel                           Exportar el reporte en un formato
  report                                Exportar el reporte en todos los formatos
  ticket <n>                            Imprimir ticket de la transacción n
  close                                 Cerrar el día
  show                                  Mostrar la pantalla
  help                                  Mostrar esta ayuda
  quit                                  Salir
";

// =============================================================================
// Actions
// =============================================================================

/// One parsed operator command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Add {
        name: String,
        quantity: String,
        price: String,
    },
    SetField(FormField, String),
    Submit,
    Edit(usize),
    Cancel,
    Delete(usize),
    Save,
    ExportAs(ReportFormat),
    Report,
    Ticket(usize),
    Close,
    Show,
    Help,
    Quit,
}

/// Parses one input line.
///
/// Command words are case-insensitive. Missing `add` fields are left empty
/// and coerce like an empty form field.
pub fn parse_action(line: &str) -> Result<Action, ApiError> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let action = match word.to_lowercase().as_str() {
        "" | "show" => Action::Show,
        "add" => {
            let mut parts = rest.splitn(3, ';').map(str::trim);
            Action::Add {
                name: parts.next().unwrap_or_default().to_string(),
                quantity: parts.next().unwrap_or_default().to_string(),
                price: parts.next().unwrap_or_default().to_string(),
            }
        }
        "name" => Action::SetField(FormField::Name, rest.to_string()),
        "qty" => Action::SetField(FormField::Quantity, rest.to_string()),
        "price" => Action::SetField(FormField::Price, rest.to_string()),
        "submit" => Action::Submit,
        "edit" => Action::Edit(parse_position(rest)?),
        "cancel" => Action::Cancel,
        "delete" => Action::Delete(parse_position(rest)?),
        "save" => Action::Save,
        "pdf" => Action::ExportAs(ReportFormat::Pdf),
        "excel" | "xlsx" => Action::ExportAs(ReportFormat::Xlsx),
        "report" => Action::Report,
        "ticket" => Action::Ticket(parse_position(rest)?),
        "close" => Action::Close,
        "help" | "?" => Action::Help,
        "quit" | "exit" => Action::Quit,
        other => {
            return Err(ApiError::validation(format!(
                "Comando desconocido: {} (escriba 'help')",
                other
            )))
        }
    };
    Ok(action)
}

fn parse_position(text: &str) -> Result<usize, ApiError> {
    text.parse()
        .map_err(|_| ApiError::validation(format!("Se esperaba un número: '{}'", text)))
}

fn is_confirmation(line: &str) -> bool {
    matches!(line.trim().to_lowercase().as_str(), "si" | "sí")
}

// =============================================================================
// Rendering
// =============================================================================

/// Everything the screen shows.
pub struct ScreenView<'a> {
    pub store_name: &'a str,
    pub register: RegisterView,
    pub transactions: Vec<TransactionView>,
}

impl fmt::Display for ScreenView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "==================== {} ====================", self.store_name)?;

        writeln!(f, "Productos en la Transacción Actual")?;
        if self.register.items.is_empty() {
            writeln!(f, "  No hay productos agregados.")?;
        }
        for item in &self.register.items {
            let marker = if item.editing { "  [editando]" } else { "" };
            writeln!(
                f,
                "  {}. {}  x{}  @ {}  = {}{}",
                item.position, item.name, item.quantity, item.unit_price, item.line_total, marker
            )?;
        }
        writeln!(f, "  Total: {}", self.register.total)?;

        let form = &self.register.form;
        match self.register.editing {
            Some(position) => writeln!(f, "Editando producto {}", position)?,
            None => writeln!(f, "Nuevo producto")?,
        }
        writeln!(
            f,
            "  Producto: \"{}\"  Cantidad: \"{}\"  Precio: \"{}\"",
            form.name, form.quantity, form.price
        )?;

        writeln!(f, "Transacciones Registradas")?;
        if self.transactions.is_empty() {
            writeln!(f, "  No hay transacciones registradas.")?;
        }
        for transaction in &self.transactions {
            writeln!(
                f,
                "  Transacción {}  ({})  Total: {}",
                transaction.number, transaction.timestamp, transaction.total
            )?;
            for item in &transaction.items {
                writeln!(
                    f,
                    "     - {}  x{}  @ {}  = {}",
                    item.name, item.quantity, item.unit_price, item.line_total
                )?;
            }
        }
        Ok(())
    }
}

fn describe_documents(documents: &[DocumentView]) -> String {
    documents
        .iter()
        .map(|doc| format!("Archivo generado: {} ({} bytes)\n", doc.path, doc.size_bytes))
        .collect()
}

// =============================================================================
// Screen
// =============================================================================

/// Output of one handled line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub output: String,
    pub quit: bool,
}

impl Reply {
    fn text(output: impl Into<String>) -> Self {
        Reply {
            output: output.into(),
            quit: false,
        }
    }

    fn error(err: &ApiError) -> Self {
        Reply::text(format!("Error: {}\n", err.message))
    }
}

/// The register screen: owns the session for its whole lifetime.
pub struct Screen<E: DocumentExporter> {
    session: RegisterSession<E>,
    config: ConfigState,
    awaiting_close_confirmation: bool,
}

impl<E: DocumentExporter> Screen<E> {
    pub fn new(session: RegisterSession<E>, config: ConfigState) -> Self {
        Screen {
            session,
            config,
            awaiting_close_confirmation: false,
        }
    }

    pub fn session(&self) -> &RegisterSession<E> {
        &self.session
    }

    /// Renders the whole screen.
    pub fn render(&self) -> String {
        ScreenView {
            store_name: &self.config.store_name,
            register: register::get_register(&self.session, &self.config),
            transactions: transaction::list_transactions(&self.session, &self.config),
        }
        .to_string()
    }

    /// Handles one input line.
    pub async fn handle(&mut self, line: &str) -> Reply {
        if self.awaiting_close_confirmation {
            self.awaiting_close_confirmation = false;
            if !is_confirmation(line) {
                return Reply::text("Cierre cancelado.\n");
            }
            return match transaction::close_day(&mut self.session).await {
                Ok(closed) => Reply::text(format!(
                    "{}Día cerrado: {} transacciones.\n{}",
                    describe_documents(&closed.documents),
                    closed.closed_transactions,
                    self.render()
                )),
                Err(err) => Reply::error(&err),
            };
        }

        let action = match parse_action(line) {
            Ok(action) => action,
            Err(err) => return Reply::error(&err),
        };
        debug!(?action, "Screen action");

        match self.apply(action).await {
            Ok(reply) => reply,
            Err(err) => Reply::error(&err),
        }
    }

    async fn apply(&mut self, action: Action) -> Result<Reply, ApiError> {
        let session = &mut self.session;
        let config = &self.config;

        let message = match action {
            Action::Add {
                name,
                quantity,
                price,
            } => {
                register::submit_item(session, config, &name, &quantity, &price);
                String::new()
            }
            Action::SetField(field, value) => {
                register::set_form_field(session, config, field, &value);
                String::new()
            }
            Action::Submit => {
                register::submit_form(session, config);
                String::new()
            }
            Action::Edit(position) => {
                register::begin_edit(session, config, position)?;
                String::new()
            }
            Action::Cancel => {
                register::cancel_edit(session, config);
                String::new()
            }
            Action::Delete(position) => {
                register::delete_item(session, config, position)?;
                String::new()
            }
            Action::Save => {
                let committed = transaction::commit_transaction(session, config).await?;
                format!(
                    "Transacción {} guardada. Total: {}\n",
                    committed.number, committed.total
                )
            }
            Action::ExportAs(format) => {
                let doc = transaction::export_report_as(session, format)?;
                return Ok(Reply::text(describe_documents(&[doc])));
            }
            Action::Report => {
                let docs = transaction::export_report(session)?;
                return Ok(Reply::text(describe_documents(&docs)));
            }
            Action::Ticket(number) => {
                let doc = transaction::print_ticket(session, number)?;
                return Ok(Reply::text(describe_documents(&[doc])));
            }
            Action::Close => {
                self.awaiting_close_confirmation = true;
                return Ok(Reply::text(
                    "¿Cerrar el día? Se exportará el reporte y se borrarán las transacciones. \
                     Escriba 'si' para confirmar.\n",
                ));
            }
            Action::Show => String::new(),
            Action::Help => return Ok(Reply::text(HELP)),
            Action::Quit => {
                return Ok(Reply {
                    output: String::new(),
                    quit: true,
                })
            }
        };

        Ok(Reply::text(format!("{}{}", message, self.render())))
    }

    /// Runs the screen until `quit` or end of input.
    pub async fn run<R, W>(&mut self, reader: R, mut writer: W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!("Register screen started");
        writer.write_all(self.render().as_bytes()).await?;

        let mut lines = reader.lines();
        loop {
            writer.write_all(PROMPT.as_bytes()).await?;
            writer.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };
            let reply = self.handle(&line).await;
            writer.write_all(reply.output.as_bytes()).await?;
            if reply.quit {
                break;
            }
        }

        writer.flush().await?;
        info!("Register screen stopped");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use till_db::{Database, DbConfig};
    use till_export::{ExportSettings, FileExporter};

    async fn screen(dir: &std::path::Path) -> (Database, Screen<FileExporter>) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let exporter = FileExporter::new(ExportSettings::new(dir));
        let session = RegisterSession::open(&db, exporter, "%d/%m/%Y")
            .await
            .unwrap();
        (db, Screen::new(session, ConfigState::default()))
    }

    #[test]
    fn test_parse_add() {
        assert_eq!(
            parse_action("add Coffee; 2; 3.50").unwrap(),
            Action::Add {
                name: "Coffee".into(),
                quantity: "2".into(),
                price: "3.50".into()
            }
        );
        assert_eq!(
            parse_action("ADD Tea").unwrap(),
            Action::Add {
                name: "Tea".into(),
                quantity: String::new(),
                price: String::new()
            }
        );
    }

    #[test]
    fn test_parse_positions_and_fields() {
        assert_eq!(parse_action("edit 2").unwrap(), Action::Edit(2));
        assert_eq!(parse_action(" delete   1 ").unwrap(), Action::Delete(1));
        assert_eq!(parse_action("ticket 3").unwrap(), Action::Ticket(3));
        assert_eq!(
            parse_action("name Café con leche").unwrap(),
            Action::SetField(FormField::Name, "Café con leche".into())
        );
        assert!(parse_action("edit two").is_err());
        assert!(parse_action("delete").is_err());
    }

    #[test]
    fn test_parse_misc() {
        assert_eq!(parse_action("").unwrap(), Action::Show);
        assert_eq!(parse_action("excel").unwrap(), Action::ExportAs(ReportFormat::Xlsx));
        assert_eq!(parse_action("pdf").unwrap(), Action::ExportAs(ReportFormat::Pdf));
        assert_eq!(parse_action("quit").unwrap(), Action::Quit);
        assert!(parse_action("dance").is_err());
    }

    #[tokio::test]
    async fn test_empty_screen_messages() {
        let dir = tempfile::tempdir().unwrap();
        let (_db, screen) = screen(dir.path()).await;
        let text = screen.render();
        assert!(text.contains("Punto de Venta"));
        assert!(text.contains("No hay productos agregados."));
        assert!(text.contains("No hay transacciones registradas."));
    }

    #[tokio::test]
    async fn test_add_edit_save() {
        let dir = tempfile::tempdir().unwrap();
        let (_db, mut screen) = screen(dir.path()).await;

        let reply = screen.handle("add Coffee; 2; 3.50").await;
        assert!(reply.output.contains("1. Coffee  x2  @ $3.50  = $7.00"));

        let reply = screen.handle("edit 1").await;
        assert!(reply.output.contains("Editando producto 1"));
        assert!(reply.output.contains("[editando]"));

        screen.handle("qty 3").await;
        let reply = screen.handle("submit").await;
        assert!(reply.output.contains("= $10.50"));

        let reply = screen.handle("save").await;
        assert!(reply.output.contains("Transacción 1 guardada. Total: $10.50"));
        assert!(reply.output.contains("No hay productos agregados."));
        assert_eq!(screen.session().state().committed_transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_errors_keep_running() {
        let dir = tempfile::tempdir().unwrap();
        let (_db, mut screen) = screen(dir.path()).await;

        let reply = screen.handle("delete 4").await;
        assert!(reply.output.starts_with("Error: "));
        assert!(!reply.quit);

        let reply = screen.handle("ticket 1").await;
        assert_eq!(reply.output, "Error: Transaction not found: 1\n");
    }

    #[tokio::test]
    async fn test_close_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let (_db, mut screen) = screen(dir.path()).await;
        screen.handle("add Tea; 1; 2").await;
        screen.handle("save").await;

        screen.handle("close").await;
        let reply = screen.handle("no").await;
        assert_eq!(reply.output, "Cierre cancelado.\n");
        assert_eq!(screen.session().state().committed_transactions().len(), 1);

        screen.handle("close").await;
        let reply = screen.handle("si").await;
        assert!(reply.output.contains("Día cerrado: 1 transacciones."));
        assert!(screen.session().state().committed_transactions().is_empty());
        assert!(dir.path().join("reporte_transacciones.pdf").exists());
        assert!(dir.path().join("reporte_transacciones.xlsx").exists());
    }

    #[tokio::test]
    async fn test_run_until_quit() {
        let dir = tempfile::tempdir().unwrap();
        let (_db, mut screen) = screen(dir.path()).await;

        let input = b"add Coffee; 2; 3.50\nadd Cake; 1; 5\nsave\nquit\nadd Ignored; 1; 1\n";
        let mut output = Vec::new();
        screen.run(&input[..], &mut output).await.unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Transacción 1 guardada. Total: $12.00"));
        assert_eq!(screen.session().state().committed_transactions().len(), 1);
        assert!(screen.session().state().in_progress_items().is_empty());
    }

    #[tokio::test]
    async fn test_run_stops_at_end_of_input() {
        let dir = tempfile::tempdir().unwrap();
        let (_db, mut screen) = screen(dir.path()).await;

        let mut output = Vec::new();
        screen.run(&b"add Tea; 1; 2"[..], &mut output).await.unwrap();
        assert_eq!(screen.session().state().in_progress_items().len(), 1);
    }
}
