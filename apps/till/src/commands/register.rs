//! # Register Commands
//!
//! Commands for the entry form and the in-progress items.
//!
//! ## Item Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  set_form_field ──► submit_form ──► item appended                      │
//! │                                                                         │
//! │  begin_edit(n) ──► form filled ──► submit_form ──► item n replaced     │
//! │                         │                                               │
//! │                         └── cancel_edit ──► form cleared               │
//! │                                                                         │
//! │  delete_item(n) ──► item n removed                                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use till_core::{EntryForm, LineItem, RegisterState};
use till_export::DocumentExporter;

use super::position_to_index;
use crate::error::ApiError;
use crate::state::{ConfigState, RegisterSession};

/// An item row as shown on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemView {
    /// 1-based position.
    pub position: usize,
    pub name: String,
    pub quantity: String,
    pub unit_price: String,
    pub line_total: String,
    /// Whether this item is loaded in the form.
    pub editing: bool,
}

impl LineItemView {
    pub fn new(index: usize, item: &LineItem, config: &ConfigState, editing: bool) -> Self {
        LineItemView {
            position: index + 1,
            name: item.name.clone(),
            quantity: item.quantity.normalize().to_string(),
            unit_price: config.format_currency(item.price()),
            line_total: config.format_currency(item.line_total()),
            editing,
        }
    }
}

/// The in-progress part of the screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterView {
    pub items: Vec<LineItemView>,
    pub total: String,
    /// 1-based position of the item being edited.
    pub editing: Option<usize>,
    pub form: EntryForm,
}

impl RegisterView {
    pub fn new(state: &RegisterState, config: &ConfigState) -> Self {
        let editing = state.editing_index();
        RegisterView {
            items: state
                .in_progress_items()
                .iter()
                .enumerate()
                .map(|(i, item)| LineItemView::new(i, item, config, editing == Some(i)))
                .collect(),
            total: config.format_currency(state.in_progress_total()),
            editing: editing.map(|i| i + 1),
            form: state.form().clone(),
        }
    }
}

/// Which entry field to type into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Quantity,
    Price,
}

/// Gets the current in-progress view.
pub fn get_register<E: DocumentExporter>(
    session: &RegisterSession<E>,
    config: &ConfigState,
) -> RegisterView {
    RegisterView::new(session.state(), config)
}

/// Replaces the text of one entry field.
pub fn set_form_field<E: DocumentExporter>(
    session: &mut RegisterSession<E>,
    config: &ConfigState,
    field: FormField,
    value: &str,
) -> RegisterView {
    debug!(?field, "set_form_field command");
    let form = session.form_mut();
    let slot = match field {
        FormField::Name => &mut form.name,
        FormField::Quantity => &mut form.quantity,
        FormField::Price => &mut form.price,
    };
    *slot = value.to_string();
    get_register(session, config)
}

/// Adds (or, while editing, replaces) an item in one step.
pub fn submit_item<E: DocumentExporter>(
    session: &mut RegisterSession<E>,
    config: &ConfigState,
    name: &str,
    quantity: &str,
    price: &str,
) -> RegisterView {
    let outcome = session.submit_item(name, quantity, price);
    debug!(?outcome, "submit_item command");
    get_register(session, config)
}

/// Submits whatever is typed in the form.
pub fn submit_form<E: DocumentExporter>(
    session: &mut RegisterSession<E>,
    config: &ConfigState,
) -> RegisterView {
    let outcome = session.submit_form();
    debug!(?outcome, "submit_form command");
    get_register(session, config)
}

/// Loads the item at `position` into the form.
pub fn begin_edit<E: DocumentExporter>(
    session: &mut RegisterSession<E>,
    config: &ConfigState,
    position: usize,
) -> Result<RegisterView, ApiError> {
    debug!(position, "begin_edit command");
    session.begin_edit(position_to_index(position)?)?;
    Ok(get_register(session, config))
}

/// Abandons the current edit.
pub fn cancel_edit<E: DocumentExporter>(
    session: &mut RegisterSession<E>,
    config: &ConfigState,
) -> RegisterView {
    debug!("cancel_edit command");
    session.cancel_edit();
    get_register(session, config)
}

/// Removes the item at `position`.
pub fn delete_item<E: DocumentExporter>(
    session: &mut RegisterSession<E>,
    config: &ConfigState,
    position: usize,
) -> Result<RegisterView, ApiError> {
    debug!(position, "delete_item command");
    session.delete_item(position_to_index(position)?)?;
    Ok(get_register(session, config))
}
