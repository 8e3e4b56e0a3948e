//! # Register State
//!
//! The register state manager: everything the screen shows, as plain data.
//!
//! ## State Diagram
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────┐  submit_item   ┌──────────┐  begin_edit(i)  ┌─────────┐ │
//! │   │  Empty   │ ─────────────► │ Ringing  │ ──────────────► │ Editing │ │
//! │   │  form    │                │   up     │ ◄────────────── │ item i  │ │
//! │   └──────────┘                └────┬─────┘  submit_item /  └─────────┘ │
//! │        ▲                           │        cancel_edit /              │
//! │        │                           │        delete_item(i)             │
//! │        │     commit_transaction    │                                   │
//! │        └───────────────────────────┘                                   │
//! │                                                                         │
//! │   committed_transactions: append-only, cleared only by close-day       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - `editing_index`, when set, is a valid index into `in_progress_items`.
//! - `committed_transactions` only grows, except for [`RegisterState::clear_log`].
//!
//! The state knows nothing about storage, clocks, or documents. The app
//! layer stamps commits with the current time and mirrors the log.

use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{EntryForm, LineItem, Transaction};
use crate::validation::validate_line_item;

// =============================================================================
// Submit Outcome
// =============================================================================

/// What a submit did to the in-progress list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new item was appended at `index`.
    Added { index: usize },

    /// The item at `index` was replaced (an edit was completed).
    Replaced { index: usize },
}

impl SubmitOutcome {
    /// Index of the item that was written.
    pub fn index(&self) -> usize {
        match self {
            SubmitOutcome::Added { index } | SubmitOutcome::Replaced { index } => *index,
        }
    }
}

// =============================================================================
// Register State
// =============================================================================

/// One register session's state.
///
/// Owned by whoever drives the screen; never global.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterState {
    in_progress: Vec<LineItem>,
    committed: Vec<Transaction>,
    editing_index: Option<usize>,
    form: EntryForm,
}

impl RegisterState {
    /// Creates an empty register.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a register whose committed log was rehydrated from storage.
    pub fn with_log(committed: Vec<Transaction>) -> Self {
        RegisterState {
            committed,
            ..Self::default()
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// Items of the transaction being rung up.
    pub fn in_progress_items(&self) -> &[LineItem] {
        &self.in_progress
    }

    /// The committed transaction log, oldest first.
    pub fn committed_transactions(&self) -> &[Transaction] {
        &self.committed
    }

    /// Index of the item being edited, if any.
    pub fn editing_index(&self) -> Option<usize> {
        self.editing_index
    }

    /// Whether an edit is in progress.
    pub fn is_editing(&self) -> bool {
        self.editing_index.is_some()
    }

    /// Current entry form text.
    pub fn form(&self) -> &EntryForm {
        &self.form
    }

    /// Mutable access to the entry form (the screen types into it).
    pub fn form_mut(&mut self) -> &mut EntryForm {
        &mut self.form
    }

    /// Replaces the entry form text.
    pub fn set_form(&mut self, form: EntryForm) {
        self.form = form;
    }

    /// Running total of the in-progress items.
    pub fn in_progress_total(&self) -> Money {
        self.in_progress.iter().map(LineItem::line_total).sum()
    }

    // -------------------------------------------------------------------------
    // Line-Item Editor
    // -------------------------------------------------------------------------

    /// Records an item from raw text.
    ///
    /// Appends when no edit is in progress; otherwise replaces the edited
    /// item and ends the edit. The form is always cleared. Nothing is ever
    /// rejected: non-numeric text becomes zero and suspicious values only
    /// produce a warning.
    ///
    /// ## Example
    /// ```rust
    /// use till_core::{RegisterState, SubmitOutcome};
    ///
    /// let mut register = RegisterState::new();
    /// assert_eq!(
    ///     register.submit_item("Tea", "1", "2.00"),
    ///     SubmitOutcome::Added { index: 0 }
    /// );
    ///
    /// register.begin_edit(0).unwrap();
    /// assert_eq!(
    ///     register.submit_item("Tea", "2", "2.00"),
    ///     SubmitOutcome::Replaced { index: 0 }
    /// );
    /// assert_eq!(register.in_progress_items()[0].line_total().cents(), 400);
    /// ```
    pub fn submit_item(&mut self, name: &str, quantity: &str, price: &str) -> SubmitOutcome {
        let item = LineItem::from_input(name, quantity, price);

        for finding in validate_line_item(&item) {
            warn!(item = %item.name, %finding, "Accepting suspicious line item");
        }

        let outcome = match self.editing_index.take() {
            Some(index) => {
                // begin_edit and delete_item keep the index in range.
                self.in_progress[index] = item;
                SubmitOutcome::Replaced { index }
            }
            None => {
                self.in_progress.push(item);
                SubmitOutcome::Added {
                    index: self.in_progress.len() - 1,
                }
            }
        };

        self.form.clear();
        debug!(?outcome, items = self.in_progress.len(), "Item submitted");
        outcome
    }

    /// Submits whatever is currently typed in the form.
    pub fn submit_form(&mut self) -> SubmitOutcome {
        let form = std::mem::take(&mut self.form);
        self.submit_item(&form.name, &form.quantity, &form.price)
    }

    /// Loads an item into the form for editing. The item list is untouched.
    pub fn begin_edit(&mut self, index: usize) -> CoreResult<()> {
        let item = self.item_at(index)?;
        self.form = EntryForm::from_item(item);
        self.editing_index = Some(index);
        debug!(index, "Editing item");
        Ok(())
    }

    /// Abandons an edit and clears the form.
    pub fn cancel_edit(&mut self) {
        self.editing_index = None;
        self.form.clear();
    }

    /// Removes an item and returns it.
    ///
    /// ## Edit Cursor Handling
    /// ```text
    /// editing 2, delete 2  → edit cancelled, form cleared
    /// editing 2, delete 0  → now editing 1 (same item)
    /// editing 2, delete 3  → still editing 2
    /// ```
    pub fn delete_item(&mut self, index: usize) -> CoreResult<LineItem> {
        self.item_at(index)?;
        let removed = self.in_progress.remove(index);

        match self.editing_index {
            Some(editing) if editing == index => self.cancel_edit(),
            Some(editing) if editing > index => self.editing_index = Some(editing - 1),
            _ => {}
        }

        debug!(index, items = self.in_progress.len(), "Item deleted");
        Ok(removed)
    }

    fn item_at(&self, index: usize) -> CoreResult<&LineItem> {
        self.in_progress
            .get(index)
            .ok_or(CoreError::ItemIndexOutOfRange {
                index,
                len: self.in_progress.len(),
            })
    }

    // -------------------------------------------------------------------------
    // Transaction Committer
    // -------------------------------------------------------------------------

    /// Freezes the in-progress items into a transaction and appends it to
    /// the log. Empty commits are allowed. Any pending edit is cancelled.
    pub fn commit_transaction(&mut self, timestamp: impl Into<String>) -> &Transaction {
        let items = std::mem::take(&mut self.in_progress);
        self.cancel_edit();
        self.committed.push(Transaction::new(items, timestamp));

        let committed = &self.committed[self.committed.len() - 1];
        debug!(
            items = committed.item_count(),
            total = %committed.total(),
            log_len = self.committed.len(),
            "Transaction committed"
        );
        committed
    }

    /// Empties the committed log (close-day).
    pub fn clear_log(&mut self) {
        self.committed.clear();
    }

    /// Removes and returns the committed log.
    pub fn take_log(&mut self) -> Vec<Transaction> {
        std::mem::take(&mut self.committed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
