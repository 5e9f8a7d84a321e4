//! One ledger + one store for the lifetime of a user session.

use stockbook_core::{AggregateRoot, DomainError};
use stockbook_events::Event;
use stockbook_inventory::{Ledger, ProfitOrLoss, TransactionOutcome, TransactionReason};
use stockbook_storage::{KeyValueStore, load_ledger, save_ledger};

use crate::config::SessionConfig;
use crate::display::{
    FinancialSummary, InventoryRow, InventoryView, ItemOption, MetricsSummary, format_money,
};
use crate::form::{FormError, ItemForm, StockForm};
use crate::notice::{Feedback, Notice};

const MSG_INVALID_ITEM: &str = "Please fill in all fields with valid positive values.";
const MSG_DUPLICATE_ID: &str = "Item ID already exists. Please use a unique ID.";
const MSG_ITEM_ADDED: &str = "Item added successfully!";
const MSG_ITEM_UPDATED: &str = "Item updated successfully!";
const MSG_ITEM_NOT_FOUND: &str = "Item not found!";
const MSG_NO_ITEM_SELECTED: &str = "Please select an item.";
const MSG_INVALID_QUANTITY: &str = "Please enter a valid positive quantity.";
const MSG_INVALID_SALE_PRICE: &str = "Please enter a valid sale price.";
const MSG_SELECTED_NOT_FOUND: &str = "Selected item not found.";
const MSG_INSUFFICIENT_STOCK: &str = "Cannot change more than available quantity.";
const MSG_SAVE_FAILED: &str = "Error saving data locally.";
const MSG_LOAD_FAILED: &str = "Error loading data from local storage.";

/// The add/edit form pre-filled for editing an existing item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    /// Pass this back as `editing` to [`Session::save_item`].
    pub editing: String,
    pub form: ItemForm,
    pub notice: Notice,
}

/// Owns the ledger and persists it after every successful mutation.
///
/// A failed save adds an error notice but never rolls the ledger back; memory
/// stays authoritative for the rest of the session.
#[derive(Debug)]
pub struct Session<S> {
    ledger: Ledger,
    store: S,
    config: SessionConfig,
}

impl<S> Session<S>
where
    S: KeyValueStore,
{
    /// Load the ledger from `store`. Problems while loading fall back to
    /// defaults and come back as an error notice.
    pub fn open(store: S, config: SessionConfig) -> (Self, Feedback) {
        let report = load_ledger(&store);
        let mut feedback = Feedback::default();
        if !report.is_clean() {
            feedback.push(Notice::error(MSG_LOAD_FAILED));
        }
        tracing::info!(
            items = report.ledger.len(),
            problems = report.problems.len(),
            "session opened"
        );

        let session = Self {
            ledger: report.ledger,
            store,
            config,
        };
        (session, feedback)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Add a new item, or overwrite the one being edited.
    pub fn save_item(&mut self, form: &ItemForm, editing: Option<&str>) -> Feedback {
        let input = match form.parse() {
            Ok(input) => input,
            Err(err) => {
                tracing::warn!(%err, "item form rejected");
                return Feedback::rejected(Notice::error(MSG_INVALID_ITEM));
            }
        };

        let (result, success) = match editing {
            Some(previous_id) => (
                self.ledger.update_item(
                    previous_id,
                    &input.id,
                    &input.name,
                    input.quantity,
                    input.cost_price,
                ),
                MSG_ITEM_UPDATED,
            ),
            None => (
                self.ledger
                    .add_item(&input.id, &input.name, input.quantity, input.cost_price),
                MSG_ITEM_ADDED,
            ),
        };

        match result {
            Ok(()) => {
                tracing::debug!(id = %input.id, edited = editing.is_some(), "item saved");
                self.persisted(Feedback::applied(Notice::success(success)))
            }
            Err(err) => {
                tracing::warn!(%err, "item save rejected");
                Feedback::rejected(Notice::error(item_error_message(&err)))
            }
        }
    }

    pub fn delete_item(&mut self, id: &str) -> Feedback {
        match self.ledger.delete_item(id) {
            Ok(name) => {
                tracing::debug!(id = id.trim(), "item deleted");
                self.persisted(Feedback::applied(Notice::success(format!(
                    "Item \"{name}\" deleted successfully!"
                ))))
            }
            Err(err) => {
                tracing::warn!(%err, "item delete rejected");
                Feedback::rejected(Notice::error(MSG_ITEM_NOT_FOUND))
            }
        }
    }

    /// Record a sale or damage from the stock modification form.
    pub fn modify_stock(&mut self, form: &StockForm) -> Feedback {
        let input = match form.parse() {
            Ok(input) => input,
            Err(err) => {
                tracing::warn!(%err, "stock form rejected");
                return Feedback::rejected(Notice::error(stock_form_message(&err)));
            }
        };

        match self.ledger.apply_transaction(
            &input.item_id,
            input.quantity,
            input.reason,
            input.sale_price,
        ) {
            Ok(outcome) => {
                tracing::debug!(
                    id = %outcome.item_id,
                    reason = %outcome.reason,
                    amount = %outcome.amount(),
                    removed = outcome.item_removed,
                    "stock reduced"
                );
                let feedback = self.transaction_feedback(&outcome);
                self.persisted(feedback)
            }
            Err(err) => {
                tracing::warn!(%err, "stock modification rejected");
                Feedback::rejected(Notice::error(stock_error_message(&err)))
            }
        }
    }

    /// Pre-fill the item form for editing `id`.
    pub fn edit_form(&self, id: &str) -> Option<EditForm> {
        let item = self.ledger.find_item(id).ok()?;
        Some(EditForm {
            editing: item.id_typed().to_string(),
            form: ItemForm::new(
                item.id_typed().as_str(),
                item.name(),
                item.quantity().to_string(),
                item.cost_price().to_fixed(),
            ),
            notice: Notice::info(format!("Editing item: {}", item.name())),
        })
    }

    /// Inventory table filtered by `query` (empty shows everything), plus the
    /// unfiltered metrics.
    pub fn inventory_view(&self, query: &str) -> InventoryView {
        let symbol = self.symbol();
        InventoryView {
            metrics: self.metrics_summary(),
            rows: self
                .ledger
                .search_items(query)
                .map(|item| InventoryRow::new(item, symbol))
                .collect(),
        }
    }

    pub fn metrics_summary(&self) -> MetricsSummary {
        MetricsSummary::new(&self.ledger.compute_metrics(), self.symbol())
    }

    pub fn financial_summary(&self) -> FinancialSummary {
        FinancialSummary::new(self.ledger.totals(), self.symbol())
    }

    pub fn item_options(&self) -> Vec<ItemOption> {
        let symbol = self.symbol();
        self.ledger
            .items()
            .iter()
            .map(|item| ItemOption::new(item, symbol))
            .collect()
    }

    /// Default sale price for the picker: the item's cost price.
    pub fn suggested_sale_price(&self, id: &str) -> Option<String> {
        self.ledger
            .find_item(id)
            .ok()
            .map(|item| item.cost_price().to_fixed())
    }

    fn symbol(&self) -> &str {
        &self.config.currency_symbol
    }

    fn persisted(&self, mut feedback: Feedback) -> Feedback {
        if let Some(change) = self.ledger.last_change() {
            tracing::info!(
                event = change.event_type(),
                schema = change.version(),
                at = %change.occurred_at(),
                ledger_version = self.ledger.version(),
                "ledger changed"
            );
        }
        if let Err(err) = save_ledger(&self.store, &self.ledger) {
            tracing::error!("failed to persist ledger: {err:?}");
            feedback.push(Notice::error(MSG_SAVE_FAILED));
        }
        feedback
    }

    fn transaction_feedback(&self, outcome: &TransactionOutcome) -> Feedback {
        let symbol = self.symbol();
        let amount = format_money(symbol, outcome.amount());
        let notice = match (outcome.reason, outcome.sale_price) {
            (TransactionReason::Sale, Some(price)) => {
                let head = format!(
                    "Sold {} of {} for {} each.",
                    outcome.quantity,
                    outcome.item_name,
                    format_money(symbol, price)
                );
                match outcome.profit_or_loss() {
                    ProfitOrLoss::Profit => Notice::success(format!("{head} Profit: {amount}")),
                    ProfitOrLoss::Loss => Notice::info(format!("{head} Loss: {amount}")),
                }
            }
            _ => Notice::info(format!(
                "Logged {} of {} as damaged. Loss: {amount}",
                outcome.quantity, outcome.item_name
            )),
        };

        let mut feedback = Feedback::applied(notice);
        if outcome.item_removed {
            feedback.push(Notice::info(format!(
                "{} quantity reached zero and was removed from inventory.",
                outcome.item_name
            )));
        }
        feedback
    }
}

fn item_error_message(err: &DomainError) -> &'static str {
    match err {
        DomainError::DuplicateId(_) => MSG_DUPLICATE_ID,
        DomainError::NotFound(_) => MSG_ITEM_NOT_FOUND,
        DomainError::InvalidInput(_) | DomainError::InsufficientStock { .. } => MSG_INVALID_ITEM,
    }
}

fn stock_form_message(err: &FormError) -> &'static str {
    match err {
        FormError::NoItemSelected => MSG_NO_ITEM_SELECTED,
        FormError::InvalidQuantity => MSG_INVALID_QUANTITY,
        FormError::InvalidSalePrice => MSG_INVALID_SALE_PRICE,
        FormError::InvalidItem(_) => MSG_INVALID_ITEM,
    }
}

fn stock_error_message(err: &DomainError) -> &'static str {
    match err {
        DomainError::NotFound(_) => MSG_SELECTED_NOT_FOUND,
        DomainError::InsufficientStock { .. } => MSG_INSUFFICIENT_STOCK,
        DomainError::InvalidInput(_) => MSG_INVALID_QUANTITY,
        DomainError::DuplicateId(_) => MSG_INVALID_ITEM,
    }
}
