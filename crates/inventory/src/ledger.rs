use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use stockbook_core::{Aggregate, AggregateRoot, DomainError, DomainResult, ItemId, Money};
use stockbook_events::Event;

use crate::item::Item;
use crate::metrics::InventoryMetrics;
use crate::search::ItemSearch;
use crate::transaction::{ProfitAndLoss, Settlement, TransactionOutcome, TransactionReason};

/// Aggregate root: the inventory ledger.
///
/// Owns every item on hand plus the cumulative profit/loss. Items keep their
/// insertion order for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    items: Vec<Item>,
    totals: ProfitAndLoss,
    version: u64,
    last_change: Option<LedgerEvent>,
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddItem {
    pub id: String,
    pub name: String,
    pub quantity: i64,
    pub cost_price: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Command: UpdateItem (full overwrite, not a patch).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateItem {
    pub previous_id: String,
    pub id: String,
    pub name: String,
    pub quantity: i64,
    pub cost_price: Decimal,
    pub occurred_at: DateTime<Utc>,
}

/// Command: DeleteItem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteItem {
    pub id: String,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ReduceStock (sale or damage).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceStock {
    pub item_id: String,
    pub quantity: i64,
    pub reason: TransactionReason,
    /// Required for a sale, ignored for damage.
    pub sale_price: Option<Decimal>,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerCommand {
    AddItem(AddItem),
    UpdateItem(UpdateItem),
    DeleteItem(DeleteItem),
    ReduceStock(ReduceStock),
}

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemAdded {
    pub item: Item,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemUpdated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdated {
    pub previous_id: ItemId,
    pub item: Item,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemDeleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDeleted {
    pub item_id: ItemId,
    pub name: String,
    pub occurred_at: DateTime<Utc>,
}

/// Event: StockReduced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockReduced {
    pub item_id: ItemId,
    pub item_name: String,
    pub quantity: u64,
    pub reason: TransactionReason,
    pub sale_price: Option<Money>,
    pub settlement: Settlement,
    /// Quantity reached zero; the item leaves the ledger.
    pub depleted: bool,
    pub occurred_at: DateTime<Utc>,
}

impl From<&StockReduced> for TransactionOutcome {
    fn from(e: &StockReduced) -> Self {
        TransactionOutcome {
            item_id: e.item_id.clone(),
            item_name: e.item_name.clone(),
            reason: e.reason,
            quantity: e.quantity,
            sale_price: e.sale_price,
            settlement: e.settlement,
            item_removed: e.depleted,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    ItemAdded(ItemAdded),
    ItemUpdated(ItemUpdated),
    ItemDeleted(ItemDeleted),
    StockReduced(StockReduced),
}

impl Event for LedgerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            LedgerEvent::ItemAdded(_) => "inventory.item.added",
            LedgerEvent::ItemUpdated(_) => "inventory.item.updated",
            LedgerEvent::ItemDeleted(_) => "inventory.item.deleted",
            LedgerEvent::StockReduced(_) => "inventory.item.stock_reduced",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            LedgerEvent::ItemAdded(e) => e.occurred_at,
            LedgerEvent::ItemUpdated(e) => e.occurred_at,
            LedgerEvent::ItemDeleted(e) => e.occurred_at,
            LedgerEvent::StockReduced(e) => e.occurred_at,
        }
    }
}

impl AggregateRoot for Ledger {
    fn version(&self) -> u64 {
        self.version
    }
}

impl Aggregate for Ledger {
    type Command = LedgerCommand;
    type Event = LedgerEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            LedgerEvent::ItemAdded(e) => {
                self.items.push(e.item.clone());
            }
            LedgerEvent::ItemUpdated(e) => {
                if let Some(slot) = self.position(e.previous_id.as_str()) {
                    self.items[slot] = e.item.clone();
                }
            }
            LedgerEvent::ItemDeleted(e) => {
                self.items.retain(|item| item.id_typed() != &e.item_id);
            }
            LedgerEvent::StockReduced(e) => {
                if let Some(slot) = self.position(e.item_id.as_str()) {
                    self.items[slot].remove_units(e.quantity);
                    if e.depleted || self.items[slot].quantity() == 0 {
                        self.items.remove(slot);
                    }
                }
                self.totals.book(&e.settlement);
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
        self.last_change = Some(event.clone());
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            LedgerCommand::AddItem(cmd) => {
                self.handle_add(cmd).map(|e| vec![LedgerEvent::ItemAdded(e)])
            }
            LedgerCommand::UpdateItem(cmd) => {
                self.handle_update(cmd).map(|e| vec![LedgerEvent::ItemUpdated(e)])
            }
            LedgerCommand::DeleteItem(cmd) => {
                self.handle_delete(cmd).map(|e| vec![LedgerEvent::ItemDeleted(e)])
            }
            LedgerCommand::ReduceStock(cmd) => {
                self.handle_reduce(cmd).map(|e| vec![LedgerEvent::StockReduced(e)])
            }
        }
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted parts.
    ///
    /// Items whose id was already seen are dropped (first one wins); their ids
    /// are returned so the caller can report them.
    pub fn restore(items: Vec<Item>, totals: ProfitAndLoss) -> (Self, Vec<ItemId>) {
        let mut kept: Vec<Item> = Vec::with_capacity(items.len());
        let mut dropped = Vec::new();
        for item in items {
            if kept.iter().any(|k| k.id_typed() == item.id_typed()) {
                dropped.push(item.id_typed().clone());
            } else {
                kept.push(item);
            }
        }
        let ledger = Self {
            items: kept,
            totals,
            version: 0,
            last_change: None,
        };
        (ledger, dropped)
    }

    /// Items in display (insertion) order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn totals(&self) -> ProfitAndLoss {
        self.totals
    }

    /// The most recently applied event, if any mutation happened since the
    /// ledger was created or restored.
    pub fn last_change(&self) -> Option<&LedgerEvent> {
        self.last_change.as_ref()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn add_item(
        &mut self,
        id: &str,
        name: &str,
        quantity: i64,
        cost_price: Decimal,
    ) -> DomainResult<()> {
        self.execute(&LedgerCommand::AddItem(AddItem {
            id: id.to_string(),
            name: name.to_string(),
            quantity,
            cost_price,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    pub fn update_item(
        &mut self,
        previous_id: &str,
        new_id: &str,
        name: &str,
        quantity: i64,
        cost_price: Decimal,
    ) -> DomainResult<()> {
        self.execute(&LedgerCommand::UpdateItem(UpdateItem {
            previous_id: previous_id.to_string(),
            id: new_id.to_string(),
            name: name.to_string(),
            quantity,
            cost_price,
            occurred_at: Utc::now(),
        }))?;
        Ok(())
    }

    /// Remove an item; returns its name for user feedback.
    pub fn delete_item(&mut self, id: &str) -> DomainResult<String> {
        let event = self.handle_delete(&DeleteItem {
            id: id.to_string(),
            occurred_at: Utc::now(),
        })?;
        let name = event.name.clone();
        self.apply(&LedgerEvent::ItemDeleted(event));
        Ok(name)
    }

    pub fn find_item(&self, id: &str) -> DomainResult<&Item> {
        self.position(id)
            .map(|slot| &self.items[slot])
            .ok_or_else(|| DomainError::not_found(id.trim()))
    }

    /// Case-insensitive substring search on id or name. An empty query
    /// yields every item.
    pub fn search_items(&self, query: &str) -> ItemSearch<'_> {
        ItemSearch::new(&self.items, query)
    }

    /// Reduce stock for a sale or damage and book the profit/loss.
    pub fn apply_transaction(
        &mut self,
        item_id: &str,
        quantity: i64,
        reason: TransactionReason,
        sale_price: Option<Decimal>,
    ) -> DomainResult<TransactionOutcome> {
        let event = self.handle_reduce(&ReduceStock {
            item_id: item_id.to_string(),
            quantity,
            reason,
            sale_price,
            occurred_at: Utc::now(),
        })?;
        let outcome = TransactionOutcome::from(&event);
        self.apply(&LedgerEvent::StockReduced(event));
        Ok(outcome)
    }

    pub fn compute_metrics(&self) -> InventoryMetrics {
        InventoryMetrics::from_items(&self.items)
    }

    fn position(&self, id: &str) -> Option<usize> {
        let id = id.trim();
        self.items.iter().position(|item| item.id_typed() == id)
    }

    fn handle_add(&self, cmd: &AddItem) -> Result<ItemAdded, DomainError> {
        let item = Item::from_input(&cmd.id, &cmd.name, cmd.quantity, cmd.cost_price)?;
        if self.contains(item.id_typed().as_str()) {
            return Err(DomainError::duplicate_id(item.id_typed().clone()));
        }
        Ok(ItemAdded {
            item,
            occurred_at: cmd.occurred_at,
        })
    }

    fn handle_update(&self, cmd: &UpdateItem) -> Result<ItemUpdated, DomainError> {
        let slot = self
            .position(&cmd.previous_id)
            .ok_or_else(|| DomainError::not_found(cmd.previous_id.trim()))?;
        let item = Item::from_input(&cmd.id, &cmd.name, cmd.quantity, cmd.cost_price)?;

        let clashes = self
            .items
            .iter()
            .enumerate()
            .any(|(i, other)| i != slot && other.id_typed() == item.id_typed());
        if clashes {
            return Err(DomainError::duplicate_id(item.id_typed().clone()));
        }

        Ok(ItemUpdated {
            previous_id: self.items[slot].id_typed().clone(),
            item,
            occurred_at: cmd.occurred_at,
        })
    }

    fn handle_delete(&self, cmd: &DeleteItem) -> Result<ItemDeleted, DomainError> {
        let item = self.find_item(&cmd.id)?;
        Ok(ItemDeleted {
            item_id: item.id_typed().clone(),
            name: item.name().to_string(),
            occurred_at: cmd.occurred_at,
        })
    }

    fn handle_reduce(&self, cmd: &ReduceStock) -> Result<StockReduced, DomainError> {
        let quantity = match u64::try_from(cmd.quantity) {
            Ok(q) if q > 0 => q,
            _ => return Err(DomainError::invalid_input("quantity must be positive")),
        };

        let sale_price = match cmd.reason {
            TransactionReason::Sale => {
                let raw = cmd.sale_price.ok_or_else(|| {
                    DomainError::invalid_input("sale price is required for a sale")
                })?;
                let price = Money::new(raw)
                    .map_err(|_| DomainError::invalid_input("sale price cannot be negative"))?;
                Some(price)
            }
            TransactionReason::Damage => None,
        };

        let item = self.find_item(&cmd.item_id)?;
        if quantity > item.quantity() {
            return Err(DomainError::insufficient_stock(quantity, item.quantity()));
        }

        let settlement = match sale_price {
            Some(price) => Settlement::for_sale(item.cost_price(), price, quantity),
            None => Settlement::for_damage(item.cost_price(), quantity),
        };

        Ok(StockReduced {
            item_id: item.id_typed().clone(),
            item_name: item.name().to_string(),
            quantity,
            reason: cmd.reason,
            sale_price,
            settlement,
            depleted: item.quantity() - quantity == 0,
            occurred_at: cmd.occurred_at,
        })
    }
}
