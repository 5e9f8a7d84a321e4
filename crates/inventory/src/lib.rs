//! Inventory ledger and stock-transaction engine.
//!
//! This crate contains business rules for inventory, implemented purely as
//! deterministic domain logic (no IO, no UI, no storage).

pub mod item;
pub mod ledger;
pub mod metrics;
pub mod search;
pub mod transaction;

pub use item::Item;
pub use ledger::{
    AddItem, DeleteItem, ItemAdded, ItemDeleted, ItemUpdated, Ledger, LedgerCommand, LedgerEvent,
    ReduceStock, StockReduced, UpdateItem,
};
pub use metrics::InventoryMetrics;
pub use search::ItemSearch;
pub use transaction::{
    ProfitAndLoss, ProfitOrLoss, Settlement, TransactionOutcome, TransactionReason,
};
