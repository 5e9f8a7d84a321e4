//! Local key-value persistence for the ledger.
//!
//! The ledger is stored under three independent string keys (`inventory`,
//! `totalProfit`, `totalLoss`). Loading never fails: missing or malformed
//! entries fall back to defaults and are reported as [`LoadProblem`]s.

pub mod error;
pub mod file_store;
pub mod snapshot;
pub mod store;

pub use error::{LoadProblem, PersistError, StoreError};
pub use file_store::FileStore;
pub use snapshot::{
    INVENTORY_KEY, LoadReport, StoredItem, TOTAL_LOSS_KEY, TOTAL_PROFIT_KEY, load_ledger,
    save_ledger,
};
pub use store::{InMemoryStore, KeyValueStore};
