use thiserror::Error;

use stockbook_core::ItemId;

/// Failure of the underlying key-value store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("storage is unavailable")]
    Unavailable,

    #[error("storage quota exceeded (needed {needed} bytes, limit {limit})")]
    QuotaExceeded { needed: usize, limit: usize },

    #[error("storage io error: {0}")]
    Io(String),
}

/// Failure while writing the ledger. Callers treat this as non-fatal: the
/// in-memory ledger stays authoritative.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to serialize {key}: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write {key}: {source}")]
    Store {
        key: &'static str,
        #[source]
        source: StoreError,
    },
}

/// Something that was skipped or defaulted while loading.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LoadProblem {
    #[error("could not read {key}: {source}")]
    Unreadable { key: &'static str, source: StoreError },

    #[error("malformed {key}: {reason}")]
    Malformed { key: &'static str, reason: String },

    #[error("dropped inventory record #{index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("dropped inventory record with duplicate id {0}")]
    DuplicateId(ItemId),
}
