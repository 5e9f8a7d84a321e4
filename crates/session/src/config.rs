//! Session configuration (environment-driven, with defaults).

use std::path::PathBuf;

use stockbook_storage::{FileStore, StoreError};

/// Overrides the store directory.
pub const DATA_DIR_ENV: &str = "STOCKBOOK_DATA_DIR";
/// Overrides the currency symbol shown before amounts.
pub const CURRENCY_ENV: &str = "STOCKBOOK_CURRENCY";

pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Where the file store lives. `None` means the per-user data directory.
    pub data_dir: Option<PathBuf>,
    /// Prefix for rendered amounts. Amounts always show two decimals.
    pub currency_symbol: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

impl SessionConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through `lookup`. Blank values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut config = Self::default();

        if let Some(dir) = get(DATA_DIR_ENV) {
            config.data_dir = Some(PathBuf::from(dir));
        }
        match get(CURRENCY_ENV) {
            Some(symbol) => config.currency_symbol = symbol,
            None => tracing::debug!("{CURRENCY_ENV} not set; using {DEFAULT_CURRENCY_SYMBOL}"),
        }

        config
    }

    /// Open the file store this configuration points at.
    pub fn open_file_store(&self) -> Result<FileStore, StoreError> {
        match &self.data_dir {
            Some(dir) => FileStore::open(dir),
            None => FileStore::open_default(),
        }
    }
}
