//! Directory-backed store: one file per key.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::error::StoreError;
use crate::store::KeyValueStore;

/// Persists each key as `{dir}/{key}.value`. Writes go to a temporary sibling
/// first and are renamed into place, so a crash never leaves half a value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create store directory at {:?}", dir))
            .map_err(io_error)?;
        Ok(Self { dir })
    }

    /// Open the store in the default per-user location.
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = default_dir().map_err(io_error)?;
        Self::open(dir)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Characters outside `[A-Za-z0-9_-]` become `_`, so keys that differ only
    /// there (`a.b`, `a_b`) share a file.
    fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.value"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(
                anyhow::Error::new(err).context(format!("failed to read {:?}", path)),
            )),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("value.tmp");

        let written = std::fs::write(&tmp, value)
            .with_context(|| format!("failed to write {:?}", tmp))
            .and_then(|_| {
                std::fs::rename(&tmp, &path)
                    .with_context(|| format!("failed to move {:?} into place", tmp))
            });

        if let Err(err) = written {
            if let Err(cleanup) = std::fs::remove_file(&tmp) {
                if cleanup.kind() != ErrorKind::NotFound {
                    tracing::warn!("failed to remove {:?}: {cleanup}", tmp);
                }
            }
            return Err(io_error(err));
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(
                anyhow::Error::new(err).context(format!("failed to remove {:?}", path)),
            )),
        }
    }
}

fn io_error(err: anyhow::Error) -> StoreError {
    StoreError::Io(format!("{err:#}"))
}

/// Resolve the default store directory: `{app_data_dir}/stockbook`.
pub fn default_dir() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory (tried data_dir and home_dir)")?;

    Ok(base.join("stockbook"))
}
