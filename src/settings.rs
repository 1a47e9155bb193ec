//! Persisted settings storage.
//!
//! The handler consumes a narrow slice of the settings surface: named
//! string lists (`autojoin`, `privaterooms`). [`JsonSettings`] persists
//! them as a single JSON document on disk; [`MemorySettings`] backs tests
//! and ephemeral runs.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::collab::SettingsStore;

/// List of rooms to join in addition to the configured ones.
pub const AUTOJOIN_KEY: &str = "autojoin";

/// List of rooms hidden from public surfaces; pruned when a join is
/// refused.
pub const PRIVATE_ROOMS_KEY: &str = "privaterooms";

/// Settings store errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings file: {0}")]
    Parse(#[from] serde_json::Error),
}

type Lists = HashMap<String, Vec<String>>;

/// File-backed settings store. The whole document is rewritten on every
/// mutation; the store is tiny and mutated from a single path.
pub struct JsonSettings {
    path: PathBuf,
    lists: Mutex<Lists>,
}

impl JsonSettings {
    /// Open the store at `path`, creating an empty one if the file does
    /// not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();
        let lists = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Lists::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path,
            lists: Mutex::new(lists),
        })
    }

    fn persist(&self, lists: &Lists) {
        let rendered = match serde_json::to_string_pretty(lists) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "failed to serialize settings");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, rendered) {
            warn!(path = %self.path.display(), error = %e, "failed to persist settings");
        }
    }
}

#[async_trait]
impl SettingsStore for JsonSettings {
    async fn list(&self, key: &str) -> Vec<String> {
        self.lists.lock().get(key).cloned().unwrap_or_default()
    }

    async fn remove(&self, key: &str, value: &str) {
        let mut lists = self.lists.lock();
        if let Some(values) = lists.get_mut(key) {
            values.retain(|v| v != value);
        }
        self.persist(&lists);
    }
}

/// In-memory settings store for tests and ephemeral runs.
#[derive(Debug, Default)]
pub struct MemorySettings {
    lists: Mutex<Lists>,
}

impl MemorySettings {
    /// Seed a list, replacing any previous contents under `key`.
    pub fn with_list(self, key: &str, values: &[&str]) -> Self {
        self.lists.lock().insert(
            key.to_owned(),
            values.iter().map(|v| (*v).to_owned()).collect(),
        );
        self
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn list(&self, key: &str) -> Vec<String> {
        self.lists.lock().get(key).cloned().unwrap_or_default()
    }

    async fn remove(&self, key: &str, value: &str) {
        if let Some(values) = self.lists.lock().get_mut(key) {
            values.retain(|v| v != value);
        }
    }
}
