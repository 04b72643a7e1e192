//! Raw key-value persistence.
//!
//! Every other module reads and writes through a [`KeyValueStore`]; none of
//! them touch files or maps directly. Implementations never fail outward: a
//! missing or broken substrate reads as empty and swallows writes.

use std::collections::HashMap;
use std::sync::RwLock;
use tracing::debug;

pub mod filesystem;

pub use filesystem::FileSystemStorage;

/// Trait defining the interface for key-value storage backends.
pub trait KeyValueStore: Send + Sync + 'static { // Ensure Send + Sync for Arc<dyn T>
    /// Returns the raw string stored under `key`, or `None` if there is none.
    fn read(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing what was there.
    fn write(&self, key: &str, value: &str);

    /// Drops `key`. Absent keys are a no-op.
    fn remove(&self, key: &str);
}

/// In-process store backed by a map.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStorage {
    fn read(&self, key: &str) -> Option<String> {
        self.entries.read().ok()?.get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) {
        match self.entries.write() {
            Ok(mut entries) => {
                entries.insert(key.to_string(), value.to_string());
            }
            Err(_) => debug!(key, "Memory store lock poisoned; write dropped"),
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }
}

/// Stand-in for "no storage available": nothing is ever stored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedStorage;

impl KeyValueStore for DetachedStorage {
    fn read(&self, _key: &str) -> Option<String> {
        None
    }

    fn write(&self, key: &str, _value: &str) {
        debug!(key, "No storage attached; write ignored");
    }

    fn remove(&self, _key: &str) {}
}
