//! Repositories own one collection each and the invariants that go with it.
//!
//! Both collections are stored whole under a single key, so every mutation
//! is a read-modify-write of the full JSON array.

use crate::storage::KeyValueStore;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

pub mod categories;
pub mod prompts;

pub use categories::CategoryRepository;
pub use prompts::PromptRepository;

/// Source of fresh record ids.
pub trait IdGenerator: Send + Sync + 'static {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Hands out a scripted list of ids, then falls back to UUIDs.
///
/// Lets tests force a collision on the first attempt.
#[derive(Debug, Default)]
pub struct SequenceIds {
    queue: Mutex<VecDeque<String>>,
}

impl SequenceIds {
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            queue: Mutex::new(ids.into_iter().map(Into::into).collect()),
        }
    }
}

impl IdGenerator for SequenceIds {
    fn next_id(&self) -> String {
        self.queue
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or_else(|| UuidIds.next_id())
    }
}

/// Draws ids until one is not already taken.
pub(crate) fn unique_id(
    ids: &dyn IdGenerator,
    collection: &'static str,
    taken: impl Fn(&str) -> bool,
) -> String {
    let mut id = ids.next_id();
    while taken(&id) {
        warn!(collection, id = %id, "Generated id already in use, regenerating");
        id = ids.next_id();
    }
    id
}

/// Reads a JSON array stored under `key`. Absent or corrupt data reads as empty.
///
/// Records stored without timestamps get them filled in on load; the filled
/// collection is written back once so later reads see the same values.
pub(crate) fn load_collection<T>(store: &dyn KeyValueStore, key: &str) -> Vec<T>
where
    T: DeserializeOwned + Serialize,
{
    let Some(raw) = store.read(key) else {
        return Vec::new();
    };
    let values: Vec<Value> = match serde_json::from_str(&raw) {
        Ok(values) => values,
        Err(e) => {
            warn!(key, error = %e, "Stored collection is not valid JSON; treating as empty");
            return Vec::new();
        }
    };
    let needs_backfill = values.iter().any(|v| {
        TIMESTAMP_FIELDS
            .iter()
            .any(|field| v.get(*field).is_none())
    });
    let items: Vec<T> = match serde_json::from_value(Value::Array(values)) {
        Ok(items) => items,
        Err(e) => {
            warn!(key, error = %e, "Stored collection has unexpected shape; treating as empty");
            return Vec::new();
        }
    };
    if needs_backfill {
        debug!(key, "Persisting timestamps filled in on load");
        save_collection(store, key, &items);
    }
    items
}

const TIMESTAMP_FIELDS: [&str; 2] = ["createdAt", "updatedAt"];

/// Serializes and writes a whole collection under `key`.
pub(crate) fn save_collection<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) {
    match serde_json::to_string(items) {
        Ok(raw) => store.write(key, &raw),
        Err(e) => warn!(key, error = %e, "Failed to serialize collection; nothing written"),
    }
}

/// Rejects blank user input for a required text field.
pub(crate) fn require_text(field: &str, value: &str) -> crate::errors::Result<()> {
    if value.trim().is_empty() {
        return Err(crate::errors::KeepError::Validation(format!("{} must not be empty", field)));
    }
    Ok(())
}
