use super::{load_collection, require_text, save_collection, unique_id, IdGenerator, UuidIds};
use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::errors::Result;
use crate::models::{NewPrompt, Prompt};
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// CRUD over the prompt collection.
#[derive(Clone)]
pub struct PromptRepository {
    store: Arc<dyn KeyValueStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    key: String,
    user_id: String,
}

impl PromptRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, &StoreConfig::default())
    }

    pub fn with_config(store: Arc<dyn KeyValueStore>, config: &StoreConfig) -> Self {
        Self {
            store,
            ids: Arc::new(UuidIds),
            clock: Arc::new(SystemClock),
            key: config.prompts_key.clone(),
            user_id: config.user_id.clone(),
        }
    }

    pub fn with_ids(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// All stored prompts, in insertion order. Empty if nothing usable is stored.
    pub fn list(&self) -> Vec<Prompt> {
        load_collection(self.store.as_ref(), &self.key)
    }

    /// Overwrites the whole collection.
    pub fn replace_all(&self, prompts: &[Prompt]) {
        debug!(count = prompts.len(), "Saving prompt collection");
        save_collection(self.store.as_ref(), &self.key, prompts);
    }

    pub fn find_by_id(&self, id: &str) -> Option<Prompt> {
        self.list().into_iter().find(|p| p.id == id)
    }

    /// Creates a prompt with a fresh id and `createdAt == updatedAt == now`.
    pub fn add(&self, data: NewPrompt) -> Result<Prompt> {
        require_text("name", &data.name)?;
        require_text("content", &data.content)?;

        let mut prompts = self.list();
        let id = unique_id(self.ids.as_ref(), "prompts", |candidate| {
            prompts.iter().any(|p| p.id == candidate)
        });
        let prompt = Prompt::from_new(id, data, &self.user_id, self.clock.now());
        prompts.push(prompt.clone());
        self.replace_all(&prompts);
        info!(id = %prompt.id, "Prompt created");
        Ok(prompt)
    }

    /// Replaces the mutable fields of the stored prompt with the same id.
    ///
    /// `createdAt` is kept from the stored record and `updatedAt` is set to
    /// now. Returns `None`, leaving storage untouched, if the id is unknown.
    pub fn update(&self, prompt: Prompt) -> Option<Prompt> {
        let mut prompts = self.list();
        let Some(existing) = prompts.iter_mut().find(|p| p.id == prompt.id) else {
            warn!(id = %prompt.id, "Prompt not found. Cannot update.");
            return None;
        };

        existing.name = prompt.name;
        existing.content = prompt.content;
        existing.category_id = prompt.category_id;
        existing.user_id = prompt.user_id;
        existing.is_public = prompt.is_public;
        existing.updated_at = self.clock.now();
        let updated = existing.clone();

        self.replace_all(&prompts);
        info!(id = %updated.id, "Prompt updated");
        Some(updated)
    }

    /// Removes the prompt if present. Returns whether anything was removed.
    pub fn delete(&self, id: &str) -> bool {
        let mut prompts = self.list();
        let before = prompts.len();
        prompts.retain(|p| p.id != id);
        if prompts.len() == before {
            debug!(id, "Delete of unknown prompt ignored");
            return false;
        }
        self.replace_all(&prompts);
        info!(id, "Prompt deleted");
        true
    }
}
