//! # promptkeep-rs
//!
//! Local-first storage for reusable text prompts. Prompts and categories
//! live as two JSON arrays in a [`KeyValueStore`](storage::KeyValueStore);
//! the whole store can be exported to, and replaced from, a single JSON
//! document.
//!
//! ```
//! use promptkeep_rs::storage::MemoryStorage;
//! use promptkeep_rs::{PromptDraft, PromptKeep};
//! use std::sync::Arc;
//!
//! let keep = PromptKeep::new(Arc::new(MemoryStorage::new()));
//! let prompt = keep
//!     .save_prompt(PromptDraft::new("Summarize", "Summarize the text below."), "Writing")
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(keep.categories().find_by_id(&prompt.category_id).unwrap().name, "Writing");
//!
//! let backup = keep.transfer().export().unwrap();
//! keep.transfer().import(&backup).unwrap();
//! ```

pub mod clock;
pub mod config;
pub mod errors;
pub mod models;
pub mod query;
pub mod repository;
pub mod storage;
pub mod transfer;

pub use config::StoreConfig;
pub use errors::{ImportError, KeepError, Result};
pub use models::{Category, NewCategory, NewPrompt, Prompt};
pub use repository::{CategoryRepository, PromptRepository};
pub use transfer::{ImportSummary, TransferEngine};

use crate::clock::Clock;
use crate::repository::IdGenerator;
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tracing::debug;

/// A prompt as entered by the user, before it is tied to a category.
///
/// With `id` set, saving updates that prompt; otherwise a new one is created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptDraft {
    pub id: Option<String>,
    pub name: String,
    pub content: String,
    pub is_public: bool,
}

impl PromptDraft {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    /// Draft that edits an existing prompt.
    pub fn editing(prompt: &Prompt) -> Self {
        Self {
            id: Some(prompt.id.clone()),
            name: prompt.name.clone(),
            content: prompt.content.clone(),
            is_public: prompt.is_public,
        }
    }
}

/// One store with both repositories and the import/export engine over it.
#[derive(Clone)]
pub struct PromptKeep {
    prompts: PromptRepository,
    categories: CategoryRepository,
    transfer: TransferEngine,
}

impl PromptKeep {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, &StoreConfig::default())
    }

    pub fn with_config(store: Arc<dyn KeyValueStore>, config: &StoreConfig) -> Self {
        let prompts = PromptRepository::with_config(store.clone(), config);
        let categories = CategoryRepository::with_config(store, config);
        let transfer = TransferEngine::new(prompts.clone(), categories.clone());
        Self {
            prompts,
            categories,
            transfer,
        }
    }

    pub fn with_ids(self, ids: Arc<dyn IdGenerator>) -> Self {
        let prompts = self.prompts.with_ids(ids.clone());
        let categories = self.categories.with_ids(ids);
        let transfer = TransferEngine::new(prompts.clone(), categories.clone());
        Self {
            prompts,
            categories,
            transfer,
        }
    }

    pub fn with_clock(self, clock: Arc<dyn Clock>) -> Self {
        let prompts = self.prompts.with_clock(clock.clone());
        let categories = self.categories.with_clock(clock.clone());
        let transfer = TransferEngine::new(prompts.clone(), categories.clone()).with_clock(clock);
        Self {
            prompts,
            categories,
            transfer,
        }
    }

    pub fn prompts(&self) -> &PromptRepository {
        &self.prompts
    }

    pub fn categories(&self) -> &CategoryRepository {
        &self.categories
    }

    pub fn transfer(&self) -> &TransferEngine {
        &self.transfer
    }

    /// Saves a draft under the named category, creating the category if no
    /// category has that name yet (ignoring case and surrounding whitespace).
    ///
    /// Returns `Ok(None)` when the draft edits a prompt that no longer exists.
    pub fn save_prompt(&self, draft: PromptDraft, category_name: &str) -> Result<Option<Prompt>> {
        repository::require_text("name", &draft.name)?;
        repository::require_text("content", &draft.content)?;
        let existing = match &draft.id {
            Some(id) => match self.prompts.find_by_id(id) {
                Some(prompt) => Some(prompt),
                None => {
                    debug!(id = %id, "Draft edits a prompt that is gone");
                    return Ok(None);
                }
            },
            None => None,
        };
        let category = self.categories.add(NewCategory::new(category_name.trim()))?;

        match existing {
            None => {
                let data = NewPrompt {
                    name: draft.name,
                    content: draft.content,
                    category_id: category.id,
                    is_public: draft.is_public,
                };
                self.prompts.add(data).map(Some)
            }
            Some(mut prompt) => {
                prompt.name = draft.name;
                prompt.content = draft.content;
                prompt.category_id = category.id;
                prompt.is_public = draft.is_public;
                Ok(self.prompts.update(prompt))
            }
        }
    }

    /// Prompts whose category no longer exists.
    pub fn dangling_prompts(&self) -> Vec<Prompt> {
        query::dangling_prompts(&self.prompts.list(), &self.categories.list())
    }

    /// Filtered, newest-first view of the stored prompts.
    pub fn search(&self, filter: &query::PromptFilter) -> Vec<Prompt> {
        query::filter_prompts(&self.prompts.list(), &self.categories.list(), filter)
    }
}
