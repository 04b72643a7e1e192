use super::{load_collection, require_text, save_collection, unique_id, IdGenerator, UuidIds};
use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::errors::{KeepError, Result};
use crate::models::{Category, NewCategory};
use crate::storage::KeyValueStore;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// CRUD over the category collection.
///
/// Names are unique case-insensitively for everything that goes through
/// [`add`](Self::add) or [`update`](Self::update). [`replace_all`](Self::replace_all)
/// writes whatever it is given.
#[derive(Clone)]
pub struct CategoryRepository {
    store: Arc<dyn KeyValueStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    key: String,
    user_id: String,
}

impl CategoryRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, &StoreConfig::default())
    }

    pub fn with_config(store: Arc<dyn KeyValueStore>, config: &StoreConfig) -> Self {
        Self {
            store,
            ids: Arc::new(UuidIds),
            clock: Arc::new(SystemClock),
            key: config.categories_key.clone(),
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

    pub fn list(&self) -> Vec<Category> {
        load_collection(self.store.as_ref(), &self.key)
    }

    pub fn replace_all(&self, categories: &[Category]) {
        debug!(count = categories.len(), "Saving category collection");
        save_collection(self.store.as_ref(), &self.key, categories);
    }

    pub fn find_by_id(&self, id: &str) -> Option<Category> {
        self.list().into_iter().find(|c| c.id == id)
    }

    /// Case-insensitive exact name match.
    pub fn find_by_name(&self, name: &str) -> Option<Category> {
        self.list().into_iter().find(|c| c.has_name(name))
    }

    /// Get-or-create: returns the existing category if one already has this
    /// name (ignoring case), otherwise creates and stores a new one.
    pub fn add(&self, data: NewCategory) -> Result<Category> {
        require_text("category name", &data.name)?;

        let mut categories = self.list();
        if let Some(existing) = categories.iter().find(|c| c.has_name(&data.name)) {
            return Ok(existing.clone());
        }

        let id = unique_id(self.ids.as_ref(), "categories", |candidate| {
            categories.iter().any(|c| c.id == candidate)
        });
        let now = self.clock.now();
        let category = Category {
            id,
            name: data.name,
            user_id: self.user_id.clone(),
            created_at: now,
            updated_at: now,
        };
        categories.push(category.clone());
        self.replace_all(&categories);
        info!(id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Renames a category.
    ///
    /// `Ok(None)` if the id is unknown. Fails with
    /// [`KeepError::DuplicateCategoryName`] if another category already uses
    /// the new name. Storage is untouched in both cases.
    pub fn update(&self, category: Category) -> Result<Option<Category>> {
        require_text("category name", &category.name)?;

        let mut categories = self.list();
        if categories
            .iter()
            .any(|c| c.id != category.id && c.has_name(&category.name))
        {
            return Err(KeepError::DuplicateCategoryName(category.name));
        }
        let Some(existing) = categories.iter_mut().find(|c| c.id == category.id) else {
            warn!(id = %category.id, "Category not found. Cannot update.");
            return Ok(None);
        };

        existing.name = category.name;
        existing.user_id = category.user_id;
        existing.updated_at = self.clock.now();
        let updated = existing.clone();

        self.replace_all(&categories);
        info!(id = %updated.id, "Category updated");
        Ok(Some(updated))
    }

    /// Hard delete. Prompts pointing at this category are left dangling.
    pub fn delete(&self, id: &str) -> bool {
        let mut categories = self.list();
        let before = categories.len();
        categories.retain(|c| c.id != id);
        if categories.len() == before {
            debug!(id, "Delete of unknown category ignored");
            return false;
        }
        self.replace_all(&categories);
        info!(id, "Category deleted");
        true
    }
}
