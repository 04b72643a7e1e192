//! JSON import and export of the whole store.
//!
//! Export wraps both collections in an envelope. Import validates the
//! envelope and every record before overwriting anything, so a rejected
//! document leaves the store exactly as it was.

use crate::clock::{iso_millis, Clock, SystemClock};
use crate::errors::{ImportError, Result};
use crate::models::{Category, Prompt};
use crate::repository::{CategoryRepository, PromptRepository};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub mod schema;

use schema::{CATEGORY_SCHEMA, PROMPT_SCHEMA};

/// Default file name used when saving an export to disk.
pub const DEFAULT_EXPORT_FILE: &str = "promptkeep_backup.json";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    prompts: &'a [Prompt],
    categories: &'a [Category],
    #[serde(with = "iso_millis")]
    exported_at: DateTime<Utc>,
}

/// What a successful import wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub prompts: usize,
    pub categories: usize,
}

impl ImportSummary {
    pub fn message(&self) -> String {
        format!(
            "Successfully imported {} prompts and {} categories.",
            self.prompts, self.categories
        )
    }
}

#[derive(Clone)]
pub struct TransferEngine {
    prompts: PromptRepository,
    categories: CategoryRepository,
    clock: Arc<dyn Clock>,
}

impl TransferEngine {
    pub fn new(prompts: PromptRepository, categories: CategoryRepository) -> Self {
        Self {
            prompts,
            categories,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Pretty-printed `{prompts, categories, exportedAt}` document.
    pub fn export(&self) -> Result<String> {
        let prompts = self.prompts.list();
        let categories = self.categories.list();
        let document = ExportDocument {
            prompts: &prompts,
            categories: &categories,
            exported_at: self.clock.now(),
        };
        let json = serde_json::to_string_pretty(&document)?;
        info!(
            prompts = prompts.len(),
            categories = categories.len(),
            "Exported store"
        );
        Ok(json)
    }

    /// Replaces both collections with the contents of `json_text`.
    ///
    /// Nothing is written unless the whole document is valid.
    pub fn import(&self, json_text: &str) -> std::result::Result<ImportSummary, ImportError> {
        let (prompts, categories) = parse_document(json_text).map_err(|e| {
            warn!(code = e.code(), error = %e, "Import rejected");
            e
        })?;

        self.prompts.replace_all(&prompts);
        self.categories.replace_all(&categories);

        let summary = ImportSummary {
            prompts: prompts.len(),
            categories: categories.len(),
        };
        info!(
            prompts = summary.prompts,
            categories = summary.categories,
            "Import complete"
        );
        Ok(summary)
    }
}

/// Parses and validates an envelope without touching storage.
pub fn parse_document(
    json_text: &str,
) -> std::result::Result<(Vec<Prompt>, Vec<Category>), ImportError> {
    let document: Value =
        serde_json::from_str(json_text).map_err(|e| ImportError::Parse(e.to_string()))?;

    let Value::Object(mut envelope) = document else {
        return Err(ImportError::structure("document", "must be a JSON object"));
    };

    let Some(Value::Array(mut raw_prompts)) = envelope.remove("prompts") else {
        return Err(ImportError::structure("prompts", "must be an array"));
    };
    let Some(Value::Array(raw_categories)) = envelope.remove("categories") else {
        return Err(ImportError::structure("categories", "must be an array"));
    };
    if !envelope.contains_key("exportedAt") {
        debug!("Import document has no exportedAt; accepting anyway");
    }

    PROMPT_SCHEMA.validate_all(&raw_prompts)?;
    CATEGORY_SCHEMA.validate_all(&raw_categories)?;

    // `title` is a legacy alias; when both are present `name` wins
    for record in raw_prompts.iter_mut().filter_map(Value::as_object_mut) {
        if record.contains_key("name") {
            record.remove("title");
        }
    }

    let prompts: Vec<Prompt> = serde_json::from_value(Value::Array(raw_prompts))
        .map_err(|e| ImportError::Unexpected(e.to_string()))?;
    let categories: Vec<Category> = serde_json::from_value(Value::Array(raw_categories))
        .map_err(|e| ImportError::Unexpected(e.to_string()))?;
    Ok((prompts, categories))
}
