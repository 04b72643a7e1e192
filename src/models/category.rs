use crate::clock::iso_millis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named grouping for prompts, unique by case-insensitive name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default = "super::default_user_id")]
    pub user_id: String,
    #[serde(with = "iso_millis", default = "super::now_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso_millis", default = "super::now_millis")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
}

impl NewCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Category {
    /// Case-insensitive name comparison used for deduplication.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}
