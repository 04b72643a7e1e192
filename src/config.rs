//! Store-level settings shared by the repositories.

/// Key under which the prompt collection is persisted.
pub const DEFAULT_PROMPTS_KEY: &str = "promptkeep_prompts";
/// Key under which the category collection is persisted.
pub const DEFAULT_CATEGORIES_KEY: &str = "promptkeep_categories";
/// Owner tag stamped on every record; the system is single-user.
pub const DEFAULT_USER_ID: &str = "temp-user-id";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub prompts_key: String,
    pub categories_key: String,
    pub user_id: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            prompts_key: DEFAULT_PROMPTS_KEY.to_string(),
            categories_key: DEFAULT_CATEGORIES_KEY.to_string(),
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

impl StoreConfig {
    /// Same keys, different owner tag.
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }
}
