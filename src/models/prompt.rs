use crate::clock::iso_millis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved piece of reusable text with a title and a category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub id: String,
    #[serde(alias = "title")] // Older exports called it `title`
    pub name: String,
    pub content: String,
    /// May point at a category that no longer exists; treat that as uncategorized.
    #[serde(default)]
    pub category_id: String,
    #[serde(with = "iso_millis", default = "super::now_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "iso_millis", default = "super::now_millis")]
    pub updated_at: DateTime<Utc>,
    #[serde(default = "super::default_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub is_public: bool,
}

/// Caller-supplied fields for a new prompt. The repository assigns the id
/// and both timestamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPrompt {
    pub name: String,
    pub content: String,
    pub category_id: String,
    pub is_public: bool,
}

impl NewPrompt {
    pub fn new(name: impl Into<String>, content: impl Into<String>, category_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            category_id: category_id.into(),
            is_public: false,
        }
    }
}

impl Prompt {
    pub(crate) fn from_new(
        id: String,
        data: NewPrompt,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name: data.name,
            content: data.content,
            category_id: data.category_id,
            created_at: now,
            updated_at: now,
            user_id: user_id.to_string(),
            is_public: data.is_public,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_camel_case_and_millisecond_timestamps() {
        let raw = json!({
            "id": "p1",
            "name": "Summarize",
            "content": "Summarize this text",
            "categoryId": "c1",
            "createdAt": "2024-01-01T00:00:00.000Z",
            "updatedAt": "2024-01-02T03:04:05.678Z",
            "userId": "temp-user-id",
            "isPublic": false
        });
        let prompt: Prompt = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(prompt.category_id, "c1");
        assert_eq!(serde_json::to_value(&prompt).unwrap(), raw);
    }

    #[test]
    fn accepts_legacy_title_and_fills_defaults() {
        let prompt: Prompt = serde_json::from_value(json!({
            "id": "p1",
            "title": "Legacy",
            "content": "Body"
        }))
        .unwrap();
        assert_eq!(prompt.name, "Legacy");
        assert_eq!(prompt.category_id, "");
        assert_eq!(prompt.user_id, "temp-user-id");
        assert!(!prompt.is_public);
    }
}
