//! Read-only views over loaded collections: search, filter, and the
//! prompts whose category has gone missing.

use crate::models::{Category, Prompt};
use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptFilter {
    /// Only prompts in this category.
    pub category_id: Option<String>,
    /// Case-insensitive substring of name, content, or category name.
    pub search: Option<String>,
}

impl PromptFilter {
    pub fn in_category(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn matching(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}

/// Name of the category a prompt points at, if that category exists.
pub fn category_name_for<'a>(prompt: &Prompt, categories: &'a [Category]) -> Option<&'a str> {
    categories
        .iter()
        .find(|c| c.id == prompt.category_id)
        .map(|c| c.name.as_str())
}

/// Prompts passing `filter`, newest `createdAt` first.
pub fn filter_prompts(prompts: &[Prompt], categories: &[Category], filter: &PromptFilter) -> Vec<Prompt> {
    let term = filter
        .search
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase);

    let mut matched: Vec<Prompt> = prompts
        .iter()
        .filter(|p| {
            filter
                .category_id
                .as_deref()
                .map_or(true, |id| p.category_id == id)
        })
        .filter(|p| match &term {
            None => true,
            Some(term) => {
                p.name.to_lowercase().contains(term)
                    || p.content.to_lowercase().contains(term)
                    || category_name_for(p, categories)
                        .map_or(false, |name| name.to_lowercase().contains(term))
            }
        })
        .cloned()
        .collect();

    // Stable sort keeps insertion order among equal timestamps
    matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matched
}

/// Prompts whose `categoryId` matches no stored category.
pub fn dangling_prompts(prompts: &[Prompt], categories: &[Category]) -> Vec<Prompt> {
    let known: HashSet<&str> = categories.iter().map(|c| c.id.as_str()).collect();
    prompts
        .iter()
        .filter(|p| !known.contains(p.category_id.as_str()))
        .cloned()
        .collect()
}
