//! Declarative shape checks for imported records.
//!
//! Every element of each array is checked; the first violation is reported
//! with its index and field name.

use crate::clock::parse_timestamp;
use crate::errors::ImportError;
use serde_json::{Map, Value};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Flag,
    Timestamp,
}

impl FieldKind {
    fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::Text => value.is_string(),
            FieldKind::Flag => value.is_boolean(),
            FieldKind::Timestamp => value
                .as_str()
                .map_or(false, |s| parse_timestamp(s).is_ok()),
        }
    }

    fn expectation(self) -> &'static str {
        match self {
            FieldKind::Text => "must be a string",
            FieldKind::Flag => "must be a boolean",
            FieldKind::Timestamp => "must be an ISO-8601 timestamp string",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Accepted keys, canonical first. Later entries are legacy aliases.
    pub keys: &'static [&'static str],
    pub kind: FieldKind,
    pub required: bool,
}

const fn required(keys: &'static [&'static str], kind: FieldKind) -> FieldRule {
    FieldRule { keys, kind, required: true }
}

const fn optional(keys: &'static [&'static str], kind: FieldKind) -> FieldRule {
    FieldRule { keys, kind, required: false }
}

#[derive(Debug, Clone, Copy)]
pub struct RecordSchema {
    pub collection: &'static str,
    pub fields: &'static [FieldRule],
}

pub const PROMPT_SCHEMA: RecordSchema = RecordSchema {
    collection: "prompts",
    fields: &[
        required(&["id"], FieldKind::Text),
        required(&["name", "title"], FieldKind::Text),
        required(&["content"], FieldKind::Text),
        optional(&["categoryId"], FieldKind::Text),
        optional(&["createdAt"], FieldKind::Timestamp),
        optional(&["updatedAt"], FieldKind::Timestamp),
        optional(&["userId"], FieldKind::Text),
        optional(&["isPublic"], FieldKind::Flag),
    ],
};

pub const CATEGORY_SCHEMA: RecordSchema = RecordSchema {
    collection: "categories",
    fields: &[
        required(&["id"], FieldKind::Text),
        required(&["name"], FieldKind::Text),
        optional(&["userId"], FieldKind::Text),
        optional(&["createdAt"], FieldKind::Timestamp),
        optional(&["updatedAt"], FieldKind::Timestamp),
    ],
};

impl RecordSchema {
    pub fn validate_all(&self, items: &[Value]) -> Result<(), ImportError> {
        items
            .iter()
            .enumerate()
            .try_for_each(|(index, item)| self.validate(index, item))?;
        self.check_unique_ids(items)
    }

    /// Ids must not repeat within one collection.
    fn check_unique_ids(&self, items: &[Value]) -> Result<(), ImportError> {
        let mut seen = HashSet::new();
        for (index, item) in items.iter().enumerate() {
            let Some(id) = item.get("id").and_then(Value::as_str) else {
                continue;
            };
            if !seen.insert(id) {
                return Err(ImportError::field(
                    self.collection,
                    index,
                    "id",
                    "duplicates an earlier record",
                ));
            }
        }
        Ok(())
    }

    fn validate(&self, index: usize, item: &Value) -> Result<(), ImportError> {
        let Some(record) = item.as_object() else {
            return Err(ImportError::Structure {
                collection: self.collection,
                index: Some(index),
                field: None,
                reason: "must be an object".to_string(),
            });
        };
        self.fields
            .iter()
            .try_for_each(|rule| self.check_rule(index, record, rule))
    }

    fn check_rule(
        &self,
        index: usize,
        record: &Map<String, Value>,
        rule: &FieldRule,
    ) -> Result<(), ImportError> {
        let canonical = rule.keys[0];
        // An alias only counts when the canonical key is missing
        let found = rule
            .keys
            .iter()
            .find_map(|key| record.get(*key).map(|value| (*key, value)));

        match found {
            Some((key, value)) if !rule.kind.accepts(value) => Err(ImportError::field(
                self.collection,
                index,
                key,
                rule.kind.expectation(),
            )),
            Some(_) => Ok(()),
            None if rule.required => Err(ImportError::field(
                self.collection,
                index,
                canonical,
                "is required",
            )),
            None => Ok(()),
        }
    }
}
