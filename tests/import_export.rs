use promptkeep_rs::clock::FixedClock;
use promptkeep_rs::storage::{FileSystemStorage, KeyValueStore, MemoryStorage};
use promptkeep_rs::{ImportError, NewCategory, NewPrompt, PromptDraft, PromptKeep};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::tempdir;

fn seeded() -> (PromptKeep, Arc<MemoryStorage>) {
    let store = Arc::new(MemoryStorage::new());
    let clock = Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()));
    let keep = PromptKeep::new(store.clone()).with_clock(clock);
    keep.save_prompt(PromptDraft::new("Outline", "Outline an essay about {{topic}}"), "Writing")
        .unwrap();
    keep.save_prompt(PromptDraft::new("Review", "Review this pull request"), "Coding")
        .unwrap();
    (keep, store)
}

#[test]
fn round_trip_reproduces_collections_exactly() {
    let (keep, _) = seeded();
    let prompts = keep.prompts().list();
    let categories = keep.categories().list();

    let exported = keep.transfer().export().unwrap();

    let fresh = PromptKeep::new(Arc::new(MemoryStorage::new()));
    fresh.transfer().import(&exported).unwrap();
    assert_eq!(fresh.prompts().list(), prompts);
    assert_eq!(fresh.categories().list(), categories);
}

#[test]
fn export_uses_the_documented_wire_shape() {
    let (keep, _) = seeded();
    let exported: Value = serde_json::from_str(&keep.transfer().export().unwrap()).unwrap();

    assert_eq!(exported["exportedAt"], "2024-05-01T12:00:00.000Z");
    let prompt = &exported["prompts"][0];
    for field in ["id", "name", "content", "categoryId", "createdAt", "updatedAt", "userId"] {
        assert!(prompt[field].is_string(), "prompt.{} should be a string", field);
    }
    assert_eq!(prompt["isPublic"], false);
    assert_eq!(prompt["userId"], "temp-user-id");
    let category = &exported["categories"][0];
    for field in ["id", "name", "userId", "createdAt", "updatedAt"] {
        assert!(category[field].is_string(), "category.{} should be a string", field);
    }
}

#[test]
fn import_overwrites_instead_of_merging() {
    let (keep, _) = seeded();
    let document = json!({
        "prompts": [{
            "id": "p1", "name": "Prompt 1", "content": "Content 1", "categoryId": "cat1",
            "createdAt": "2024-01-01T00:00:00.000Z", "updatedAt": "2024-01-01T00:00:00.000Z",
            "userId": "temp-user-id", "isPublic": false
        }],
        "categories": [{
            "id": "cat1", "name": "Category 1", "userId": "temp-user-id",
            "createdAt": "2024-01-01T00:00:00.000Z", "updatedAt": "2024-01-01T00:00:00.000Z"
        }],
        "exportedAt": "2024-01-01T00:00:00.000Z"
    });

    let summary = keep.transfer().import(&document.to_string()).unwrap();
    assert_eq!(summary.message(), "Successfully imported 1 prompts and 1 categories.");
    assert_eq!(serde_json::to_value(keep.prompts().list()).unwrap(), document["prompts"]);
    assert_eq!(serde_json::to_value(keep.categories().list()).unwrap(), document["categories"]);
}

#[test]
fn non_json_input_is_a_parse_error() {
    let (keep, store) = seeded();
    let before = store.read("promptkeep_prompts");

    let err = keep.transfer().import("not json at all").unwrap_err();
    assert!(matches!(err, ImportError::Parse(_)));
    assert_eq!(err.code(), "parse_error");
    assert!(err.to_string().starts_with("Invalid JSON format"));
    assert_eq!(store.read("promptkeep_prompts"), before);
}

#[test]
fn structural_problems_are_structure_errors_and_leave_state_intact() {
    let (keep, store) = seeded();
    let prompts_before = store.read("promptkeep_prompts");
    let categories_before = store.read("promptkeep_categories");

    let cases = [
        r#"null"#,
        r#"[1, 2, 3]"#,
        r#"{"prompts": "not-an-array", "categories": []}"#,
        r#"{"categories": []}"#,
        r#"{"prompts": []}"#,
        r#"{"prompts": [], "categories": {}}"#,
        r#"{"prompts": [{"id": "p1", "content": "no name"}], "categories": []}"#,
        r#"{"prompts": [], "categories": [{"id": "c1"}]}"#,
        r#"{"prompts": [{"id": 7, "name": "n", "content": "c"}], "categories": []}"#,
    ];
    for case in cases {
        let err = keep.transfer().import(case).unwrap_err();
        assert_eq!(err.code(), "structure_error", "input: {}", case);
    }

    assert_eq!(store.read("promptkeep_prompts"), prompts_before);
    assert_eq!(store.read("promptkeep_categories"), categories_before);
}

#[test]
fn a_bad_record_deep_in_the_array_is_caught() {
    let (keep, _) = seeded();
    let mut prompts: Vec<Value> = (0..4)
        .map(|i| json!({"id": format!("p{}", i), "name": "ok", "content": "ok"}))
        .collect();
    prompts.push(json!({"id": "p4", "name": "broken", "content": null}));
    let document = json!({"prompts": prompts, "categories": []});

    let err = keep.transfer().import(&document.to_string()).unwrap_err();
    assert_eq!(
        err,
        ImportError::Structure {
            collection: "prompts",
            index: Some(4),
            field: Some("content".to_string()),
            reason: "must be a string".to_string(),
        }
    );
    assert_eq!(keep.prompts().list().len(), 2);
}

#[test]
fn missing_exported_at_and_legacy_fields_are_accepted() {
    let keep = PromptKeep::new(Arc::new(MemoryStorage::new()));
    let document = r#"{
        "prompts": [{"id": "p1", "title": "Prompt 1", "content": "Content 1", "categoryId": "cat1"}],
        "categories": [{"id": "cat1", "name": "Category 1"}]
    }"#;

    keep.transfer().import(document).unwrap();
    let prompts = keep.prompts().list();
    assert_eq!(prompts[0].name, "Prompt 1");
    assert_eq!(keep.categories().list()[0].name, "Category 1");
}

#[test]
fn empty_arrays_clear_the_store() {
    let (keep, _) = seeded();
    let summary = keep
        .transfer()
        .import(r#"{"prompts": [], "categories": [], "exportedAt": "2024-01-01T00:00:00.000Z"}"#)
        .unwrap();
    assert_eq!((summary.prompts, summary.categories), (0, 0));
    assert!(keep.prompts().list().is_empty());
    assert!(keep.categories().list().is_empty());
}

#[test]
fn imported_duplicates_and_dangling_references_are_kept_verbatim() {
    let keep = PromptKeep::new(Arc::new(MemoryStorage::new()));
    let document = json!({
        "prompts": [{"id": "p1", "name": "n", "content": "c", "categoryId": "nowhere"}],
        "categories": [{"id": "a", "name": "Same"}, {"id": "b", "name": "SAME"}]
    });

    keep.transfer().import(&document.to_string()).unwrap();
    assert_eq!(keep.categories().list().len(), 2);
    assert_eq!(keep.dangling_prompts().len(), 1);
}

#[test]
fn repeated_ids_are_rejected_and_leave_state_intact() {
    let (keep, store) = seeded();
    let prompts_before = store.read("promptkeep_prompts");
    let categories_before = store.read("promptkeep_categories");

    let duplicate_prompts = json!({
        "prompts": [
            {"id": "p1", "name": "A", "content": "a", "categoryId": "c"},
            {"id": "p1", "name": "B", "content": "b", "categoryId": "c"}
        ],
        "categories": [{"id": "c", "name": "One"}]
    });
    let err = keep.transfer().import(&duplicate_prompts.to_string()).unwrap_err();
    assert_eq!(err.code(), "structure_error");
    assert_eq!(
        err,
        ImportError::Structure {
            collection: "prompts",
            index: Some(1),
            field: Some("id".to_string()),
            reason: "duplicates an earlier record".to_string(),
        }
    );

    let duplicate_categories = json!({
        "prompts": [],
        "categories": [{"id": "c", "name": "One"}, {"id": "c", "name": "Two"}]
    });
    let err = keep.transfer().import(&duplicate_categories.to_string()).unwrap_err();
    assert_eq!(err.code(), "structure_error");
    assert!(err.to_string().contains("categories[1].id"));

    assert_eq!(store.read("promptkeep_prompts"), prompts_before);
    assert_eq!(store.read("promptkeep_categories"), categories_before);
}

#[test]
fn imported_timestamps_are_normalized_to_utc_milliseconds() {
    let keep = PromptKeep::new(Arc::new(MemoryStorage::new()));
    let document = json!({
        "prompts": [{
            "id": "p1", "name": "n", "content": "c",
            "createdAt": "2024-01-01T02:00:00.123456+02:00",
            "updatedAt": "2024-01-01T00:00:00"
        }],
        "categories": []
    });

    keep.transfer().import(&document.to_string()).unwrap();
    let stored = serde_json::to_value(keep.prompts().list()).unwrap();
    assert_eq!(stored[0]["createdAt"], "2024-01-01T00:00:00.123Z");
    assert_eq!(stored[0]["updatedAt"], "2024-01-01T00:00:00.000Z");
}

#[test]
fn filesystem_store_survives_reopen_after_import() {
    let dir = tempdir().unwrap();
    let (source, _) = seeded();
    let exported = source.transfer().export().unwrap();

    {
        let keep = PromptKeep::new(Arc::new(FileSystemStorage::new(dir.path())));
        keep.transfer().import(&exported).unwrap();
    }

    let reopened = PromptKeep::new(Arc::new(FileSystemStorage::new(dir.path())));
    assert_eq!(reopened.prompts().list(), source.prompts().list());
    assert_eq!(reopened.categories().list(), source.categories().list());

    reopened.categories().add(NewCategory::new("Later")).unwrap();
    reopened.prompts().add(NewPrompt::new("x", "y", "")).unwrap();
    assert_eq!(reopened.categories().list().len(), 3);
}
