mod common;

use std::sync::Arc;

use university::{
    course::{Course, CourseInsert},
    store::{DocumentStore, StoreError},
};

use common::MemoryStore;

fn course(name: &str) -> Course {
    Course::new(CourseInsert {
        course_name: name.to_string(),
        course_id: "CS501".to_string(),
        duration: 40,
        description: None,
        author: "A. Engineer".to_string(),
        url: "http://example.test/cs501".to_string(),
    })
}

#[tokio::test]
async fn insert_rejects_an_existing_key() {
    let store = Arc::new(MemoryStore::new());
    let doc = course("Systems Design");

    store.insert(&doc.id, &doc).await.expect("first insert");
    let err = store
        .insert(&doc.id, &doc)
        .await
        .expect_err("second insert must fail");
    assert!(matches!(err, StoreError::DuplicateKey(_)));
}

#[tokio::test]
async fn get_fails_on_a_missing_key() {
    let store = MemoryStore::new();

    let err = store.get("missing").await.expect_err("must be absent");
    assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn upsert_overwrites_and_remove_deletes() {
    let store = MemoryStore::new();
    let doc = course("Systems Design");

    store.upsert(&doc.id, &doc).await.expect("upsert creates");
    let mut replacement = doc.clone();
    replacement.author = "B. Engineer".to_string();
    store
        .upsert(&doc.id, &replacement)
        .await
        .expect("upsert overwrites");

    let stored = store.get(&doc.id).await.expect("stored");
    assert_eq!(stored.author, "B. Engineer");

    store.remove(&doc.id).await.expect("remove");
    assert!(store.get(&doc.id).await.is_err());
}

#[tokio::test]
async fn query_matches_substrings_only() {
    let store = MemoryStore::new();
    for name in ["Intro to Go", "Intro to Rust", "Advanced Calculus"] {
        let doc = course(name);
        store.insert(&doc.id, &doc).await.expect("insert");
    }

    let matches = store.query("Intro").await.expect("query");
    assert_eq!(matches.len(), 2);

    let matches = store.query("Calculus").await.expect("query");
    assert_eq!(matches.len(), 1);

    let matches = store.query("Nothing").await.expect("query");
    assert!(matches.is_empty());
}
