use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use axum::Router;
use serde_json::{json, Value};
use university::{
    app,
    config::Config,
    course::Course,
    state::AppState,
    store::{DocumentStore, StoreError},
};

/// In-memory stand-in for the Couchbase store, honoring the same contract:
/// insert fails on an existing key, get/remove fail on a missing one, query
/// is a substring match on `courseName`.
pub struct MemoryStore {
    docs: RwLock<HashMap<String, Course>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(HashMap::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.docs.read().unwrap().len()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Course, StoreError> {
        self.docs
            .read()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn insert(&self, key: &str, doc: &Course) -> Result<(), StoreError> {
        let mut docs = self.docs.write().unwrap();
        if docs.contains_key(key) {
            return Err(StoreError::DuplicateKey(key.to_string()));
        }
        docs.insert(key.to_string(), doc.clone());
        Ok(())
    }

    async fn upsert(&self, key: &str, doc: &Course) -> Result<(), StoreError> {
        self.docs
            .write()
            .unwrap()
            .insert(key.to_string(), doc.clone());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.docs
            .write()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn query(&self, term: &str) -> Result<Vec<Course>, StoreError> {
        Ok(self
            .docs
            .read()
            .unwrap()
            .values()
            .filter(|c| c.course_name.contains(term))
            .cloned()
            .collect())
    }
}

pub fn test_config() -> Config {
    Config {
        port: 0,
        db_host: "localhost".to_string(),
        bucket: "university".to_string(),
        scope: "_default".to_string(),
        collection: "courses".to_string(),
        db_username: "admin".to_string(),
        password: "password".to_string(),
        audit_log_dir: "./logs".to_string(),
    }
}

pub fn build_app() -> (Router, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let state = AppState::with_store(test_config(), store.clone()).expect("state should assemble");
    (app(state), store)
}

pub fn course_body(course_name: &str, course_id: &str) -> Value {
    json!({
        "courseName": course_name,
        "courseId": course_id,
        "duration": 40,
        "description": "a course",
        "author": "A. Engineer",
        "url": format!("http://example.test/{course_id}")
    })
}
