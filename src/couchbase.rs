//! # Couchbase
//!
//! Store client for the Couchbase document database, speaking the cluster's
//! public HTTP APIs. The management endpoint (port 8091) verifies credentials
//! and bucket resolution once at startup; every document operation afterwards
//! goes through the query service (port 8093) as a parameterized N1QL
//! statement against the configured `bucket`.`scope`.`collection` keyspace.
//!
//! Caller-supplied values (document keys, search terms) always travel in the
//! statement `args`, never spliced into the statement text, so a search term
//! cannot alter query semantics.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::{
    config::Config,
    course::Course,
    store::{DocumentStore, StoreError},
};

const MANAGEMENT_PORT: u16 = 8091;
const QUERY_PORT: u16 = 8093;

/// Query-service error code for an INSERT hitting an existing key.
const DUPLICATE_KEY_CODE: u64 = 12009;

pub struct CouchbaseStore {
    http: Client,
    query_url: String,
    keyspace: String,
    username: String,
    password: String,
}

#[derive(Deserialize)]
struct QueryEnvelope {
    status: String,
    #[serde(default)]
    results: Vec<Value>,
    #[serde(default)]
    errors: Vec<QueryServiceError>,
}

#[derive(Deserialize)]
struct QueryServiceError {
    code: u64,
    msg: String,
}

impl CouchbaseStore {
    /// Authenticates against the cluster and resolves the configured bucket.
    /// Fails before the server starts serving; there is no reconnect or retry
    /// once connected.
    pub async fn connect(config: &Config) -> Result<Self, StoreError> {
        let store = Self {
            http: Client::new(),
            query_url: format!(
                "http://{}:{}/query/service",
                config.db_host, QUERY_PORT
            ),
            keyspace: keyspace(&config.bucket, &config.scope, &config.collection),
            username: config.db_username.clone(),
            password: config.password.clone(),
        };

        let bucket_url = format!(
            "http://{}:{}/pools/default/buckets/{}",
            config.db_host, MANAGEMENT_PORT, config.bucket
        );
        let response = store
            .http
            .get(&bucket_url)
            .basic_auth(&store.username, Some(&store.password))
            .send()
            .await?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Err(StoreError::Auth),
            StatusCode::NOT_FOUND => {
                return Err(StoreError::BucketNotFound(config.bucket.clone()))
            }
            status if !status.is_success() => {
                return Err(StoreError::Query {
                    code: status.as_u16() as u64,
                    msg: format!("bucket check failed: {status}"),
                })
            }
            _ => {}
        }

        info!(bucket = %config.bucket, "connected to couchbase");
        Ok(store)
    }

    async fn execute(&self, statement: String, args: Vec<Value>) -> Result<Vec<Value>, StoreError> {
        let response = self
            .http
            .post(&self.query_url)
            .basic_auth(&self.username, Some(&self.password))
            .json(&json!({ "statement": statement, "args": args }))
            .send()
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(StoreError::Auth);
        }

        let envelope: QueryEnvelope = response.json().await?;
        if envelope.status != "success" {
            return Err(map_service_errors(envelope.errors));
        }
        Ok(envelope.results)
    }
}

#[async_trait]
impl DocumentStore for CouchbaseStore {
    async fn get(&self, key: &str) -> Result<Course, StoreError> {
        let results = self
            .execute(select_by_key(&self.keyspace), vec![json!(key)])
            .await?;
        let doc = results
            .into_iter()
            .next()
            .ok_or_else(|| StoreError::NotFound(key.to_string()))?;
        Ok(serde_json::from_value(doc)?)
    }

    async fn insert(&self, key: &str, doc: &Course) -> Result<(), StoreError> {
        self.execute(
            insert_statement(&self.keyspace),
            vec![json!(key), serde_json::to_value(doc)?],
        )
        .await
        .map_err(|e| match e {
            StoreError::Query { code, .. } if code == DUPLICATE_KEY_CODE => {
                StoreError::DuplicateKey(key.to_string())
            }
            other => other,
        })?;
        Ok(())
    }

    async fn upsert(&self, key: &str, doc: &Course) -> Result<(), StoreError> {
        self.execute(
            upsert_statement(&self.keyspace),
            vec![json!(key), serde_json::to_value(doc)?],
        )
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.execute(delete_by_key(&self.keyspace), vec![json!(key)])
            .await?;
        Ok(())
    }

    async fn query(&self, term: &str) -> Result<Vec<Course>, StoreError> {
        let results = self
            .execute(search_by_name(&self.keyspace), vec![json!(like_pattern(term))])
            .await?;
        results
            .into_iter()
            .map(|doc| serde_json::from_value(doc).map_err(StoreError::from))
            .collect()
    }
}

fn map_service_errors(errors: Vec<QueryServiceError>) -> StoreError {
    match errors.into_iter().next() {
        Some(e) => StoreError::Query {
            code: e.code,
            msg: e.msg,
        },
        None => StoreError::Query {
            code: 0,
            msg: "query service reported failure without detail".to_string(),
        },
    }
}

fn keyspace(bucket: &str, scope: &str, collection: &str) -> String {
    format!("`{bucket}`.`{scope}`.`{collection}`")
}

fn select_by_key(keyspace: &str) -> String {
    format!("SELECT c.* FROM {keyspace} c USE KEYS $1")
}

fn insert_statement(keyspace: &str) -> String {
    format!("INSERT INTO {keyspace} (KEY, VALUE) VALUES ($1, $2)")
}

fn upsert_statement(keyspace: &str) -> String {
    format!("UPSERT INTO {keyspace} (KEY, VALUE) VALUES ($1, $2)")
}

fn delete_by_key(keyspace: &str) -> String {
    format!("DELETE FROM {keyspace} c USE KEYS $1")
}

fn search_by_name(keyspace: &str) -> String {
    format!("SELECT c.* FROM {keyspace} c WHERE c.courseName LIKE $1")
}

fn like_pattern(term: &str) -> String {
    format!("%{term}%")
}
