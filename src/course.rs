use chrono::Local;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Timestamp layout carried in `createdAt`.
pub const CREATED_AT_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// A persisted course document. Assigned its `id` and `createdAt` at insert
/// time and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub course_name: String,
    pub course_id: String,
    pub duration: i64,
    #[serde(default)]
    pub description: Option<String>,
    pub author: String,
    pub url: String,
    pub created_at: String,
}

/// Caller-supplied shape for course creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseInsert {
    pub course_name: String,
    pub course_id: String,
    pub duration: i64,
    #[serde(default)]
    pub description: Option<String>,
    pub author: String,
    pub url: String,
}

impl Course {
    pub fn new(insert: CourseInsert) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            course_name: insert.course_name,
            course_id: insert.course_id,
            duration: insert.duration,
            description: insert.description,
            author: insert.author,
            url: insert.url,
            created_at: Local::now().format(CREATED_AT_FORMAT).to_string(),
        }
    }
}
