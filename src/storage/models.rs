use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: i64,
    pub blog: String,
    pub title: String,
    pub created_on: DateTime<Utc>,
    pub modified_on: DateTime<Utc>,
    pub content: String,
    pub excerpt: String,
    pub poster_uri: Option<String>,
    pub cloud_storage_object: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub blog_post: i64,
    pub name: String,
    pub website: Option<String>,
    pub comment: String,
    pub created_on: DateTime<Utc>,
}

/// 删除结果，`success = false` 表示没有行被删除
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteResult {
    pub success: bool,
    pub id: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}
