use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::BookId;

/// The slice of the catalog this service aggregates over. The full catalog
/// (authors, descriptions, covers) lives in the catalog service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub isbn: Option<String>,
    pub pages: Option<i32>,
    pub genre: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(default)]
    pub isbn: Option<String>,
    #[serde(default)]
    pub pages: Option<i32>,
    #[serde(default)]
    pub genre: Option<String>,
}
