use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::content::ContentData;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentItem {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(flatten)]
    pub data: ContentData,
    pub file_url: Option<String>,
    pub is_starred: bool,
    pub created_at: DateTime<Utc>,
}

/// One `(content item, tag)` pairing returned by the join fetch. `content_item` is
/// `None` when the link outlived the content row it pointed at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRow {
    pub tag_id: Uuid,
    pub content_item: Option<ContentItem>,
    pub tag: Option<Tag>,
}

/// A content item scored against one selection. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedContentItem {
    #[serde(flatten)]
    pub item: ContentItem,
    pub tags: Vec<Tag>,
    pub match_count: usize,
}
