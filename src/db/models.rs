use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::content::ContentData;
use crate::db::entities::{content_item, tag};
use crate::feed::{ContentItem, Tag};

/// A tag with the number of content items linked to it.
/// Listed on the admin screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagWithCount {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub content_count: i64,
}

/// A content item together with every tag linked to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredContent {
    #[serde(flatten)]
    pub item: ContentItem,
    pub tags: Vec<Tag>,
}

impl From<tag::Model> for Tag {
    fn from(model: tag::Model) -> Self {
        Tag {
            id: model.id,
            name: model.name,
        }
    }
}

impl TryFrom<content_item::Model> for ContentItem {
    type Error = serde_json::Error;

    fn try_from(model: content_item::Model) -> Result<Self, Self::Error> {
        let data = ContentData::from_parts(model.content_type, model.content_data)?;
        Ok(ContentItem {
            id: model.id,
            title: model.title,
            description: model.description,
            data,
            file_url: model.file_url,
            is_starred: model.is_starred,
            created_at: model.created_at,
        })
    }
}
