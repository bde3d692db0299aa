use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::db::entities::{content_item, content_tag, tag};
use crate::db::services::{ContentServiceError, content_service, tag_service};
use crate::feed::{ContentItem, ContentSource, FeedError, JoinRow, SelectionQuery, Tag};

/// [`ContentSource`] backed by the Postgres store.
#[cfg_attr(not(test), derive(Clone))] // sea-orm `mock` (dev-dep) drops Clone on DatabaseConnection
pub struct DbContentSource {
    db: DatabaseConnection,
}

impl DbContentSource {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn upstream(err: DbErr) -> FeedError {
    FeedError::Upstream(err.to_string())
}

#[async_trait]
impl ContentSource for DbContentSource {
    async fn fetch_tags(&self) -> Result<Vec<Tag>, FeedError> {
        let tags = tag_service::list_tags(&self.db).await.map_err(upstream)?;
        Ok(tags.into_iter().map(Tag::from).collect())
    }

    async fn fetch_join_rows(&self, selection: &SelectionQuery) -> Result<Vec<JoinRow>, FeedError> {
        if selection.is_empty() {
            return Ok(Vec::new());
        }
        let tag_ids = selection.tag_ids().iter().copied();

        let tags: HashMap<Uuid, Tag> = tag::Entity::find()
            .filter(tag::Column::Id.is_in(tag_ids.clone()))
            .all(&self.db)
            .await
            .map_err(upstream)?
            .into_iter()
            .map(|model| (model.id, Tag::from(model)))
            .collect();

        let links = content_tag::Entity::find()
            .filter(content_tag::Column::TagId.is_in(tag_ids))
            .order_by_asc(content_tag::Column::ContentId)
            .find_also_related(content_item::Entity)
            .all(&self.db)
            .await
            .map_err(upstream)?;
        debug!(selected = selection.len(), rows = links.len(), "Fetched join rows.");

        Ok(links
            .into_iter()
            .map(|(link, model)| {
                let content_item = model.and_then(|model| {
                    let id = model.id;
                    ContentItem::try_from(model)
                        .map_err(|e| warn!(content_id = %id, error = %e, "Skipping unreadable content row."))
                        .ok()
                });
                JoinRow {
                    tag_id: link.tag_id,
                    content_item,
                    tag: tags.get(&link.tag_id).cloned(),
                }
            })
            .collect())
    }

    async fn fetch_starred_images(&self) -> Result<Vec<ContentItem>, FeedError> {
        content_service::starred_images(&self.db)
            .await
            .map_err(|e: ContentServiceError| FeedError::Upstream(e.to_string()))
    }
}
