use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::content::{NewContent, ValidationError};
use crate::db::entities::{content_item, content_tag, tag};
use crate::db::enums::ContentType;
use crate::db::models::StoredContent;
use crate::db::services::tag_service::missing_tag_ids;
use crate::feed::{ContentItem, Tag};

#[derive(Debug, thiserror::Error)]
pub enum ContentServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Unknown tag ids: {0:?}")]
    UnknownTags(Vec<Uuid>),
    #[error("Content not found: {0}")]
    NotFound(Uuid),
    #[error("{operation}: {source}")]
    Db {
        operation: &'static str,
        #[source]
        source: DbErr,
    },
    #[error("Stored content {id} has malformed content_data: {source}")]
    Malformed {
        id: Uuid,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to encode content_data: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ContentServiceError {
    fn db(operation: &'static str) -> impl FnOnce(DbErr) -> Self {
        move |source| ContentServiceError::Db { operation, source }
    }
}

fn to_stored(model: content_item::Model, tags: Vec<tag::Model>) -> Result<StoredContent, ContentServiceError> {
    let id = model.id;
    let item = ContentItem::try_from(model).map_err(|source| ContentServiceError::Malformed { id, source })?;
    let mut tags: Vec<Tag> = tags.into_iter().map(Tag::from).collect();
    tags.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(StoredContent { item, tags })
}

async fn ensure_tags_exist<C: ConnectionTrait>(
    conn: &C,
    tag_ids: &[Uuid],
    operation: &'static str,
) -> Result<(), ContentServiceError> {
    let missing = missing_tag_ids(conn, tag_ids)
        .await
        .map_err(ContentServiceError::db(operation))?;
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ContentServiceError::UnknownTags(missing))
    }
}

async fn link_tags<C: ConnectionTrait>(conn: &C, content_id: Uuid, tag_ids: &[Uuid]) -> Result<(), DbErr> {
    if tag_ids.is_empty() {
        return Ok(());
    }
    let links = tag_ids.iter().map(|tag_id| content_tag::ActiveModel {
        content_id: Set(content_id),
        tag_id: Set(*tag_id),
    });
    content_tag::Entity::insert_many(links)
        .exec_without_returning(conn)
        .await?;
    Ok(())
}

// --- Content Service Functions ---

/// Inserts a content item and its tag links in one transaction.
pub async fn create_content(db: &DatabaseConnection, content: NewContent) -> Result<StoredContent, ContentServiceError> {
    const OP: &str = "Error adding content";

    let content_data = content.data.to_value()?;
    let txn = db.begin().await.map_err(ContentServiceError::db(OP))?;
    ensure_tags_exist(&txn, &content.tag_ids, OP).await?;

    let new_item = content_item::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(content.title),
        description: Set(content.description),
        content_type: Set(content.data.content_type()),
        content_data: Set(content_data),
        file_url: Set(content.file_url),
        is_starred: Set(content.is_starred),
        created_at: Set(Utc::now()),
    };
    let saved = new_item.insert(&txn).await.map_err(ContentServiceError::db(OP))?;
    link_tags(&txn, saved.id, &content.tag_ids)
        .await
        .map_err(ContentServiceError::db("Error linking tags"))?;
    txn.commit().await.map_err(ContentServiceError::db(OP))?;

    info!(content_id = %saved.id, content_type = %saved.content_type, "Content saved.");
    get_content(db, saved.id).await
}

/// Replaces every editable field of a content item and its full set of tag links.
pub async fn update_content(
    db: &DatabaseConnection,
    content_id: Uuid,
    content: NewContent,
) -> Result<StoredContent, ContentServiceError> {
    const OP: &str = "Error updating content";

    let content_data = content.data.to_value()?;
    let txn = db.begin().await.map_err(ContentServiceError::db(OP))?;

    let existing = content_item::Entity::find_by_id(content_id)
        .one(&txn)
        .await
        .map_err(ContentServiceError::db(OP))?
        .ok_or(ContentServiceError::NotFound(content_id))?;
    ensure_tags_exist(&txn, &content.tag_ids, OP).await?;

    let mut active_item: content_item::ActiveModel = existing.into();
    active_item.title = Set(content.title);
    active_item.description = Set(content.description);
    active_item.content_type = Set(content.data.content_type());
    active_item.content_data = Set(content_data);
    active_item.file_url = Set(content.file_url);
    active_item.is_starred = Set(content.is_starred);
    active_item.update(&txn).await.map_err(ContentServiceError::db(OP))?;

    content_tag::Entity::delete_many()
        .filter(content_tag::Column::ContentId.eq(content_id))
        .exec(&txn)
        .await
        .map_err(ContentServiceError::db(OP))?;
    link_tags(&txn, content_id, &content.tag_ids)
        .await
        .map_err(ContentServiceError::db("Error linking tags"))?;
    txn.commit().await.map_err(ContentServiceError::db(OP))?;

    info!(%content_id, "Content updated.");
    get_content(db, content_id).await
}

/// Deletes a content item. Its tag links go with it through ON DELETE CASCADE.
pub async fn delete_content(db: &DatabaseConnection, content_id: Uuid) -> Result<(), ContentServiceError> {
    let result = content_item::Entity::delete_by_id(content_id)
        .exec(db)
        .await
        .map_err(ContentServiceError::db("Error deleting content"))?;
    if result.rows_affected == 0 {
        return Err(ContentServiceError::NotFound(content_id));
    }
    info!(%content_id, "Content deleted.");
    Ok(())
}

pub async fn set_starred(
    db: &DatabaseConnection,
    content_id: Uuid,
    is_starred: bool,
) -> Result<StoredContent, ContentServiceError> {
    const OP: &str = "Error updating star";

    let existing = content_item::Entity::find_by_id(content_id)
        .one(db)
        .await
        .map_err(ContentServiceError::db(OP))?
        .ok_or(ContentServiceError::NotFound(content_id))?;
    let mut active_item: content_item::ActiveModel = existing.into();
    active_item.is_starred = Set(is_starred);
    active_item.update(db).await.map_err(ContentServiceError::db(OP))?;

    get_content(db, content_id).await
}

pub async fn get_content(db: &DatabaseConnection, content_id: Uuid) -> Result<StoredContent, ContentServiceError> {
    let mut rows = content_item::Entity::find_by_id(content_id)
        .find_with_related(tag::Entity)
        .all(db)
        .await
        .map_err(ContentServiceError::db("Error loading content"))?;
    let (model, tags) = rows.pop().ok_or(ContentServiceError::NotFound(content_id))?;
    to_stored(model, tags)
}

/// Every content item, newest first. Rows whose payload no longer parses are
/// logged and left out.
pub async fn list_content(db: &DatabaseConnection) -> Result<Vec<StoredContent>, ContentServiceError> {
    let rows = content_item::Entity::find()
        .order_by_desc(content_item::Column::CreatedAt)
        .order_by_asc(content_item::Column::Id)
        .find_with_related(tag::Entity)
        .all(db)
        .await
        .map_err(ContentServiceError::db("Error loading content"))?;

    Ok(rows
        .into_iter()
        .filter_map(|(model, tags)| match to_stored(model, tags) {
            Ok(stored) => Some(stored),
            Err(e) => {
                warn!(error = %e, "Skipping unreadable content row.");
                None
            }
        })
        .collect())
}

/// Starred image items, oldest first so backdrop rotation order is stable.
pub async fn starred_images(db: &DatabaseConnection) -> Result<Vec<ContentItem>, ContentServiceError> {
    let models = content_item::Entity::find()
        .filter(content_item::Column::IsStarred.eq(true))
        .filter(content_item::Column::ContentType.eq(ContentType::Image))
        .order_by_asc(content_item::Column::CreatedAt)
        .order_by_asc(content_item::Column::Id)
        .all(db)
        .await
        .map_err(ContentServiceError::db("Error loading starred images"))?;

    Ok(models
        .into_iter()
        .filter_map(|model| {
            let id = model.id;
            ContentItem::try_from(model)
                .map_err(|e| warn!(content_id = %id, error = %e, "Skipping unreadable starred image."))
                .ok()
        })
        .collect())
}
