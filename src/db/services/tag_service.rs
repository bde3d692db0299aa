use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, RuntimeErr, Set, prelude::Expr,
};
use uuid::Uuid;

use crate::db::entities::{content_tag, tag};
use crate::db::models::TagWithCount;

#[derive(Debug, thiserror::Error)]
pub enum TagServiceError {
    #[error("Tag name must not be empty")]
    EmptyName,
    #[error("A tag named '{0}' already exists.")]
    DuplicateName(String),
    #[error("Tag not found: {0}")]
    NotFound(Uuid),
    #[error("{operation}: {source}")]
    Db {
        operation: &'static str,
        #[source]
        source: DbErr,
    },
}

/// Tag names are stored trimmed and lowercase.
pub fn normalize_tag_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// True when the database rejected a write because of a unique constraint.
pub fn is_unique_violation(err: &DbErr) -> bool {
    match err {
        DbErr::Query(RuntimeErr::SqlxError(sqlx_error)) | DbErr::Exec(RuntimeErr::SqlxError(sqlx_error)) => {
            matches!(sqlx_error, sqlx::Error::Database(database_error) if database_error.is_unique_violation())
        }
        _ => false,
    }
}

fn write_error(operation: &'static str, name: &str, source: DbErr) -> TagServiceError {
    if is_unique_violation(&source) {
        TagServiceError::DuplicateName(name.to_string())
    } else {
        TagServiceError::Db { operation, source }
    }
}

// --- Tag Service Functions ---

/// The full tag catalog, ordered by name.
pub async fn list_tags(db: &DatabaseConnection) -> Result<Vec<tag::Model>, DbErr> {
    tag::Entity::find()
        .order_by_asc(tag::Column::Name)
        .all(db)
        .await
}

/// The tag catalog with the number of content items linked to each tag.
pub async fn list_tags_with_counts(db: &DatabaseConnection) -> Result<Vec<TagWithCount>, TagServiceError> {
    let db_err = |source| TagServiceError::Db {
        operation: "Error loading tags",
        source,
    };

    let tags = list_tags(db).await.map_err(db_err)?;
    let counts: HashMap<Uuid, i64> = content_tag::Entity::find()
        .select_only()
        .column(content_tag::Column::TagId)
        .column_as(Expr::col(content_tag::Column::ContentId).count(), "content_count")
        .group_by(content_tag::Column::TagId)
        .into_tuple::<(Uuid, i64)>()
        .all(db)
        .await
        .map_err(db_err)?
        .into_iter()
        .collect();

    Ok(tags
        .into_iter()
        .map(|t| TagWithCount {
            content_count: counts.get(&t.id).copied().unwrap_or(0),
            id: t.id,
            name: t.name,
            created_at: t.created_at,
        })
        .collect())
}

/// Creates a new tag.
pub async fn create_tag(db: &DatabaseConnection, name: &str) -> Result<tag::Model, TagServiceError> {
    let name = normalize_tag_name(name);
    if name.is_empty() {
        return Err(TagServiceError::EmptyName);
    }

    let new_tag = tag::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.clone()),
        created_at: Set(Utc::now()),
    };
    new_tag
        .insert(db)
        .await
        .map_err(|e| write_error("Error adding tag", &name, e))
}

/// Renames an existing tag.
pub async fn rename_tag(
    db: &DatabaseConnection,
    tag_id: Uuid,
    name: &str,
) -> Result<tag::Model, TagServiceError> {
    let name = normalize_tag_name(name);
    if name.is_empty() {
        return Err(TagServiceError::EmptyName);
    }

    let existing = tag::Entity::find_by_id(tag_id)
        .one(db)
        .await
        .map_err(|source| TagServiceError::Db {
            operation: "Error renaming tag",
            source,
        })?
        .ok_or(TagServiceError::NotFound(tag_id))?;

    let mut active_tag: tag::ActiveModel = existing.into();
    active_tag.name = Set(name.clone());
    active_tag
        .update(db)
        .await
        .map_err(|e| write_error("Error renaming tag", &name, e))
}

/// Deletes a tag. The ON DELETE CASCADE on content_tags removes its links.
pub async fn delete_tag(db: &DatabaseConnection, tag_id: Uuid) -> Result<(), TagServiceError> {
    let result = tag::Entity::delete_by_id(tag_id)
        .exec(db)
        .await
        .map_err(|source| TagServiceError::Db {
            operation: "Error deleting tag",
            source,
        })?;
    if result.rows_affected == 0 {
        return Err(TagServiceError::NotFound(tag_id));
    }
    Ok(())
}

/// Ids among `tag_ids` that have no tag row.
pub async fn missing_tag_ids<C: sea_orm::ConnectionTrait>(
    db: &C,
    tag_ids: &[Uuid],
) -> Result<Vec<Uuid>, DbErr> {
    let found: Vec<Uuid> = tag::Entity::find()
        .select_only()
        .column(tag::Column::Id)
        .filter(tag::Column::Id.is_in(tag_ids.iter().copied()))
        .into_tuple::<Uuid>()
        .all(db)
        .await?;
    Ok(tag_ids
        .iter()
        .copied()
        .filter(|id| !found.contains(id))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag_name() {
        assert_eq!(normalize_tag_name("  Lonely "), "lonely");
        assert_eq!(normalize_tag_name("   "), "");
    }

    #[test]
    fn test_other_errors_are_not_unique_violations() {
        assert!(!is_unique_violation(&DbErr::RecordNotFound("tags".to_string())));
        assert!(!is_unique_violation(&DbErr::Query(RuntimeErr::Internal("timeout".to_string()))));
    }

    #[test]
    fn test_error_messages_name_the_operation() {
        let err = TagServiceError::Db {
            operation: "Error adding tag",
            source: DbErr::Custom("connection reset".to_string()),
        };
        assert_eq!(err.to_string(), "Error adding tag: Custom Error: connection reset");
    }
}
