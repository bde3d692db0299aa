use sea_orm::{ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, Schema};
use tracing::info;

use crate::db::entities::{content_item, content_tag, tag};

/// Creates the tables this service owns when they do not exist yet.
/// Link table last, since it references the other two.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_if_missing(db, tag::Entity).await?;
    create_if_missing(db, content_item::Entity).await?;
    create_if_missing(db, content_tag::Entity).await?;
    info!("Database schema is in place.");
    Ok(())
}

async fn create_if_missing<E: EntityTrait>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);
    let mut statement = schema.create_table_from_entity(entity);
    db.execute(backend.build(statement.if_not_exists())).await?;
    Ok(())
}
