use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::db::enums::ContentType;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "content_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub content_type: ContentType,
    /// Shape depends on `content_type`; see `crate::content::ContentData`.
    #[sea_orm(column_type = "JsonBinary")]
    pub content_data: Json,
    pub file_url: Option<String>,
    pub is_starred: bool,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::content_tag::Entity")]
    ContentTag,
}

impl Related<super::content_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContentTag.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::content_tag::Relation::Tag.def()
    }
    fn via() -> Option<RelationDef> {
        Some(super::content_tag::Relation::ContentItem.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
