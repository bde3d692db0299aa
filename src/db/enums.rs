use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "content_type_enum")]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[sea_orm(string_value = "text")]
    Text,
    #[sea_orm(string_value = "quote")]
    Quote,
    #[sea_orm(string_value = "link")]
    Link,
    #[sea_orm(string_value = "image")]
    Image,
    #[sea_orm(string_value = "video")]
    Video,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Quote => "quote",
            ContentType::Link => "link",
            ContentType::Image => "image",
            ContentType::Video => "video",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
