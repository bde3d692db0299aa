//! SeaORM entities for the tag catalog, the content store and the
//! many-to-many links between them.

pub mod content_item;
pub mod content_tag;
pub mod tag;
