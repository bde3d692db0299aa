pub mod content_service;
pub mod tag_service;

pub use content_service::ContentServiceError;
pub use tag_service::TagServiceError;
