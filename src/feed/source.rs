use async_trait::async_trait;
use thiserror::Error;

use crate::feed::selection::SelectionQuery;
use crate::feed::types::{ContentItem, JoinRow, Tag};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FeedError {
    #[error("Upstream fetch failed: {0}")]
    Upstream(String),
}

/// The read side of the content store, as the results pipeline sees it.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// The whole tag catalog, ordered by name.
    async fn fetch_tags(&self) -> Result<Vec<Tag>, FeedError>;

    /// Every `(content, tag)` pairing whose tag is in `selection`.
    async fn fetch_join_rows(&self, selection: &SelectionQuery) -> Result<Vec<JoinRow>, FeedError>;

    /// Starred image items, oldest first.
    async fn fetch_starred_images(&self) -> Result<Vec<ContentItem>, FeedError>;
}
