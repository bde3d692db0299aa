//! Fixtures shared by the feed and web tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Notify;
use uuid::Uuid;

use crate::content::{ContentData, ImageData, TextData};
use crate::feed::selection::SelectionQuery;
use crate::feed::source::{ContentSource, FeedError};
use crate::feed::types::{ContentItem, JoinRow, RankedContentItem, Tag};

pub fn tag(name: &str) -> Tag {
    Tag {
        id: Uuid::new_v4(),
        name: name.to_string(),
    }
}

pub fn content(title: &str) -> ContentItem {
    ContentItem {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: String::new(),
        data: ContentData::Text(TextData {
            text: format!("<p>{title}</p>"),
        }),
        file_url: None,
        is_starred: false,
        created_at: Utc::now(),
    }
}

pub fn image(title: &str) -> ContentItem {
    ContentItem {
        data: ContentData::Image(ImageData {
            image_url: format!("https://img.example/{title}.png"),
            caption: None,
        }),
        is_starred: true,
        ..content(title)
    }
}

pub fn join_row(item: &ContentItem, tag: &Tag) -> JoinRow {
    JoinRow {
        tag_id: tag.id,
        content_item: Some(item.clone()),
        tag: Some(tag.clone()),
    }
}

pub fn ranked(item: ContentItem, match_count: usize) -> RankedContentItem {
    RankedContentItem {
        item,
        tags: Vec::new(),
        match_count,
    }
}

/// In-memory content store keyed by item, each item carrying its tags.
#[derive(Default)]
pub struct MemorySource {
    tags: Vec<Tag>,
    items: Vec<(ContentItem, Vec<Tag>)>,
    fail: bool,
}

impl MemorySource {
    pub fn new(tags: Vec<Tag>, items: Vec<(ContentItem, Vec<Tag>)>) -> Self {
        MemorySource { tags, items, fail: false }
    }

    pub fn failing() -> Self {
        MemorySource {
            fail: true,
            ..MemorySource::default()
        }
    }

    fn check(&self) -> Result<(), FeedError> {
        if self.fail {
            return Err(FeedError::Upstream("connection refused".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContentSource for MemorySource {
    async fn fetch_tags(&self) -> Result<Vec<Tag>, FeedError> {
        self.check()?;
        let mut tags = self.tags.clone();
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }

    async fn fetch_join_rows(&self, selection: &SelectionQuery) -> Result<Vec<JoinRow>, FeedError> {
        self.check()?;
        let rows = self
            .items
            .iter()
            .flat_map(|(item, tags)| {
                tags.iter()
                    .filter(move |t| selection.contains(&t.id))
                    .map(move |t| join_row(item, t))
            })
            .collect();
        Ok(rows)
    }

    async fn fetch_starred_images(&self) -> Result<Vec<ContentItem>, FeedError> {
        self.check()?;
        Ok(self
            .items
            .iter()
            .map(|(item, _)| item)
            .filter(|item| item.is_starred && matches!(item.data, ContentData::Image(_)))
            .cloned()
            .collect())
    }
}

/// Wraps a `MemorySource` and holds back any join fetch that includes `gate_tag`
/// until `release` is called.
pub struct GatedSource {
    gate_tag: Uuid,
    inner: MemorySource,
    entered: Notify,
    gate: Notify,
}

impl GatedSource {
    pub fn new(gate_tag: Uuid, inner: MemorySource) -> Self {
        GatedSource {
            gate_tag,
            inner,
            entered: Notify::new(),
            gate: Notify::new(),
        }
    }

    pub async fn wait_until_entered(&self) {
        self.entered.notified().await;
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }
}

#[async_trait]
impl ContentSource for GatedSource {
    async fn fetch_tags(&self) -> Result<Vec<Tag>, FeedError> {
        self.inner.fetch_tags().await
    }

    async fn fetch_join_rows(&self, selection: &SelectionQuery) -> Result<Vec<JoinRow>, FeedError> {
        if selection.contains(&self.gate_tag) {
            self.entered.notify_one();
            self.gate.notified().await;
        }
        self.inner.fetch_join_rows(selection).await
    }

    async fn fetch_starred_images(&self) -> Result<Vec<ContentItem>, FeedError> {
        self.inner.fetch_starred_images().await
    }
}

/// Wraps a `MemorySource` and counts join fetches.
pub struct CountingSource {
    inner: MemorySource,
    join_fetches: AtomicUsize,
}

impl CountingSource {
    pub fn new(inner: MemorySource) -> Self {
        CountingSource {
            inner,
            join_fetches: AtomicUsize::new(0),
        }
    }

    pub fn join_fetches(&self) -> usize {
        self.join_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContentSource for CountingSource {
    async fn fetch_tags(&self) -> Result<Vec<Tag>, FeedError> {
        self.inner.fetch_tags().await
    }

    async fn fetch_join_rows(&self, selection: &SelectionQuery) -> Result<Vec<JoinRow>, FeedError> {
        self.join_fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch_join_rows(selection).await
    }

    async fn fetch_starred_images(&self) -> Result<Vec<ContentItem>, FeedError> {
        self.inner.fetch_starred_images().await
    }
}
