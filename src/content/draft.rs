use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::content::data::{ContentData, ImageData, LinkData, QuoteData, TextData, VideoData};
use crate::content::video::normalize_embed_url;
use crate::db::enums::ContentType;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Title and at least one tag required")]
    MissingTitleOrTags,
    #[error("{message}")]
    MissingField {
        content_type: ContentType,
        message: &'static str,
    },
    #[error("Invalid content_data for {content_type}: {message}")]
    MalformedData {
        content_type: ContentType,
        message: String,
    },
}

/// Content as submitted by the admin form, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentDraft {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub content_type: ContentType,
    #[serde(default)]
    pub content_data: Value,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub is_starred: bool,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

/// Validated content, ready to be written together with its tag links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContent {
    pub title: String,
    pub description: String,
    pub data: ContentData,
    pub file_url: Option<String>,
    pub is_starred: bool,
    pub tag_ids: Vec<Uuid>,
}

impl ContentDraft {
    pub fn validate(self) -> Result<NewContent, ValidationError> {
        if self.title.trim().is_empty() || self.tag_ids.is_empty() {
            return Err(ValidationError::MissingTitleOrTags);
        }
        let data = ContentData::from_parts(self.content_type, self.content_data).map_err(|e| {
            ValidationError::MalformedData {
                content_type: self.content_type,
                message: e.to_string(),
            }
        })?;
        NewContent::build(
            self.title,
            self.description,
            self.tag_ids,
            self.file_url,
            self.is_starred,
            data,
        )
    }
}

impl NewContent {
    /// Checks the fields every producer must supply and normalizes the payload:
    /// blank optional strings are dropped and video URLs are rewritten to embeds.
    pub fn build(
        title: String,
        description: String,
        tag_ids: Vec<Uuid>,
        file_url: Option<String>,
        is_starred: bool,
        data: ContentData,
    ) -> Result<Self, ValidationError> {
        let title = title.trim().to_string();
        if title.is_empty() || tag_ids.is_empty() {
            return Err(ValidationError::MissingTitleOrTags);
        }

        let mut unique_tag_ids = Vec::with_capacity(tag_ids.len());
        for id in tag_ids {
            if !unique_tag_ids.contains(&id) {
                unique_tag_ids.push(id);
            }
        }

        Ok(NewContent {
            title,
            description: description.trim().to_string(),
            data: normalize_data(data)?,
            file_url: non_blank(file_url),
            is_starred,
            tag_ids: unique_tag_ids,
        })
    }
}

fn normalize_data(data: ContentData) -> Result<ContentData, ValidationError> {
    match data {
        ContentData::Text(TextData { text }) => {
            if text.trim().is_empty() {
                return missing(ContentType::Text, "Text content required");
            }
            Ok(ContentData::Text(TextData { text }))
        }
        ContentData::Quote(QuoteData { quote, source, source_url }) => {
            if quote.trim().is_empty() || source.trim().is_empty() {
                return missing(ContentType::Quote, "Quote and source required");
            }
            Ok(ContentData::Quote(QuoteData {
                quote,
                source: source.trim().to_string(),
                source_url: non_blank(source_url),
            }))
        }
        ContentData::Link(LinkData { url }) => {
            if url.trim().is_empty() {
                return missing(ContentType::Link, "URL required");
            }
            Ok(ContentData::Link(LinkData { url: url.trim().to_string() }))
        }
        ContentData::Image(ImageData { image_url, caption }) => {
            if image_url.trim().is_empty() {
                return missing(ContentType::Image, "Image URL required");
            }
            Ok(ContentData::Image(ImageData {
                image_url: image_url.trim().to_string(),
                caption: non_blank(caption),
            }))
        }
        ContentData::Video(VideoData { embed_url, caption }) => {
            if embed_url.trim().is_empty() {
                return missing(ContentType::Video, "Video embed URL required");
            }
            Ok(ContentData::Video(VideoData {
                embed_url: normalize_embed_url(&embed_url),
                caption: non_blank(caption),
            }))
        }
    }
}

fn missing(content_type: ContentType, message: &'static str) -> Result<ContentData, ValidationError> {
    Err(ValidationError::MissingField { content_type, message })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(content_type: ContentType, content_data: Value) -> ContentDraft {
        ContentDraft {
            title: "  Breathe  ".to_string(),
            description: String::new(),
            content_type,
            content_data,
            file_url: None,
            is_starred: false,
            tag_ids: vec![Uuid::new_v4()],
        }
    }

    #[test]
    fn test_title_and_tags_are_required() {
        let mut no_tags = draft(ContentType::Text, json!({ "text": "hello" }));
        no_tags.tag_ids.clear();
        assert_eq!(no_tags.validate(), Err(ValidationError::MissingTitleOrTags));

        let mut blank_title = draft(ContentType::Text, json!({ "text": "hello" }));
        blank_title.title = "   ".to_string();
        assert_eq!(blank_title.validate(), Err(ValidationError::MissingTitleOrTags));
    }

    #[test]
    fn test_quote_requires_quote_and_source() {
        let err = draft(ContentType::Quote, json!({ "quote": "words", "source": " " }))
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "Quote and source required");
    }

    #[test]
    fn test_missing_json_field_is_malformed() {
        let err = draft(ContentType::Link, json!({})).validate().unwrap_err();
        assert!(matches!(
            err,
            ValidationError::MalformedData { content_type: ContentType::Link, .. }
        ));
    }

    #[test]
    fn test_video_is_normalized_and_blank_caption_dropped() {
        let content = draft(
            ContentType::Video,
            json!({ "embedUrl": "https://youtu.be/abc123", "caption": "" }),
        )
        .validate()
        .unwrap();

        assert_eq!(content.title, "Breathe");
        assert_eq!(
            content.data,
            ContentData::Video(VideoData {
                embed_url: "https://www.youtube.com/embed/abc123".to_string(),
                caption: None,
            })
        );
    }

    #[test]
    fn test_duplicate_tag_ids_are_collapsed() {
        let tag = Uuid::new_v4();
        let content = NewContent::build(
            "Hold on".to_string(),
            String::new(),
            vec![tag, tag],
            Some(" ".to_string()),
            true,
            ContentData::Link(LinkData { url: "https://example.org".to_string() }),
        )
        .unwrap();

        assert_eq!(content.tag_ids, vec![tag]);
        assert_eq!(content.file_url, None);
        assert!(content.is_starred);
    }
}
