use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::db::enums::ContentType;

/// The typed payload of a content item. Serialized adjacently tagged, so an item
/// renders as `"content_type": "...", "content_data": {...}` on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "content_type", content = "content_data", rename_all = "lowercase")]
pub enum ContentData {
    Text(TextData),
    Quote(QuoteData),
    Link(LinkData),
    Image(ImageData),
    Video(VideoData),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextData {
    /// May contain HTML.
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteData {
    pub quote: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkData {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageData {
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoData {
    pub embed_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl ContentData {
    pub fn content_type(&self) -> ContentType {
        match self {
            ContentData::Text(_) => ContentType::Text,
            ContentData::Quote(_) => ContentType::Quote,
            ContentData::Link(_) => ContentType::Link,
            ContentData::Image(_) => ContentType::Image,
            ContentData::Video(_) => ContentType::Video,
        }
    }

    /// Rebuilds the payload from the stored `content_type` column and the raw
    /// `content_data` JSON column.
    pub fn from_parts(content_type: ContentType, value: Value) -> Result<Self, serde_json::Error> {
        Ok(match content_type {
            ContentType::Text => ContentData::Text(serde_json::from_value(value)?),
            ContentType::Quote => ContentData::Quote(serde_json::from_value(value)?),
            ContentType::Link => ContentData::Link(serde_json::from_value(value)?),
            ContentType::Image => ContentData::Image(serde_json::from_value(value)?),
            ContentType::Video => ContentData::Video(serde_json::from_value(value)?),
        })
    }

    /// The JSON stored in the `content_data` column.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        match self {
            ContentData::Text(data) => serde_json::to_value(data),
            ContentData::Quote(data) => serde_json::to_value(data),
            ContentData::Link(data) => serde_json::to_value(data),
            ContentData::Image(data) => serde_json::to_value(data),
            ContentData::Video(data) => serde_json::to_value(data),
        }
    }

    pub fn caption(&self) -> Option<&str> {
        match self {
            ContentData::Image(data) => data.caption.as_deref(),
            ContentData::Video(data) => data.caption.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quote_from_parts_keeps_optional_source_url() {
        let data = ContentData::from_parts(
            ContentType::Quote,
            json!({ "quote": "Still I rise", "source": "Maya Angelou", "sourceUrl": "https://example.org" }),
        )
        .unwrap();

        assert_eq!(
            data,
            ContentData::Quote(QuoteData {
                quote: "Still I rise".to_string(),
                source: "Maya Angelou".to_string(),
                source_url: Some("https://example.org".to_string()),
            })
        );
        assert_eq!(data.content_type(), ContentType::Quote);
    }

    #[test]
    fn test_from_parts_rejects_shape_of_another_type() {
        let result = ContentData::from_parts(ContentType::Image, json!({ "url": "https://example.org" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_stored_value_omits_missing_caption() {
        let data = ContentData::Image(ImageData {
            image_url: "https://img.example/cat.png".to_string(),
            caption: None,
        });
        assert_eq!(data.to_value().unwrap(), json!({ "imageUrl": "https://img.example/cat.png" }));
    }

    #[test]
    fn test_wire_format_is_adjacently_tagged() {
        let data = ContentData::Video(VideoData {
            embed_url: "https://www.youtube.com/embed/abc".to_string(),
            caption: Some("<em>calm</em>".to_string()),
        });
        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(
            value,
            json!({
                "content_type": "video",
                "content_data": { "embedUrl": "https://www.youtube.com/embed/abc", "caption": "<em>calm</em>" }
            })
        );
        assert_eq!(data.caption(), Some("<em>calm</em>"));
    }
}
