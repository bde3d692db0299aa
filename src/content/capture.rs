use serde::Deserialize;
use uuid::Uuid;

use crate::content::data::{ContentData, ImageData, LinkData, QuoteData, TextData, VideoData};
use crate::content::draft::{NewContent, ValidationError};
use crate::content::video::is_youtube_url;

/// What the browser extension clipped.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Capture {
    Image { url: String },
    Text { text: String },
    Quote { quote: String },
    Video { url: String },
    Link { url: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedPage {
    #[serde(flatten)]
    pub capture: Capture,
    pub page_url: String,
    #[serde(default)]
    pub page_title: Option<String>,
}

/// A capture plus the title, caption and tags the user picked in the popup.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureSubmission {
    pub capture: CapturedPage,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

impl CapturedPage {
    /// Capture of the whole page the extension was opened on.
    pub fn current_page(url: &str, title: Option<String>) -> Self {
        let capture = if is_youtube_url(url) {
            Capture::Video { url: url.to_string() }
        } else {
            Capture::Link { url: url.to_string() }
        };
        CapturedPage {
            capture,
            page_url: url.to_string(),
            page_title: title,
        }
    }
}

impl CaptureSubmission {
    pub fn into_new_content(self) -> Result<NewContent, ValidationError> {
        let CapturedPage { capture, page_url, page_title } = self.capture;

        let title = if self.title.trim().is_empty() {
            page_title.clone().unwrap_or_default()
        } else {
            self.title
        };
        let caption = Some(self.caption).filter(|c| !c.trim().is_empty());

        let data = match capture {
            Capture::Image { url } => ContentData::Image(ImageData { image_url: url, caption }),
            Capture::Text { text } => ContentData::Text(TextData { text }),
            Capture::Quote { quote } => ContentData::Quote(QuoteData {
                quote,
                source: page_title.unwrap_or_else(|| page_url.clone()),
                source_url: Some(page_url),
            }),
            Capture::Video { url } => ContentData::Video(VideoData { embed_url: url, caption }),
            Capture::Link { url } => ContentData::Link(LinkData { url }),
        };

        NewContent::build(title, String::new(), self.tag_ids, None, false, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_current_page_classification() {
        let video = CapturedPage::current_page("https://www.youtube.com/watch?v=xyz", None);
        assert!(matches!(video.capture, Capture::Video { .. }));

        let link = CapturedPage::current_page("https://example.org/article", Some("Article".to_string()));
        assert_eq!(link.capture, Capture::Link { url: "https://example.org/article".to_string() });
    }

    #[test]
    fn test_image_submission_from_json() {
        let tag = Uuid::new_v4();
        let submission: CaptureSubmission = serde_json::from_value(json!({
            "capture": { "type": "image", "url": "https://img.example/a.png", "pageUrl": "https://img.example" },
            "title": "Soft light",
            "caption": "via <a href=\"https://img.example\">img</a>",
            "tag_ids": [tag],
        }))
        .unwrap();

        let content = submission.into_new_content().unwrap();
        assert_eq!(content.title, "Soft light");
        assert_eq!(content.tag_ids, vec![tag]);
        assert_eq!(
            content.data,
            ContentData::Image(ImageData {
                image_url: "https://img.example/a.png".to_string(),
                caption: Some("via <a href=\"https://img.example\">img</a>".to_string()),
            })
        );
    }

    #[test]
    fn test_quote_uses_page_as_source_and_title() {
        let submission = CaptureSubmission {
            capture: CapturedPage {
                capture: Capture::Quote { quote: "<pre>breathe in</pre>".to_string() },
                page_url: "https://poems.example/1".to_string(),
                page_title: Some("A poem".to_string()),
            },
            title: String::new(),
            caption: "ignored for quotes".to_string(),
            tag_ids: vec![Uuid::new_v4()],
        };

        let content = submission.into_new_content().unwrap();
        assert_eq!(content.title, "A poem");
        assert_eq!(
            content.data,
            ContentData::Quote(QuoteData {
                quote: "<pre>breathe in</pre>".to_string(),
                source: "A poem".to_string(),
                source_url: Some("https://poems.example/1".to_string()),
            })
        );
    }

    #[test]
    fn test_video_capture_is_normalized() {
        let submission = CaptureSubmission {
            capture: CapturedPage::current_page("https://youtu.be/q1w2e3", Some("Rain".to_string())),
            title: "Rain sounds".to_string(),
            caption: String::new(),
            tag_ids: vec![Uuid::new_v4()],
        };

        let content = submission.into_new_content().unwrap();
        assert_eq!(
            content.data,
            ContentData::Video(VideoData {
                embed_url: "https://www.youtube.com/embed/q1w2e3".to_string(),
                caption: None,
            })
        );
    }

    #[test]
    fn test_submission_without_tags_is_rejected() {
        let submission = CaptureSubmission {
            capture: CapturedPage::current_page("https://example.org", Some("Example".to_string())),
            title: String::new(),
            caption: String::new(),
            tag_ids: Vec::new(),
        };
        assert_eq!(submission.into_new_content(), Err(ValidationError::MissingTitleOrTags));
    }
}
