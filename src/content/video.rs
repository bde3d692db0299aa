use url::Url;

const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Rewrites YouTube watch and short links to their embeddable form.
/// Any other URL, including one that is already an embed URL, is returned as given.
pub fn normalize_embed_url(raw: &str) -> String {
    let raw = raw.trim();

    if raw.contains("youtube.com/watch") {
        if let Some(video_id) = watch_video_id(raw) {
            return format!("{YOUTUBE_EMBED_BASE}{video_id}");
        }
    } else if let Some((_, rest)) = raw.split_once("youtu.be/") {
        let video_id = rest.split(['?', '#', '/']).next().unwrap_or_default();
        if !video_id.is_empty() {
            return format!("{YOUTUBE_EMBED_BASE}{video_id}");
        }
    }

    raw.to_string()
}

/// True for URLs that `normalize_embed_url` would turn into a YouTube embed.
pub fn is_youtube_url(raw: &str) -> bool {
    raw.contains("youtube.com/watch") || raw.contains("youtu.be/")
}

fn watch_video_id(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw).ok()?;
    parsed
        .query_pairs()
        .find(|(key, _)| key == "v")
        .map(|(_, value)| value.into_owned())
        .filter(|id| !id.is_empty())
}
