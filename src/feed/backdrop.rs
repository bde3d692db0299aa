use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::content::ContentData;
use crate::feed::types::ContentItem;

/// Picks the landing-page background among starred images. The choice only
/// changes when `now` crosses into a new `bucket`-sized time window.
pub fn pick_backdrop<'a>(
    images: &'a [ContentItem],
    now: DateTime<Utc>,
    bucket: Duration,
) -> Option<&'a ContentItem> {
    let candidates: Vec<&ContentItem> = images
        .iter()
        .filter(|item| matches!(item.data, ContentData::Image(_)))
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let bucket_secs = bucket.as_secs().max(1);
    let window = now.timestamp().max(0) as u64 / bucket_secs;
    let index = (window % candidates.len() as u64) as usize;
    Some(candidates[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::testing::{content, image};
    use chrono::TimeZone;

    #[test]
    fn test_same_bucket_same_pick() {
        let images: Vec<ContentItem> = (0..3).map(|i| image(&format!("img-{i}"))).collect();
        let hour = Duration::from_secs(3600);
        let early = Utc.timestamp_opt(7200, 0).unwrap();
        let late = Utc.timestamp_opt(7200 + 3599, 0).unwrap();

        let a = pick_backdrop(&images, early, hour).unwrap();
        let b = pick_backdrop(&images, late, hour).unwrap();
        assert_eq!(a.id, b.id);
        assert_eq!(a.id, images[2].id);
    }

    #[test]
    fn test_next_bucket_rotates() {
        let images: Vec<ContentItem> = (0..3).map(|i| image(&format!("img-{i}"))).collect();
        let hour = Duration::from_secs(3600);
        let pick = pick_backdrop(&images, Utc.timestamp_opt(3 * 3600, 0).unwrap(), hour).unwrap();
        assert_eq!(pick.id, images[0].id);
    }

    #[test]
    fn test_non_images_are_ignored() {
        let items = vec![content("quote-ish")];
        assert!(pick_backdrop(&items, Utc::now(), Duration::from_secs(60)).is_none());
    }
}
