use std::collections::{HashMap, HashSet};

use tracing::debug;
use uuid::Uuid;

use crate::feed::selection::{MatchMode, SelectionQuery};
use crate::feed::types::{ContentItem, JoinRow, RankedContentItem, Tag};

/// Collapses join rows into one record per content item and counts how many of
/// the selected tags each item carries.
///
/// Rows without a content item are skipped. Items that end up matching none of the
/// selected tags are dropped. Emission order follows first appearance in `rows`.
pub fn score(selection: &SelectionQuery, rows: Vec<JoinRow>) -> Vec<RankedContentItem> {
    if selection.is_empty() {
        return Vec::new();
    }

    struct Entry {
        item: ContentItem,
        tags: Vec<Tag>,
        matched: HashSet<Uuid>,
    }

    let mut index: HashMap<Uuid, usize> = HashMap::new();
    let mut entries: Vec<Entry> = Vec::new();
    let mut orphaned = 0usize;

    for row in rows {
        let Some(item) = row.content_item else {
            orphaned += 1;
            continue;
        };

        let slot = *index.entry(item.id).or_insert_with(|| {
            entries.push(Entry {
                item,
                tags: Vec::new(),
                matched: HashSet::new(),
            });
            entries.len() - 1
        });
        let entry = &mut entries[slot];

        if let Some(tag) = row.tag {
            if !entry.tags.iter().any(|t| t.id == tag.id) {
                entry.tags.push(tag);
            }
        }
        if selection.contains(&row.tag_id) {
            entry.matched.insert(row.tag_id);
        }
    }

    if orphaned > 0 {
        debug!(orphaned, "Skipped join rows whose content item no longer exists.");
    }

    entries
        .into_iter()
        .filter(|entry| !entry.matched.is_empty())
        .map(|entry| RankedContentItem {
            match_count: entry.matched.len(),
            item: entry.item,
            tags: entry.tags,
        })
        .collect()
}

/// Applies the match mode to scored items. `All` keeps only items carrying every
/// selected tag.
pub fn filter_by_mode(
    items: Vec<RankedContentItem>,
    mode: MatchMode,
    selection: &SelectionQuery,
) -> Vec<RankedContentItem> {
    match mode {
        MatchMode::Any => items,
        MatchMode::All => items
            .into_iter()
            .filter(|item| item.match_count == selection.len())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::testing::{content, join_row, tag};

    #[test]
    fn test_empty_selection_scores_nothing() {
        let t = tag("calm");
        let rows = vec![join_row(&content("a"), &t)];
        assert!(score(&SelectionQuery::default(), rows).is_empty());
    }

    #[test]
    fn test_rows_collapse_to_one_item_with_match_count() {
        let calm = tag("calm");
        let sad = tag("sad");
        let item = content("a");
        let other = content("b");
        let selection = SelectionQuery::new([calm.id, sad.id]);

        let rows = vec![
            join_row(&item, &calm),
            join_row(&other, &sad),
            join_row(&item, &sad),
            join_row(&item, &calm),
        ];
        let scored = score(&selection, rows);

        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].item.id, item.id);
        assert_eq!(scored[0].match_count, 2);
        assert_eq!(scored[0].tags.len(), 2);
        assert_eq!(scored[1].item.id, other.id);
        assert_eq!(scored[1].match_count, 1);
    }

    #[test]
    fn test_orphaned_rows_are_skipped() {
        let calm = tag("calm");
        let item = content("a");
        let selection = SelectionQuery::new([calm.id]);
        let rows = vec![
            JoinRow { tag_id: calm.id, content_item: None, tag: Some(calm.clone()) },
            join_row(&item, &calm),
        ];

        let scored = score(&selection, rows);
        assert_eq!(scored.len(), 1);
        assert_eq!(scored[0].item.id, item.id);
    }

    #[test]
    fn test_items_outside_selection_are_excluded() {
        let calm = tag("calm");
        let angry = tag("angry");
        let item = content("a");
        let selection = SelectionQuery::new([calm.id]);

        let scored = score(&selection, vec![join_row(&item, &angry)]);
        assert!(scored.is_empty());
    }

    #[test]
    fn test_match_count_within_bounds_and_ids_distinct() {
        let tags: Vec<Tag> = ["a", "b", "c"].into_iter().map(tag).collect();
        let items: Vec<ContentItem> = (0..6).map(|i| content(&format!("item-{i}"))).collect();
        let selection = SelectionQuery::new(tags.iter().map(|t| t.id));

        let mut rows = Vec::new();
        for (i, item) in items.iter().enumerate() {
            for t in tags.iter().take(i % 3 + 1) {
                rows.push(join_row(item, t));
                rows.push(join_row(item, t));
            }
        }

        let scored = score(&selection, rows);
        let distinct: HashSet<Uuid> = scored.iter().map(|r| r.item.id).collect();
        assert_eq!(distinct.len(), items.len());
        assert_eq!(scored.len(), items.len());
        for ranked in &scored {
            assert!(ranked.match_count > 0 && ranked.match_count <= selection.len());
        }
    }

    #[test]
    fn test_all_mode_requires_every_tag() {
        let calm = tag("calm");
        let sad = tag("sad");
        let both = content("both");
        let one = content("one");
        let selection = SelectionQuery::new([calm.id, sad.id]);
        let rows = vec![join_row(&both, &calm), join_row(&both, &sad), join_row(&one, &sad)];

        let kept = filter_by_mode(score(&selection, rows), MatchMode::All, &selection);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].item.id, both.id);
    }
}
