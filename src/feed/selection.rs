use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// The set of tag ids a visitor picked. Duplicates are collapsed and the ids are
/// kept sorted, so two selections with the same ids compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SelectionQuery {
    tag_ids: Vec<Uuid>,
}

/// Whether an item needs any one of the selected tags or all of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    #[default]
    Any,
    All,
}

impl SelectionQuery {
    pub fn new(ids: impl IntoIterator<Item = Uuid>) -> Self {
        let unique: BTreeSet<Uuid> = ids.into_iter().collect();
        SelectionQuery {
            tag_ids: unique.into_iter().collect(),
        }
    }

    /// Parses the `tags` query parameter: a comma-separated id list. Blank entries
    /// and entries that are not valid ids are skipped, since they can never match a tag.
    pub fn parse(raw: &str) -> Self {
        let ids = raw
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .filter_map(|token| match Uuid::parse_str(token) {
                Ok(id) => Some(id),
                Err(e) => {
                    debug!(token, error = %e, "Ignoring malformed tag id in selection.");
                    None
                }
            });
        SelectionQuery::new(ids)
    }

    pub fn tag_ids(&self) -> &[Uuid] {
        &self.tag_ids
    }

    pub fn contains(&self, tag_id: &Uuid) -> bool {
        self.tag_ids.binary_search(tag_id).is_ok()
    }

    pub fn len(&self) -> usize {
        self.tag_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tag_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dedups_and_ignores_junk() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let raw = format!(" {a},{b},,not-an-id,{a} ");

        let selection = SelectionQuery::parse(&raw);
        assert_eq!(selection.len(), 2);
        assert!(selection.contains(&a));
        assert!(selection.contains(&b));
    }

    #[test]
    fn test_order_does_not_matter() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(SelectionQuery::new([a, b]), SelectionQuery::new([b, a, b]));
    }

    #[test]
    fn test_empty_parameter_is_empty_selection() {
        assert!(SelectionQuery::parse("").is_empty());
        assert!(SelectionQuery::parse(" , ,").is_empty());
    }
}
