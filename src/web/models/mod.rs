use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::feed::{LoadStatus, MatchMode, RankedContentItem, ResultsState, SelectionQuery};

/// Query string of the results endpoints: `?tags=<id>,<id>&match=any|all`.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionParams {
    #[serde(default)]
    pub tags: String,
    #[serde(default, rename = "match")]
    pub match_mode: MatchMode,
}

impl SelectionParams {
    pub fn selection(&self) -> SelectionQuery {
        SelectionQuery::parse(&self.tags)
    }
}

/// One rendering of a results view.
#[derive(Debug, Serialize)]
pub struct ResultsPage {
    pub view_id: Uuid,
    pub generation: u64,
    pub status: LoadStatus,
    pub selection: SelectionQuery,
    pub match_mode: MatchMode,
    /// Items of the current page displayed so far.
    pub items: Vec<RankedContentItem>,
    /// The part of `items` added by the step that produced this page.
    pub new_items: Vec<RankedContentItem>,
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
    pub has_more: bool,
    pub has_next_page: bool,
    pub scroll_to_top: bool,
    /// Set when the request's selection was replaced by a newer one before its
    /// results arrived; the page then shows the newer selection's state.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub superseded: bool,
}

impl ResultsPage {
    pub fn from_state(view_id: Uuid, state: &ResultsState) -> Self {
        let feed = state.feed();
        ResultsPage {
            view_id,
            generation: state.generation(),
            status: state.status(),
            selection: state.selection().clone(),
            match_mode: state.match_mode(),
            items: feed.displayed().to_vec(),
            new_items: feed.new_items().to_vec(),
            total: feed.total(),
            page: feed.page(),
            page_count: feed.page_count(),
            has_more: feed.has_more(),
            has_next_page: feed.has_next_page(),
            scroll_to_top: feed.scroll_to_top(),
            superseded: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct TagNameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct StarRequest {
    pub is_starred: bool,
}
