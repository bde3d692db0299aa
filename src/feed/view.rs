use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use rand::Rng;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::feed::pagination::{PageSize, Paginator};
use crate::feed::scoring::{filter_by_mode, score};
use crate::feed::selection::{MatchMode, SelectionQuery};
use crate::feed::shuffle::banded_shuffle;
use crate::feed::source::ContentSource;
use crate::feed::types::{JoinRow, RankedContentItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Idle,
    Loading,
    Ready,
}

/// Identifies the selection a fetch was started for. Only the ticket of the
/// latest selection may resolve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    selection: SelectionQuery,
    match_mode: MatchMode,
}

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selection(&self) -> &SelectionQuery {
        &self.selection
    }
}

/// Full state of one results view. Every transition builds a new value.
#[derive(Debug, Clone)]
pub struct ResultsState {
    generation: u64,
    selection: SelectionQuery,
    match_mode: MatchMode,
    status: LoadStatus,
    feed: Paginator,
}

/// Scores, filters and orders join rows for a selection.
pub fn rank<R: Rng + ?Sized>(
    selection: &SelectionQuery,
    match_mode: MatchMode,
    rows: Vec<JoinRow>,
    rng: &mut R,
) -> Vec<RankedContentItem> {
    let scored = filter_by_mode(score(selection, rows), match_mode, selection);
    banded_shuffle(scored, rng)
}

impl ResultsState {
    pub fn new(size: PageSize) -> Self {
        ResultsState {
            generation: 0,
            selection: SelectionQuery::default(),
            match_mode: MatchMode::default(),
            status: LoadStatus::Idle,
            feed: Paginator::empty(size),
        }
    }

    /// Starts a new selection. An empty selection resolves immediately to an empty
    /// result and needs no fetch. Repeating the current selection keeps the
    /// ranked list, its order and the paging position as they are.
    pub fn begin(&self, selection: SelectionQuery, match_mode: MatchMode) -> (Self, Option<FetchTicket>) {
        if self.is_selected(&selection, match_mode) {
            return (self.clone(), None);
        }
        let generation = self.generation + 1;
        let size = self.feed.page_size();

        if selection.is_empty() {
            let next = ResultsState {
                generation,
                selection,
                match_mode,
                status: LoadStatus::Ready,
                feed: Paginator::empty(size),
            };
            return (next, None);
        }

        let ticket = FetchTicket {
            generation,
            selection: selection.clone(),
            match_mode,
        };
        let next = ResultsState {
            generation,
            selection,
            match_mode,
            status: LoadStatus::Loading,
            feed: Paginator::empty(size),
        };
        (next, Some(ticket))
    }

    /// True once `selection` under `match_mode` has been started on this state.
    pub fn is_selected(&self, selection: &SelectionQuery, match_mode: MatchMode) -> bool {
        self.status != LoadStatus::Idle && self.selection == *selection && self.match_mode == match_mode
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Applies fetched rows for `ticket`. Returns `None` when a newer selection has
    /// superseded the ticket; the rows are then discarded.
    pub fn resolve<R: Rng + ?Sized>(
        &self,
        ticket: &FetchTicket,
        rows: Vec<JoinRow>,
        rng: &mut R,
    ) -> Option<Self> {
        if !self.is_current(ticket) {
            return None;
        }
        let ranked = rank(&ticket.selection, ticket.match_mode, rows, rng);
        Some(ResultsState {
            generation: self.generation,
            selection: self.selection.clone(),
            match_mode: self.match_mode,
            status: LoadStatus::Ready,
            feed: Paginator::new(ranked, self.feed.page_size()),
        })
    }

    pub fn load_more(&self) -> Self {
        ResultsState {
            feed: self.feed.load_more(),
            ..self.clone()
        }
    }

    pub fn next_page(&self) -> Self {
        ResultsState {
            feed: self.feed.next_page(),
            ..self.clone()
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn selection(&self) -> &SelectionQuery {
        &self.selection
    }

    pub fn match_mode(&self) -> MatchMode {
        self.match_mode
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn feed(&self) -> &Paginator {
        &self.feed
    }
}

#[derive(Debug, Clone)]
pub enum SelectOutcome {
    /// The selection's results are now the view's state.
    Applied(Arc<ResultsState>),
    /// A newer selection took over while this one was fetching.
    Superseded(Arc<ResultsState>),
}

impl SelectOutcome {
    pub fn state(&self) -> &Arc<ResultsState> {
        match self {
            SelectOutcome::Applied(state) | SelectOutcome::Superseded(state) => state,
        }
    }
}

/// A single results view: the state container one consumer pages through.
#[derive(Debug)]
pub struct ResultsView {
    id: Uuid,
    state: Mutex<Arc<ResultsState>>,
    last_seen_ms: AtomicI64,
}

impl ResultsView {
    pub fn new(size: PageSize) -> Self {
        ResultsView {
            id: Uuid::new_v4(),
            state: Mutex::new(Arc::new(ResultsState::new(size))),
            last_seen_ms: AtomicI64::new(Utc::now().timestamp_millis()),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn last_seen_ms(&self) -> i64 {
        self.last_seen_ms.load(Ordering::Relaxed)
    }

    fn touch(&self) {
        self.last_seen_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    pub async fn snapshot(&self) -> Arc<ResultsState> {
        self.touch();
        self.state.lock().await.clone()
    }

    /// Runs the whole pipeline for a new selection. The lock is not held while
    /// fetching; a fetch whose selection was replaced in the meantime is dropped.
    /// Fetch failures count as an empty result.
    pub async fn select(
        &self,
        source: &dyn ContentSource,
        selection: SelectionQuery,
        match_mode: MatchMode,
    ) -> SelectOutcome {
        self.touch();
        let ticket = {
            let mut guard = self.state.lock().await;
            if guard.is_selected(&selection, match_mode) {
                debug!(view_id = %self.id, generation = guard.generation(), "Selection unchanged, keeping results.");
                return SelectOutcome::Applied(guard.clone());
            }
            let (next, ticket) = guard.begin(selection, match_mode);
            *guard = Arc::new(next);
            match ticket {
                Some(ticket) => ticket,
                None => {
                    debug!(view_id = %self.id, "Empty selection, skipping fetch.");
                    return SelectOutcome::Applied(guard.clone());
                }
            }
        };

        let rows = match source.fetch_join_rows(ticket.selection()).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(view_id = %self.id, generation = ticket.generation(), error = %e, "Join fetch failed, showing no results.");
                Vec::new()
            }
        };

        let mut guard = self.state.lock().await;
        let resolved = {
            let mut rng = rand::rng();
            guard.resolve(&ticket, rows, &mut rng)
        };
        match resolved {
            Some(next) => {
                info!(
                    view_id = %self.id,
                    generation = next.generation(),
                    tag_count = next.selection().len(),
                    item_count = next.feed().total(),
                    "Results ready."
                );
                *guard = Arc::new(next);
                SelectOutcome::Applied(guard.clone())
            }
            None => {
                debug!(
                    view_id = %self.id,
                    stale_generation = ticket.generation(),
                    current_generation = guard.generation(),
                    "Discarding results for a superseded selection."
                );
                SelectOutcome::Superseded(guard.clone())
            }
        }
    }

    pub async fn load_more(&self) -> Arc<ResultsState> {
        self.touch();
        let mut guard = self.state.lock().await;
        *guard = Arc::new(guard.load_more());
        guard.clone()
    }

    pub async fn next_page(&self) -> Arc<ResultsState> {
        self.touch();
        let mut guard = self.state.lock().await;
        *guard = Arc::new(guard.next_page());
        guard.clone()
    }
}
