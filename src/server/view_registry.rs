use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time;
use tracing::{debug, info};
use uuid::Uuid;

use crate::feed::{PageSize, ResultsView};

/// Live results views, one per browsing session, keyed by view id.
/// Views nobody has touched for longer than the TTL are dropped by a
/// background sweep. At most `max_views` are kept; opening one more drops
/// the least recently seen.
#[derive(Debug)]
pub struct ViewRegistry {
    views: DashMap<Uuid, Arc<ResultsView>>,
    page_size: PageSize,
    max_views: usize,
}

impl ViewRegistry {
    pub fn new(page_size: PageSize, max_views: usize) -> Self {
        Self {
            views: DashMap::new(),
            page_size,
            max_views: max_views.max(1),
        }
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn create(&self) -> Arc<ResultsView> {
        while self.views.len() >= self.max_views {
            let Some(oldest) = self
                .views
                .iter()
                .min_by_key(|entry| entry.value().last_seen_ms())
                .map(|entry| *entry.key())
            else {
                break;
            };
            self.views.remove(&oldest);
            debug!(view_id = %oldest, max_views = self.max_views, "Dropped least recently seen view.");
        }
        let view = Arc::new(ResultsView::new(self.page_size));
        self.views.insert(view.id(), Arc::clone(&view));
        debug!(view_id = %view.id(), "Results view created.");
        view
    }

    pub fn get(&self, view_id: &Uuid) -> Option<Arc<ResultsView>> {
        self.views.get(view_id).map(|entry| Arc::clone(entry.value()))
    }

    pub fn remove(&self, view_id: &Uuid) -> bool {
        self.views.remove(view_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.views.len()
    }

    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Drops every view last seen more than `ttl` before `now_ms`. Returns how
    /// many were dropped.
    pub fn evict_idle(&self, ttl: Duration, now_ms: i64) -> usize {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        let before = self.views.len();
        self.views
            .retain(|_, view| now_ms.saturating_sub(view.last_seen_ms()) <= ttl_ms);
        before.saturating_sub(self.views.len())
    }

    /// Spawns the periodic idle sweep. The sweep runs at a tenth of the TTL,
    /// but at least once a second.
    pub fn spawn_eviction(self: &Arc<Self>, ttl: Duration) -> JoinHandle<()> {
        let registry = Arc::clone(self);
        let period = (ttl / 10).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut interval = time::interval(period);
            loop {
                interval.tick().await;
                let evicted = registry.evict_idle(ttl, Utc::now().timestamp_millis());
                if evicted > 0 {
                    info!(evicted, remaining = registry.len(), "Evicted idle results views.");
                }
            }
        })
    }
}
