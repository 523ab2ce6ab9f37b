//! Open repository list views.
//!
//! Opening a list page issues a [`ViewId`] and a list view in the `Loading`
//! state. The first data request for that id fetches the user's repositories;
//! filter, sort and "load more" requests carrying the same id re-derive from
//! that list without going back to GitHub. A view lives until it expires or
//! is evicted to make room for newer ones.

use std::collections::HashMap;
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard, OnceCell};
use tracing::{debug, warn};

use crate::github::GitHubClient;
use crate::view::{Generation, RepositoryListView};

/// Identifies one open list view across its page, fragment and JSON requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ViewId(u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ViewId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(ViewId)
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long a view keeps its fetched list.
    pub ttl: Duration,
    /// Open views kept at once; the oldest is evicted past this.
    pub max_views: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30 * 60),
            max_views: 1024,
        }
    }
}

/// One visitor's list view: the username it was opened for and the list
/// state derived from a single fetch.
pub struct ListSession {
    id: ViewId,
    username: String,
    generation: Generation,
    opened_at: Instant,
    fetched: OnceCell<()>,
    view: Mutex<RepositoryListView>,
}

impl ListSession {
    fn new(id: ViewId, username: &str) -> Self {
        let mut view = RepositoryListView::new();
        let generation = view.begin(username);
        ListSession {
            id,
            username: username.to_string(),
            generation,
            opened_at: Instant::now(),
            fetched: OnceCell::new(),
            view: Mutex::new(view),
        }
    }

    pub fn id(&self) -> ViewId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Whether the fetch for this view has already completed.
    pub fn is_fetched(&self) -> bool {
        self.fetched.initialized()
    }

    /// Runs the view's one fetch. Concurrent callers wait for the same fetch;
    /// later callers return immediately.
    pub async fn ensure_loaded(&self, github: &GitHubClient) {
        self.fetched
            .get_or_init(|| async {
                let result = github.list_user_repositories(&self.username).await;
                let mut view = self.view.lock().await;
                if !view.complete(self.generation, result) {
                    warn!(view = %self.id, username = %self.username, "List fetch superseded");
                }
            })
            .await;
    }

    /// Exclusive access to the list state for applying a request's filter,
    /// sort and page.
    pub async fn view(&self) -> MutexGuard<'_, RepositoryListView> {
        self.view.lock().await
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.opened_at.elapsed() >= ttl
    }
}

pub struct SessionStore {
    next_id: AtomicU64,
    config: SessionConfig,
    sessions: Mutex<HashMap<ViewId, Arc<ListSession>>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SessionStore {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            config,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Opens a new view for `username` in the `Loading` state.
    pub async fn open(&self, username: &str) -> Arc<ListSession> {
        let id = ViewId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let session = Arc::new(ListSession::new(id, username));

        let mut sessions = self.sessions.lock().await;
        let ttl = self.config.ttl;
        sessions.retain(|_, open| !open.is_expired(ttl));

        while sessions.len() >= self.config.max_views.max(1) {
            let oldest = sessions
                .values()
                .min_by_key(|open| (open.opened_at, open.id.0))
                .map(|open| open.id);
            match oldest {
                Some(oldest) => {
                    debug!(view = %oldest, "Evicting list view");
                    sessions.remove(&oldest);
                }
                None => break,
            }
        }

        sessions.insert(id, Arc::clone(&session));
        debug!(view = %id, username, open = sessions.len(), "Opened list view");
        session
    }

    /// The live view `id`, if it was opened for `username` (compared
    /// case-insensitively, like GitHub logins) and has not expired.
    pub async fn get(&self, id: ViewId, username: &str) -> Option<Arc<ListSession>> {
        let mut sessions = self.sessions.lock().await;
        if sessions.get(&id)?.is_expired(self.config.ttl) {
            sessions.remove(&id);
            return None;
        }

        let session = sessions.get(&id)?;
        if !session.username.eq_ignore_ascii_case(username) {
            return None;
        }
        Some(Arc::clone(session))
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
