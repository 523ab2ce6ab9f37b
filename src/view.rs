//! Fetch-and-display view state.
//!
//! A view performs one fetch per identifying key (a username, or a
//! username/repository pair). Every fetch is tagged with a [`Generation`];
//! only the completion carrying the latest generation is applied, so a slow
//! response for a superseded key can never overwrite fresher state.

use crate::error::ExplorerError;
use crate::pipeline::{self, DerivedView, LanguageFilter, SortOrder};
use crate::types::Repository;
use serde::Serialize;
use tracing::{debug, warn};

/// Monotonic id of an issued fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Generation(u64);

/// Which fetch failed, for the generic failure message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchKind {
    UserData,
    Repositories,
    RepositoryDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "kind")]
pub enum FailureReason {
    UserNotFound,
    RepositoryNotFound,
    Generic(FetchKind),
}

impl FailureReason {
    /// Maps a client error onto the two-level taxonomy shown to visitors.
    pub fn from_error(kind: FetchKind, error: &ExplorerError) -> Self {
        match (kind, error.is_not_found()) {
            (FetchKind::RepositoryDetails, true) => FailureReason::RepositoryNotFound,
            (_, true) => FailureReason::UserNotFound,
            (kind, false) => FailureReason::Generic(kind),
        }
    }

    /// Key into the message tables in [`crate::i18n`].
    pub fn message_key(&self) -> &'static str {
        match self {
            FailureReason::UserNotFound => "errors.user_not_found",
            FailureReason::RepositoryNotFound => "errors.repository_not_found",
            FailureReason::Generic(FetchKind::UserData) => "errors.fetch_user",
            FailureReason::Generic(FetchKind::Repositories) => "errors.fetch_repositories",
            FailureReason::Generic(FetchKind::RepositoryDetails) => "errors.fetch_repository",
        }
    }

    /// Machine-readable reason carried on rendered error boxes.
    pub fn code(&self) -> &'static str {
        match self {
            FailureReason::UserNotFound => "user_not_found",
            FailureReason::RepositoryNotFound => "repository_not_found",
            FailureReason::Generic(_) => "fetch_failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(FailureReason),
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            ViewState::Failed(reason) => Some(reason),
            _ => None,
        }
    }
}

/// One view's server data, keyed by the parameter that identifies it.
#[derive(Debug, Clone)]
pub struct FetchView<T> {
    kind: FetchKind,
    key: Option<String>,
    latest: u64,
    state: ViewState<T>,
}

impl<T> FetchView<T> {
    pub fn new(kind: FetchKind) -> Self {
        FetchView {
            kind,
            key: None,
            latest: 0,
            state: ViewState::Idle,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn state(&self) -> &ViewState<T> {
        &self.state
    }

    pub fn into_state(self) -> ViewState<T> {
        self.state
    }

    pub fn current_generation(&self) -> Generation {
        Generation(self.latest)
    }

    /// Issues a new fetch for `key`, moving to `Loading` and dropping any
    /// data held for the previous key.
    pub fn begin(&mut self, key: impl Into<String>) -> Generation {
        self.latest += 1;
        self.key = Some(key.into());
        self.state = ViewState::Loading;
        Generation(self.latest)
    }

    /// Applies a completed fetch. Returns `false` when the completion belongs
    /// to a superseded generation and was discarded.
    pub fn complete(&mut self, generation: Generation, result: crate::error::Result<T>) -> bool {
        if generation.0 != self.latest {
            debug!(
                stale = generation.0,
                latest = self.latest,
                "Discarding superseded fetch result"
            );
            return false;
        }

        self.state = match result {
            Ok(data) => ViewState::Loaded(data),
            Err(e) => {
                warn!(key = ?self.key, error = %e, "Fetch failed");
                ViewState::Failed(FailureReason::from_error(self.kind, &e))
            }
        };
        true
    }
}

/// The repository list page: fetched list plus the visitor's filter, sort
/// and page counter.
#[derive(Debug, Clone)]
pub struct RepositoryListView {
    fetch: FetchView<Vec<Repository>>,
    filter: LanguageFilter,
    sort: SortOrder,
    page: usize,
}

impl Default for RepositoryListView {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryListView {
    pub fn new() -> Self {
        RepositoryListView {
            fetch: FetchView::new(FetchKind::Repositories),
            filter: LanguageFilter::default(),
            sort: SortOrder::default(),
            page: 1,
        }
    }

    pub fn begin(&mut self, username: &str) -> Generation {
        self.page = 1;
        self.fetch.begin(username)
    }

    pub fn complete(
        &mut self,
        generation: Generation,
        result: crate::error::Result<Vec<Repository>>,
    ) -> bool {
        let applied = self.fetch.complete(generation, result);
        if applied {
            self.page = 1;
        }
        applied
    }

    pub fn username(&self) -> Option<&str> {
        self.fetch.key()
    }

    pub fn state(&self) -> &ViewState<Vec<Repository>> {
        self.fetch.state()
    }

    pub fn filter(&self) -> LanguageFilter {
        self.filter
    }

    pub fn sort(&self) -> SortOrder {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_filter(&mut self, filter: LanguageFilter) {
        self.filter = filter;
        self.page = 1;
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.sort = sort;
        self.page = 1;
    }

    /// Advances one page when more items remain. No network call.
    pub fn load_more(&mut self) -> bool {
        let has_more = self.derived().map(|view| view.has_more).unwrap_or(false);
        if has_more {
            self.page += 1;
        }
        has_more
    }

    /// Jumps straight to `page`, as when a visitor follows a "load more" link.
    pub fn show_page(&mut self, page: usize) {
        let total = self
            .fetch
            .state()
            .data()
            .map(|repos| pipeline::filter_and_sort(repos, self.filter, self.sort).len())
            .unwrap_or(0);
        self.page = page.clamp(1, pipeline::last_page(total));
    }

    pub fn derived(&self) -> Option<DerivedView<'_>> {
        self.fetch
            .state()
            .data()
            .map(|repos| pipeline::derive(repos, self.filter, self.sort, self.page))
    }
}
