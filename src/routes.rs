//! Web route handlers.

use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::error::{ExplorerError, WebError};
use crate::github::GitHubClient;
use crate::health;
use crate::i18n::Translations;
use crate::pipeline::{DerivedView, LanguageFilter, SortOrder};
use crate::session::{ListSession, SessionConfig, SessionStore, ViewId};
use crate::settings::{Locale, RootChange, Settings, SettingsEffect, SettingsUpdate};
use crate::templates::{
    ErrorView, FragmentErrorTemplate, RepoCardsFragment, RepoDetailFragment, RepoDetailTemplate,
    RepoListTemplate, RepoResultsFragment, SearchTemplate,
};
use crate::types::{GitHubUser, Repository};
use crate::view::{FailureReason, FetchKind, FetchView, RepositoryListView, ViewState};

/// Shared state for every route.
#[derive(Clone)]
pub struct AppState {
    pub github: Arc<GitHubClient>,
    pub sessions: Arc<SessionStore>,
    pub default_locale: Locale,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(github: GitHubClient, default_locale: Locale) -> Self {
        Self::with_sessions(github, default_locale, SessionConfig::default())
    }

    pub fn with_sessions(
        github: GitHubClient,
        default_locale: Locale,
        sessions: SessionConfig,
    ) -> Self {
        AppState {
            github: Arc::new(github),
            sessions: Arc::new(SessionStore::new(sessions)),
            default_locale,
            start_time: Instant::now(),
        }
    }
}

/// Create the web router. Internal endpoints live under `/_/`, which no
/// GitHub login can take.
pub fn web_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search))
        .route("/_/settings/locale", post(update_locale))
        .route("/_/settings/theme", post(toggle_theme))
        .route("/_/api/users/:username/repos", get(repositories_json))
        .route("/_/list/:username", get(repositories_results))
        .route("/_/list/:username/cards", get(repositories_cards))
        .route("/_/detail/:username/:repo", get(repository_detail_fragment))
        .route("/:username", get(repository_list))
        .route("/:username/:repo", get(repository_detail))
        .merge(health::health_routes())
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub username: String,
}

/// View id, filter, sort and page as they appear in the query string.
/// Unknown values fall back to the defaults rather than rejecting the
/// request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub view: Option<String>,
    pub filter: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl ListQuery {
    fn view_id(&self) -> Option<ViewId> {
        self.view.as_deref().and_then(|value| value.parse().ok())
    }

    fn filter(&self) -> LanguageFilter {
        self.filter
            .as_deref()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    fn sort(&self) -> SortOrder {
        self.sort
            .as_deref()
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    fn page(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|value| value.parse().ok())
            .unwrap_or(1)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DetailQuery {
    /// `full` renders the repository on the page itself instead of loading
    /// it after the shell.
    pub render: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocaleForm {
    pub locale: String,
    #[serde(default)]
    pub return_to: String,
}

#[derive(Debug, Deserialize)]
pub struct ThemeForm {
    #[serde(default)]
    pub return_to: String,
}

/// JSON body of the repositories endpoint.
#[derive(Debug, Serialize)]
pub struct RepositoriesResponse<'a> {
    /// Pass back as `view` to page through the same fetched list.
    pub view: ViewId,
    pub username: &'a str,
    pub filter: LanguageFilter,
    pub sort: SortOrder,
    #[serde(flatten)]
    pub derived: DerivedView<'a>,
}

#[derive(Debug, Serialize)]
struct FailureResponse<'a> {
    error: &'a FailureReason,
}

/// Keeps a login path-safe: ASCII alphanumerics and hyphens. Whether the
/// account exists is left to GitHub.
pub fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Repository names GitHub accepts: ASCII alphanumerics, `-`, `_` and `.`.
fn is_valid_repo_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 100
        && name != "."
        && name != ".."
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// Only same-site absolute paths; anything else goes back to `/`.
pub fn safe_return_path(return_to: &str) -> &str {
    let local = return_to.starts_with('/')
        && !return_to.starts_with("//")
        && !return_to.contains('\\')
        && !return_to.chars().any(char::is_control);
    if local {
        return_to
    } else {
        "/"
    }
}

fn visitor_settings(state: &AppState, headers: &HeaderMap) -> Settings {
    let cookies = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect::<Vec<_>>()
        .join("; ");
    let header = (!cookies.is_empty()).then_some(cookies.as_str());
    Settings::from_cookie_header(header, state.default_locale)
}

fn failure_status(reason: Option<&FailureReason>) -> StatusCode {
    match reason {
        None => StatusCode::OK,
        Some(FailureReason::UserNotFound) | Some(FailureReason::RepositoryNotFound) => {
            StatusCode::NOT_FOUND
        }
        Some(FailureReason::Generic(_)) => StatusCode::BAD_GATEWAY,
    }
}

async fn load_user(state: &AppState, username: &str) -> ViewState<GitHubUser> {
    let mut view = FetchView::new(FetchKind::UserData);
    let generation = view.begin(username);
    let result = if is_valid_username(username) {
        state.github.get_user(username).await
    } else {
        Err(ExplorerError::NotFound(format!(
            "Invalid username: {}",
            username
        )))
    };
    view.complete(generation, result);
    view.into_state()
}

async fn load_repository(state: &AppState, username: &str, repo: &str) -> ViewState<Repository> {
    let mut view = FetchView::new(FetchKind::RepositoryDetails);
    let generation = view.begin(format!("{}/{}", username, repo));
    let result = if is_valid_username(username) && is_valid_repo_name(repo) {
        state.github.get_repository(username, repo).await
    } else {
        Err(ExplorerError::NotFound(format!(
            "Invalid repository: {}/{}",
            username, repo
        )))
    };
    view.complete(generation, result);
    view.into_state()
}

/// The open view named by `?view=`, if it is still live and belongs to
/// `username`.
async fn existing_session(
    state: &AppState,
    username: &str,
    query: &ListQuery,
) -> Option<Arc<ListSession>> {
    let id = query.view_id()?;
    state.sessions.get(id, username).await
}

fn apply_query(view: &mut RepositoryListView, query: &ListQuery) {
    view.set_filter(query.filter());
    view.set_sort(query.sort());
    view.show_page(query.page());
}

fn fragment_failure(status: StatusCode, failure: ErrorView) -> Result<Response, WebError> {
    let template = FragmentErrorTemplate::new(failure);
    Ok((status, Html(template.render()?)).into_response())
}

/// Search page; with `?username=` checks the user exists and redirects to
/// their repository list.
async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Result<Response, WebError> {
    let settings = visitor_settings(&state, &headers);
    let username = query.username.trim();

    if username.is_empty() {
        let template = SearchTemplate::new(&settings, "", None);
        return Ok(Html(template.render()?).into_response());
    }

    match load_user(&state, username).await {
        ViewState::Loaded(user) => {
            info!(username = %user.login, "User found");
            Ok(Redirect::to(&format!("/{}", username)).into_response())
        }
        other => {
            let failure = other.failure();
            let template = SearchTemplate::new(&settings, username, failure);
            Ok((failure_status(failure), Html(template.render()?)).into_response())
        }
    }
}

/// Repository list page. Without a live `?view=` this opens a new view and
/// sends the loading shell; the results are fetched by the page afterwards.
/// With one, the page is rendered from that view's list.
async fn repository_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(username): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response, WebError> {
    let settings = visitor_settings(&state, &headers);

    if !is_valid_username(&username) {
        let failed = ViewState::Failed(FailureReason::UserNotFound);
        let template = RepoListTemplate::new(
            &settings,
            &username,
            None,
            query.filter(),
            query.sort(),
            &failed,
            None,
        );
        return Ok((StatusCode::NOT_FOUND, Html(template.render()?)).into_response());
    }

    let Some(session) = existing_session(&state, &username, &query).await else {
        let session = state.sessions.open(&username).await;
        let template = RepoListTemplate::loading(
            &settings,
            &username,
            session.id(),
            query.filter(),
            query.sort(),
        );
        return Ok(Html(template.render()?).into_response());
    };

    session.ensure_loaded(&state.github).await;
    let mut view = session.view().await;
    apply_query(&mut view, &query);
    let derived = view.derived();

    debug!(
        username = %username,
        view = %session.id(),
        filter = %view.filter(),
        sort = %view.sort(),
        page = view.page(),
        "Rendering repository list"
    );

    let template = RepoListTemplate::new(
        &settings,
        &username,
        Some(session.id()),
        view.filter(),
        view.sort(),
        view.state(),
        derived.as_ref(),
    );
    let status = failure_status(view.state().failure());
    Ok((status, Html(template.render()?)).into_response())
}

/// Count, cards and loader for an open view: the first load after the shell
/// and every filter or sort change.
async fn repositories_results(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(username): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response, WebError> {
    let settings = visitor_settings(&state, &headers);
    let i18n = Translations::new(settings.locale);

    let Some(session) = existing_session(&state, &username, &query).await else {
        return fragment_failure(StatusCode::GONE, ErrorView::expired(&i18n));
    };

    session.ensure_loaded(&state.github).await;
    let mut view = session.view().await;
    apply_query(&mut view, &query);
    let derived = view.derived();

    match derived {
        Some(derived) => {
            let fragment = RepoResultsFragment::new(
                &settings,
                &username,
                session.id(),
                view.filter(),
                view.sort(),
                &derived,
            );
            Ok(Html(fragment.render()?).into_response())
        }
        None => {
            let reason = view
                .state()
                .failure()
                .cloned()
                .unwrap_or(FailureReason::Generic(FetchKind::Repositories));
            fragment_failure(
                failure_status(Some(&reason)),
                ErrorView::from_failure(&reason, &i18n),
            )
        }
    }
}

/// Cards for the next page of an open view, fetched by the infinite-scroll
/// loader.
async fn repositories_cards(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(username): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response, WebError> {
    let settings = visitor_settings(&state, &headers);
    let i18n = Translations::new(settings.locale);

    let Some(session) = existing_session(&state, &username, &query).await else {
        return fragment_failure(StatusCode::GONE, ErrorView::expired(&i18n));
    };

    session.ensure_loaded(&state.github).await;
    let mut view = session.view().await;
    apply_query(&mut view, &query);
    let derived = view.derived();

    match derived {
        Some(derived) => {
            let fragment = RepoCardsFragment::new(
                &settings,
                &username,
                session.id(),
                view.filter(),
                view.sort(),
                &derived,
            );
            Ok(Html(fragment.render()?).into_response())
        }
        None => {
            let reason = view
                .state()
                .failure()
                .cloned()
                .unwrap_or(FailureReason::Generic(FetchKind::Repositories));
            fragment_failure(
                failure_status(Some(&reason)),
                ErrorView::from_failure(&reason, &i18n),
            )
        }
    }
}

/// Derived view as JSON. Reuses the view named by `?view=` when it is live;
/// otherwise opens one and fetches.
async fn repositories_json(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<ListQuery>,
) -> Response {
    if !is_valid_username(&username) {
        let error = FailureReason::UserNotFound;
        return (StatusCode::NOT_FOUND, Json(FailureResponse { error: &error })).into_response();
    }

    let session = match existing_session(&state, &username, &query).await {
        Some(session) => session,
        None => state.sessions.open(&username).await,
    };
    session.ensure_loaded(&state.github).await;
    let mut view = session.view().await;
    apply_query(&mut view, &query);
    let derived = view.derived();

    match derived {
        Some(derived) => Json(RepositoriesResponse {
            view: session.id(),
            username: &username,
            filter: view.filter(),
            sort: view.sort(),
            derived,
        })
        .into_response(),
        None => {
            let reason = view.state().failure();
            let status = failure_status(reason);
            match reason {
                Some(error) => (status, Json(FailureResponse { error })).into_response(),
                None => status.into_response(),
            }
        }
    }
}

/// Repository page. Sends the loading shell unless `?render=full` asks for
/// the repository to be fetched before responding.
async fn repository_detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((username, repo)): Path<(String, String)>,
    Query(query): Query<DetailQuery>,
) -> Result<Response, WebError> {
    let settings = visitor_settings(&state, &headers);

    if query.render.as_deref() != Some("full") {
        let template = RepoDetailTemplate::new(&settings, &username, &repo, &ViewState::Loading);
        return Ok(Html(template.render()?).into_response());
    }

    let view = load_repository(&state, &username, &repo).await;
    let template = RepoDetailTemplate::new(&settings, &username, &repo, &view);
    let status = failure_status(view.failure());
    Ok((status, Html(template.render()?)).into_response())
}

async fn repository_detail_fragment(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((username, repo)): Path<(String, String)>,
) -> Result<Response, WebError> {
    let settings = visitor_settings(&state, &headers);
    let view = load_repository(&state, &username, &repo).await;

    let fragment = RepoDetailFragment::new(&settings, &username, &view);
    let status = failure_status(view.failure());
    Ok((status, Html(fragment.render()?)).into_response())
}

async fn update_locale(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LocaleForm>,
) -> Result<Response, WebError> {
    let locale: Locale = form.locale.parse()?;
    let mut settings = visitor_settings(&state, &headers);
    let effects = settings.update(SettingsUpdate::SetLocale(locale));
    apply_effects(effects, &form.return_to)
}

async fn toggle_theme(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ThemeForm>,
) -> Result<Response, WebError> {
    let mut settings = visitor_settings(&state, &headers);
    let effects = settings.update(SettingsUpdate::ToggleTheme);
    apply_effects(effects, &form.return_to)
}

/// Turns settings effects into a response: cookies become `Set-Cookie`
/// headers, and the root change is applied by redirecting back so the page
/// is rendered again with the new settings.
fn apply_effects(effects: Vec<SettingsEffect>, return_to: &str) -> Result<Response, WebError> {
    let mut response = Redirect::to(safe_return_path(return_to)).into_response();

    for effect in effects {
        match effect {
            SettingsEffect::Persist { cookies } => {
                for cookie in cookies {
                    let value = HeaderValue::from_str(&cookie)
                        .map_err(|e| WebError::Internal(format!("Invalid cookie: {}", e)))?;
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
            }
            SettingsEffect::ApplyToRoot(RootChange::ThemeClass(theme)) => {
                debug!(theme = %theme, "Theme changed");
            }
            SettingsEffect::ApplyToRoot(RootChange::Reload) => {
                debug!("Locale changed, reloading");
            }
        }
    }

    Ok(response)
}
