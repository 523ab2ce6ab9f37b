//! Askama template definitions and the view models they render.

use askama::Template;
use serde::Serialize;

use crate::i18n::{format_count, Translations};
use crate::pipeline::{DerivedView, LanguageFilter, SortOrder, PAGE_SIZE};
use crate::session::ViewId;
use crate::settings::{Locale, Settings, Theme, THEME_STORAGE_KEY};
use crate::types::Repository;
use crate::view::{FailureReason, ViewState};

/// Skeleton placeholders while the list is loading.
pub const LIST_SKELETONS: usize = 5;
/// Skeleton placeholders while a single repository is loading.
pub const DETAIL_SKELETONS: usize = 1;
/// Skeletons shown under the list while the next page is fetched.
pub const LOADER_SKELETONS: usize = 2;

/// Option in a `<select>`.
#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
    pub value: &'static str,
    pub label: String,
    pub selected: bool,
}

/// Header and document-level data shared by every page.
#[derive(Debug, Clone)]
pub struct Shell {
    pub lang: &'static str,
    pub root_class: &'static str,
    /// Theme to mirror into local storage, empty when unset.
    pub stored_theme: &'static str,
    pub storage_key: &'static str,
    pub toggle_label: String,
    pub locales: Vec<SelectOption>,
    pub return_to: String,
}

impl Shell {
    pub fn new(settings: &Settings, i18n: &Translations, return_to: impl Into<String>) -> Self {
        let toggle_label = match settings.theme {
            Some(Theme::Dark) => i18n.t("header.light"),
            _ => i18n.t("header.dark"),
        };

        Shell {
            lang: settings.locale.code(),
            root_class: settings.root_class(),
            stored_theme: settings.root_class(),
            storage_key: THEME_STORAGE_KEY,
            toggle_label: toggle_label.to_string(),
            locales: Locale::ALL
                .into_iter()
                .map(|locale| SelectOption {
                    value: locale.code(),
                    label: locale.native_name().to_string(),
                    selected: locale == settings.locale,
                })
                .collect(),
            return_to: return_to.into(),
        }
    }
}

/// Repository card in the list.
#[derive(Debug, Clone, Serialize)]
pub struct RepoCard {
    pub name: String,
    pub detail_url: String,
    pub stars: u32,
    pub language: Option<String>,
    pub description: Option<String>,
    pub updated: String,
    pub html_url: String,
}

impl RepoCard {
    pub fn new(repo: &Repository, username: &str, i18n: &Translations) -> Self {
        RepoCard {
            name: repo.name.clone(),
            detail_url: format!("/{}/{}", username, repo.name),
            stars: repo.stargazers_count,
            language: repo.language.clone(),
            description: repo.description.clone(),
            updated: i18n.short_date(&repo.updated_at),
            html_url: repo.html_url.clone(),
        }
    }
}

/// Everything the detail page shows about one repository.
#[derive(Debug, Clone, Serialize)]
pub struct RepoDetail {
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stars: String,
    pub forks: String,
    pub issues: String,
    /// `-` when GitHub reports no language.
    pub language: String,
    pub updated: String,
    pub owner_login: Option<String>,
    pub owner_avatar: Option<String>,
}

impl RepoDetail {
    pub fn new(repo: &Repository, i18n: &Translations) -> Self {
        RepoDetail {
            name: repo.name.clone(),
            description: repo.description.clone(),
            html_url: repo.html_url.clone(),
            stars: format_count(repo.stargazers_count),
            forks: format_count(repo.forks_count),
            issues: format_count(repo.open_issues_count),
            language: repo.language.clone().unwrap_or_else(|| "-".to_string()),
            updated: i18n.long_date(&repo.updated_at),
            owner_login: repo.owner.as_ref().map(|owner| owner.login.clone()),
            owner_avatar: repo.owner.as_ref().map(|owner| owner.avatar_url.clone()),
        }
    }
}

/// Error box shown in place of content. `reason` is rendered as a data
/// attribute so the loader script can tell failures apart.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorView {
    pub reason: &'static str,
    pub message: String,
}

impl ErrorView {
    pub fn from_failure(reason: &FailureReason, i18n: &Translations) -> Self {
        ErrorView {
            reason: reason.code(),
            message: i18n.t(reason.message_key()).to_string(),
        }
    }

    /// The list view a request referred to is gone.
    pub fn expired(i18n: &Translations) -> Self {
        ErrorView {
            reason: "expired",
            message: i18n.t("errors.view_expired").to_string(),
        }
    }
}

fn placeholders(count: usize) -> Vec<usize> {
    (0..count).collect()
}

fn list_query(view: ViewId, filter: LanguageFilter, sort: SortOrder, page: usize) -> String {
    format!("view={}&filter={}&sort={}&page={}", view, filter, sort, page)
}

fn filter_options(i18n: &Translations, filter: LanguageFilter) -> Vec<SelectOption> {
    LanguageFilter::ALL
        .into_iter()
        .map(|option| SelectOption {
            value: option.as_str(),
            label: i18n.t(&format!("filter.{}", option)).to_string(),
            selected: option == filter,
        })
        .collect()
}

fn sort_options(i18n: &Translations, sort: SortOrder) -> Vec<SelectOption> {
    SortOrder::ALL
        .into_iter()
        .map(|option| SelectOption {
            value: option.as_str(),
            label: i18n.t(&format!("sort.{}", option)).to_string(),
            selected: option == sort,
        })
        .collect()
}

/// Search landing page.
#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchTemplate {
    pub i18n: Translations,
    pub shell: Shell,
    pub username: String,
    pub error: Option<ErrorView>,
}

impl SearchTemplate {
    pub fn new(settings: &Settings, username: &str, failure: Option<&FailureReason>) -> Self {
        let i18n = Translations::new(settings.locale);
        SearchTemplate {
            shell: Shell::new(settings, &i18n, "/"),
            username: username.to_string(),
            error: failure.map(|reason| ErrorView::from_failure(reason, &i18n)),
            i18n,
        }
    }
}

/// The cards of the current derived view plus the loader for the next page.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub count_label: String,
    pub empty: bool,
    pub cards: Vec<RepoCard>,
    pub has_more: bool,
    /// Full page for the next page, followed without scripts.
    pub next_page_url: String,
    /// Cards-only fragment for the next page, fetched by the loader.
    pub next_cards_url: String,
}

impl Listing {
    pub fn new(
        username: &str,
        view_id: ViewId,
        filter: LanguageFilter,
        sort: SortOrder,
        derived: &DerivedView<'_>,
        i18n: &Translations,
    ) -> Self {
        let next = list_query(view_id, filter, sort, derived.page + 1);
        Listing {
            count_label: i18n.repository_count(derived.total),
            empty: derived.total == 0,
            cards: derived
                .items
                .iter()
                .map(|repo| RepoCard::new(repo, username, i18n))
                .collect(),
            has_more: derived.has_more,
            next_page_url: format!("/{}?{}", username, next),
            next_cards_url: format!("/_/list/{}/cards?{}", username, next),
        }
    }
}

/// Repository list page. Rendered first in the `Loading` state; the
/// results are then swapped in from [`RepoResultsFragment`].
#[derive(Template)]
#[template(path = "repo_list.html")]
pub struct RepoListTemplate {
    pub i18n: Translations,
    pub shell: Shell,
    pub username: String,
    /// Empty when no view was opened, as for names GitHub cannot have.
    pub view_id: String,
    pub loading: bool,
    pub skeletons: Vec<usize>,
    pub error: Option<ErrorView>,
    pub filters: Vec<SelectOption>,
    pub sorts: Vec<SelectOption>,
    pub listing: Option<Listing>,
    pub results_url: String,
    pub fallback_url: String,
}

impl RepoListTemplate {
    pub fn new(
        settings: &Settings,
        username: &str,
        view_id: Option<ViewId>,
        filter: LanguageFilter,
        sort: SortOrder,
        state: &ViewState<Vec<Repository>>,
        derived: Option<&DerivedView<'_>>,
    ) -> Self {
        let i18n = Translations::new(settings.locale);
        let page = derived.map(|view| view.page).unwrap_or(1);

        let (view_param, return_to, listing) = match view_id {
            Some(id) => (
                id.to_string(),
                format!("/{}?{}", username, list_query(id, filter, sort, page)),
                derived.map(|view| Listing::new(username, id, filter, sort, view, &i18n)),
            ),
            None => (String::new(), format!("/{}", username), None),
        };

        let skeletons = if state.is_loading() {
            placeholders(LIST_SKELETONS)
        } else {
            placeholders(LOADER_SKELETONS)
        };

        RepoListTemplate {
            shell: Shell::new(settings, &i18n, return_to),
            username: username.to_string(),
            fallback_url: format!(
                "/{}?view={}&filter={}&sort={}",
                username, view_param, filter, sort
            ),
            results_url: format!("/_/list/{}", username),
            view_id: view_param,
            loading: state.is_loading(),
            skeletons,
            error: state
                .failure()
                .map(|reason| ErrorView::from_failure(reason, &i18n)),
            filters: filter_options(&i18n, filter),
            sorts: sort_options(&i18n, sort),
            listing,
            i18n,
        }
    }

    /// The shell sent before the list is fetched.
    pub fn loading(
        settings: &Settings,
        username: &str,
        view_id: ViewId,
        filter: LanguageFilter,
        sort: SortOrder,
    ) -> Self {
        Self::new(
            settings,
            username,
            Some(view_id),
            filter,
            sort,
            &ViewState::Loading,
            None,
        )
    }
}

/// Count, cards and loader for a view, swapped into the list page when the
/// fetch completes or the filter or sort changes.
#[derive(Template)]
#[template(path = "repo_results_fragment.html")]
pub struct RepoResultsFragment {
    pub i18n: Translations,
    pub results: Listing,
    pub skeletons: Vec<usize>,
}

impl RepoResultsFragment {
    pub fn new(
        settings: &Settings,
        username: &str,
        view_id: ViewId,
        filter: LanguageFilter,
        sort: SortOrder,
        derived: &DerivedView<'_>,
    ) -> Self {
        let i18n = Translations::new(settings.locale);
        RepoResultsFragment {
            results: Listing::new(username, view_id, filter, sort, derived, &i18n),
            skeletons: placeholders(LOADER_SKELETONS),
            i18n,
        }
    }
}

/// Cards for one page, appended by the infinite-scroll loader.
#[derive(Template)]
#[template(path = "repo_cards.html")]
pub struct RepoCardsFragment {
    pub i18n: Translations,
    pub cards: Vec<RepoCard>,
    pub has_more: bool,
    pub next_fragment_url: String,
    pub next_page_url: String,
}

impl RepoCardsFragment {
    /// Only the items that page `view.page` adds on top of the previous one.
    pub fn new(
        settings: &Settings,
        username: &str,
        view_id: ViewId,
        filter: LanguageFilter,
        sort: SortOrder,
        view: &DerivedView<'_>,
    ) -> Self {
        let i18n = Translations::new(settings.locale);
        let skip = (view.page - 1) * PAGE_SIZE;
        let next = list_query(view_id, filter, sort, view.page + 1);
        RepoCardsFragment {
            cards: view
                .items
                .iter()
                .skip(skip)
                .map(|repo| RepoCard::new(repo, username, &i18n))
                .collect(),
            has_more: view.has_more,
            next_fragment_url: format!("/_/list/{}/cards?{}", username, next),
            next_page_url: format!("/{}?{}", username, next),
            i18n,
        }
    }
}

/// A failed or expired fragment request.
#[derive(Template)]
#[template(path = "fragment_error.html")]
pub struct FragmentErrorTemplate {
    pub failure: ErrorView,
}

impl FragmentErrorTemplate {
    pub fn new(failure: ErrorView) -> Self {
        FragmentErrorTemplate { failure }
    }
}

/// Single repository page.
#[derive(Template)]
#[template(path = "repo_detail.html")]
pub struct RepoDetailTemplate {
    pub i18n: Translations,
    pub shell: Shell,
    pub username: String,
    pub back_url: String,
    pub loading: bool,
    pub skeletons: Vec<usize>,
    pub error: Option<ErrorView>,
    pub repo: Option<RepoDetail>,
    pub detail_url: String,
    pub fallback_url: String,
}

impl RepoDetailTemplate {
    pub fn new(
        settings: &Settings,
        username: &str,
        repo_name: &str,
        state: &ViewState<Repository>,
    ) -> Self {
        let i18n = Translations::new(settings.locale);
        RepoDetailTemplate {
            shell: Shell::new(settings, &i18n, format!("/{}/{}", username, repo_name)),
            username: username.to_string(),
            back_url: format!("/{}", username),
            loading: state.is_loading(),
            skeletons: placeholders(DETAIL_SKELETONS),
            error: state
                .failure()
                .map(|reason| ErrorView::from_failure(reason, &i18n)),
            repo: state.data().map(|repo| RepoDetail::new(repo, &i18n)),
            detail_url: format!("/_/detail/{}/{}", username, repo_name),
            fallback_url: format!("/{}/{}?render=full", username, repo_name),
            i18n,
        }
    }
}

/// The detail card, or its error, swapped into a loading detail page.
#[derive(Template)]
#[template(path = "repo_detail_fragment.html")]
pub struct RepoDetailFragment {
    pub i18n: Translations,
    pub username: String,
    pub back_url: String,
    pub error: Option<ErrorView>,
    pub repo: Option<RepoDetail>,
}

impl RepoDetailFragment {
    pub fn new(settings: &Settings, username: &str, state: &ViewState<Repository>) -> Self {
        let i18n = Translations::new(settings.locale);
        RepoDetailFragment {
            username: username.to_string(),
            back_url: format!("/{}", username),
            error: state
                .failure()
                .map(|reason| ErrorView::from_failure(reason, &i18n)),
            repo: state.data().map(|repo| RepoDetail::new(repo, &i18n)),
            i18n,
        }
    }
}
