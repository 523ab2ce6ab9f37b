//! Client-side filter, sort and pagination over an already fetched
//! repository list.
//!
//! Everything here is pure: the same inputs always produce the same
//! [`DerivedView`], and nothing touches the network.

use crate::types::Repository;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Items added to the displayed slice per "load more".
pub const PAGE_SIZE: usize = 10;

const NAMED_LANGUAGES: [&str; 3] = ["javascript", "typescript", "python"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageFilter {
    #[default]
    All,
    JavaScript,
    TypeScript,
    Python,
    Other,
}

impl LanguageFilter {
    pub const ALL: [LanguageFilter; 5] = [
        LanguageFilter::All,
        LanguageFilter::JavaScript,
        LanguageFilter::TypeScript,
        LanguageFilter::Python,
        LanguageFilter::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageFilter::All => "all",
            LanguageFilter::JavaScript => "javascript",
            LanguageFilter::TypeScript => "typescript",
            LanguageFilter::Python => "python",
            LanguageFilter::Other => "other",
        }
    }

    /// Whether a repository with the given primary language passes this filter.
    ///
    /// A missing language only passes [`LanguageFilter::All`].
    pub fn matches(&self, language: Option<&str>) -> bool {
        match (self, language) {
            (LanguageFilter::All, _) => true,
            (_, None) => false,
            (LanguageFilter::Other, Some(lang)) => !NAMED_LANGUAGES
                .iter()
                .any(|named| lang.eq_ignore_ascii_case(named)),
            (named, Some(lang)) => lang.eq_ignore_ascii_case(named.as_str()),
        }
    }
}

impl fmt::Display for LanguageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageFilter::ALL
            .into_iter()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown language filter: {}", s))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recently updated first.
    #[default]
    Updated,
    /// Most starred first.
    Stars,
}

impl SortOrder {
    pub const ALL: [SortOrder; 2] = [SortOrder::Updated, SortOrder::Stars];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Updated => "updated",
            SortOrder::Stars => "stars",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown sort order: {}", s))
    }
}

/// The filtered, sorted and paginated slice currently shown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView<'a> {
    pub items: Vec<&'a Repository>,
    /// Size of the filtered set, before pagination.
    pub total: usize,
    pub page: usize,
    pub has_more: bool,
}

/// Filters then stably sorts. Ties keep their input order.
pub fn filter_and_sort(
    repos: &[Repository],
    filter: LanguageFilter,
    sort: SortOrder,
) -> Vec<&Repository> {
    let mut filtered: Vec<&Repository> = repos
        .iter()
        .filter(|repo| filter.matches(repo.language.as_deref()))
        .collect();

    match sort {
        SortOrder::Updated => filtered.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        SortOrder::Stars => filtered.sort_by(|a, b| b.stargazers_count.cmp(&a.stargazers_count)),
    }

    filtered
}

/// Last page that still shows something new; page 1 for an empty set.
pub fn last_page(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE).max(1)
}

pub fn derive(
    repos: &[Repository],
    filter: LanguageFilter,
    sort: SortOrder,
    page: usize,
) -> DerivedView<'_> {
    let mut items = filter_and_sort(repos, filter, sort);
    let total = items.len();
    let page = page.clamp(1, last_page(total));

    items.truncate(page * PAGE_SIZE);
    let has_more = items.len() < total;

    DerivedView {
        items,
        total,
        page,
        has_more,
    }
}
