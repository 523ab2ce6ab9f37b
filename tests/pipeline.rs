mod common;

use common::repo;
use repo_explorer::pipeline::{derive, filter_and_sort, LanguageFilter, SortOrder, PAGE_SIZE};
use repo_explorer::types::Repository;

fn mixed_repos() -> Vec<Repository> {
    vec![
        repo(1, "web", Some("JavaScript"), 12, "2023-03-01T10:00:00Z"),
        repo(2, "api", Some("typescript"), 40, "2023-07-15T08:00:00Z"),
        repo(3, "ml", Some("Python"), 5, "2022-11-20T12:00:00Z"),
        repo(4, "cli", Some("Rust"), 40, "2024-02-02T00:00:00Z"),
        repo(5, "notes", None, 1, "2024-05-05T00:00:00Z"),
        repo(6, "kernel", Some("C"), 99, "2021-01-01T00:00:00Z"),
        repo(7, "scripts", Some("PYTHON"), 2, "2023-09-09T00:00:00Z"),
    ]
}

fn numbered_repos(count: u64) -> Vec<Repository> {
    (0..count)
        .map(|i| {
            repo(
                i,
                &format!("r{}", i),
                Some("Go"),
                (i % 13) as u32,
                &format!("2024-03-{:02}T00:00:00Z", (i % 28) + 1),
            )
        })
        .collect()
}

#[test]
fn test_every_item_matches_specific_filter() {
    let repos = mixed_repos();
    for filter in LanguageFilter::ALL {
        if filter == LanguageFilter::All {
            continue;
        }
        let view = derive(&repos, filter, SortOrder::Updated, 1);
        for item in &view.items {
            assert!(
                filter.matches(item.language.as_deref()),
                "{} should not pass filter {}",
                item.name,
                filter
            );
        }
        let expected = repos
            .iter()
            .filter(|r| filter.matches(r.language.as_deref()))
            .count();
        assert_eq!(view.total, expected);
    }
}

#[test]
fn test_named_filters_ignore_case() {
    let repos = mixed_repos();
    let python: Vec<&str> = filter_and_sort(&repos, LanguageFilter::Python, SortOrder::Stars)
        .iter()
        .map(|r| r.name.as_str())
        .collect();
    assert_eq!(python, vec!["ml", "scripts"]);

    let typescript = filter_and_sort(&repos, LanguageFilter::TypeScript, SortOrder::Stars);
    assert_eq!(typescript.len(), 1);
    assert_eq!(typescript[0].name, "api");
}

#[test]
fn test_missing_language_only_in_all() {
    let repos = mixed_repos();
    let other = filter_and_sort(&repos, LanguageFilter::Other, SortOrder::Updated);
    assert!(other.iter().all(|r| r.language.is_some()));
    let names: Vec<&str> = other.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["cli", "kernel"]);

    let all = filter_and_sort(&repos, LanguageFilter::All, SortOrder::Updated);
    assert!(all.iter().any(|r| r.name == "notes"));
}

#[test]
fn test_sort_is_non_increasing() {
    let repos = mixed_repos();

    let by_updated = filter_and_sort(&repos, LanguageFilter::All, SortOrder::Updated);
    for pair in by_updated.windows(2) {
        assert!(pair[0].updated_at >= pair[1].updated_at);
    }

    let by_stars = filter_and_sort(&repos, LanguageFilter::All, SortOrder::Stars);
    for pair in by_stars.windows(2) {
        assert!(pair[0].stargazers_count >= pair[1].stargazers_count);
    }
}

#[test]
fn test_star_ties_keep_input_order() {
    let repos = mixed_repos();
    let by_stars = filter_and_sort(&repos, LanguageFilter::All, SortOrder::Stars);
    let tied: Vec<u64> = by_stars
        .iter()
        .filter(|r| r.stargazers_count == 40)
        .map(|r| r.id)
        .collect();
    assert_eq!(tied, vec![2, 4]);
}

#[test]
fn test_derive_is_idempotent() {
    let repos = numbered_repos(37);
    let first = derive(&repos, LanguageFilter::All, SortOrder::Stars, 2);
    let second = derive(&repos, LanguageFilter::All, SortOrder::Stars, 2);
    assert_eq!(first, second);
}

#[test]
fn test_pagination_is_monotonic() {
    let repos = numbered_repos(37);
    let mut previous = 0;
    for page in 1..=5 {
        let view = derive(&repos, LanguageFilter::All, SortOrder::Updated, page);
        let shown = view.items.len();
        assert!(shown >= previous);
        assert_eq!(shown, (page * PAGE_SIZE).min(37));
        assert_eq!(view.has_more, shown < 37);
        previous = shown;
    }
}

#[test]
fn test_page_is_clamped_to_available_items() {
    let repos = numbered_repos(12);
    let view = derive(&repos, LanguageFilter::All, SortOrder::Updated, 9);
    assert_eq!(view.page, 2);
    assert_eq!(view.items.len(), 12);
    assert!(!view.has_more);

    let view = derive(&repos, LanguageFilter::All, SortOrder::Updated, 0);
    assert_eq!(view.page, 1);
    assert_eq!(view.items.len(), PAGE_SIZE);
    assert!(view.has_more);
}

#[test]
fn test_empty_filter_result() {
    let repos = numbered_repos(5);
    let view = derive(&repos, LanguageFilter::Python, SortOrder::Stars, 3);
    assert_eq!(view.total, 0);
    assert_eq!(view.page, 1);
    assert!(view.items.is_empty());
    assert!(!view.has_more);
}

#[test]
fn test_other_by_stars_scenario() {
    let repos = vec![
        repo(1, "go-tool", Some("Go"), 5, "2023-01-01T00:00:00Z"),
        repo(2, "py-lib", Some("Python"), 50, "2023-06-01T00:00:00Z"),
    ];
    let view = derive(&repos, LanguageFilter::Other, SortOrder::Stars, 1);
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].name, "go-tool");
    assert_eq!(view.total, 1);
    assert!(!view.has_more);
}
