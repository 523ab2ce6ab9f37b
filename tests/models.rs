mod common;

use chrono::{Datelike, TimeZone, Utc};
use common::{repo, repo_json};
use repo_explorer::i18n::Translations;
use repo_explorer::settings::{Locale, Settings, Theme};
use repo_explorer::templates::{RepoCard, RepoDetail, Shell};
use repo_explorer::types::{GitHubUser, Repository};
use serde_json::json;

#[test]
fn test_repository_deserialization() {
    let value = repo_json(42, "explorer", Some("Rust"), 7, "2024-03-15T09:30:00Z");
    let repo: Repository = serde_json::from_value(value).unwrap();

    assert_eq!(repo.id, 42);
    assert_eq!(repo.name, "explorer");
    assert_eq!(repo.language.as_deref(), Some("Rust"));
    assert_eq!(repo.updated_at, Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap());
    assert_eq!(repo.owner.unwrap().login, "octocat");
}

#[test]
fn test_repository_list_item_without_detail_fields() {
    let value = json!({
        "id": 1,
        "name": "minimal",
        "description": null,
        "stargazers_count": 0,
        "language": null,
        "html_url": "https://github.com/octocat/minimal",
        "updated_at": "2020-02-29T00:00:00Z"
    });
    let repo: Repository = serde_json::from_value(value).unwrap();

    assert_eq!(repo.description, None);
    assert_eq!(repo.forks_count, 0);
    assert_eq!(repo.open_issues_count, 0);
    assert!(repo.owner.is_none());
    assert_eq!(repo.updated_at.day(), 29);
}

#[test]
fn test_user_deserialization() {
    let user: GitHubUser = serde_json::from_value(json!({
        "login": "octocat",
        "id": 1,
        "avatar_url": null,
        "html_url": "https://github.com/octocat"
    }))
    .unwrap();
    assert_eq!(user.login, "octocat");
    assert!(user.avatar_url.is_none());
}

#[test]
fn test_repo_card_view() {
    let mut source = repo(1, "site", None, 3, "2024-01-05T00:00:00Z");
    source.description = Some("Personal site".to_string());
    let card = RepoCard::new(&source, "octocat", &Translations::new(Locale::En));

    assert_eq!(card.detail_url, "/octocat/site");
    assert_eq!(card.updated, "Jan 5, 2024");
    assert_eq!(card.language, None);
    assert_eq!(card.description.as_deref(), Some("Personal site"));
}

#[test]
fn test_repo_detail_placeholder_language() {
    let mut source = repo(1, "big", None, 123456, "2024-01-05T00:00:00Z");
    source.forks_count = 7890;
    let detail = RepoDetail::new(&source, &Translations::new(Locale::En));

    assert_eq!(detail.language, "-");
    assert_eq!(detail.stars, "123,456");
    assert_eq!(detail.forks, "7,890");
    assert_eq!(detail.updated, "January 5, 2024");
}

#[test]
fn test_shell_reflects_settings() {
    let settings = Settings {
        locale: Locale::Ko,
        theme: Some(Theme::Dark),
    };
    let i18n = Translations::new(settings.locale);
    let shell = Shell::new(&settings, &i18n, "/octocat");

    assert_eq!(shell.lang, "ko");
    assert_eq!(shell.root_class, "dark");
    assert_eq!(shell.toggle_label, "라이트 모드");
    assert!(shell.locales.iter().any(|option| option.value == "ko" && option.selected));
}
