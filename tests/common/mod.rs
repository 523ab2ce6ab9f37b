#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use chrono::{DateTime, Utc};
use repo_explorer::github::GitHubClient;
use repo_explorer::routes::AppState;
use repo_explorer::settings::Locale;
use repo_explorer::types::Repository;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::MockServer;

pub fn repo(id: u64, name: &str, language: Option<&str>, stars: u32, updated: &str) -> Repository {
    Repository {
        id,
        name: name.to_string(),
        description: None,
        stargazers_count: stars,
        forks_count: 0,
        open_issues_count: 0,
        language: language.map(str::to_string),
        html_url: format!("https://github.com/octocat/{}", name),
        updated_at: updated
            .parse::<DateTime<Utc>>()
            .expect("test timestamp should be RFC 3339"),
        owner: None,
    }
}

/// API-shaped JSON for a repository, as GitHub returns it.
pub fn repo_json(id: u64, name: &str, language: Option<&str>, stars: u32, updated: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "full_name": format!("octocat/{}", name),
        "description": format!("The {} project", name),
        "stargazers_count": stars,
        "forks_count": 3,
        "open_issues_count": 1,
        "language": language,
        "html_url": format!("https://github.com/octocat/{}", name),
        "updated_at": updated,
        "owner": {
            "login": "octocat",
            "avatar_url": "https://avatars.githubusercontent.com/u/583231"
        }
    })
}

/// `count` repositories cycling through a few languages, with distinct
/// star counts and update times.
pub fn many_repos_json(count: u64) -> Value {
    let languages = [Some("Rust"), Some("Python"), Some("JavaScript"), None];
    let repos: Vec<Value> = (0..count)
        .map(|i| {
            repo_json(
                i + 1,
                &format!("repo-{:02}", i),
                languages[(i % 4) as usize],
                (i * 7 % 50) as u32,
                &format!("2024-01-{:02}T00:00:00Z", (i % 28) + 1),
            )
        })
        .collect();
    Value::Array(repos)
}

pub struct TestContext {
    pub github: MockServer,
    pub app: Router,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_locale(Locale::En).await
    }

    pub async fn with_locale(default_locale: Locale) -> Self {
        let github = MockServer::start().await;
        let client =
            GitHubClient::with_base_url(&github.uri()).expect("Failed to create client");
        let app = repo_explorer::build_router(AppState::new(client, default_locale));
        TestContext { github, app }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app
            .clone()
            .oneshot(request)
            .await
            .expect("router should not fail")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    /// Opens the list page for `username` and returns its view id.
    pub async fn open_view(&self, username: &str) -> String {
        let response = self.get(&format!("/{}", username)).await;
        view_id(&body_string(response).await)
    }
}

/// The view id a list page was opened with, read from its controls form.
pub fn view_id(body: &str) -> String {
    let marker = "name=\"view\" value=\"";
    let start = body.find(marker).expect("list page should carry a view id") + marker.len();
    let end = body[start..].find('"').expect("view id should be quoted");
    body[start..start + end].to_string()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body should be readable");
    String::from_utf8(bytes.to_vec()).expect("body should be UTF-8")
}
