mod common;

use common::repo_json;
use repo_explorer::error::ExplorerError;
use repo_explorer::github::GitHubClient;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> GitHubClient {
    GitHubClient::with_base_url(&server.uri()).expect("Failed to create client")
}

#[tokio::test]
async fn test_github_client_creation() {
    let client = GitHubClient::new();
    assert!(client.is_ok());
    assert_eq!(client.unwrap().base_url().as_str(), "https://api.github.com/");
}

#[tokio::test]
async fn test_invalid_base_url() {
    let result = GitHubClient::with_base_url("not a url");
    assert!(matches!(result, Err(ExplorerError::InvalidUrl(_))));
}

#[tokio::test]
async fn test_get_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .and(header("Accept", "application/vnd.github.v3+json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "login": "octocat",
            "id": 583231,
            "avatar_url": "https://avatars.githubusercontent.com/u/583231",
            "html_url": "https://github.com/octocat"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client_for(&server).await.get_user("octocat").await.unwrap();
    assert_eq!(user.login, "octocat");
    assert_eq!(user.id, 583231);
}

#[tokio::test]
async fn test_user_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/doesnotexist123456"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Not Found"})))
        .mount(&server)
        .await;

    let result = client_for(&server).await.get_user("doesnotexist123456").await;

    match result.unwrap_err() {
        ExplorerError::NotFound(_) => {} // Expected
        other => panic!("Expected NotFound error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_list_repositories_requests_one_full_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            repo_json(1, "hello-world", Some("Ruby"), 10, "2024-01-01T00:00:00Z"),
            repo_json(2, "spoon-knife", None, 20, "2024-02-01T00:00:00Z"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let repos = client_for(&server)
        .await
        .list_user_repositories("octocat")
        .await
        .unwrap();

    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].name, "hello-world");
    assert_eq!(repos[1].language, None);
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat/repos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).await.list_user_repositories("octocat").await;

    match result.unwrap_err() {
        ExplorerError::ApiError(message) => assert!(message.contains("500")),
        other => panic!("Expected ApiError, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_get_repository_with_null_language() {
    let server = MockServer::start().await;
    let mut body = repo_json(9, "dotfiles", None, 1234, "2024-06-30T12:00:00Z");
    body["forks_count"] = json!(56);
    Mock::given(method("GET"))
        .and(path("/repos/octocat/dotfiles"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let repo = client_for(&server)
        .await
        .get_repository("octocat", "dotfiles")
        .await
        .unwrap();

    assert_eq!(repo.language, None);
    assert_eq!(repo.stargazers_count, 1234);
    assert_eq!(repo.forks_count, 56);
    assert_eq!(repo.owner.unwrap().login, "octocat");
}

#[tokio::test]
async fn test_malformed_body_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos/octocat/broken"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let result = client_for(&server)
        .await
        .get_repository("octocat", "broken")
        .await;
    let error = result.unwrap_err();
    assert!(matches!(error, ExplorerError::JsonError(_)));
    assert!(!error.is_not_found());
}

#[tokio::test]
#[ignore = "Requires network access to api.github.com"]
async fn test_list_real_repositories() {
    let client = GitHubClient::new().expect("Failed to create client");

    let repos = client
        .list_user_repositories("octocat")
        .await
        .expect("Failed to list repositories");

    assert!(!repos.is_empty());
    for repo in &repos {
        assert!(!repo.name.is_empty());
        assert!(!repo.html_url.is_empty());
    }
}
