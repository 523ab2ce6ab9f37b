use crate::error::{ExplorerError, Result};
use crate::types::{GitHubUser, Repository};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

pub const API_BASE_URL: &str = "https://api.github.com";
pub const PER_PAGE: u32 = 100;
const DEFAULT_USER_AGENT: &str = "GitHub Repository Explorer/0.1.0";

/// Unauthenticated client for the handful of GitHub REST endpoints the
/// explorer needs. One request per call, no retries.
pub struct GitHubClient {
    client: Client,
    base_url: Url,
}

impl GitHubClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(API_BASE_URL)
    }

    pub fn with_base_url(base_url: &str) -> Result<Self> {
        Self::builder(base_url, Duration::from_secs(30), DEFAULT_USER_AGENT)
    }

    pub fn builder(base_url: &str, timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ExplorerError::ApiError(format!(
                "Base URL cannot hold a path: {}",
                base_url
            )));
        }

        Ok(GitHubClient { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Builds `{base}/{segments...}` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn make_request(&self, url: Url, query: &[(&str, String)]) -> Result<Response> {
        let response = self
            .client
            .get(url.clone())
            .query(query)
            .header("Accept", "application/vnd.github.v3+json")
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {
                debug!(%url, %status, "GitHub request succeeded");
                Ok(response)
            }
            reqwest::StatusCode::NOT_FOUND => {
                Err(ExplorerError::NotFound(format!("Resource not found: {}", url.path())))
            }
            status => {
                let error_text = response.text().await.unwrap_or_default();
                warn!(%url, %status, "GitHub request failed");
                Err(ExplorerError::ApiError(format!(
                    "API request failed with status {}: {}",
                    status, error_text
                )))
            }
        }
    }

    /// Reads the whole body before decoding so a malformed payload surfaces
    /// as a JSON error rather than a transport error.
    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// Existence check used by the search page.
    pub async fn get_user(&self, username: &str) -> Result<GitHubUser> {
        let url = self.endpoint(&["users", username]);
        let response = self.make_request(url, &[]).await?;
        Self::decode(response).await
    }

    /// Up to 100 public repositories in a single call.
    pub async fn list_user_repositories(&self, username: &str) -> Result<Vec<Repository>> {
        let url = self.endpoint(&["users", username, "repos"]);
        let response = self
            .make_request(url, &[("per_page", PER_PAGE.to_string())])
            .await?;
        let repos: Vec<Repository> = Self::decode(response).await?;
        debug!(username, count = repos.len(), "Fetched repositories");
        Ok(repos)
    }

    pub async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository> {
        let url = self.endpoint(&["repos", owner, repo]);
        let response = self.make_request(url, &[]).await?;
        Self::decode(response).await
    }
}
