use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("GitHub API error: {0}")]
    ApiError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Template error: {0}")]
    TemplateError(#[from] askama::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid setting: {0}")]
    InvalidSetting(String),
}

impl ExplorerError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExplorerError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

/// Errors surfaced by the HTTP layer, rendered as a small HTML page.
#[derive(Error, Debug)]
pub enum WebError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("upstream error: {0}")]
    Upstream(String),

    #[error("template error: {0}")]
    Template(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl WebError {
    pub fn status(&self) -> StatusCode {
        match self {
            WebError::NotFound(_) => StatusCode::NOT_FOUND,
            WebError::BadRequest(_) => StatusCode::BAD_REQUEST,
            WebError::Upstream(_) => StatusCode::BAD_GATEWAY,
            WebError::Template(_) | WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }

        let html = format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Error - GitHub Repository Explorer</title>
    <script src="https://cdn.tailwindcss.com"></script>
</head>
<body class="bg-gray-900 text-gray-100 min-h-screen flex items-center justify-center">
    <div class="text-center">
        <h1 class="text-6xl font-bold text-red-500 mb-4">{}</h1>
        <p class="text-xl text-gray-400 mb-8">{}</p>
        <a href="/" class="text-blue-400 hover:text-blue-300 underline">Back to search</a>
    </div>
</body>
</html>"#,
            status.as_u16(),
            escape_html(&self.to_string())
        );

        (status, Html(html)).into_response()
    }
}

impl From<askama::Error> for WebError {
    fn from(err: askama::Error) -> Self {
        WebError::Template(err.to_string())
    }
}

impl From<ExplorerError> for WebError {
    fn from(err: ExplorerError) -> Self {
        match err {
            ExplorerError::NotFound(msg) => WebError::NotFound(msg),
            ExplorerError::InvalidSetting(msg) => WebError::BadRequest(msg),
            ExplorerError::TemplateError(e) => WebError::Template(e.to_string()),
            ExplorerError::ApiError(msg) => WebError::Upstream(msg),
            ExplorerError::NetworkError(e) => WebError::Upstream(e.to_string()),
            ExplorerError::JsonError(e) => WebError::Upstream(e.to_string()),
            other => WebError::Internal(other.to_string()),
        }
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
