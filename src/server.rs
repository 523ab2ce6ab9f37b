use crate::cli::Cli;
use crate::error::Result;
use crate::github::GitHubClient;
use crate::routes::{web_routes, AppState};
use crate::session::SessionConfig;
use crate::settings::Locale;
use axum::Router;
use std::future::Future;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub default_locale: Locale,
    pub user_agent: String,
    pub sessions: SessionConfig,
}

impl ServerConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        Ok(ServerConfig {
            bind_addr: cli.bind.clone(),
            api_base_url: cli.api_base_url.clone(),
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
            default_locale: cli.default_locale.parse()?,
            user_agent: cli.user_agent.clone(),
            sessions: SessionConfig {
                ttl: Duration::from_secs(cli.view_ttl_secs),
                max_views: cli.max_views,
            },
        })
    }

    pub fn app_state(&self) -> Result<AppState> {
        let github =
            GitHubClient::builder(&self.api_base_url, self.request_timeout, &self.user_agent)?;
        Ok(AppState::with_sessions(
            github,
            self.default_locale,
            self.sessions.clone(),
        ))
    }
}

/// Full application router with request tracing.
pub fn build_router(state: AppState) -> Router {
    web_routes()
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// Binds and serves until `shutdown` resolves.
pub async fn serve<F>(config: &ServerConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(config.app_state()?);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    info!("Web server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
