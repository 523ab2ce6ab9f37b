use clap::Parser;

#[derive(Parser)]
#[command(name = "github-repo-explorer")]
#[command(about = "GitHub Repository Explorer - Search GitHub users and browse their public repositories")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Address the web server listens on
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:3000")]
    pub bind: String,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    pub api_base_url: String,

    /// Timeout for a single GitHub request, in seconds
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// How long an open repository list keeps its fetched repositories, in seconds
    #[arg(long, env = "VIEW_TTL_SECS", default_value_t = 1800)]
    pub view_ttl_secs: u64,

    /// Open repository lists kept in memory before the oldest is dropped
    #[arg(long, env = "MAX_VIEWS", default_value_t = 1024)]
    pub max_views: usize,

    /// Locale used when the visitor has not picked one (en or ko)
    #[arg(long, env = "DEFAULT_LOCALE", default_value = "en")]
    pub default_locale: String,

    /// User-Agent sent to GitHub
    #[arg(long, env = "GITHUB_USER_AGENT", default_value = "GitHub Repository Explorer/0.1.0")]
    pub user_agent: String,
}
