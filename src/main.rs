use anyhow::Context;
use clap::Parser;
use colored::*;
use repo_explorer::cli::Cli;
use repo_explorer::server::{self, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .init();

    let cli = Cli::parse();
    let config = ServerConfig::from_cli(&cli).context("Invalid configuration")?;

    println!("{}", "GitHub Repository Explorer".bold().green());
    println!("{}\n", "=".repeat(50).dimmed());
    println!("🌐 GitHub API: {}", config.api_base_url);
    println!("🗣️  Default locale: {}", config.default_locale);
    println!(
        "🗂️  List views: up to {}, kept {}s",
        config.sessions.max_views,
        config.sessions.ttl.as_secs()
    );
    println!("📡 Listening on http://{}", config.bind_addr);
    println!("\nPress Ctrl+C to stop the server\n");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("Failed to listen for Ctrl+C: {}", e);
        }
        println!("\n🛑 Shutting down server...");
    };

    server::serve(&config, shutdown)
        .await
        .context("Web server failed")?;

    println!("✅ Server stopped");

    Ok(())
}
