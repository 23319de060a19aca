use clap::Parser;
use github_proxy::config::{Config, Overrides};
use github_proxy::github::client::GitHubClient;
use github_proxy::logging;
use github_proxy::server::{self, AppState};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "github-proxy",
    about = "Lists a GitHub user's non-fork repositories together with their branches"
)]
struct Cli {
    #[arg(long, short, help = "Path to a TOML config file")]
    config: Option<PathBuf>,

    #[arg(long, help = "Upstream GitHub API base URL")]
    base_url: Option<String>,

    #[arg(long, help = "Address to listen on, e.g. 127.0.0.1:8080")]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(Overrides {
        config_path: cli.config,
        github_base_url: cli.base_url,
        bind_addr: cli.bind,
    })?;

    logging::init(&config.log_filter);

    let client = GitHubClient::new(&config.github_base_url)?;
    let state = AppState::new(Arc::new(client));

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(upstream = %config.github_base_url, "starting github-proxy");

    server::serve(listener, state, shutdown_signal()).await?;
    info!("shut down");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
