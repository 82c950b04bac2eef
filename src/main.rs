use anyhow::{Context, Result};
use feedcast::catalog::SOURCES;
use feedcast::config::Config;
use feedcast::feed::HttpFeedSource;
use feedcast::orchestrator::{Orchestrator, RunConfig};
use feedcast::publish::telegram::TelegramApi;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("feedcast=info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %format!("{:#}", e), "Run failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config_path = Config::path_from_env();
    let config = Config::load_with_env(&config_path)
        .with_context(|| format!("Failed to load config from '{}'", config_path.display()))?;
    let credentials = config
        .credentials()
        .context("Telegram credentials are required")?;

    let client = reqwest::Client::builder()
        .user_agent(concat!("feedcast/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let api = TelegramApi::new(
        client.clone(),
        config.telegram_api_base.as_str(),
        credentials.token,
        credentials.channel_id,
    );
    let run_config = RunConfig {
        sources: SOURCES.to_vec(),
        posted_links_path: config.posted_links_file.clone(),
    };

    let summary = Orchestrator::new(run_config, HttpFeedSource::new(client), api)
        .run()
        .await
        .context("Run aborted")?;

    tracing::info!(
        sources_checked = summary.sources_checked,
        sources_failed = summary.sources_failed,
        selected = summary.entries_selected,
        delivered = summary.delivered,
        failed = summary.failed,
        persisted = summary.persisted,
        "Finished"
    );
    Ok(())
}
