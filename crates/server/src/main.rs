mod api;
mod cli;
mod db;
mod error;
mod router;
mod state;
mod upload;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use finlens_agent::{analyze_financial_document, financial_analyst, Crew};
use finlens_core::Config;

use crate::cli::{Cli, Command};
use crate::db::{ResultStore, SqliteStore};
use crate::state::AppState;

fn load_config() -> Config {
    finlens_core::config::load_dotenv();
    Config::from_env()
}

async fn open_store(config: &Config) -> anyhow::Result<SqliteStore> {
    let store = SqliteStore::open(config.storage.database_path());
    store
        .init()
        .await
        .with_context(|| format!("initializing {}", store.path().display()))?;
    Ok(store)
}

async fn serve(mut config: Config, host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }
    config.log_summary();

    tokio::fs::create_dir_all(&config.storage.data_dir)
        .await
        .with_context(|| format!("creating {}", config.storage.data_dir.display()))?;

    let store = open_store(&config).await?;
    info!(stored = store.count().await?, "existing analyses");

    let crew = Crew::from_config(financial_analyst(), analyze_financial_document(), &config.llm)
        .context("configuring LLM provider")?;
    info!(agent = %crew.agent().role, model = config.llm.model(), "analysis crew ready");

    let state = Arc::new(AppState::new(
        Arc::new(store),
        Arc::new(crew),
        config.storage.clone(),
    ));
    let app = router::build_router(state, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config();

    match cli.command() {
        Command::Serve { host, port } => serve(config, host, port).await?,
        Command::InitDb => {
            let store = open_store(&config).await?;
            info!(path = %store.path().display(), stored = store.count().await?, "database ready");
        }
    }

    Ok(())
}
