//! Teller application binary - composition root.
//!
//! Ties together all Teller crates into a single executable:
//! 1. Parse CLI args and load configuration from TOML
//! 2. Open the SQLite database and seed demo data on first run
//! 3. Train the intent classifier from the corpus
//! 4. Start the axum REST API server

mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use teller_api::state::AppState;
use teller_core::config::TellerConfig;
use teller_nlu::NluEngine;
use teller_storage::{seed_demo_data, Database};

use cli::CliArgs;

/// Expand ~ to the home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if let Some(rest) = data_dir.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(rest)
    } else {
        PathBuf::from(data_dir)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config (loaded before tracing init so the resolved log level can
    // seed the filter; RUST_LOG still wins).
    let config_file = args.resolve_config_path();
    let mut config = TellerConfig::load_or_default(&config_file);
    config.general.port = args.resolve_port(config.general.port);
    if let Some(dir) = args.resolve_data_dir() {
        config.general.data_dir = dir;
    }
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(config.general.log_level.clone())
            }),
        )
        .init();

    tracing::info!("Starting Teller v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // Storage.
    let data_dir = resolve_data_dir(&config.general.data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let db_path = data_dir.join("bank.db");
    let seed_db = Arc::new(Database::new(&db_path)?);
    if seed_demo_data(&seed_db)? {
        tracing::info!("First run: demo data seeded (try user01 / User01@123)");
    }
    drop(seed_db);
    tracing::info!(path = %db_path.display(), "SQLite database opened");

    // Intent classifier, trained once at startup.
    let nlu = NluEngine::from_config(&config.nlu)?;

    // API state uses its own DB connection (SQLite supports concurrent
    // readers under WAL).
    let api_db = Database::new(&db_path)?;
    let port = config.general.port;
    let state = AppState::new(config, api_db, nlu);

    if let Err(e) = teller_api::start_server(state).await {
        tracing::error!(error = %e, "Server exited — is another instance running?");
        tracing::error!("Try: TELLER_PORT={} teller", port + 1);
        return Err(e.into());
    }

    Ok(())
}
