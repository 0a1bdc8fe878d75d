//! Command-line flags for the `teller` binary.
//!
//! Every flag has an environment fallback and a config-file fallback:
//! flag > env var > config value > built-in default.

use std::path::PathBuf;

use clap::Parser;

/// Teller — a demo banking assistant with a slot-filling chatbot.
#[derive(Parser, Debug)]
#[command(name = "teller", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// API server port.
    #[arg(short = 'p', long = "port")]
    pub port: Option<u16>,

    /// Data directory for the SQLite database.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,
}

impl CliArgs {
    /// Where to read the config file from: `--config`, then
    /// `TELLER_CONFIG`, then `~/.teller/config.toml`.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.config
            .clone()
            .or_else(|| std::env::var("TELLER_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(default_config_path)
    }

    /// Which port to serve on: `--port`, then `TELLER_PORT`, then the
    /// config value, then 4040.
    pub fn resolve_port(&self, config_port: u16) -> u16 {
        self.port
            .or_else(|| std::env::var("TELLER_PORT").ok()?.parse().ok())
            .unwrap_or(if config_port != 0 { config_port } else { 4040 })
    }

    /// Data directory override, if any (`None` keeps the config value).
    pub fn resolve_data_dir(&self) -> Option<String> {
        self.data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
    }

    /// Log level override, if any.
    pub fn resolve_log_level(&self) -> Option<String> {
        self.log_level.clone()
    }
}

fn default_config_path() -> PathBuf {
    match std::env::var("HOME") {
        Ok(home) => PathBuf::from(home).join(".teller").join("config.toml"),
        Err(_) => PathBuf::from("config.toml"),
    }
}
