use clap::Parser;
use std::path::PathBuf;

use crate::watcher::DEFAULT_DISCORD_API_URL;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Parser, Debug, Clone)]
#[command(name = "gas-ticker")]
#[command(about = "Manage per-network gas price tickers over HTTP")]
#[command(version)]
pub struct Cli {
    /// Address to bind the HTTP API to
    #[arg(long, env = "TICKER_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the HTTP API to
    #[arg(short, long, env = "TICKER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// SQLite database used to persist watched networks (disabled when unset)
    #[arg(long, env = "TICKER_DB")]
    pub db: Option<PathBuf>,

    /// Gas price endpoint; `{network}` is replaced with the lower-cased network
    #[arg(long, env = "TICKER_GAS_API_URL")]
    pub gas_api_url: Option<String>,

    /// Discord REST API base URL
    #[arg(long, env = "TICKER_DISCORD_API_URL", default_value = DEFAULT_DISCORD_API_URL)]
    pub discord_api_url: String,

    /// Enable verbose output (-v)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output (-q)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output logs in JSON format
    #[arg(long, env = "TICKER_LOG_JSON")]
    pub json: bool,

    /// Write logs to this file instead of stdout
    #[arg(long, env = "TICKER_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
