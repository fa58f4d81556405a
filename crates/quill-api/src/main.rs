//! Quill API server
//!
//! Starts the HTTP server for idea intake and the review queue.

use anyhow::Context;
use clap::Parser;
use quill_api::{config::ApiConfig, start_server};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Quill - research-backed post drafting with a human review queue
#[derive(Parser, Debug)]
#[command(name = "quill-api", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "QUILL_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind address
    #[arg(long)]
    bind: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Credentials may live in a local .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ApiConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => {
            eprintln!("Warning: No config file specified, using defaults");
            ApiConfig::default()
        }
    };
    if let Some(bind) = cli.bind {
        config.bind_address = bind;
    }
    if let Some(port) = cli.port {
        config.bind_port = port;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    start_server(config).await?;
    Ok(())
}
