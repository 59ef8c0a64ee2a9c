use anyhow::{Context, Result};
use sealion_gateway::{config, server};
use tracing::info;
use tracing_subscriber::{EnvFilter, filter::LevelFilter};

/// Resolves the effective filter: `RUST_LOG` wins over the configured level.
/// A bare level that does not parse is rejected before anything is logged.
fn log_filter(configured: &str) -> Result<(String, EnvFilter)> {
    let level = std::env::var("RUST_LOG").unwrap_or_else(|_| configured.to_string());

    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok((level, filter));
    }

    level.parse::<LevelFilter>().with_context(|| {
        format!(
            "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
            level
        )
    })?;
    let filter = EnvFilter::new(&level);
    Ok((level, filter))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Config has to be read before tracing exists, so failures go to stderr
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let (log_level, filter) = match log_filter(&config.server.logs.level) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("{:#}", e);
            std::process::exit(1);
        }
    };

    // JSON lines, one per event
    tracing_subscriber::fmt().with_env_filter(filter).json().init();

    info!(
        "Gateway starting for model {} with log level: {}",
        config.inference.model, log_level
    );

    server::run(config).await?;

    Ok(())
}
