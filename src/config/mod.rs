mod types;

pub use types::*;

use crate::{Error, Result};
use std::env;
use std::path::Path;
use tracing::debug;

const ACCOUNT_ID_VAR: &str = "CLOUDFLARE_ACCOUNT_ID";
const API_TOKEN_VAR: &str = "CLOUDFLARE_API_TOKEN";

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());
    load_from(config_path).await
}

pub async fn load_from(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    let mut config = from_yaml_str(&config_str)?;

    if let Ok(account_id) = env::var(ACCOUNT_ID_VAR) {
        config.inference.account_id = account_id;
    }
    if let Ok(api_token) = env::var(API_TOKEN_VAR) {
        config.inference.api_token = api_token;
    }

    validate(&config)?;
    Ok(config)
}

/// Parses configuration text without consulting the environment.
pub fn from_yaml_str(yaml: &str) -> Result<Config> {
    Ok(serde_yaml::from_str(yaml)?)
}

pub fn validate(config: &Config) -> Result<()> {
    if config.inference.account_id.trim().is_empty() {
        return Err(Error::config(format!(
            "inference.account_id is empty (set it in the file or via {ACCOUNT_ID_VAR})"
        )));
    }
    if config.inference.api_token.trim().is_empty() {
        return Err(Error::config(format!(
            "inference.api_token is empty (set it in the file or via {API_TOKEN_VAR})"
        )));
    }
    if config.inference.model.trim().is_empty() {
        return Err(Error::config("inference.model must not be empty"));
    }
    Ok(())
}
