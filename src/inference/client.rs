use super::types::*;
use crate::{Error, Result, config::InferenceConfig};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use serde_json::Value;
use tracing::debug;

/// The backend capability the router delegates to: run a model over a
/// message list, optionally streaming.
#[async_trait]
pub trait InferenceEngine: Send + Sync {
    async fn run(&self, model: &str, input: InferenceInput) -> Result<InferenceOutput>;
}

/// Client for the Workers AI REST endpoint.
pub struct WorkersAiClient {
    client: reqwest::Client,
    base_url: String,
    account_id: String,
    api_token: String,
}

impl WorkersAiClient {
    pub fn new(config: InferenceConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            account_id: config.account_id,
            api_token: config.api_token,
        }
    }

    pub fn run_url(&self, model: &str) -> String {
        format!(
            "{}/accounts/{}/ai/run/{}",
            self.base_url,
            self.account_id,
            model.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl InferenceEngine for WorkersAiClient {
    async fn run(&self, model: &str, input: InferenceInput) -> Result<InferenceOutput> {
        debug!(
            "Running {} with {} messages (stream: {})",
            model,
            input.messages.len(),
            input.is_streaming()
        );

        let streaming = input.is_streaming();
        let response = self
            .client
            .post(self.run_url(model))
            .bearer_auth(&self.api_token)
            .json(&input)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::inference(format!(
                "backend responded with {status}: {body}"
            )));
        }

        if streaming {
            let stream = response.bytes_stream().map_err(Error::from).boxed();
            return Ok(InferenceOutput::Stream(stream));
        }

        let mut envelope: Value = response.json().await?;
        let result = match envelope.get_mut("result") {
            Some(result) => result.take(),
            None => envelope,
        };
        Ok(InferenceOutput::Json(result))
    }
}
