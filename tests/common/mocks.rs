use async_trait::async_trait;
use bytes::Bytes;
use futures::{StreamExt, stream};
use sealion_gateway::{
    Error, Result,
    inference::{InferenceEngine, InferenceInput, InferenceOutput},
};
use serde_json::Value;
use std::sync::{Arc, Mutex};

/// Mock inference engine for testing
#[derive(Debug, Default)]
pub struct MockInferenceEngine {
    pub calls: Arc<Mutex<Vec<(String, InferenceInput)>>>,
    pub json: Option<Value>,
    pub chunks: Vec<String>,
    pub error: Option<String>,
}

impl MockInferenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, json: Value) -> Self {
        self.json = Some(json);
        self
    }

    pub fn with_chunks(mut self, chunks: &[&str]) -> Self {
        self.chunks = chunks.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn get_calls(&self) -> Vec<(String, InferenceInput)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceEngine for MockInferenceEngine {
    async fn run(&self, model: &str, input: InferenceInput) -> Result<InferenceOutput> {
        let streaming = input.is_streaming();
        self.calls.lock().unwrap().push((model.to_string(), input));

        if let Some(ref error) = self.error {
            return Err(Error::inference(error.clone()));
        }

        // A mock with only a JSON result answers streaming runs with it too
        if streaming && !(self.chunks.is_empty() && self.json.is_some()) {
            let chunks: Vec<Result<Bytes>> = self
                .chunks
                .iter()
                .map(|c| Ok(Bytes::from(c.clone())))
                .collect();
            return Ok(InferenceOutput::Stream(stream::iter(chunks).boxed()));
        }

        Ok(InferenceOutput::Json(
            self.json.clone().unwrap_or(Value::Null),
        ))
    }
}
