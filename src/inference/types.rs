use crate::{Error, Result};
use bytes::Bytes;
use futures::stream::{self, BoxStream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Incremental response body handed back by a streaming run.
pub type ByteStream = BoxStream<'static, Result<Bytes>>;

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

impl From<Message> for Value {
    fn from(message: Message) -> Self {
        json!({ "role": message.role, "content": message.content })
    }
}

/// Payload of a single backend run.
///
/// Messages are kept as raw JSON: caller-supplied arrays are forwarded
/// without inspecting their elements.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceInput {
    pub messages: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

impl InferenceInput {
    pub fn new(messages: Vec<Value>) -> Self {
        Self {
            messages,
            stream: None,
        }
    }

    pub fn streaming(messages: Vec<Value>) -> Self {
        Self {
            messages,
            stream: Some(true),
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.stream.unwrap_or(false)
    }
}

pub enum InferenceOutput {
    Json(Value),
    Stream(ByteStream),
}

impl InferenceOutput {
    pub fn into_json(self) -> Result<Value> {
        match self {
            Self::Json(value) => Ok(value),
            Self::Stream(_) => Err(Error::inference(
                "backend returned a stream for a non-streaming run",
            )),
        }
    }

    /// A JSON result is relayed as a single chunk.
    pub fn into_stream(self) -> Result<ByteStream> {
        match self {
            Self::Stream(stream) => Ok(stream),
            Self::Json(value) => {
                let chunk = Bytes::from(serde_json::to_vec(&value)?);
                Ok(stream::once(async move { Ok(chunk) }).boxed())
            }
        }
    }
}

impl std::fmt::Debug for InferenceOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(value) => f.debug_tuple("Json").field(value).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}
