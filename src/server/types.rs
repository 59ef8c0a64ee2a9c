use crate::{Error, Result};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;

pub const AVAILABLE_ENDPOINTS: [&str; 4] = ["/", "/health", "/chat", "/stream"];

/// Inbound chat body before normalization. Either `messages` (used as-is
/// when it is an array) or `prompt` with an optional `system`.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ChatRequestBody {
    pub messages: Option<Value>,
    pub prompt: Option<Value>,
    pub system: Option<Value>,
}

impl ChatRequestBody {
    pub fn parse(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(Error::InvalidJson)?;
        Ok(Self::from_value(value))
    }

    /// Non-object documents (`null`, arrays, scalars) carry neither field and
    /// end up as the missing-input 400 rather than a server fault.
    pub fn from_value(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };
        Self {
            messages: fields.remove("messages"),
            prompt: fields.remove("prompt"),
            system: fields.remove("system"),
        }
    }

    /// Canonical message list: a caller-supplied array verbatim, otherwise
    /// the optional system turn followed by the user prompt.
    pub fn into_messages(self) -> Result<Vec<Value>> {
        if let Some(Value::Array(messages)) = self.messages {
            return Ok(messages);
        }

        let prompt = match self.prompt {
            Some(prompt) if is_present(&prompt) => prompt,
            _ => return Err(Error::MissingInput),
        };

        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.system.filter(is_present) {
            messages.push(turn("system", system));
        }
        messages.push(turn("user", prompt));
        Ok(messages)
    }
}

/// A field counts as supplied unless it is `null`, `false`, zero or an
/// empty string. Other values are forwarded untouched as message content.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn turn(role: &str, content: Value) -> Value {
    json!({ "role": role, "content": content })
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub model: String,
    pub endpoints: Endpoints,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub chat: String,
    pub stream: String,
}

impl HealthResponse {
    pub fn ok(model: &str) -> Self {
        Self {
            status: "ok".to_string(),
            model: model.to_string(),
            endpoints: Endpoints {
                chat: "/chat".to_string(),
                stream: "/stream".to_string(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simple_example: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_endpoints: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            example: None,
            simple_example: None,
            available_endpoints: None,
        }
    }

    /// Error body for a request carrying neither accepted input shape.
    pub fn missing_input(error: impl Into<String>) -> Self {
        Self {
            example: Some(json!({
                "messages": [
                    { "role": "system", "content": "You are a helpful assistant" },
                    { "role": "user", "content": "Hello!" }
                ]
            })),
            simple_example: Some(json!({
                "prompt": "Hello!",
                "system": "You are a helpful assistant"
            })),
            ..Self::new(error)
        }
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self {
            available_endpoints: Some(AVAILABLE_ENDPOINTS.iter().map(|e| e.to_string()).collect()),
            ..Self::new(error)
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, body) = match self {
            Error::InvalidJson(_) => (StatusCode::BAD_REQUEST, ErrorResponse::new(message)),
            Error::MissingInput => (StatusCode::BAD_REQUEST, ErrorResponse::missing_input(message)),
            Error::MethodNotAllowed => {
                (StatusCode::METHOD_NOT_ALLOWED, ErrorResponse::new(message))
            }
            Error::NotFound => (StatusCode::NOT_FOUND, ErrorResponse::not_found(message)),
            other => {
                error!("Request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, ErrorResponse::new(message))
            }
        };
        (status, Json(body)).into_response()
    }
}
