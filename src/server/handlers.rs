use super::types::{ChatRequestBody, HealthResponse};
use crate::{
    Error, Result,
    inference::{InferenceEngine, InferenceInput},
};
use axum::{
    body::{Body, Bytes},
    extract::{Request, State},
    http::{Method, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn InferenceEngine>,
    pub model: Arc<str>,
}

impl AppState {
    pub fn new(engine: Arc<dyn InferenceEngine>, model: impl Into<Arc<str>>) -> Self {
        Self {
            engine,
            model: model.into(),
        }
    }
}

/// Answers every OPTIONS request with an empty 200 before routing.
pub async fn preflight(request: Request, next: Next) -> Response {
    if request.method() == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    next.run(request).await
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::ok(&state.model))
}

pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let messages = ChatRequestBody::parse(&body)?.into_messages()?;
    info!("Chat request with {} messages", messages.len());

    let output = state
        .engine
        .run(&state.model, InferenceInput::new(messages))
        .await?;

    Ok(Json(output.into_json()?).into_response())
}

pub async fn stream(State(state): State<AppState>, body: Bytes) -> Result<Response> {
    let messages = ChatRequestBody::parse(&body)?.into_messages()?;
    info!("Stream request with {} messages", messages.len());

    let stream = state
        .engine
        .run(&state.model, InferenceInput::streaming(messages))
        .await?
        .into_stream()?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

pub async fn method_not_allowed() -> Error {
    Error::MethodNotAllowed
}

/// Unmatched paths still run the method gate and body checks before
/// reporting 404.
pub async fn fallback(method: Method, body: Bytes) -> Result<Response> {
    if method != Method::POST {
        return Err(Error::MethodNotAllowed);
    }

    let messages = ChatRequestBody::parse(&body)?.into_messages()?;
    debug!("No route for POST with {} messages", messages.len());

    Err(Error::NotFound)
}
