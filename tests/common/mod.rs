#![allow(dead_code)]

pub mod mocks;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response},
};
use sealion_gateway::server::{self, AppState};
use serde_json::Value;
use std::sync::Arc;

pub use mocks::MockInferenceEngine;

pub const TEST_MODEL: &str = "@cf/test/model";

/// Router wired to the given mock engine.
pub fn create_test_app(engine: Arc<MockInferenceEngine>) -> Router {
    server::router(AppState::new(engine, TEST_MODEL))
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn assert_cors_headers<B>(response: &Response<B>) {
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
}

pub fn assert_json_error<B>(response: &Response<B>) {
    assert_cors_headers(response);
    assert_eq!(response.headers()["content-type"], "application/json");
}
