//! Shared helpers for askgate-proxy integration tests.

// Each test binary uses a different subset of these helpers.
#![allow(dead_code)]

pub mod fake_ask;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, header};
use http_body_util::BodyExt;
use tokio_util::sync::CancellationToken;

use askgate_core::{AskPort, GatewayConfig};
use askgate_proxy::{ShutdownHandle, create_router};

/// API key every test router is configured with.
pub const TEST_API_KEY: &str = "test-key-123";

/// Bearer header value matching [`TEST_API_KEY`].
pub const TEST_BEARER: &str = "Bearer test-key-123";

/// Router plus the token `/kill` cancels.
pub fn test_router(ask: Arc<dyn AskPort>) -> (Router, CancellationToken) {
    let config = GatewayConfig::with_defaults(TEST_API_KEY).with_port(0);
    let cancel = CancellationToken::new();
    let shutdown = ShutdownHandle::new(cancel.clone(), Duration::from_millis(100));
    (create_router(&config, ask, shutdown), cancel)
}

pub fn get(uri: &str, bearer: Option<&str>) -> Request<Body> {
    request("GET", uri, bearer, Body::empty())
}

pub fn post(uri: &str, bearer: Option<&str>, body: &str) -> Request<Body> {
    request("POST", uri, bearer, Body::from(body.to_string()))
}

fn request(method: &str, uri: &str, bearer: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(value) = bearer {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    builder.body(body).unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(response).await).unwrap()
}
