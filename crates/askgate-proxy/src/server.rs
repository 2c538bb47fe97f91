//! Axum HTTP server for the OpenAI-compatible gateway.
//!
//! This module provides the `serve()` function that runs the gateway
//! using a pre-bound TcpListener (from the supervisor).

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::Method,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

use askgate_core::{AskPort, AskRequest, GatewayConfig, ModelDescriptor};

use crate::auth::{AuthGuard, require_bearer};
use crate::error::HttpError;
use crate::models::{AskAnswer, HealthResponse, KillResponse};
use crate::shutdown::ShutdownHandle;
use crate::stream::sse_response;
use crate::translate::{ChatRequest, CompletionEnvelope, parse_ask_prompt};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct GatewayState {
    /// The AI capability behind the gateway.
    pub ask: Arc<dyn AskPort>,
    /// Model reported when a request does not name one.
    pub default_model: Arc<str>,
    /// Lets `/kill` close the listener after responding.
    pub shutdown: ShutdownHandle,
}

/// Build the gateway router.
///
/// Route order: kill, health, models, chat completions, ask, then the 404
/// fallback. Every route, the fallback included, sits behind [`AuthGuard`],
/// which lets the public lifecycle routes through on its own.
pub fn create_router(
    config: &GatewayConfig,
    ask: Arc<dyn AskPort>,
    shutdown: ShutdownHandle,
) -> Router {
    let state = GatewayState {
        ask,
        default_model: Arc::from(config.default_model.as_str()),
        shutdown,
    };
    let guard = AuthGuard::new(&config.api_key);

    Router::new()
        .route("/kill", post(kill).fallback(only_post))
        .route("/health", get(health).fallback(only_get))
        .route("/v1/models", get(list_models).fallback(only_get))
        .route(
            "/v1/chat/completions",
            post(chat_completions).fallback(only_post),
        )
        .route("/ask", post(ask_once).fallback(only_post))
        .fallback(not_found)
        .with_state(state)
        .layer(middleware::from_fn_with_state(guard, require_bearer))
        .layer(TraceLayer::new_for_http())
}

/// Run the gateway with a pre-bound listener until `cancel` fires.
///
/// `/kill` cancels the same token after the configured grace delay.
///
/// # Returns
///
/// Returns `Ok(())` on clean shutdown, or an error if the server fails.
pub async fn serve(
    listener: TcpListener,
    config: GatewayConfig,
    ask: Arc<dyn AskPort>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    debug!(api_key_len = config.api_key.len(), "Bearer auth enabled");

    let shutdown = ShutdownHandle::new(cancel.clone(), config.kill_grace);
    let app = create_router(&config, ask, shutdown);

    info!("Gateway listening on {addr}");
    info!("Configure OpenAI clients to use: http://{addr}/v1");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Gateway shut down");
    Ok(())
}

/// Acknowledge, then close the listener after the grace delay.
async fn kill(State(state): State<GatewayState>) -> Json<KillResponse> {
    state.shutdown.trigger();
    Json(KillResponse::shut_down())
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::running())
}

/// Models advertised by the capability, as a bare `[{id, name}]` array.
async fn list_models(State(state): State<GatewayState>) -> Json<Vec<ModelDescriptor>> {
    debug!("GET /v1/models");
    Json(state.ask.models())
}

async fn chat_completions(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Response, HttpError> {
    let body: Value = serde_json::from_slice(&body)?;
    let request = ChatRequest::from_json(&body, &state.default_model)?;

    info!(
        model = %request.model,
        streaming = request.stream,
        prior_turns = request.prior_turns,
        "Processing chat completion request"
    );

    let ask_request = request.ask_request();

    if request.stream {
        let envelope = CompletionEnvelope::now(request.model);
        return Ok(sse_response(state.ask, ask_request, envelope));
    }

    let answer = state.ask.ask(&ask_request).await.map_err(|e| {
        error!(model = %request.model, "Chat completion failed: {e}");
        HttpError::from(e)
    })?;

    Ok(Json(CompletionEnvelope::now(request.model).full(answer)).into_response())
}

/// Single-shot `{prompt}` → `{answer}`.
async fn ask_once(
    State(state): State<GatewayState>,
    body: Bytes,
) -> Result<Json<AskAnswer>, HttpError> {
    let body: Value = serde_json::from_slice(&body)?;
    let prompt = parse_ask_prompt(&body)?;

    let answer = state.ask.ask(&AskRequest::new(prompt)).await.map_err(|e| {
        error!("Ask failed: {e}");
        HttpError::from(e)
    })?;

    Ok(Json(AskAnswer { answer }))
}

async fn only_post() -> HttpError {
    method_not_allowed(&Method::POST)
}

async fn only_get() -> HttpError {
    method_not_allowed(&Method::GET)
}

fn method_not_allowed(allowed: &Method) -> HttpError {
    HttpError::MethodNotAllowed(format!("Only {allowed} method is allowed"))
}

async fn not_found() -> HttpError {
    HttpError::NotFound("Endpoint not found".to_string())
}
