//! Axum HTTP responder serving callback-wrapped JSON

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::get,
};
use jsonp_domain::{CallbackName, DomainError, ScriptBody};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use super::middleware::JsonpMiddleware;
use crate::{
    Result,
    config::{CallbackPolicy, HEALTH_PATH, ResponderConfig},
};

/// Content type of callback-wrapped bodies
pub const JAVASCRIPT_CONTENT_TYPE: &str = "application/javascript";

/// Shared responder state
#[derive(Clone)]
pub struct JsonpAppState {
    config: Arc<ResponderConfig>,
}

impl JsonpAppState {
    pub fn new(config: ResponderConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ResponderConfig {
        &self.config
    }

    /// Pick the callback name for a request from its raw query string
    ///
    /// The last occurrence of the callback parameter wins. A missing or
    /// empty value, or one the policy refuses, yields the default name.
    pub fn resolve_callback(&self, raw_query: Option<&str>) -> CallbackName {
        let requested = raw_query.and_then(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .filter(|(key, _)| key == self.config.callback_param.as_str())
                .map(|(_, value)| value.into_owned())
                .last()
        });

        requested
            .and_then(|value| CallbackName::new(value).ok())
            .filter(|name| match self.config.policy {
                CallbackPolicy::Verbatim => true,
                CallbackPolicy::Identifier => name.is_identifier(),
            })
            .unwrap_or_else(|| self.config.default_callback.clone())
    }
}

/// Create the JSONP router
///
/// Mounts the script route, the bare JSON route and `/health`. Call
/// [`ResponderConfig::validate`] first; colliding routes panic here.
pub fn create_jsonp_router(config: &ResponderConfig) -> Router<JsonpAppState> {
    Router::new()
        .route(&config.path, get(script_payload))
        .route(&config.json_path, get(json_payload))
        .route(HEALTH_PATH, get(system_health))
        .layer(JsonpMiddleware::new())
        .layer(TraceLayer::new_for_http())
}

/// Serve the responder on an already-bound listener until the server stops
///
/// # Errors
///
/// Returns [`crate::Error::Config`] for an invalid configuration and
/// [`crate::Error::Io`] if the server fails.
pub async fn serve(listener: TcpListener, config: ResponderConfig) -> Result<()> {
    config.validate()?;

    let app = create_jsonp_router(&config).with_state(JsonpAppState::new(config.clone()));

    if let Ok(addr) = listener.local_addr() {
        info!(
            "JSONP responder listening on http://{}{} (callback param '{}')",
            addr, config.path, config.callback_param
        );
    }

    axum::serve(listener, app).await?;
    Ok(())
}

/// `<callback>(<pretty json>);` with a JavaScript content type
async fn script_payload(
    State(state): State<JsonpAppState>,
    RawQuery(query): RawQuery,
) -> std::result::Result<Response, ResponderError> {
    let callback = state.resolve_callback(query.as_deref());
    debug!(callback = %callback, "serving script payload");

    let body = ScriptBody::wrap(callback, &state.config.payload)?;

    Ok(([(CONTENT_TYPE, JAVASCRIPT_CONTENT_TYPE)], body.to_string()).into_response())
}

/// The same payload without callback wrapping
async fn json_payload(State(state): State<JsonpAppState>) -> impl IntoResponse {
    Json(state.config.payload.clone())
}

async fn system_health(State(state): State<JsonpAppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "routes": [state.config.path, state.config.json_path],
        "callback_param": state.config.callback_param,
    }))
}

/// Responder errors surfaced as HTTP responses
#[derive(Debug, thiserror::Error)]
pub enum ResponderError {
    #[error("Payload error: {0}")]
    Payload(#[from] DomainError),
}

impl IntoResponse for ResponderError {
    fn into_response(self) -> Response {
        let status = match &self {
            ResponderError::Payload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(serde_json::json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
