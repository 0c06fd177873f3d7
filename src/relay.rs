//! The same-origin forwarding shim for relay mode.
//!
//! A deliberately thin endpoint: it validates the body shape, injects the
//! server-side credential, fills in defaults, and otherwise mirrors the
//! upstream response: body verbatim, status included. No business logic
//! lives here.
//!
//! The shim answers `POST /api/chat`, replies 405 to other methods, and
//! handles CORS preflight permissively (any origin, POST/OPTIONS,
//! Content-Type).

use arrrg_derive::CommandLine;
use axum::extract::State;
use axum::http::{Method, StatusCode, header};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};

use crate::config::{GroqConfig, RELAY_PATH};
use crate::error::{Error, Result};
use crate::observability;

/// Command-line arguments for the lectern-relay tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct RelayArgs {
    /// Port to listen on.
    #[arrrg(optional, "Port to listen on (default: 3000)", "PORT")]
    pub port: Option<u32>,
}

#[derive(Clone)]
struct RelayState {
    config: GroqConfig,
    client: reqwest::Client,
}

/// Builds the relay application around the given configuration.
///
/// The configuration's credential stays inside this process; clients of
/// the relay never see it.
pub fn app(config: GroqConfig) -> Result<Router> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()
        .map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(Router::new()
        .route(RELAY_PATH, post(chat_handler))
        .layer(cors)
        .with_state(RelayState { config, client }))
}

/// Forwards one chat request upstream and mirrors the response.
async fn chat_handler(
    State(state): State<RelayState>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    observability::RELAY_REQUESTS.click();

    if !body.get("messages").is_some_and(Value::is_array) {
        observability::RELAY_REJECTS.click();
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "Invalid request: messages array is required" })),
        );
    }

    if !state.config.has_usable_key() {
        observability::RELAY_REJECTS.click();
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Server configuration error: API key not set" })),
        );
    }
    let api_key = state.config.api_key.as_deref().unwrap_or_default();

    let forward = forward_body(&body, &state.config);
    let response = state
        .client
        .post(&state.config.api_url)
        .bearer_auth(api_key)
        .json(&forward)
        .send()
        .await;

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            observability::RELAY_UPSTREAM_ERRORS.click();
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": format!("Upstream request failed: {e}") })),
            );
        }
    };

    let status_code = response.status().as_u16();
    if !response.status().is_success() {
        observability::RELAY_UPSTREAM_ERRORS.click();
    }

    match response.json::<Value>().await {
        Ok(upstream) => (
            StatusCode::from_u16(status_code).unwrap_or(StatusCode::BAD_GATEWAY),
            Json(upstream),
        ),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to read upstream response: {e}") })),
        ),
    }
}

/// Builds the upstream body: the caller's fields with server-side defaults
/// filled in.
fn forward_body(body: &Value, config: &GroqConfig) -> Value {
    json!({
        "model": body.get("model").cloned().unwrap_or_else(|| json!(config.model)),
        "messages": body.get("messages").cloned().unwrap_or_else(|| json!([])),
        "temperature": body.get("temperature").cloned().unwrap_or_else(|| json!(config.temperature)),
        "max_tokens": body.get("max_tokens").cloned().unwrap_or_else(|| json!(config.max_tokens)),
        "top_p": body.get("top_p").cloned().unwrap_or_else(|| json!(1.0)),
        "stream": false
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL};

    fn configured() -> GroqConfig {
        GroqConfig::new().with_api_key("gsk_test")
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn non_post_is_rejected() {
        let app = app(configured()).unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(RELAY_PATH)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn preflight_is_permitted() {
        let app = app(configured()).unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri(RELAY_PATH)
                    .header("origin", "https://hcm202.vercel.app")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("access-control-allow-origin")
                .and_then(|v| v.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn missing_messages_is_bad_request() {
        let app = app(configured()).unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(RELAY_PATH)
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"model":"m"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Invalid request: messages array is required"
        );
    }

    #[tokio::test]
    async fn unconfigured_key_is_server_error() {
        let app = app(GroqConfig::new()).unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(RELAY_PATH)
                    .header("content-type", "application/json")
                    .body(Body::from(
                        r#"{"messages":[{"role":"user","content":"hi"}]}"#,
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Server configuration error: API key not set");
    }

    #[test]
    fn forward_body_fills_defaults() {
        let body = json!({ "messages": [{ "role": "user", "content": "hi" }] });
        let forward = forward_body(&body, &GroqConfig::new());
        assert_eq!(forward["model"], DEFAULT_MODEL);
        assert_eq!(forward["max_tokens"], DEFAULT_MAX_TOKENS);
        assert_eq!(forward["top_p"], 1.0);
        assert_eq!(forward["stream"], false);
        assert_eq!(forward["messages"], body["messages"]);
    }

    #[test]
    fn forward_body_keeps_caller_overrides() {
        let body = json!({
            "messages": [],
            "model": "llama-3.1-8b-instant",
            "temperature": 0.25,
            "max_tokens": 64,
            "top_p": 0.5
        });
        let forward = forward_body(&body, &GroqConfig::new());
        assert_eq!(forward["model"], "llama-3.1-8b-instant");
        assert_eq!(forward["temperature"], 0.25);
        assert_eq!(forward["max_tokens"], 64);
        assert_eq!(forward["top_p"], 0.5);
    }
}
