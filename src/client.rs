//! HTTP transports for the chat-completions API.
//!
//! Two transports implement the same [`CompletionTransport`] contract: the
//! [`RelayClient`] posts to a same-origin forwarding endpoint that injects
//! the credential server-side, and the [`DirectClient`] posts straight to
//! the upstream API with a locally configured credential. Which one a
//! deployment uses is decided once, by [`crate::config::TransportMode`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client as ReqwestClient, Response};
use serde::Deserialize;
use url::Url;

use crate::client_logger::ClientLogger;
use crate::config::{GroqConfig, RELAY_PATH};
use crate::error::{Error, Result};
use crate::observability;
use crate::types::{ChatCompletion, CompletionRequest};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A transport capable of one chat-completions exchange.
///
/// Implementations must return an error for any response that does not
/// carry at least one completion choice, so callers can rely on
/// [`ChatCompletion::first_content`] being present on success.
#[async_trait]
pub trait CompletionTransport: Send + Sync {
    /// Sends the request and returns the parsed completion.
    async fn complete(&self, request: &CompletionRequest) -> Result<ChatCompletion>;

    /// The endpoint this transport posts to.
    fn endpoint(&self) -> &str;
}

/// Client for the same-origin relay endpoint.
///
/// Attaches no credential; the relay injects its own before forwarding
/// upstream.
pub struct RelayClient {
    client: ReqwestClient,
    endpoint: String,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl RelayClient {
    /// Creates a relay client for the given origin, e.g.
    /// `https://hcm202.vercel.app`.
    pub fn new(origin: &str) -> Result<Self> {
        let endpoint = Url::parse(origin)?.join(RELAY_PATH)?.to_string();
        Ok(Self {
            client: http_client()?,
            endpoint,
            logger: None,
        })
    }

    /// Attaches a logger that observes requests and completions.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }
}

#[async_trait]
impl CompletionTransport for RelayClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<ChatCompletion> {
        if let Some(logger) = &self.logger {
            logger.log_request(request);
        }
        let completion = post_completion(&self.client, &self.endpoint, None, request).await?;
        if let Some(logger) = &self.logger {
            logger.log_completion(&completion);
        }
        Ok(completion)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Client for the upstream chat-completions API.
///
/// Requires a locally configured credential. A missing or placeholder key
/// short-circuits with [`Error::Configuration`] before any network
/// activity.
pub struct DirectClient {
    client: ReqwestClient,
    config: GroqConfig,
    logger: Option<Arc<dyn ClientLogger>>,
}

impl DirectClient {
    /// Creates a direct client from the given configuration.
    pub fn new(config: GroqConfig) -> Result<Self> {
        // Validate the endpoint up front so a bad GROQ_API_URL fails at
        // construction, not on the first send.
        Url::parse(&config.api_url)?;
        Ok(Self {
            client: http_client()?,
            config,
            logger: None,
        })
    }

    /// Attaches a logger that observes requests and completions.
    pub fn with_logger(mut self, logger: Arc<dyn ClientLogger>) -> Self {
        self.logger = Some(logger);
        self
    }
}

#[async_trait]
impl CompletionTransport for DirectClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<ChatCompletion> {
        let key = self
            .config
            .api_key
            .as_deref()
            .filter(|_| self.config.has_usable_key());
        let Some(key) = key else {
            return Err(Error::configuration(
                "GROQ_API_KEY is missing or still the placeholder value",
            ));
        };
        if let Some(logger) = &self.logger {
            logger.log_request(request);
        }
        let completion =
            post_completion(&self.client, &self.config.api_url, Some(key), request).await?;
        if let Some(logger) = &self.logger {
            logger.log_completion(&completion);
        }
        Ok(completion)
    }

    fn endpoint(&self) -> &str {
        &self.config.api_url
    }
}

/// Builds the shared reqwest client.
fn http_client() -> Result<ReqwestClient> {
    ReqwestClient::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .map_err(|e| {
            Error::http_client(
                format!("Failed to build HTTP client: {}", e),
                Some(Box::new(e)),
            )
        })
}

/// POSTs the request body and parses the completion, classifying every
/// failure along the way.
async fn post_completion(
    client: &ReqwestClient,
    url: &str,
    bearer: Option<&str>,
    request: &CompletionRequest,
) -> Result<ChatCompletion> {
    observability::CLIENT_REQUESTS.click();

    let mut builder = client.post(url).json(request);
    if let Some(key) = bearer {
        builder = builder.bearer_auth(key);
    }

    let response = builder.send().await.map_err(|e| {
        observability::CLIENT_REQUEST_ERRORS.click();
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(DEFAULT_TIMEOUT.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    })?;

    if !response.status().is_success() {
        observability::CLIENT_REQUEST_ERRORS.click();
        return Err(process_error_response(response).await);
    }

    let completion = response.json::<ChatCompletion>().await.map_err(|e| {
        Error::serialization(
            format!("Failed to parse response: {}", e),
            Some(Box::new(e)),
        )
    })?;

    if completion.choices.is_empty() {
        observability::CLIENT_EMPTY_COMPLETIONS.click();
        return Err(Error::empty_completion("no response from model"));
    }
    Ok(completion)
}

/// Process an API error response and convert it to our Error type.
async fn process_error_response(response: Response) -> Error {
    let status_code = response.status().as_u16();

    let retry_after = response
        .headers()
        .get("retry-after")
        .and_then(|val| val.to_str().ok())
        .and_then(|val| val.parse::<u64>().ok());

    let error_body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            return Error::http_client(
                format!("Failed to read error response: {}", e),
                Some(Box::new(e)),
            );
        }
    };

    classify_status(status_code, &error_body, retry_after)
}

/// Maps an HTTP status and error body to the matching error variant.
///
/// The body is expected to be `{"error": {"message": ...}}`; anything else
/// falls back to a generic message.
pub(crate) fn classify_status(status_code: u16, body: &str, retry_after: Option<u64>) -> Error {
    #[derive(Deserialize)]
    struct ErrorResponse {
        error: Option<ErrorDetail>,
    }

    #[derive(Deserialize)]
    struct ErrorDetail {
        message: Option<String>,
    }

    let message = serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|parsed| parsed.error)
        .and_then(|detail| detail.message)
        .unwrap_or_else(|| "Unknown error".to_string());

    match status_code {
        401 => Error::authentication(message),
        429 => Error::rate_limit(message, retry_after),
        _ => Error::api(status_code, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PLACEHOLDER_API_KEY;

    #[test]
    fn relay_endpoint_joins_origin_and_path() {
        let client = RelayClient::new("https://hcm202.vercel.app").unwrap();
        assert_eq!(client.endpoint(), "https://hcm202.vercel.app/api/chat");

        let client = RelayClient::new("http://127.0.0.1:3000").unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:3000/api/chat");
    }

    #[test]
    fn relay_rejects_invalid_origin() {
        assert!(RelayClient::new("not a url").is_err());
    }

    #[test]
    fn direct_rejects_invalid_api_url() {
        let config = GroqConfig::new()
            .with_api_key("gsk_test")
            .with_api_url("definitely-not-a-url");
        assert!(DirectClient::new(config).is_err());
    }

    #[tokio::test]
    async fn direct_short_circuits_on_placeholder_key() {
        let config = GroqConfig::new().with_api_key(PLACEHOLDER_API_KEY);
        let client = DirectClient::new(config).unwrap();
        let request = CompletionRequest::exchange("m", "s", "u", 0.8, 16);
        let err = client.complete(&request).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn direct_short_circuits_on_missing_key() {
        let client = DirectClient::new(GroqConfig::new()).unwrap();
        let request = CompletionRequest::exchange("m", "s", "u", 0.8, 16);
        let err = client.complete(&request).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn classify_parses_upstream_detail() {
        let err = classify_status(400, r#"{"error":{"message":"bad model"}}"#, None);
        match err {
            Error::Api {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 400);
                assert_eq!(message, "bad model");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }

    #[test]
    fn classify_401_is_authentication() {
        let err = classify_status(401, r#"{"error":{"message":"invalid api key"}}"#, None);
        assert!(err.is_authentication());
    }

    #[test]
    fn classify_429_is_rate_limit_with_retry_after() {
        let err = classify_status(429, "{}", Some(30));
        match err {
            Error::RateLimit { retry_after, .. } => assert_eq!(retry_after, Some(30)),
            other => panic!("expected RateLimit error, got {:?}", other),
        }
    }

    #[test]
    fn classify_falls_back_on_unparseable_body() {
        let err = classify_status(502, "<html>Bad Gateway</html>", None);
        match err {
            Error::Api {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 502);
                assert_eq!(message, "Unknown error");
            }
            other => panic!("expected Api error, got {:?}", other),
        }
    }
}
