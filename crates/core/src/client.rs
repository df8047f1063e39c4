use async_trait::async_trait;
use conekta_bridge_types::CONEKTA_ACCEPT_HEADER;
use reqwest::{
    Method,
    header::{ACCEPT, ACCEPT_LANGUAGE},
};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::{CONNECT_TIMEOUT_SECS, ClientConfig, Locale};

/// A call to make against the Conekta API, relative to its base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            path: path.into(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: Method::POST,
            path: path.into(),
            body,
        }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::PUT,
            path: path.into(),
            body: Some(body),
        }
    }
}

/// Raw upstream answer. Status and body are kept undecoded so the service
/// can apply one normalization rule to every operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Failures that happen before an upstream response is available
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransportError {
    /// The upstream call exceeded the configured timeout
    #[error("Timed out waiting for Conekta: {0}")]
    Timeout(String),

    /// DNS resolution or TCP/TLS connection failed
    #[error("Could not connect to Conekta: {0}")]
    Connect(String),

    /// The response body could not be read. `status` is set when the
    /// status line was an error status.
    #[error("Failed to read Conekta response: {message}")]
    Body {
        message: String,
        status: Option<u16>,
    },

    /// Any other client error, with the status the client attached to it
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        status: Option<u16>,
    },
}

impl TransportError {
    /// Status surfaced by the transport itself, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Body { status, .. } | TransportError::Http { status, .. } => *status,
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            TransportError::Timeout(_) => "timeout",
            TransportError::Connect(_) => "connect",
            TransportError::Body { .. } => "body",
            TransportError::Http { .. } => "http",
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();
        if error.is_timeout() {
            TransportError::Timeout(message)
        } else if error.is_connect() {
            TransportError::Connect(message)
        } else if error.is_body() || error.is_decode() {
            TransportError::Body {
                message,
                status: None,
            }
        } else {
            TransportError::Http {
                message,
                status: error.status().map(|s| s.as_u16()),
            }
        }
    }
}

/// The seam between the service and the remote Conekta API.
///
/// Production code uses [`ConektaClient`]; tests substitute fakes.
#[async_trait]
pub trait ConektaApi: Send + Sync {
    /// Perform exactly one upstream call.
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError>;
}

/// `reqwest`-backed [`ConektaApi`]
#[derive(Debug, Clone)]
pub struct ConektaClient {
    http_client: reqwest::Client,
    base_url: Url,
    api_key: String,
    locale: Locale,
}

impl ConektaClient {
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(std::time::Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            locale: config.locale,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ConektaApi for ConektaClient {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let url = self.endpoint(&request.path);
        debug!(method = %request.method, url = %url, "Sending request to Conekta");

        let mut builder = self
            .http_client
            .request(request.method, &url)
            .bearer_auth(&self.api_key)
            .header(ACCEPT, CONEKTA_ACCEPT_HEADER)
            .header(ACCEPT_LANGUAGE, self.locale.as_str());

        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            // A 2xx whose body is lost is still a failure of ours
            if (200..300).contains(&status) {
                TransportError::from(e)
            } else {
                TransportError::Body {
                    message: e.to_string(),
                    status: Some(status),
                }
            }
        })?;

        debug!(url = %url, status, "Conekta responded");

        Ok(ApiResponse { status, body })
    }
}
