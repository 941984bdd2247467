//! Shared HTTP client for the Lendport API.
//!
//! Provides a minimal client with configurable auth (Bearer token or X-API-Key),
//! a generic JSON POST helper, and the upload-credential request used by the
//! upload coordinator. Non-success responses surface as `ApiError` so callers
//! can show the API's own message.

pub mod api;

use anyhow::{Context, Result};
use lendport_core::{ApiError, AuthScheme, ClientConfig};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Authentication strategy for the API.
#[derive(Clone, Debug)]
pub enum Auth {
    /// `Authorization: Bearer {token}`
    Bearer(String),
    /// `X-API-Key: {key}`
    XApiKey(String),
}

/// Error body returned by the API on non-success responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    code: Option<String>,
}

/// HTTP client for the Lendport API with configurable auth.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    api_prefix: String,
    auth: Auth,
}

impl ApiClient {
    pub fn new(base_url: String, auth: Auth) -> Result<Self> {
        Self::build(
            base_url,
            "/api/v0".to_string(),
            auth,
            Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        )
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let auth = match config.auth_scheme {
            AuthScheme::ApiKey => Auth::XApiKey(config.api_key.clone()),
            AuthScheme::Bearer => Auth::Bearer(config.api_key.clone()),
        };

        Self::build(
            config.api_url.clone(),
            config.api_prefix(),
            auth,
            config.http_timeout,
        )
    }

    /// Create client from environment: LENDPORT_API_URL (or API_URL), LENDPORT_API_KEY (or API_KEY).
    pub fn from_env() -> Result<Self> {
        let config = ClientConfig::from_env().context("Invalid API client configuration")?;
        Self::from_config(&config)
    }

    fn build(base_url: String, api_prefix: String, auth: Auth, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_prefix,
            auth,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// API version prefix (e.g. "/api/v0")
    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            Auth::Bearer(token) => request.header("Authorization", format!("Bearer {}", token)),
            Auth::XApiKey(key) => request.header("X-API-Key", key.as_str()),
        }
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let url = self.build_url(path);
        let request = self.client.post(&url).json(body);
        let request = self.apply_auth(request);

        let response = request.send().await.context("Failed to send request")?;
        Self::parse_response(response).await
    }

    async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(api_error(status, &error_text).into());
        }

        let body: T = response
            .json()
            .await
            .context("Failed to parse response as JSON")?;

        Ok(body)
    }
}

/// Build an `ApiError` from a non-success response, preferring the API's JSON
/// error body and falling back to the raw text or the status reason.
fn api_error(status: reqwest::StatusCode, body: &str) -> ApiError {
    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
        return ApiError {
            status: status.as_u16(),
            code: parsed.code,
            message: parsed.error,
        };
    }

    let message = match body.trim() {
        "" => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
        text => text.to_string(),
    };

    ApiError {
        status: status.as_u16(),
        code: None,
        message,
    }
}
