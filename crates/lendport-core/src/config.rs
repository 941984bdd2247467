//! Configuration module
//!
//! Client-side settings for reaching the platform API, and presigner settings
//! for components that mint upload URLs themselves. Both are read from the
//! environment (with `.env` support via dotenvy).

use crate::error::ConfigError;
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:3000";
const DEFAULT_API_VERSION: &str = "v0";
const HTTP_TIMEOUT_SECS: u64 = 60;
const PRESIGNED_URL_EXPIRY_SECS: u64 = 15 * 60;

/// How the API key is presented to the platform API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `X-API-Key: {key}`
    ApiKey,
    /// `Authorization: Bearer {key}`
    Bearer,
}

impl FromStr for AuthScheme {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "api-key" | "api_key" | "apikey" => Ok(AuthScheme::ApiKey),
            "bearer" => Ok(AuthScheme::Bearer),
            _ => Err(ConfigError::Invalid {
                key: "LENDPORT_AUTH_SCHEME".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Settings for the platform API client
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_key: String,
    pub auth_scheme: AuthScheme,
    pub api_version: String,
    pub http_timeout: Duration,
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the process environment in `from_env`).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("LENDPORT_API_URL")
            .or_else(|| lookup("API_URL"))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let api_key = lookup("LENDPORT_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .ok_or_else(|| {
                ConfigError::Missing("Set LENDPORT_API_KEY or API_KEY".to_string())
            })?;

        let auth_scheme = match lookup("LENDPORT_AUTH_SCHEME") {
            Some(value) => value.parse()?,
            None => AuthScheme::ApiKey,
        };

        let api_version =
            lookup("LENDPORT_API_VERSION").unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let http_timeout = parse_secs(&lookup, "LENDPORT_HTTP_TIMEOUT_SECS", HTTP_TIMEOUT_SECS)?;

        let config = Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key,
            auth_scheme,
            api_version,
            http_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.api_url.starts_with("http://") || self.api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                key: "LENDPORT_API_URL".to_string(),
                value: self.api_url.clone(),
            });
        }
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("LENDPORT_API_KEY is empty".to_string()));
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                key: "LENDPORT_HTTP_TIMEOUT_SECS".to_string(),
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    /// API version prefix, e.g. `/api/v0`
    pub fn api_prefix(&self) -> String {
        format!("/api/{}", self.api_version)
    }
}

/// Settings for signing presigned PUT URLs against S3-compatible storage
#[derive(Clone, Debug)]
pub struct PresignerConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, DigitalOcean Spaces, etc.)
    pub endpoint: Option<String>,
    pub url_expiry: Duration,
}

impl PresignerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bucket = lookup("S3_BUCKET")
            .ok_or_else(|| ConfigError::Missing("S3_BUCKET not configured".to_string()))?;
        let region = lookup("S3_REGION")
            .or_else(|| lookup("AWS_REGION"))
            .ok_or_else(|| {
                ConfigError::Missing("S3_REGION or AWS_REGION not configured".to_string())
            })?;
        let endpoint = lookup("S3_ENDPOINT").filter(|e| !e.trim().is_empty());
        let url_expiry =
            parse_secs(&lookup, "PRESIGNED_URL_EXPIRY_SECS", PRESIGNED_URL_EXPIRY_SECS)?;

        let config = Self {
            bucket,
            region,
            endpoint,
            url_expiry,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bucket.trim().is_empty() {
            return Err(ConfigError::Missing("S3_BUCKET is empty".to_string()));
        }
        // SigV4 presigned URLs are capped at seven days
        if self.url_expiry.is_zero() || self.url_expiry > Duration::from_secs(7 * 24 * 3600) {
            return Err(ConfigError::Invalid {
                key: "PRESIGNED_URL_EXPIRY_SECS".to_string(),
                value: self.url_expiry.as_secs().to_string(),
            });
        }
        Ok(())
    }
}

fn parse_secs<F>(lookup: &F, key: &str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|_| ConfigError::Invalid {
                key: key.to_string(),
                value: raw,
            }),
        None => Ok(Duration::from_secs(default)),
    }
}
