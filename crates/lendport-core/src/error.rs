//! Error types module
//!
//! `UploadError` is the single error surfaced by the upload workflow. Its
//! display text is meant to be shown to the end user as-is. `ApiError` is the
//! structured failure produced by the platform API client, and `describe` is
//! the one place where collaborator failures of any shape become a message.

use crate::models::ArtifactKind;

/// Structured failure returned by the platform API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("API request failed with status {status}: {message}")]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// Machine-readable error code, when the API sent one
    pub code: Option<String>,
    /// Human-readable message from the API error body
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(String),

    #[error("Invalid configuration value for {key}: {value}")]
    Invalid { key: String, value: String },
}

/// Workflow step that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPhase {
    /// The issuer could not provide a presigned URL
    CredentialIssuance,
    /// The bytes could not be written to the presigned URL
    Transfer,
}

/// Upload failure, rendered as `"<kind label> upload failed: <message>"`.
///
/// The phase is kept for inspection but never changes the rendered text.
#[derive(Debug, thiserror::Error)]
#[error("{kind} upload failed: {message}")]
pub struct UploadError {
    kind: ArtifactKind,
    phase: UploadPhase,
    message: String,
    #[source]
    source: anyhow::Error,
}

impl UploadError {
    pub fn new(kind: ArtifactKind, phase: UploadPhase, source: anyhow::Error) -> Self {
        Self {
            kind,
            phase,
            message: describe(&source),
            source,
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }

    pub fn phase(&self) -> UploadPhase {
        self.phase
    }

    /// Underlying message without the kind prefix
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Reduce a collaborator failure to a single display message.
///
/// A structured `ApiError` contributes its `message` field; anything else is
/// rendered with its full context chain (`outer: inner: cause`).
pub fn describe(failure: &anyhow::Error) -> String {
    match failure.downcast_ref::<ApiError>() {
        Some(api_error) => api_error.message.clone(),
        None => format!("{:#}", failure),
    }
}
