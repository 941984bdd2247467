//! Lendport Core Library
//!
//! Shared domain models, error types, configuration and the credential-issuer
//! capability used by every Lendport upload component.

pub mod config;
pub mod error;
pub mod issuer;
pub mod models;

// Re-export commonly used types
pub use config::{AuthScheme, ClientConfig, PresignerConfig};
pub use error::{describe, ApiError, ConfigError, UploadError, UploadPhase};
pub use issuer::CredentialIssuer;
pub use models::{ArtifactFile, ArtifactKind, PresignedUploadResult, UploadRequest, UploadedArtifact};
