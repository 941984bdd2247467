use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Kind of artifact being uploaded.
///
/// Only used to label failure messages shown to the end user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    Image,
    DocumentTemplate,
}

impl ArtifactKind {
    /// Human-readable label used as the prefix of upload failure messages
    pub fn label(&self) -> &'static str {
        match self {
            ArtifactKind::Image => "Image",
            ArtifactKind::DocumentTemplate => "Document template",
        }
    }
}

impl Display for ArtifactKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.label())
    }
}

impl FromStr for ArtifactKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(ArtifactKind::Image),
            "document-template" | "document_template" | "document template" => {
                Ok(ArtifactKind::DocumentTemplate)
            }
            _ => Err(anyhow::anyhow!(
                "Invalid artifact kind: {}. Must be one of: image, document-template",
                s
            )),
        }
    }
}

/// Request sent to the credential issuer for a presigned upload URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// Original client-side file name (the extension is derived from it)
    pub file_name: String,
    /// MIME type reported by the source file
    pub content_type: String,
    /// Byte length, advisory only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
    /// Entity the artifact belongs to (e.g. a product record)
    pub owner_id: String,
    /// Caller-assigned revision number
    pub version: u32,
    /// Not sent to the issuer
    #[serde(skip)]
    pub kind: ArtifactKind,
}

/// Presigned upload credential returned by the issuer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUploadResult {
    /// Time-limited URL accepting a single PUT
    pub upload_url: String,
    /// Canonical object path, valid only once the PUT succeeds
    pub storage_key: String,
    /// Seconds until `upload_url` stops being accepted
    pub expires_in: u64,
}

impl PresignedUploadResult {
    /// Instant at which the upload URL expires, given when it was issued.
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        let secs = i64::try_from(self.expires_in).unwrap_or(i64::MAX);
        Duration::try_seconds(secs)
            .and_then(|ttl| issued_at.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Result of a completed upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedArtifact {
    pub storage_key: String,
}
