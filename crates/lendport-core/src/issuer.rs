//! Credential issuance capability
//!
//! The upload coordinator depends on this trait only, so it can be driven by
//! the platform API client, an in-process presigner or a test fake.

use crate::models::{PresignedUploadResult, UploadRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Issues short-lived write credentials for a single artifact upload
#[async_trait]
pub trait CredentialIssuer: Send + Sync {
    /// Mint a presigned upload URL and the storage key it will populate
    async fn issue_credential(&self, request: &UploadRequest)
        -> anyhow::Result<PresignedUploadResult>;
}

#[async_trait]
impl<T: CredentialIssuer + ?Sized> CredentialIssuer for Arc<T> {
    async fn issue_credential(
        &self,
        request: &UploadRequest,
    ) -> anyhow::Result<PresignedUploadResult> {
        (**self).issue_credential(request).await
    }
}
