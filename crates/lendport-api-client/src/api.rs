//! Upload endpoints of the Lendport API.

use crate::ApiClient;
use anyhow::Result;
use async_trait::async_trait;
use lendport_core::{CredentialIssuer, PresignedUploadResult, UploadRequest};

impl ApiClient {
    /// Ask the API for a presigned upload URL and the storage key it maps to.
    #[tracing::instrument(
        skip(self, request),
        fields(owner_id = %request.owner_id, version = request.version)
    )]
    pub async fn request_upload_url(&self, request: &UploadRequest) -> Result<PresignedUploadResult> {
        let path = format!("{}/uploads/presigned", self.api_prefix());
        let result: PresignedUploadResult = self.post_json(&path, request).await?;

        tracing::debug!(
            storage_key = %result.storage_key,
            expires_in = result.expires_in,
            "Received presigned upload URL"
        );

        Ok(result)
    }
}

#[async_trait]
impl CredentialIssuer for ApiClient {
    async fn issue_credential(&self, request: &UploadRequest) -> Result<PresignedUploadResult> {
        self.request_upload_url(request).await
    }
}
