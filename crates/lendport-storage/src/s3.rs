use crate::keys::generate_storage_key;
use crate::traits::{StorageError, StorageResult};
use async_trait::async_trait;
use chrono::Utc;
use http::Method;
use lendport_core::{CredentialIssuer, PresignerConfig, PresignedUploadResult, UploadRequest};
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::signer::Signer;
use std::time::Duration;
use uuid::Uuid;

/// Issues presigned PUT URLs for S3-compatible storage without a round trip
/// to the platform API.
#[derive(Clone)]
pub struct S3Presigner {
    store: AmazonS3,
    bucket: String,
    url_expiry: Duration,
}

impl S3Presigner {
    /// Create a presigner using credentials from the standard AWS environment
    /// variables.
    pub fn new(config: &PresignerConfig) -> StorageResult<Self> {
        Self::from_builder(AmazonS3Builder::from_env(), config)
    }

    /// Create a presigner from a pre-configured builder (e.g. with explicit
    /// credentials). Bucket, region and endpoint are taken from `config`.
    pub fn from_builder(builder: AmazonS3Builder, config: &PresignerConfig) -> StorageResult<Self> {
        let mut builder = builder
            .with_region(config.region.clone())
            .with_bucket_name(config.bucket.clone());

        if let Some(ref endpoint) = config.endpoint {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self {
            store,
            bucket: config.bucket.clone(),
            url_expiry: config.url_expiry,
        })
    }

    /// Sign a PUT URL for an explicit storage key
    #[tracing::instrument(skip(self), fields(s3.bucket = %self.bucket, s3.key = %key))]
    pub async fn presigned_put_url(&self, key: &str) -> StorageResult<String> {
        let location = Path::from(key.to_string());
        let url = self
            .store
            .signed_url(Method::PUT, &location, self.url_expiry)
            .await
            .map_err(|e| StorageError::BackendError(format!("Failed to sign URL: {}", e)))?;

        Ok(url.to_string())
    }
}

#[async_trait]
impl CredentialIssuer for S3Presigner {
    async fn issue_credential(
        &self,
        request: &UploadRequest,
    ) -> anyhow::Result<PresignedUploadResult> {
        let unique_id = Uuid::new_v4().simple().to_string();
        let storage_key = generate_storage_key(
            &request.owner_id,
            request.version,
            &request.file_name,
            Utc::now().date_naive(),
            &unique_id,
        )?;

        let upload_url = self.presigned_put_url(&storage_key).await?;

        tracing::info!(
            owner_id = %request.owner_id,
            version = request.version,
            storage_key = %storage_key,
            expires_in_seconds = self.url_expiry.as_secs(),
            "Issued presigned PUT URL"
        );

        Ok(PresignedUploadResult {
            upload_url,
            storage_key,
            expires_in: self.url_expiry.as_secs(),
        })
    }
}
