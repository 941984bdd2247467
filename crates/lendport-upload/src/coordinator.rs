use lendport_core::{
    ArtifactFile, ArtifactKind, CredentialIssuer, UploadError, UploadPhase, UploadRequest,
    UploadedArtifact,
};
use lendport_storage::StorageTransfer;

/// Runs the presigned upload of a single artifact.
///
/// Steps run strictly in order: issue credential, transfer bytes, return the
/// key. A failure at either step ends the call; nothing is retried, resumed or
/// compensated, and no key is returned. The coordinator holds no per-call
/// state, so one instance can serve any number of concurrent uploads.
#[derive(Clone, Debug)]
pub struct UploadCoordinator<T> {
    transfer: T,
}

impl<T: StorageTransfer> UploadCoordinator<T> {
    pub fn new(transfer: T) -> Self {
        Self { transfer }
    }

    /// Upload `file` as a new revision of `owner_id`'s artifact.
    ///
    /// Every call requests a fresh credential; identical inputs produce
    /// independent uploads and keys.
    #[tracing::instrument(
        skip(self, file, issuer),
        fields(
            kind = %kind,
            owner_id = %owner_id,
            version = version,
            file_name = %file.name,
            size_bytes = file.size()
        )
    )]
    pub async fn upload_artifact<I>(
        &self,
        file: &ArtifactFile,
        issuer: &I,
        kind: ArtifactKind,
        owner_id: &str,
        version: u32,
    ) -> Result<UploadedArtifact, UploadError>
    where
        I: CredentialIssuer + ?Sized,
    {
        let request = UploadRequest {
            file_name: file.name.clone(),
            content_type: file.content_type.clone(),
            file_size: Some(file.size()),
            owner_id: owner_id.to_string(),
            version,
            kind,
        };

        let credential = issuer
            .issue_credential(&request)
            .await
            .map_err(|e| UploadError::new(kind, UploadPhase::CredentialIssuance, e))?;

        tracing::debug!(
            storage_key = %credential.storage_key,
            expires_in = credential.expires_in,
            "Credential issued, uploading"
        );

        self.transfer
            .put(&credential.upload_url, file)
            .await
            .map_err(|e| UploadError::new(kind, UploadPhase::Transfer, e))?;

        tracing::info!(storage_key = %credential.storage_key, "Artifact uploaded");

        Ok(UploadedArtifact {
            storage_key: credential.storage_key,
        })
    }
}
