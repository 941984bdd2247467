use anyhow::Context;
use lendport_core::{ArtifactFile, ArtifactKind, CredentialIssuer, UploadedArtifact};
use lendport_storage::StorageTransfer;
use lendport_upload::UploadCoordinator;
use std::path::Path;

/// Options for a single `upload` invocation.
#[derive(Debug, Clone)]
pub struct UploadArgs<'a> {
    pub path: &'a Path,
    pub kind: ArtifactKind,
    pub owner_id: &'a str,
    pub version: u32,
    pub content_type: Option<&'a str>,
}

/// Load a file from disk and push it through the upload workflow.
///
/// File loading errors carry context; workflow errors are returned as the
/// coordinator's display-ready `UploadError`.
pub async fn upload_file<I, T>(
    args: &UploadArgs<'_>,
    issuer: &I,
    coordinator: &UploadCoordinator<T>,
) -> anyhow::Result<UploadedArtifact>
where
    I: CredentialIssuer + ?Sized,
    T: StorageTransfer,
{
    let file = ArtifactFile::from_path(args.path, args.content_type)
        .await
        .with_context(|| format!("Cannot upload {}", args.path.display()))?;

    let uploaded = coordinator
        .upload_artifact(&file, issuer, args.kind, args.owner_id, args.version)
        .await?;

    Ok(uploaded)
}

/// Whether `LENDPORT_LOG_JSON` asks for JSON log lines.
pub fn json_logs_requested(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_lowercase()).as_deref(),
        Some("1") | Some("true") | Some("yes")
    )
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json = json_logs_requested(std::env::var("LENDPORT_LOG_JSON").ok().as_deref());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
