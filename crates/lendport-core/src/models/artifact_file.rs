use anyhow::Context;
use bytes::Bytes;
use std::path::Path;

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// In-memory file payload handed to the upload coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFile {
    pub name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl ArtifactFile {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data: data.into(),
        }
    }

    /// Byte length of the payload
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    /// Load a file from disk. The content type is inferred from the extension
    /// unless one is given.
    pub async fn from_path(path: &Path, content_type: Option<&str>) -> anyhow::Result<Self> {
        if path
            .components()
            .any(|c| c == std::path::Component::ParentDir)
        {
            return Err(anyhow::anyhow!("Invalid input: {}", path.display()));
        }

        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(String::from)
            .ok_or_else(|| anyhow::anyhow!("Path has no file name: {}", path.display()))?;

        let content_type = content_type
            .map(String::from)
            .unwrap_or_else(|| content_type_for(&name).to_string());

        Ok(Self::new(name, content_type, data))
    }
}

/// Best-effort MIME type for a file name, keyed on its extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let Some((_, ext)) = file_name.rsplit_once('.') else {
        return DEFAULT_CONTENT_TYPE;
    };

    match ext.to_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "txt" => "text/plain",
        "html" | "htm" => "text/html",
        _ => DEFAULT_CONTENT_TYPE,
    }
}
