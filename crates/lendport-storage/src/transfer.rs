use crate::traits::{StorageError, StorageTransfer};
use async_trait::async_trait;
use lendport_core::ArtifactFile;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;

const TRANSFER_TIMEOUT_SECS: u64 = 300;
const MAX_REJECTION_CHARS: usize = 256;

/// Uploads a payload with a single HTTP PUT to a presigned URL.
///
/// The URL carries its own authorization, so no auth header is sent.
#[derive(Clone, Debug)]
pub struct PresignedPutTransfer {
    client: Client,
}

impl PresignedPutTransfer {
    pub fn new() -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TRANSFER_TIMEOUT_SECS))
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    /// Reuse an existing client (and its connection pool)
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StorageTransfer for PresignedPutTransfer {
    async fn put(&self, upload_url: &str, file: &ArtifactFile) -> anyhow::Result<()> {
        let start = std::time::Instant::now();
        let size = file.size();

        let response = self
            .client
            .put(upload_url)
            .header(CONTENT_TYPE, file.content_type.as_str())
            .body(file.data.clone())
            .send()
            .await
            .map_err(|e| StorageError::Network(network_message(e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::debug!(
                status = status.as_u16(),
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "Presigned PUT rejected"
            );
            return Err(StorageError::Rejected {
                status: status.as_u16(),
                body: rejection_message(&body),
            }
            .into());
        }

        tracing::debug!(
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Presigned PUT accepted"
        );

        Ok(())
    }
}

/// Render a send failure with its cause chain. The URL is dropped since a
/// presigned URL carries its signature in the query string.
fn network_message(err: reqwest::Error) -> String {
    let err = err.without_url();
    let mut message = err.to_string();
    let mut source = std::error::Error::source(&err);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Reduce a storage rejection body to one short line.
///
/// S3-style XML errors contribute their `<Message>` element; other bodies are
/// flattened and truncated.
fn rejection_message(body: &str) -> String {
    let body = body.trim();
    if let Some(message) = xml_element(body, "Message") {
        return message.to_string();
    }

    let flat = body.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= MAX_REJECTION_CHARS {
        return flat;
    }
    let truncated: String = flat.chars().take(MAX_REJECTION_CHARS).collect();
    format!("{}...", truncated)
}

fn xml_element<'a>(body: &'a str, tag: &str) -> Option<&'a str> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = body.find(&open)? + open.len();
    let end = start + body[start..].find(&close)?;
    Some(body[start..end].trim()).filter(|m| !m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn sample_file() -> ArtifactFile {
        ArtifactFile::new("logo.png", "image/png", b"png-bytes".to_vec())
    }

    #[tokio::test]
    async fn put_sends_body_and_content_type_without_auth() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/bucket/prod-1/logo.png")
            .match_query(Matcher::UrlEncoded("X-Amz-Signature".into(), "sig".into()))
            .match_header("content-type", "image/png")
            .match_header("authorization", Matcher::Missing)
            .match_body("png-bytes")
            .with_status(200)
            .create_async()
            .await;

        let transfer = PresignedPutTransfer::new().unwrap();
        let url = format!("{}/bucket/prod-1/logo.png?X-Amz-Signature=sig", server.url());

        transfer.put(&url, &sample_file()).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn put_fails_on_rejected_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PUT", "/bucket/key")
            .with_status(403)
            .with_body("Request has expired")
            .create_async()
            .await;

        let transfer = PresignedPutTransfer::new().unwrap();
        let err = transfer
            .put(&format!("{}/bucket/key", server.url()), &sample_file())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "storage rejected upload with status 403: Request has expired"
        );
    }

    #[tokio::test]
    async fn put_fails_on_network_error_without_leaking_url() {
        let transfer = PresignedPutTransfer::new().unwrap();
        // Port 9 (discard) on localhost is not expected to accept HTTP
        let err = transfer
            .put(
                "http://127.0.0.1:9/bucket/key?X-Amz-Signature=topsecret",
                &sample_file(),
            )
            .await
            .unwrap_err();

        let message = match err.downcast_ref::<StorageError>() {
            Some(StorageError::Network(message)) => message.clone(),
            other => panic!("expected network error, got {:?}", other),
        };
        assert!(!message.contains("topsecret"), "{}", message);
        assert!(!message.contains("127.0.0.1:9/bucket"), "{}", message);
        assert!(message.to_lowercase().contains("connect"), "{}", message);
    }

    #[tokio::test]
    async fn put_rejection_extracts_s3_xml_message() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PUT", "/bucket/key")
            .with_status(403)
            .with_header("content-type", "application/xml")
            .with_body(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<Error>\n  <Code>AccessDenied</Code>\n  <Message>Request has expired</Message>\n  <RequestId>4442587FB7D0A2F9</RequestId>\n</Error>\n",
            )
            .create_async()
            .await;

        let transfer = PresignedPutTransfer::new().unwrap();
        let err = transfer
            .put(&format!("{}/bucket/key", server.url()), &sample_file())
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "storage rejected upload with status 403: Request has expired"
        );
    }

    #[test]
    fn rejection_message_truncates_long_bodies() {
        let body = format!("line one\n{}", "x".repeat(1000));
        let message = rejection_message(&body);

        assert!(!message.contains('\n'));
        assert!(message.starts_with("line one x"));
        assert_eq!(message.chars().count(), MAX_REJECTION_CHARS + 3);
    }
}
