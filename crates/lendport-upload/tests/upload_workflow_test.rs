//! End-to-end upload workflow against mocked API and storage endpoints.

use lendport_api_client::{ApiClient, Auth};
use lendport_core::{ArtifactFile, ArtifactKind, UploadPhase};
use lendport_storage::PresignedPutTransfer;
use lendport_upload::UploadCoordinator;
use mockito::{Matcher, Server, ServerGuard};

fn presigned_body(server: &ServerGuard, key: &str) -> String {
    serde_json::json!({
        "uploadUrl": format!("{}/bucket/{}?X-Amz-Signature=abc", server.url(), key),
        "storageKey": key,
        "expiresIn": 900
    })
    .to_string()
}

fn client(server: &ServerGuard) -> ApiClient {
    ApiClient::new(server.url(), Auth::XApiKey("secret".to_string())).unwrap()
}

fn coordinator() -> UploadCoordinator<PresignedPutTransfer> {
    UploadCoordinator::new(PresignedPutTransfer::new().unwrap())
}

#[tokio::test]
async fn uploads_and_returns_issued_key() {
    let mut server = Server::new_async().await;
    let key = "prod-1/2026-10-17-1-f00d.png";
    let body = presigned_body(&server, key);

    let issue = server
        .mock("POST", "/api/v0/uploads/presigned")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "fileName": "logo.png",
            "fileSize": 5,
            "ownerId": "prod-1",
            "version": 1
        })))
        .with_status(200)
        .with_body(body)
        .expect(1)
        .create_async()
        .await;
    let put = server
        .mock("PUT", "/bucket/prod-1/2026-10-17-1-f00d.png")
        .match_query(Matcher::Any)
        .match_body("hello")
        .with_status(200)
        .expect(1)
        .create_async()
        .await;

    let file = ArtifactFile::new("logo.png", "image/png", b"hello".to_vec());
    let uploaded = coordinator()
        .upload_artifact(&file, &client(&server), ArtifactKind::Image, "prod-1", 1)
        .await
        .unwrap();

    assert_eq!(uploaded.storage_key, key);
    issue.assert_async().await;
    put.assert_async().await;
}

#[tokio::test]
async fn api_quota_error_surfaces_api_message() {
    let mut server = Server::new_async().await;
    let _issue = server
        .mock("POST", "/api/v0/uploads/presigned")
        .with_status(429)
        .with_body(r#"{"error":"quota exceeded","code":"USAGE_LIMIT_EXCEEDED","recoverable":false}"#)
        .create_async()
        .await;
    let put = server
        .mock("PUT", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let file = ArtifactFile::new("logo.png", "image/png", b"hello".to_vec());
    let err = coordinator()
        .upload_artifact(&file, &client(&server), ArtifactKind::Image, "prod-1", 1)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Image upload failed: quota exceeded");
    put.assert_async().await;
}

#[tokio::test]
async fn expired_url_fails_without_key() {
    let mut server = Server::new_async().await;
    let body = presigned_body(&server, "prod-1/2026-10-17-3-dead.docx");
    let _issue = server
        .mock("POST", "/api/v0/uploads/presigned")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;
    let _put = server
        .mock("PUT", Matcher::Any)
        .with_status(403)
        .with_body("Request has expired")
        .create_async()
        .await;

    let file = ArtifactFile::new("terms.docx", "application/octet-stream", b"doc".to_vec());
    let err = coordinator()
        .upload_artifact(
            &file,
            &client(&server),
            ArtifactKind::DocumentTemplate,
            "prod-1",
            3,
        )
        .await
        .unwrap_err();

    assert_eq!(err.phase(), UploadPhase::Transfer);
    assert_eq!(
        err.to_string(),
        "Document template upload failed: storage rejected upload with status 403: Request has expired"
    );
}

#[tokio::test]
async fn concurrent_uploads_are_independent() {
    let mut server = Server::new_async().await;
    let ok_body = presigned_body(&server, "prod-1/2026-10-17-1-aaaa.png");
    let failing_body = presigned_body(&server, "prod-1/2026-10-17-2-bbbb.png");

    let _issue_v1 = server
        .mock("POST", "/api/v0/uploads/presigned")
        .match_body(Matcher::PartialJson(serde_json::json!({ "version": 1 })))
        .with_status(200)
        .with_body(ok_body)
        .create_async()
        .await;
    let _issue_v2 = server
        .mock("POST", "/api/v0/uploads/presigned")
        .match_body(Matcher::PartialJson(serde_json::json!({ "version": 2 })))
        .with_status(200)
        .with_body(failing_body)
        .create_async()
        .await;
    let _put_v1 = server
        .mock("PUT", "/bucket/prod-1/2026-10-17-1-aaaa.png")
        .match_query(Matcher::Any)
        .with_status(200)
        .create_async()
        .await;
    let _put_v2 = server
        .mock("PUT", "/bucket/prod-1/2026-10-17-2-bbbb.png")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let api = client(&server);
    let coordinator = coordinator();
    let first_file = ArtifactFile::new("a.png", "image/png", b"first".to_vec());
    let second_file = ArtifactFile::new("b.png", "image/png", b"second".to_vec());

    let (first, second) = futures::future::join(
        coordinator.upload_artifact(&first_file, &api, ArtifactKind::Image, "prod-1", 1),
        coordinator.upload_artifact(&second_file, &api, ArtifactKind::Image, "prod-1", 2),
    )
    .await;

    assert_eq!(first.unwrap().storage_key, "prod-1/2026-10-17-1-aaaa.png");
    let err = second.unwrap_err();
    assert_eq!(err.phase(), UploadPhase::Transfer);
    assert!(err.to_string().starts_with("Image upload failed: "));
}

#[tokio::test]
async fn unreachable_storage_hides_signed_url() {
    let mut server = Server::new_async().await;
    let _issue = server
        .mock("POST", "/api/v0/uploads/presigned")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "uploadUrl": "http://127.0.0.1:9/bucket/prod-1/k.png?X-Amz-Signature=topsecret",
                "storageKey": "prod-1/k.png",
                "expiresIn": 900
            })
            .to_string(),
        )
        .create_async()
        .await;

    let file = ArtifactFile::new("logo.png", "image/png", b"hello".to_vec());
    let err = coordinator()
        .upload_artifact(&file, &client(&server), ArtifactKind::Image, "prod-1", 1)
        .await
        .unwrap_err();

    let message = err.to_string();
    assert_eq!(err.phase(), UploadPhase::Transfer);
    assert!(message.starts_with("Image upload failed: network error: "), "{}", message);
    assert!(!message.contains("topsecret"), "{}", message);
}

#[tokio::test]
async fn unreachable_api_keeps_transport_cause() {
    let api = ApiClient::new(
        "http://127.0.0.1:9".to_string(),
        Auth::XApiKey("secret".to_string()),
    )
    .unwrap();

    let file = ArtifactFile::new("logo.png", "image/png", b"hello".to_vec());
    let err = coordinator()
        .upload_artifact(&file, &api, ArtifactKind::Image, "prod-1", 1)
        .await
        .unwrap_err();

    let message = err.to_string();
    assert_eq!(err.phase(), UploadPhase::CredentialIssuance);
    assert!(
        message.starts_with("Image upload failed: Failed to send request: "),
        "{}",
        message
    );
    assert!(message.to_lowercase().contains("connect"), "{}", message);
}
