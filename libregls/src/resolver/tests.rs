use super::*;
use crate::manifest::{MEDIA_TYPE_MANIFEST_LIST_V2, MEDIA_TYPE_MANIFEST_V2};
use mockito::{Mock, ServerGuard};

async fn mock_manifest(server: &mut ServerGuard, repo: &str, tag: &str, digest: &str) -> Mock {
    server
        .mock("GET", format!("/v2/{}/manifests/{}", repo, tag).as_str())
        .match_header("accept", MEDIA_TYPE_MANIFEST_V2)
        .with_status(200)
        .with_body(format!(
            r#"{{"schemaVersion": 2, "config": {{"digest": "{}"}}}}"#,
            digest
        ))
        .create_async()
        .await
}

async fn mock_manifest_list(server: &mut ServerGuard, repo: &str, tag: &str, body: &str) -> Mock {
    server
        .mock("GET", format!("/v2/{}/manifests/{}", repo, tag).as_str())
        .match_header("accept", MEDIA_TYPE_MANIFEST_LIST_V2)
        .with_status(200)
        .with_body(body)
        .create_async()
        .await
}

async fn mock_blob(server: &mut ServerGuard, repo: &str, digest: &str, created: &str) -> Mock {
    server
        .mock("GET", format!("/v2/{}/blobs/{}", repo, digest).as_str())
        .with_status(200)
        .with_body(format!(r#"{{"created": "{}"}}"#, created))
        .create_async()
        .await
}

fn resolver_for(server: &ServerGuard) -> TagResolver {
    TagResolver::new(RegistryClient::new(&server.url()).unwrap())
}

#[tokio::test]
async fn test_resolve_multi_platform_tag() {
    let mut server = mockito::Server::new_async().await;
    let m1 = mock_manifest(&mut server, "app", "v1", "sha256:c1").await;
    let m2 = mock_manifest_list(
        &mut server,
        "app",
        "v1",
        r#"{"manifests": [
            {"platform": {"architecture": "amd64", "os": "linux"}},
            {"platform": {"architecture": "arm64", "os": "linux"}}
        ]}"#,
    )
    .await;
    let m3 = mock_blob(&mut server, "app", "sha256:c1", "2023-05-01T12:30:00.123456Z").await;

    let record = resolver_for(&server).resolve("app", "v1").await.unwrap();

    m1.assert_async().await;
    m2.assert_async().await;
    m3.assert_async().await;
    assert_eq!(record.repository, "app");
    assert_eq!(record.tag, "v1");
    assert_eq!(record.created, "2023-05-01T12:30:00.123456Z");
    assert_eq!(record.joined_architectures(), "amd64,arm64");
}

#[tokio::test]
async fn test_resolve_falls_back_to_top_level_architecture() {
    let mut server = mockito::Server::new_async().await;
    let _manifest = mock_manifest(&mut server, "app", "v1", "sha256:c1").await;
    let _list = mock_manifest_list(
        &mut server,
        "app",
        "v1",
        r#"{"manifests": [], "architecture": "amd64"}"#,
    )
    .await;
    let _blob = mock_blob(&mut server, "app", "sha256:c1", "2023-05-01T12:30:00Z").await;

    let record = resolver_for(&server).resolve("app", "v1").await.unwrap();

    assert_eq!(record.architectures, vec!["amd64"]);
}

#[tokio::test]
async fn test_resolve_without_any_architecture_yields_empty_string() {
    let mut server = mockito::Server::new_async().await;
    let _manifest = mock_manifest(&mut server, "app", "v1", "sha256:c1").await;
    let _list = mock_manifest_list(&mut server, "app", "v1", r#"{"schemaVersion": 2}"#).await;
    let _blob = mock_blob(&mut server, "app", "sha256:c1", "2023-05-01T12:30:00Z").await;

    let record = resolver_for(&server).resolve("app", "v1").await.unwrap();

    assert_eq!(record.architectures, vec![String::new()]);
    assert_eq!(record.joined_architectures(), "");
}

#[tokio::test]
async fn test_created_time_without_config_digest_is_decode_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v2/app/manifests/v1")
        .match_header("accept", MEDIA_TYPE_MANIFEST_V2)
        .with_status(200)
        .with_body(r#"{"manifests": [{"platform": {"architecture": "amd64"}}]}"#)
        .create_async()
        .await;

    let err = resolver_for(&server)
        .created_time("app", "v1")
        .await
        .unwrap_err();

    assert!(matches!(err, RegistryError::Decode { .. }));
}

#[tokio::test]
async fn test_resolve_propagates_blob_failure() {
    let mut server = mockito::Server::new_async().await;
    let _manifest = mock_manifest(&mut server, "app", "v1", "sha256:c1").await;
    let _list = mock_manifest_list(&mut server, "app", "v1", r#"{"architecture": "amd64"}"#).await;
    let _mock = server
        .mock("GET", "/v2/app/blobs/sha256:c1")
        .with_status(404)
        .create_async()
        .await;

    let err = resolver_for(&server).resolve("app", "v1").await.unwrap_err();

    assert_eq!(err.status_code(), Some(404));
}

#[tokio::test]
async fn test_resolve_propagates_manifest_list_failure() {
    let mut server = mockito::Server::new_async().await;
    let _manifest = mock_manifest(&mut server, "app", "v1", "sha256:c1").await;
    let _blob = mock_blob(&mut server, "app", "sha256:c1", "2023-05-01T12:30:00Z").await;
    let _mock = server
        .mock("GET", "/v2/app/manifests/v1")
        .match_header("accept", MEDIA_TYPE_MANIFEST_LIST_V2)
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let err = resolver_for(&server).resolve("app", "v1").await.unwrap_err();

    assert!(matches!(err, RegistryError::Decode { .. }));
}

#[test]
fn test_joined_architectures_preserves_order_and_duplicates() {
    let record = TagRecord {
        repository: "app".to_string(),
        tag: "v1".to_string(),
        created: String::new(),
        architectures: vec!["arm".to_string(), "amd64".to_string(), "arm".to_string()],
    };

    assert_eq!(record.joined_architectures(), "arm,amd64,arm");
}
