use super::*;
use crate::aggregator::FailurePolicy;

#[test]
fn test_builder_requires_registry_url() {
    let result = Regls::builder().build();
    assert!(matches!(
        result.err(),
        Some(RegistryError::MissingArgument { .. })
    ));
}

#[test]
fn test_builder_rejects_blank_registry_url() {
    let result = Regls::builder().registry_url("  ").build();
    assert!(matches!(
        result.err(),
        Some(RegistryError::MissingArgument { .. })
    ));
}

#[test]
fn test_builder_falls_back_to_config_url() {
    let config = Config::from_yaml_str("registry:\n  url: registry.internal:5000").unwrap();
    let regls = Regls::builder().with_config(config).build().unwrap();

    assert_eq!(regls.registry_url(), "http://registry.internal:5000");
}

#[test]
fn test_builder_explicit_url_wins_over_config() {
    let config = Config::from_yaml_str("registry:\n  url: from-config:5000").unwrap();
    let regls = Regls::builder()
        .registry_url("https://explicit:5000")
        .with_config(config)
        .build()
        .unwrap();

    assert_eq!(regls.registry_url(), "https://explicit:5000");
}

#[test]
fn test_builder_takes_concurrency_from_config() {
    let config = Config::from_yaml_str("network:\n  concurrency: 3").unwrap();
    let regls = Regls::builder()
        .registry_url("localhost:5000")
        .with_config(config)
        .build()
        .unwrap();

    assert_eq!(regls.options().concurrency, 3);
    assert_eq!(regls.options().policy, FailurePolicy::BestEffort);
}

#[test]
fn test_builder_explicit_options_win() {
    let regls = Regls::builder()
        .registry_url("localhost:5000")
        .with_options(ListOptions::new().with_show_all(true).with_concurrency(2))
        .build()
        .unwrap();

    assert!(regls.options().show_all);
    assert_eq!(regls.options().concurrency, 2);
}

#[tokio::test]
async fn test_list_runs_full_inventory() {
    let mut server = mockito::Server::new_async().await;
    let _catalog = server
        .mock("GET", "/v2/_catalog")
        .with_status(200)
        .with_body(r#"{"repositories": ["alpine"]}"#)
        .create_async()
        .await;
    let _tags = server
        .mock("GET", "/v2/alpine/tags/list")
        .with_status(200)
        .with_body(r#"{"name": "alpine", "tags": ["3.18"]}"#)
        .create_async()
        .await;
    let _manifest = server
        .mock("GET", "/v2/alpine/manifests/3.18")
        .match_header("accept", crate::manifest::MEDIA_TYPE_MANIFEST_V2)
        .with_status(200)
        .with_body(r#"{"config": {"digest": "sha256:cfg"}}"#)
        .create_async()
        .await;
    let _list = server
        .mock("GET", "/v2/alpine/manifests/3.18")
        .match_header("accept", crate::manifest::MEDIA_TYPE_MANIFEST_LIST_V2)
        .with_status(200)
        .with_body(r#"{"manifests": [{"platform": {"architecture": "arm64"}}]}"#)
        .create_async()
        .await;
    let _blob = server
        .mock("GET", "/v2/alpine/blobs/sha256:cfg")
        .with_status(200)
        .with_body(r#"{"created": "2023-08-07T19:20:20.894140623Z"}"#)
        .create_async()
        .await;

    let regls = Regls::connect(&server.url()).unwrap();
    let inventory = regls.list().await.unwrap();

    assert_eq!(inventory.rows.len(), 1);
    let row = &inventory.rows[0];
    assert_eq!(row.repository, "alpine");
    assert_eq!(row.tag, "3.18");
    assert_eq!(row.architecture, "arm64");
    assert_eq!(row.created, "2023-08-07 19:20:20");
}
