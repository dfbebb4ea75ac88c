use super::*;

#[test]
fn test_single_platform_manifest_is_detected() {
    let body = br#"{
        "schemaVersion": 2,
        "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
        "config": {
            "mediaType": "application/vnd.docker.container.image.v1+json",
            "size": 1469,
            "digest": "sha256:abc123"
        },
        "layers": []
    }"#;

    let shape = ManifestShape::from_bytes(body).unwrap();

    assert_eq!(shape.config_digest(), Some("sha256:abc123"));
    assert!(!shape.is_multi_platform());
}

#[test]
fn test_manifest_list_is_detected() {
    let body = br#"{
        "schemaVersion": 2,
        "mediaType": "application/vnd.docker.distribution.manifest.list.v2+json",
        "manifests": [
            {
                "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
                "digest": "sha256:aaa",
                "size": 528,
                "platform": {"architecture": "amd64", "os": "linux"}
            },
            {
                "mediaType": "application/vnd.docker.distribution.manifest.v2+json",
                "digest": "sha256:bbb",
                "size": 528,
                "platform": {"architecture": "arm64", "os": "linux"}
            }
        ]
    }"#;

    let shape = ManifestShape::from_bytes(body).unwrap();

    assert!(shape.is_multi_platform());
    assert_eq!(shape.config_digest(), None);
    assert_eq!(shape.architectures(), vec!["amd64", "arm64"]);
    match shape {
        ManifestShape::MultiPlatform { manifests } => {
            assert_eq!(manifests[0].digest, "sha256:aaa");
            assert_eq!(manifests[0].size, 528);
            assert_eq!(manifests[1].platform.os, "linux");
        }
        _ => panic!("Expected MultiPlatform"),
    }
}

#[test]
fn test_manifest_list_keeps_duplicate_architectures() {
    let body = br#"{"manifests": [
        {"platform": {"architecture": "arm", "os": "linux"}},
        {"platform": {"architecture": "arm", "os": "linux"}}
    ]}"#;

    let shape = ManifestShape::from_bytes(body).unwrap();
    assert_eq!(shape.architectures(), vec!["arm", "arm"]);
}

#[test]
fn test_empty_manifest_list_falls_back_to_top_level_architecture() {
    let body = br#"{"manifests": [], "architecture": "amd64"}"#;

    let shape = ManifestShape::from_bytes(body).unwrap();

    assert_eq!(
        shape,
        ManifestShape::FallbackSingleArch {
            architecture: "amd64".to_string()
        }
    );
    assert_eq!(shape.architectures(), vec!["amd64"]);
}

#[test]
fn test_null_manifests_falls_back() {
    let body = br#"{"manifests": null, "architecture": "s390x"}"#;

    let shape = ManifestShape::from_bytes(body).unwrap();
    assert_eq!(shape.architectures(), vec!["s390x"]);
}

#[test]
fn test_no_architecture_anywhere_yields_one_empty_entry() {
    let shape = ManifestShape::from_bytes(b"{}").unwrap();

    assert_eq!(
        shape,
        ManifestShape::FallbackSingleArch {
            architecture: String::new()
        }
    );
    assert_eq!(shape.architectures(), vec![String::new()]);
}

#[test]
fn test_schema1_manifest_keeps_architecture() {
    let body = br#"{
        "schemaVersion": 1,
        "architecture": "ppc64le",
        "config": {"digest": "sha256:def"}
    }"#;

    let shape = ManifestShape::from_bytes(body).unwrap();

    assert_eq!(shape.config_digest(), Some("sha256:def"));
    assert_eq!(shape.architectures(), vec!["ppc64le"]);
}

#[test]
fn test_single_platform_without_architecture_yields_empty_entry() {
    let shape = ManifestShape::from_bytes(br#"{"config": {"digest": "sha256:1"}}"#).unwrap();
    assert_eq!(shape.architectures(), vec![String::new()]);
}

#[test]
fn test_empty_config_digest_is_not_single_platform() {
    let shape = ManifestShape::from_bytes(br#"{"config": {"digest": ""}}"#).unwrap();
    assert_eq!(shape.config_digest(), None);
}

#[test]
fn test_entry_without_platform_yields_empty_architecture() {
    let body = br#"{"manifests": [{"digest": "sha256:a"}]}"#;

    let shape = ManifestShape::from_bytes(body).unwrap();
    assert_eq!(shape.architectures(), vec![String::new()]);
}

#[test]
fn test_invalid_json_is_decode_error() {
    let result = ManifestShape::from_bytes(b"<html>not json</html>");
    assert!(matches!(result, Err(RegistryError::Decode { .. })));
}

#[test]
fn test_non_object_json_is_decode_error() {
    let result = ManifestShape::from_bytes(b"[1, 2, 3]");
    assert!(matches!(result, Err(RegistryError::Decode { .. })));
}

#[test]
fn test_wrongly_typed_manifests_is_decode_error() {
    let result = ManifestShape::from_bytes(br#"{"manifests": "nope"}"#);
    assert!(matches!(result, Err(RegistryError::Decode { .. })));
}

#[test]
fn test_config_blob_created_is_verbatim() {
    let blob: ConfigBlob =
        serde_json::from_str(r#"{"created": "2023-05-01T12:30:00.123456789Z", "os": "linux"}"#)
            .unwrap();
    assert_eq!(blob.created, "2023-05-01T12:30:00.123456789Z");
}

#[test]
fn test_config_blob_missing_created_is_empty() {
    let blob: ConfigBlob = serde_json::from_str(r#"{"architecture": "amd64"}"#).unwrap();
    assert_eq!(blob.created, "");
}
