//! Unit tests for manifest schema decoding.

use super::*;
use rstest::{fixture, rstest};

const EMPTY_SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";

#[fixture]
fn version_manifest_json() -> &'static str {
    r#"{
        "latest": {"release": "1.20.1", "snapshot": "23w31a"},
        "versions": [
            {"id": "23w31a", "type": "snapshot", "url": "https://meta.test/23w31a.json",
             "time": "2023-08-01T12:00:00+00:00"},
            {"id": "1.20.1", "type": "release", "url": "https://meta.test/1.20.1.json"}
        ]
    }"#
}

#[rstest]
fn decodes_version_manifest(version_manifest_json: &str) {
    let manifest: VersionManifest =
        serde_json::from_str(version_manifest_json).expect("valid manifest");
    assert_eq!(manifest.tagged("release"), Some("1.20.1"));
    assert_eq!(manifest.tagged("snapshot"), Some("23w31a"));
    assert_eq!(manifest.versions.len(), 2);

    match manifest.versions.first().expect("one version") {
        VersionEntry::Listed(first) => {
            assert_eq!(first.id, "23w31a");
            assert_eq!(first.kind, "snapshot");
            assert_eq!(first.manifest_url, "https://meta.test/23w31a.json");
        }
        other => panic!("expected a listed descriptor, got {other:?}"),
    }
}

#[test]
fn missing_latest_map_decodes_as_empty() {
    let manifest: VersionManifest =
        serde_json::from_str(r#"{"versions": []}"#).expect("latest is optional");
    assert!(manifest.latest.is_empty());
    assert_eq!(manifest.tagged("release"), None);
}

#[rstest]
#[case::missing_versions(r#"{"latest": {}}"#)]
#[case::versions_not_a_list(r#"{"versions": {}}"#)]
#[case::tag_not_a_string(r#"{"latest": {"release": 1}, "versions": []}"#)]
fn rejects_malformed_version_manifest(#[case] json: &str) {
    let result = serde_json::from_str::<VersionManifest>(json);
    assert!(result.is_err());
}

#[rstest]
#[case::descriptor_without_url(r#"{"id": "1", "type": "release"}"#, Some("1"))]
#[case::numeric_id(r#"{"id": 7, "type": "release", "url": "U"}"#, None)]
#[case::not_an_object(r#""1.20.1""#, None)]
fn keeps_unreadable_version_entries(#[case] entry: &str, #[case] id: Option<&str>) {
    let json = format!(r#"{{"versions": [{entry}]}}"#);
    let manifest: VersionManifest = serde_json::from_str(&json).expect("entries decode leniently");
    let decoded = manifest.versions.first().expect("one entry");
    assert!(matches!(decoded, VersionEntry::Unreadable(_)), "{decoded:?}");
    assert_eq!(decoded.id(), id);
}

#[test]
fn decodes_package_manifest() {
    let json = format!(
        r#"{{"downloads": {{
            "server": {{"url": "https://cdn.test/server.jar", "sha1": "{EMPTY_SHA1}", "size": 0}},
            "client": {{"url": "https://cdn.test/client.jar", "sha1": "{EMPTY_SHA1}", "size": 12}}
        }}, "id": "1.20.1"}}"#
    );
    let manifest: PackageManifest = serde_json::from_str(&json).expect("valid manifest");

    let server = manifest
        .artefact("server")
        .expect("server listed")
        .expect("server entry decodes");
    assert_eq!(server.url, "https://cdn.test/server.jar");
    assert_eq!(server.checksum.as_str(), EMPTY_SHA1);
    assert_eq!(server.size, 0);
    assert!(manifest.artefact("windows_server").is_none());
    assert_eq!(manifest.roles().collect::<Vec<_>>(), vec!["client", "server"]);
}

#[rstest]
#[case::bad_checksum(r#"{"url": "u", "sha1": "nope", "size": 0}"#)]
#[case::negative_size(r#"{"url": "u", "sha1": "da39a3ee5e6b4b0d3255bfef95601890afd80709", "size": -1}"#)]
#[case::missing_url(r#"{"sha1": "da39a3ee5e6b4b0d3255bfef95601890afd80709", "size": 0}"#)]
fn malformed_role_entry_fails_only_its_own_lookup(#[case] entry: &str) {
    let json = format!(
        r#"{{"downloads": {{"server": {entry},
            "client": {{"url": "https://cdn.test/client.jar", "sha1": "{EMPTY_SHA1}", "size": 1}}}}}}"#
    );
    let manifest: PackageManifest = serde_json::from_str(&json).expect("downloads map decodes");
    assert!(manifest.artefact("server").expect("server listed").is_err());
    assert!(manifest.artefact("client").expect("client listed").is_ok());
}

#[rstest]
#[case::missing_downloads(r#"{"id": "1.20.1"}"#)]
#[case::downloads_not_a_map(r#"{"downloads": []}"#)]
fn rejects_malformed_package_manifest(#[case] json: &str) {
    let result = serde_json::from_str::<PackageManifest>(json);
    assert!(result.is_err());
}

#[test]
fn descriptor_display_names_kind_and_id() {
    let descriptor = VersionDescriptor {
        id: "1.20.1".to_owned(),
        kind: "release".to_owned(),
        manifest_url: "U1".to_owned(),
    };
    assert_eq!(descriptor.to_string(), "release '1.20.1'");
}
