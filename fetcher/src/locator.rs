//! Artefact lookup in a version's package manifest.

use crate::artefact::manifest::{Artefact, PackageManifest, VersionDescriptor};
use crate::error::{PipelineError, Result};
use crate::fetch::ManifestFetcher;
use log::{Log, debug};

/// Locates the downloadable artefact for a role within a resolved version.
pub struct ArtefactLocator<'a> {
    fetcher: &'a ManifestFetcher<'a>,
    logger: &'a dyn Log,
}

impl<'a> ArtefactLocator<'a> {
    /// Create a locator that fetches package manifests through `fetcher`.
    #[must_use]
    pub fn new(fetcher: &'a ManifestFetcher<'a>, logger: &'a dyn Log) -> Self {
        Self { fetcher, logger }
    }

    /// Fetch the package manifest of `descriptor` and return its `role`
    /// artefact.
    ///
    /// # Errors
    ///
    /// Propagates [`PipelineError::Fetch`] and
    /// [`PipelineError::MalformedManifest`] from the fetch. Returns
    /// [`PipelineError::ArtefactMissing`] when the document does not have the
    /// package manifest shape or does not list `role`.
    pub fn locate(&self, descriptor: &VersionDescriptor, role: &str) -> Result<Artefact> {
        let document = self.fetcher.fetch_json(&descriptor.manifest_url)?;
        let missing = |reason: String| PipelineError::ArtefactMissing {
            role: role.to_owned(),
            version: descriptor.id.clone(),
            reason,
        };

        let manifest: PackageManifest = serde_json::from_value(document)
            .map_err(|e| missing(format!("unexpected package manifest shape: {e}")))?;
        let artefact = manifest
            .artefact(role)
            .transpose()
            .map_err(|e| missing(format!("unexpected '{role}' entry: {e}")))?
            .ok_or_else(|| missing(listed_roles(&manifest)))?;

        debug!(
            logger: self.logger,
            "Found '{role}' artefact for {descriptor}: {} ({} bytes, sha1 {})",
            artefact.url,
            artefact.size,
            artefact.checksum
        );
        Ok(artefact)
    }
}

fn listed_roles(manifest: &PackageManifest) -> String {
    let roles: Vec<&str> = manifest.roles().collect();
    if roles.is_empty() {
        return "manifest lists no downloads".to_owned();
    }
    format!("available roles: {}", roles.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{CapturingLogger, StubDownloader, package_manifest_json};
    use rstest::rstest;

    const EMPTY_SHA1: &str = "da39a3ee5e6b4b0d3255bfef95601890afd80709";
    const PACKAGE_URL: &str = "https://meta.test/1.20.1.json";

    fn descriptor() -> VersionDescriptor {
        VersionDescriptor {
            id: "1.20.1".to_owned(),
            kind: "release".to_owned(),
            manifest_url: PACKAGE_URL.to_owned(),
        }
    }

    fn locate_with(body: &str, role: &str) -> Result<Artefact> {
        let downloader = StubDownloader::new().with_text(PACKAGE_URL, body);
        let logger = CapturingLogger::default();
        let fetcher = ManifestFetcher::new(&downloader, &logger);
        ArtefactLocator::new(&fetcher, &logger).locate(&descriptor(), role)
    }

    #[test]
    fn returns_artefact_for_role() {
        let body = package_manifest_json("server", "https://cdn.test/server.jar", EMPTY_SHA1, 0);
        let artefact = locate_with(&body, "server").expect("server listed");
        assert_eq!(artefact.url, "https://cdn.test/server.jar");
        assert_eq!(artefact.checksum.as_str(), EMPTY_SHA1);
        assert_eq!(artefact.size, 0);
    }

    #[test]
    fn absent_role_lists_alternatives() {
        let body = package_manifest_json("client", "https://cdn.test/client.jar", EMPTY_SHA1, 3);
        let err = locate_with(&body, "server").expect_err("server not listed");
        match err {
            PipelineError::ArtefactMissing {
                role,
                version,
                reason,
            } => {
                assert_eq!(role, "server");
                assert_eq!(version, "1.20.1");
                assert_eq!(reason, "available roles: client");
            }
            other => panic!("expected ArtefactMissing, got {other:?}"),
        }
    }

    #[rstest]
    #[case::no_downloads(r#"{"id": "1.20.1"}"#)]
    #[case::downloads_not_a_map(r#"{"downloads": []}"#)]
    #[case::bad_checksum(r#"{"downloads": {"server": {"url": "u", "sha1": "xyz", "size": 1}}}"#)]
    fn wrong_shape_is_artefact_missing(#[case] body: &str) {
        let err = locate_with(body, "server").expect_err("wrong shape");
        assert!(
            matches!(err, PipelineError::ArtefactMissing { .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn broken_sibling_role_does_not_block_lookup() {
        let body = format!(
            r#"{{"downloads": {{
                "client": {{"url": "https://cdn.test/client.jar", "sha1": "", "size": 3}},
                "server": {{"url": "https://cdn.test/server.jar", "sha1": "{EMPTY_SHA1}", "size": 0}}
            }}}}"#
        );
        let artefact = locate_with(&body, "server").expect("server entry is valid");
        assert_eq!(artefact.url, "https://cdn.test/server.jar");
    }

    #[test]
    fn broken_selected_role_names_the_entry() {
        let body = r#"{"downloads": {"server": {"url": "u", "sha1": "", "size": 0}}}"#;
        let err = locate_with(body, "server").expect_err("server entry is broken");
        match err {
            PipelineError::ArtefactMissing { reason, .. } => {
                assert!(reason.starts_with("unexpected 'server' entry:"), "{reason}");
            }
            other => panic!("expected ArtefactMissing, got {other:?}"),
        }
    }

    #[test]
    fn empty_downloads_reports_no_downloads() {
        let err = locate_with(r#"{"downloads": {}}"#, "server").expect_err("nothing listed");
        assert!(err.to_string().contains("manifest lists no downloads"));
    }

    #[test]
    fn invalid_json_stays_malformed_manifest() {
        let err = locate_with("{", "server").expect_err("not JSON");
        assert!(matches!(err, PipelineError::MalformedManifest { .. }));
    }

    #[test]
    fn unreachable_manifest_is_fetch_error() {
        let downloader = StubDownloader::new();
        let logger = CapturingLogger::default();
        let fetcher = ManifestFetcher::new(&downloader, &logger);
        let err = ArtefactLocator::new(&fetcher, &logger)
            .locate(&descriptor(), "server")
            .expect_err("no response registered");
        assert!(matches!(err, PipelineError::Fetch { .. }));
    }
}
