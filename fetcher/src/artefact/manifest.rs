//! Manifest schema types for the two-stage version lookup.
//!
//! The top-level [`VersionManifest`] lists every published version and maps
//! symbolic tags to exact ids. Each [`VersionDescriptor`] points at a
//! per-version [`PackageManifest`] that lists the downloadable artefacts by
//! role.

use super::sha1_digest::Sha1Digest;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// The top-level manifest listing every published version.
///
/// The schema mirrors the upstream launcher metadata:
///
/// ```json
/// {
///   "latest": { "release": "1.20.1", "snapshot": "23w31a" },
///   "versions": [
///     { "id": "23w31a", "type": "snapshot", "url": "https://.../23w31a.json" },
///     { "id": "1.20.1", "type": "release", "url": "https://.../1.20.1.json" }
///   ]
/// }
/// ```
///
/// `versions` is ordered newest-first and the first matching id wins.
/// Entries that do not decode as a [`VersionDescriptor`] are kept as
/// [`VersionEntry::Unreadable`]; they only fail a lookup that selects them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VersionManifest {
    /// Symbolic tag to exact version id.
    #[serde(default)]
    pub latest: BTreeMap<String, String>,
    /// Version entries, newest first.
    pub versions: Vec<VersionEntry>,
}

impl VersionManifest {
    /// Look up the exact id a tag points at.
    #[must_use]
    pub fn tagged(&self, tag: &str) -> Option<&str> {
        self.latest.get(tag).map(String::as_str)
    }
}

/// The record identifying one published version.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VersionDescriptor {
    /// Exact version id, e.g. `1.20.1`.
    pub id: String,
    /// Version kind, e.g. `release` or `snapshot`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Location of the per-version manifest.
    #[serde(rename = "url")]
    pub manifest_url: String,
}

/// One element of a manifest's `versions` list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum VersionEntry {
    /// A well-formed descriptor.
    Listed(VersionDescriptor),
    /// Any other JSON value, kept verbatim.
    Unreadable(Value),
}

impl VersionEntry {
    /// Return the entry's version id, if it has a string `id`.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Listed(descriptor) => Some(&descriptor.id),
            Self::Unreadable(value) => value.get("id").and_then(Value::as_str),
        }
    }
}

impl From<VersionDescriptor> for VersionEntry {
    fn from(descriptor: VersionDescriptor) -> Self {
        Self::Listed(descriptor)
    }
}

impl fmt::Display for VersionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.id)
    }
}

/// The per-version manifest listing downloadable artefacts by role.
///
/// Only the `downloads` map itself is checked when decoding; each role's
/// entry is decoded on lookup, so a broken `client` entry does not hide a
/// valid `server` one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PackageManifest {
    downloads: BTreeMap<String, Value>,
}

impl PackageManifest {
    /// Decode the artefact published for `role`.
    ///
    /// Returns `None` when the role is not listed.
    ///
    /// # Errors
    ///
    /// The inner result is an error when the role's entry does not have the
    /// artefact shape.
    pub fn artefact(&self, role: &str) -> Option<Result<Artefact, serde_json::Error>> {
        self.downloads.get(role).map(Artefact::deserialize)
    }

    /// Iterate over the listed roles in sorted order.
    pub fn roles(&self) -> impl Iterator<Item = &str> {
        self.downloads.keys().map(String::as_str)
    }
}

/// A single downloadable file description.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Artefact {
    /// Download location.
    pub url: String,
    /// Expected SHA-1 digest of the file.
    #[serde(rename = "sha1")]
    pub checksum: Sha1Digest,
    /// Advertised size in bytes.
    pub size: u64,
}

#[cfg(test)]
#[path = "manifest_tests.rs"]
mod tests;
