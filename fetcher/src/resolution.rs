//! Version selection against the top-level manifest.
//!
//! A selector is either an exact version id or a symbolic tag such as
//! `release`. Tags are followed exactly one hop through the manifest's
//! `latest` map; the resulting id is then matched against the version list,
//! where the first occurrence wins.

use crate::artefact::manifest::{VersionDescriptor, VersionEntry, VersionManifest};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// The tag used when no selector is given.
pub const DEFAULT_TAG: &str = "release";

/// How the user asked for a version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VersionSelector {
    /// An exact version id, e.g. `1.20.1`.
    ExactId(String),
    /// A symbolic tag, e.g. `release` or `snapshot`.
    Tag(String),
}

impl Default for VersionSelector {
    fn default() -> Self {
        Self::Tag(DEFAULT_TAG.to_owned())
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactId(id) => write!(f, "'{id}'"),
            Self::Tag(tag) => write!(f, "tag '{tag}'"),
        }
    }
}

/// Why a selector did not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No entry carries the requested id, or the tag is not defined.
    #[error("version {selector} not found in manifest")]
    NotFound {
        /// The selector as the user supplied it, plus the id a tag led to.
        selector: String,
    },

    /// The selected entry is not a valid version descriptor.
    #[error("entry for version '{id}' is unreadable: {reason}")]
    UnreadableEntry {
        /// The id of the selected entry.
        id: String,
        /// Why the entry could not be decoded.
        reason: String,
    },
}

/// Select the descriptor `selector` refers to.
///
/// # Errors
///
/// Returns [`ResolveError::NotFound`] when a tag is not present in
/// `latest`, or when no entry carries the (possibly tag-resolved) id.
/// Returns [`ResolveError::UnreadableEntry`] when the first entry with that
/// id is malformed.
///
/// # Examples
///
/// ```
/// use server_fetcher::artefact::manifest::VersionManifest;
/// use server_fetcher::resolution::{VersionSelector, resolve};
///
/// let manifest: VersionManifest = serde_json::from_str(
///     r#"{"latest":{"release":"1.20.1"},
///         "versions":[{"id":"1.20.1","type":"release","url":"U1"}]}"#,
/// )
/// .expect("valid manifest");
/// let descriptor = resolve(&VersionSelector::Tag("release".into()), &manifest)
///     .expect("tag resolves");
/// assert_eq!(descriptor.manifest_url, "U1");
/// ```
pub fn resolve<'m>(
    selector: &VersionSelector,
    manifest: &'m VersionManifest,
) -> Result<&'m VersionDescriptor, ResolveError> {
    let entry = match selector {
        VersionSelector::ExactId(id) => {
            find_first(manifest, id).ok_or_else(|| not_found(selector.to_string()))?
        }
        VersionSelector::Tag(tag) => {
            let id = manifest
                .tagged(tag)
                .ok_or_else(|| not_found(selector.to_string()))?;
            find_first(manifest, id)
                .ok_or_else(|| not_found(format!("{selector} (resolved to '{id}')")))?
        }
    };
    match entry {
        VersionEntry::Listed(descriptor) => Ok(descriptor),
        VersionEntry::Unreadable(value) => Err(ResolveError::UnreadableEntry {
            id: entry.id().unwrap_or_default().to_owned(),
            reason: VersionDescriptor::deserialize(value)
                .err()
                .map_or_else(|| "unrecognised entry".to_owned(), |e| e.to_string()),
        }),
    }
}

fn find_first<'m>(manifest: &'m VersionManifest, id: &str) -> Option<&'m VersionEntry> {
    manifest.versions.iter().find(|entry| entry.id() == Some(id))
}

fn not_found(selector: String) -> ResolveError {
    ResolveError::NotFound { selector }
}
