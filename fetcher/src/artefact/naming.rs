//! Destination naming policy for downloaded artefacts.
//!
//! Constructs deterministic file names in the format
//! `<prefix>-<kind>-<id>.<extension>`, e.g.
//! `minecraft_server-release-1.20.1.jar`.

use super::error::{ArtefactError, Result};
use super::manifest::VersionDescriptor;

/// The default file name prefix.
pub const DEFAULT_PREFIX: &str = "minecraft_server";

/// The default file extension, without the leading dot.
pub const DEFAULT_EXTENSION: &str = "jar";

/// Naming strategy for committed artefacts.
///
/// # Examples
///
/// ```
/// use server_fetcher::artefact::manifest::VersionDescriptor;
/// use server_fetcher::artefact::naming::ArtefactNaming;
///
/// let descriptor = VersionDescriptor {
///     id: "1.20.1".to_owned(),
///     kind: "release".to_owned(),
///     manifest_url: "https://meta.test/1.20.1.json".to_owned(),
/// };
/// let name = ArtefactNaming::default()
///     .file_name(&descriptor)
///     .expect("safe name");
/// assert_eq!(name, "minecraft_server-release-1.20.1.jar");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtefactNaming {
    prefix: String,
    extension: String,
}

impl ArtefactNaming {
    /// Create a naming strategy from a prefix and an extension.
    ///
    /// A leading dot on `extension` is ignored.
    #[must_use]
    pub fn new(prefix: impl Into<String>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            prefix: prefix.into(),
            extension: extension.trim_start_matches('.').to_owned(),
        }
    }

    /// Return the file name for the artefact of `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`ArtefactError::UnsafeFileName`] when the descriptor's kind
    /// or id (or the configured prefix) would produce a name outside the
    /// destination directory.
    pub fn file_name(&self, descriptor: &VersionDescriptor) -> Result<String> {
        validate_component(&self.prefix)?;
        validate_component(&descriptor.kind)?;
        validate_component(&descriptor.id)?;
        let stem = format!("{}-{}-{}", self.prefix, descriptor.kind, descriptor.id);
        if self.extension.is_empty() {
            return Ok(stem);
        }
        validate_component(&self.extension)?;
        Ok(format!("{stem}.{}", self.extension))
    }
}

impl Default for ArtefactNaming {
    fn default() -> Self {
        Self::new(DEFAULT_PREFIX, DEFAULT_EXTENSION)
    }
}

fn validate_component(value: &str) -> Result<()> {
    let reason = if value.is_empty() {
        "component is empty"
    } else if value == "." || value == ".." {
        "component is a relative directory reference"
    } else if value.contains(['/', '\\']) {
        "component contains a path separator"
    } else if value.contains('\0') {
        "component contains a NUL byte"
    } else {
        return Ok(());
    };
    Err(ArtefactError::UnsafeFileName {
        value: value.to_owned(),
        reason: reason.to_owned(),
    })
}
