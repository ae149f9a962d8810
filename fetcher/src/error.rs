//! Error types for the download-and-verify pipeline.
//!
//! Every stage returns one of these variants. The binary maps each kind to
//! a distinct process exit code so that build scripts can tell a typo in the
//! requested version apart from a tampered download.

use crate::artefact::download::DownloadError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can end a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A manifest or artefact request failed at the transport or HTTP level.
    #[error("fetch failed: {source}")]
    Fetch {
        /// The underlying download failure.
        #[source]
        source: DownloadError,
    },

    /// A manifest was not valid JSON or did not match the expected schema.
    #[error("malformed manifest at {url}: {reason}")]
    MalformedManifest {
        /// Where the manifest was fetched from.
        url: String,
        /// Description of the parse or schema failure.
        reason: String,
    },

    /// The requested version or tag is not listed in the manifest.
    #[error("version {selector} not found in manifest")]
    VersionNotFound {
        /// The selector as the user supplied it.
        selector: String,
    },

    /// The per-version manifest does not describe the requested artefact.
    #[error("no '{role}' artefact for version '{version}': {reason}")]
    ArtefactMissing {
        /// The requested artefact role.
        role: String,
        /// The resolved version id.
        version: String,
        /// Why the artefact could not be located.
        reason: String,
    },

    /// The downloaded file does not hash to the advertised checksum.
    #[error("checksum mismatch for {path}: expected {expected}, actual {actual}")]
    ChecksumMismatch {
        /// The path the artefact would have been committed to.
        path: Utf8PathBuf,
        /// The checksum recorded in the manifest.
        expected: String,
        /// The computed digest.
        actual: String,
    },

    /// A filesystem operation on the destination failed.
    #[error("cannot {operation} {path}")]
    Filesystem {
        /// The operation that failed, e.g. "create" or "rename".
        operation: &'static str,
        /// The path involved.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Return the process exit code for this error kind.
    ///
    /// Codes start at 3 so that they never collide with the generic failure
    /// code 1 or the usage-error code 2 used by the argument parser.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Fetch { .. } => 3,
            Self::MalformedManifest { .. } => 4,
            Self::VersionNotFound { .. } => 5,
            Self::ArtefactMissing { .. } => 6,
            Self::ChecksumMismatch { .. } => 7,
            Self::Filesystem { .. } => 8,
        }
    }

    /// Build a [`PipelineError::Filesystem`] from an I/O error.
    pub(crate) fn filesystem(
        operation: &'static str,
        path: impl Into<Utf8PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Filesystem {
            operation,
            path: path.into(),
            source,
        }
    }
}

impl From<DownloadError> for PipelineError {
    fn from(source: DownloadError) -> Self {
        Self::Fetch { source }
    }
}

/// Result type alias using [`PipelineError`].
pub type Result<T> = std::result::Result<T, PipelineError>;
