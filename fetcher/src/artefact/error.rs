//! Error types for artefact value validation.
//!
//! Each variant provides a descriptive message identifying the invalid input
//! and the constraint that was violated.

use thiserror::Error;

/// Errors arising from invalid artefact-related values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtefactError {
    /// A SHA-1 digest is not a valid 40-character hex string.
    #[error("invalid SHA-1 digest: {reason}")]
    InvalidSha1Digest {
        /// Description of the validation failure.
        reason: String,
    },

    /// A file name component would not stay inside the destination directory.
    #[error("unsafe file name component \"{value}\": {reason}")]
    UnsafeFileName {
        /// The rejected component.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },
}

/// Result type alias using [`ArtefactError`].
pub type Result<T> = std::result::Result<T, ArtefactError>;
