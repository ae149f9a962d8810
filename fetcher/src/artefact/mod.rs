//! Manifest schema, artefact naming, download, and verification.
//!
//! # Sub-modules
//!
//! - [`download`] — HTTP download trait and `ureq` implementation.
//! - [`error`] — Validation errors for artefact values.
//! - [`manifest`] — Version and package manifest schema types.
//! - [`naming`] — Destination file naming policy (`ArtefactNaming`).
//! - [`sha1_digest`] — SHA-1 digest newtype (`Sha1Digest`).
//! - [`verification`] — Streaming SHA-1 computation and comparison.

pub mod download;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod sha1_digest;
pub mod verification;
