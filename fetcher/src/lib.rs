//! Server fetcher library.
//!
//! Resolves a version selector against a two-stage remote manifest, downloads
//! the artefact for the resolved version, and verifies its SHA-1 checksum
//! before committing it to the destination directory. It is used by the
//! `server-fetcher` CLI binary and can be driven programmatically with an
//! injected downloader and logger.
//!
//! # Modules
//!
//! - [`artefact`] - Manifest schema, naming, download, and verification
//! - [`cli`] - Command-line argument definitions
//! - [`error`] - Pipeline error taxonomy and exit codes
//! - [`fetch`] - JSON manifest fetching
//! - [`locator`] - Artefact lookup in per-version manifests
//! - [`logging`] - Injected stderr logger
//! - [`output`] - User-facing result reporting
//! - [`pipeline`] - Download-and-verify orchestration
//! - [`resolution`] - Version selection by id or tag

pub mod artefact;
pub mod cli;
pub mod error;
pub mod fetch;
pub mod locator;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod resolution;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
