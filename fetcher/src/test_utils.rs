//! Shared test utilities for the fetcher crate.

use crate::artefact::download::{ArtefactDownloader, DownloadError};
use log::{LevelFilter, Log, Metadata, Record};
use sha1::{Digest, Sha1};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;

/// A canned response served by [`StubDownloader`].
#[derive(Debug, Clone)]
pub enum StubResponse {
    /// Serve these bytes with a success status.
    Body(Vec<u8>),
    /// Fail as if the server answered 404.
    NotFound,
    /// Fail as if the connection could not be established.
    Unreachable(String),
}

/// A stub implementation of [`ArtefactDownloader`] for testing.
///
/// Responses are keyed by URL; unknown URLs answer 404. Every request is
/// recorded so tests can assert which network calls were made.
#[derive(Debug, Default)]
pub struct StubDownloader {
    responses: HashMap<String, StubResponse>,
    requests: RefCell<Vec<String>>,
}

impl StubDownloader {
    /// Creates a stub with no registered responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `body` for `url`.
    #[must_use]
    pub fn with_text(self, url: &str, body: &str) -> Self {
        self.with_response(url, StubResponse::Body(body.as_bytes().to_vec()))
    }

    /// Serves raw `bytes` for `url`.
    #[must_use]
    pub fn with_bytes(self, url: &str, bytes: &[u8]) -> Self {
        self.with_response(url, StubResponse::Body(bytes.to_vec()))
    }

    /// Registers an arbitrary response for `url`.
    #[must_use]
    pub fn with_response(mut self, url: &str, response: StubResponse) -> Self {
        self.responses.insert(url.to_owned(), response);
        self
    }

    /// Returns every URL requested so far, in order.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    fn respond(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        self.requests.borrow_mut().push(url.to_owned());
        match self.responses.get(url) {
            Some(StubResponse::Body(bytes)) => Ok(bytes.clone()),
            Some(StubResponse::Unreachable(reason)) => Err(DownloadError::HttpError {
                url: url.to_owned(),
                reason: reason.clone(),
            }),
            Some(StubResponse::NotFound) | None => Err(DownloadError::NotFound {
                url: url.to_owned(),
            }),
        }
    }
}

impl ArtefactDownloader for StubDownloader {
    fn download_text(&self, url: &str) -> Result<String, DownloadError> {
        let bytes = self.respond(url)?;
        String::from_utf8(bytes).map_err(|e| DownloadError::HttpError {
            url: url.to_owned(),
            reason: e.to_string(),
        })
    }

    fn download_to(&self, url: &str, sink: &mut dyn Write) -> Result<u64, DownloadError> {
        let bytes = self.respond(url)?;
        sink.write_all(&bytes).map_err(DownloadError::Write)?;
        sink.flush().map_err(DownloadError::Write)?;
        Ok(u64::try_from(bytes.len()).unwrap_or(u64::MAX))
    }
}

/// A [`Log`] implementation that keeps formatted records in memory.
#[derive(Debug)]
pub struct CapturingLogger {
    level: LevelFilter,
    lines: Mutex<Vec<String>>,
}

impl CapturingLogger {
    /// Creates a logger that captures records up to `level`.
    #[must_use]
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            lines: Mutex::new(Vec::new()),
        }
    }

    /// Returns the captured lines as `[LEVEL] message`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().expect("logger lock").clone()
    }

    /// Returns whether any captured line contains `fragment`.
    #[must_use]
    pub fn contains(&self, fragment: &str) -> bool {
        self.lines().iter().any(|line| line.contains(fragment))
    }
}

impl Default for CapturingLogger {
    fn default() -> Self {
        Self::new(LevelFilter::Trace)
    }
}

impl Log for CapturingLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let line = format!("[{}] {}", record.level(), record.args());
            self.lines.lock().expect("logger lock").push(line);
        }
    }

    fn flush(&self) {}
}

/// Returns the lowercase hex SHA-1 digest of `data`.
#[must_use]
pub fn sha1_hex(data: &[u8]) -> String {
    format!("{:x}", Sha1::digest(data))
}

/// Builds a top-level manifest whose `release` tag points at `release_id`.
///
/// `versions` are `(id, kind, url)` triples, listed in the given order.
#[must_use]
pub fn version_manifest_json(release_id: &str, versions: &[(&str, &str, &str)]) -> String {
    let entries: Vec<serde_json::Value> = versions
        .iter()
        .map(|(id, kind, url)| serde_json::json!({"id": id, "type": kind, "url": url}))
        .collect();
    serde_json::json!({
        "latest": {"release": release_id},
        "versions": entries,
    })
    .to_string()
}

/// Builds a package manifest with a single artefact under `role`.
#[must_use]
pub fn package_manifest_json(role: &str, url: &str, sha1: &str, size: u64) -> String {
    let mut downloads = serde_json::Map::new();
    downloads.insert(
        role.to_owned(),
        serde_json::json!({"url": url, "sha1": sha1, "size": size}),
    );
    serde_json::json!({ "downloads": downloads }).to_string()
}
