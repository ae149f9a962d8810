//! Manifest fetching: GET a URL and decode the body as JSON.
//!
//! Shared by the version and artefact stages. There is no retry; the first
//! failure aborts the caller.

use crate::artefact::download::ArtefactDownloader;
use crate::error::{PipelineError, Result};
use log::{Log, debug};
use serde_json::Value;

/// Fetches JSON documents through an injected [`ArtefactDownloader`].
pub struct ManifestFetcher<'a> {
    downloader: &'a dyn ArtefactDownloader,
    logger: &'a dyn Log,
}

impl<'a> ManifestFetcher<'a> {
    /// Create a fetcher over `downloader`, logging to `logger`.
    #[must_use]
    pub fn new(downloader: &'a dyn ArtefactDownloader, logger: &'a dyn Log) -> Self {
        Self { downloader, logger }
    }

    /// Fetch `url` and parse the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Fetch`] when the request fails or the status
    /// is not a success, and [`PipelineError::MalformedManifest`] when the
    /// body is not valid JSON.
    pub fn fetch_json(&self, url: &str) -> Result<Value> {
        debug!(logger: self.logger, "Downloading manifest from '{url}'");
        let body = self.downloader.download_text(url)?;
        debug!(logger: self.logger, "Decoding manifest JSON ({} bytes)", body.len());
        serde_json::from_str(&body).map_err(|e| PipelineError::MalformedManifest {
            url: url.to_owned(),
            reason: e.to_string(),
        })
    }
}
