//! HTTP download logic for manifests and artefacts.
//!
//! Provides a trait-based abstraction over blocking HTTP GET requests so
//! that the resolution and verification stages can be exercised without
//! network access.

use std::io::{self, Read, Write};
use std::sync::OnceLock;
use std::time::Duration;

/// Buffer size for streaming a response body into its sink.
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Timeout for establishing a connection.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for receiving response headers once the request is sent.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for fetching remote documents and artefact bodies.
///
/// Implementations follow redirects and treat any final status outside the
/// success range as an error.
///
/// # Examples
///
/// ```
/// use server_fetcher::artefact::download::HttpDownloader;
///
/// let downloader = HttpDownloader;
/// // Use downloader.download_text(url) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactDownloader {
    /// Fetch `url` and return the body as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the status is not a success.
    fn download_text(&self, url: &str) -> Result<String, DownloadError>;

    /// Fetch `url` and stream the body into `sink` as it arrives.
    ///
    /// Returns the number of bytes written.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not a success,
    /// or the body cannot be read. A failure of `sink` itself is reported
    /// as [`DownloadError::Write`].
    fn download_to(&self, url: &str, sink: &mut dyn Write) -> Result<u64, DownloadError>;
}

/// Errors arising from HTTP download operations.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested resource was not found (HTTP 404).
    #[error("not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// The connection failed while the response body was being read.
    #[error("failed reading response body from {url}")]
    Read {
        /// The URL whose body was being read.
        url: String,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The sink rejected the received bytes.
    #[error("failed writing downloaded body")]
    Write(#[source] io::Error),
}

/// HTTP-based downloader using `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpDownloader;

impl ArtefactDownloader for HttpDownloader {
    fn download_text(&self, url: &str) -> Result<String, DownloadError> {
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        response
            .into_body()
            .read_to_string()
            .map_err(|e| DownloadError::HttpError {
                url: url.to_owned(),
                reason: e.to_string(),
            })
    }

    fn download_to(&self, url: &str, sink: &mut dyn Write) -> Result<u64, DownloadError> {
        let response = http_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let mut body = response.into_body();
        copy_body(url, &mut body.as_reader(), sink)
    }
}

/// Stream `reader` into `sink`.
///
/// Read failures become [`DownloadError::Read`] and sink failures
/// [`DownloadError::Write`].
fn copy_body(url: &str, reader: &mut dyn Read, sink: &mut dyn Write) -> Result<u64, DownloadError> {
    let mut buffer = vec![0_u8; COPY_BUFFER_SIZE];
    let mut written: u64 = 0;
    loop {
        let read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => {
                return Err(DownloadError::Read {
                    url: url.to_owned(),
                    source,
                });
            }
        };
        let chunk = buffer.get(..read).unwrap_or_default();
        sink.write_all(chunk).map_err(DownloadError::Write)?;
        written += u64::try_from(read).unwrap_or(u64::MAX);
    }
    sink.flush().map_err(DownloadError::Write)?;
    Ok(written)
}

/// Shared `ureq` agent with timeout configuration.
///
/// Only connection set-up and response headers are bounded; artefact bodies
/// may legitimately take longer than any fixed global timeout.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_connect(Some(CONNECT_TIMEOUT))
            .timeout_recv_response(Some(RESPONSE_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        ureq::Error::StatusCode(status) => DownloadError::HttpError {
            url: url.to_owned(),
            reason: format!("HTTP status {status}"),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
