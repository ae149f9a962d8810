//! Download-and-verify pipeline orchestration.
//!
//! A run walks `Idle → ResolvingVersion → LocatingArtefact → Downloading →
//! Verifying` and ends in either `Committed` or `Failed`:
//!
//! 1. Fetch the top-level manifest and resolve the selector.
//! 2. Fetch the version's package manifest and pick the artefact by role.
//! 3. Stream the artefact into a temporary file inside the destination
//!    directory.
//! 4. Re-read the temporary file through SHA-1 and compare digests.
//! 5. On a match, rename the temporary file to its final name. On a
//!    mismatch, delete it along with any file already at the final name,
//!    and report both digests.
//!
//! A file at the final name therefore always passed verification; an
//! interrupted run can only leave a `.part` file behind. Nothing is retried.

use crate::artefact::download::{ArtefactDownloader, DownloadError};
use crate::artefact::manifest::{Artefact, VersionDescriptor, VersionManifest};
use crate::artefact::naming::ArtefactNaming;
use crate::artefact::verification::{Verification, verify_file};
use crate::error::{PipelineError, Result};
use crate::fetch::ManifestFetcher;
use crate::locator::ArtefactLocator;
use crate::resolution::{ResolveError, VersionSelector, resolve};
use camino::{Utf8Path, Utf8PathBuf};
use log::{Log, debug, info, warn};
use std::fmt;
use tempfile::NamedTempFile;

/// The default top-level manifest location.
pub const DEFAULT_MANIFEST_URL: &str =
    "https://launchermeta.mojang.com/mc/game/version_manifest.json";

/// The default artefact role.
pub const DEFAULT_ROLE: &str = "server";

/// Suffix of in-progress downloads.
const PART_SUFFIX: &str = ".part";

/// Parameters for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Location of the top-level version manifest.
    pub manifest_url: String,
    /// Artefact role to download from the package manifest.
    pub role: String,
    /// Directory the verified artefact is committed to.
    pub destination: Utf8PathBuf,
    /// How the committed file is named.
    pub naming: ArtefactNaming,
}

impl PipelineConfig {
    /// Create a configuration with default manifest URL, role, and naming.
    #[must_use]
    pub fn new(destination: impl Into<Utf8PathBuf>) -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_owned(),
            role: DEFAULT_ROLE.to_owned(),
            destination: destination.into(),
            naming: ArtefactNaming::default(),
        }
    }
}

/// Where a pipeline run currently is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Not started.
    #[default]
    Idle,
    /// Fetching the top-level manifest and resolving the selector.
    ResolvingVersion,
    /// Fetching the package manifest and picking the artefact.
    LocatingArtefact,
    /// Streaming the artefact to a temporary file.
    Downloading,
    /// Hashing the temporary file.
    Verifying,
    /// The verified file is at its final path.
    Committed,
    /// The run ended with an error.
    Failed,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::ResolvingVersion => "resolving version",
            Self::LocatingArtefact => "locating artefact",
            Self::Downloading => "downloading",
            Self::Verifying => "verifying",
            Self::Committed => "committed",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// The result of a committed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    /// Final path of the artefact.
    pub path: Utf8PathBuf,
    /// Whether the file passed checksum verification.
    pub verified: bool,
    /// The version that was downloaded.
    pub version: VersionDescriptor,
    /// The computed SHA-1 digest.
    pub digest: String,
    /// Number of bytes received.
    pub bytes_written: u64,
}

/// A downloaded but not yet verified artefact.
struct StagedDownload {
    file: NamedTempFile,
    path: Utf8PathBuf,
    bytes_written: u64,
}

/// Resolves, downloads, verifies, and commits one artefact.
pub struct DownloadVerifyPipeline<'a> {
    config: &'a PipelineConfig,
    downloader: &'a dyn ArtefactDownloader,
    logger: &'a dyn Log,
    stage: PipelineStage,
}

impl<'a> DownloadVerifyPipeline<'a> {
    /// Create a pipeline over injected HTTP and logging capabilities.
    #[must_use]
    pub fn new(
        config: &'a PipelineConfig,
        downloader: &'a dyn ArtefactDownloader,
        logger: &'a dyn Log,
    ) -> Self {
        Self {
            config,
            downloader,
            logger,
            stage: PipelineStage::Idle,
        }
    }

    /// Return the current stage.
    #[must_use]
    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    /// Run the pipeline for `selector`.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any stage; see [`PipelineError`].
    /// On [`PipelineError::ChecksumMismatch`] the downloaded file has already
    /// been removed.
    pub fn run(&mut self, selector: &VersionSelector) -> Result<DownloadOutcome> {
        match self.execute(selector) {
            Ok(outcome) => {
                self.enter(PipelineStage::Committed);
                info!(logger: self.logger, "Saved {} to '{}'", outcome.version, outcome.path);
                Ok(outcome)
            }
            Err(err) => {
                debug!(logger: self.logger, "Pipeline failed while {}: {err}", self.stage);
                self.enter(PipelineStage::Failed);
                Err(err)
            }
        }
    }

    fn execute(&mut self, selector: &VersionSelector) -> Result<DownloadOutcome> {
        let fetcher = ManifestFetcher::new(self.downloader, self.logger);

        self.enter(PipelineStage::ResolvingVersion);
        let descriptor = self.resolve_version(&fetcher, selector)?;

        self.enter(PipelineStage::LocatingArtefact);
        let artefact =
            ArtefactLocator::new(&fetcher, self.logger).locate(&descriptor, &self.config.role)?;
        let final_path = self.final_path(&descriptor)?;

        self.enter(PipelineStage::Downloading);
        let staged = self.download(&artefact, &final_path)?;

        self.enter(PipelineStage::Verifying);
        let (staged, digest) = self.verify(staged, &artefact, &final_path)?;
        let bytes_written = staged.bytes_written;
        self.commit(staged, &final_path)?;

        Ok(DownloadOutcome {
            path: final_path,
            verified: true,
            version: descriptor,
            digest,
            bytes_written,
        })
    }

    fn enter(&mut self, next: PipelineStage) {
        debug!(logger: self.logger, "Stage: {} -> {next}", self.stage);
        self.stage = next;
    }

    fn resolve_version(
        &self,
        fetcher: &ManifestFetcher<'_>,
        selector: &VersionSelector,
    ) -> Result<VersionDescriptor> {
        let url = &self.config.manifest_url;
        let document = fetcher.fetch_json(url)?;
        let manifest: VersionManifest =
            serde_json::from_value(document).map_err(|e| PipelineError::MalformedManifest {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        debug!(
            logger: self.logger,
            "Manifest lists {} versions and {} tags",
            manifest.versions.len(),
            manifest.latest.len()
        );

        let descriptor = resolve(selector, &manifest)
            .map_err(|e| match e {
                ResolveError::NotFound { selector } => PipelineError::VersionNotFound { selector },
                unreadable @ ResolveError::UnreadableEntry { .. } => {
                    PipelineError::MalformedManifest {
                        url: url.clone(),
                        reason: unreadable.to_string(),
                    }
                }
            })?
            .clone();
        info!(logger: self.logger, "Resolved {selector} to {descriptor}");
        Ok(descriptor)
    }

    fn final_path(&self, descriptor: &VersionDescriptor) -> Result<Utf8PathBuf> {
        let file_name = self.config.naming.file_name(descriptor).map_err(|e| {
            PipelineError::MalformedManifest {
                url: self.config.manifest_url.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(self.config.destination.join(file_name))
    }

    fn download(&self, artefact: &Artefact, final_path: &Utf8Path) -> Result<StagedDownload> {
        let dir = &self.config.destination;
        std::fs::create_dir_all(dir).map_err(|e| PipelineError::filesystem("create", dir, e))?;

        let prefix = format!(".{}.", final_path.file_name().unwrap_or("artefact"));
        let mut file = tempfile::Builder::new()
            .prefix(&prefix)
            .suffix(PART_SUFFIX)
            .tempfile_in(dir)
            .map_err(|e| PipelineError::filesystem("create a temporary file in", dir, e))?;
        let path = Utf8PathBuf::try_from(file.path().to_path_buf()).map_err(|e| {
            PipelineError::filesystem("create a temporary file in", dir, e.into_io_error())
        })?;

        info!(logger: self.logger, "Downloading {} to '{path}'", artefact.url);
        let bytes_written = self
            .downloader
            .download_to(&artefact.url, &mut file)
            .map_err(|e| match e {
                DownloadError::Write(source) => PipelineError::filesystem("write", &path, source),
                other => PipelineError::from(other),
            })?;
        file.as_file()
            .sync_all()
            .map_err(|e| PipelineError::filesystem("sync", &path, e))?;
        debug!(logger: self.logger, "Wrote {bytes_written} bytes to '{path}'");

        if bytes_written != artefact.size {
            warn!(
                logger: self.logger,
                "Received {bytes_written} bytes but the manifest advertises {}",
                artefact.size
            );
        }

        Ok(StagedDownload {
            file,
            path,
            bytes_written,
        })
    }

    fn verify(
        &self,
        staged: StagedDownload,
        artefact: &Artefact,
        final_path: &Utf8Path,
    ) -> Result<(StagedDownload, String)> {
        debug!(logger: self.logger, "Calculating checksum for '{}'", staged.path);
        let verification = verify_file(staged.file.path(), &artefact.checksum)
            .map_err(|e| PipelineError::filesystem("read", &staged.path, e))?;
        match verification {
            Verification::Match { digest } => {
                debug!(logger: self.logger, "'{}' matches checksum {digest}", staged.path);
                Ok((staged, digest))
            }
            Verification::Mismatch { expected, actual } => {
                warn!(
                    logger: self.logger,
                    "'{}' does not match checksum {expected} (got {actual}); removing it",
                    staged.path
                );
                if let Err(e) = staged.file.close() {
                    warn!(logger: self.logger, "Failed to remove '{}': {e}", staged.path);
                }
                self.remove_stale(final_path)?;
                Err(PipelineError::ChecksumMismatch {
                    path: final_path.to_owned(),
                    expected,
                    actual,
                })
            }
        }
    }

    /// Delete a file left at `final_path` by an earlier run.
    fn remove_stale(&self, final_path: &Utf8Path) -> Result<()> {
        match std::fs::remove_file(final_path) {
            Ok(()) => {
                warn!(logger: self.logger, "Removed '{final_path}' left by an earlier run");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PipelineError::filesystem("delete", final_path, e)),
        }
    }

    fn commit(&self, staged: StagedDownload, final_path: &Utf8Path) -> Result<()> {
        staged
            .file
            .persist(final_path)
            .map_err(|e| PipelineError::filesystem("rename into", final_path, e.error))?;
        debug!(logger: self.logger, "Renamed '{}' to '{final_path}'", staged.path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
