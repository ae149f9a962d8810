//! CLI argument definitions for the server fetcher.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::artefact::naming::{ArtefactNaming, DEFAULT_EXTENSION, DEFAULT_PREFIX};
use crate::logging::level_for;
use crate::pipeline::{DEFAULT_MANIFEST_URL, DEFAULT_ROLE, PipelineConfig};
use crate::resolution::{DEFAULT_TAG, VersionSelector};
use camino::Utf8PathBuf;
use clap::Parser;
use log::LevelFilter;

/// Environment variable overriding the top-level manifest location.
pub const MANIFEST_URL_ENV: &str = "VERSION_MANIFEST_URL";

/// Download and verify a server artefact from the version manifest.
#[derive(Parser, Debug, Clone)]
#[command(name = "server-fetcher")]
#[command(version, about)]
#[command(long_about = concat!(
    "Download and verify a server artefact from the version manifest.\n\n",
    "The version is chosen either by exact id (--release) or by tag (--latest). ",
    "The per-version manifest is then consulted for the artefact of the ",
    "requested role, which is downloaded, checked against its SHA-1 checksum, ",
    "and only then moved to its final name in the destination directory.",
))]
#[command(after_help = concat!(
    "EXIT STATUS:\n",
    "  0  artefact downloaded and verified\n",
    "  2  invalid arguments\n",
    "  3  network or HTTP failure\n",
    "  4  malformed manifest\n",
    "  5  version or tag not found\n",
    "  6  artefact role missing from the version manifest\n",
    "  7  checksum mismatch (the download was removed)\n",
    "  8  destination not writable\n\n",
    "EXAMPLES:\n",
    "  Download the latest release into the current directory:\n",
    "    $ server-fetcher\n\n",
    "  Download the latest snapshot into /srv/minecraft:\n",
    "    $ server-fetcher --latest snapshot /srv/minecraft\n\n",
    "  Download an exact version with debug logging:\n",
    "    $ server-fetcher --release 1.20.1 --debug /srv/minecraft",
))]
pub struct Cli {
    /// Exact id of the version to download.
    #[arg(long, value_name = "ID", conflicts_with = "latest")]
    pub release: Option<String>,

    /// Download the version a tag points at [default tag: release].
    #[arg(
        long,
        value_name = "TAG",
        num_args = 0..=1,
        default_missing_value = DEFAULT_TAG
    )]
    pub latest: Option<String>,

    /// Directory the verified artefact is written to.
    #[arg(value_name = "DEST", default_value = ".")]
    pub dest: Utf8PathBuf,

    /// Location of the top-level version manifest.
    #[arg(
        long,
        value_name = "URL",
        env = MANIFEST_URL_ENV,
        default_value = DEFAULT_MANIFEST_URL
    )]
    pub manifest_url: String,

    /// Artefact role to download from the version manifest.
    #[arg(long, value_name = "ROLE", default_value = DEFAULT_ROLE)]
    pub role: String,

    /// File name prefix for the downloaded artefact.
    #[arg(long, value_name = "PREFIX", default_value = DEFAULT_PREFIX)]
    pub prefix: String,

    /// File extension for the downloaded artefact.
    #[arg(long, value_name = "EXT", default_value = DEFAULT_EXTENSION)]
    pub extension: String,

    /// Enable debug logging and print error causes.
    #[arg(short, long)]
    pub debug: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only report errors.
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Return the version selector the flags describe.
    ///
    /// Without `--release` or `--latest` the default release tag is used.
    #[must_use]
    pub fn selector(&self) -> VersionSelector {
        match (&self.release, &self.latest) {
            (Some(id), _) => VersionSelector::ExactId(id.clone()),
            (None, Some(tag)) => VersionSelector::Tag(tag.clone()),
            (None, None) => VersionSelector::default(),
        }
    }

    /// Build the pipeline configuration from the flags.
    #[must_use]
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            manifest_url: self.manifest_url.clone(),
            role: self.role.clone(),
            destination: self.dest.clone(),
            naming: ArtefactNaming::new(self.prefix.clone(), self.extension.clone()),
        }
    }

    /// Return the log level for the verbosity flags.
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        level_for(self.debug, self.quiet, self.verbosity)
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
