//! Output formatting for the fetcher CLI.
//!
//! The committed path goes to stdout so scripts can capture it; everything
//! else, including failure reports, goes to stderr.

use crate::error::PipelineError;
use crate::pipeline::DownloadOutcome;
use std::error::Error;
use std::fmt::Display;
use std::io::Write;

/// Write a line to `stream`, ignoring write failures.
pub fn write_line(stream: &mut dyn Write, message: impl Display) {
    if writeln!(stream, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

/// Format the stdout line for a committed artefact.
///
/// # Example
///
/// ```
/// use server_fetcher::artefact::manifest::VersionDescriptor;
/// use server_fetcher::output::success_line;
/// use server_fetcher::pipeline::DownloadOutcome;
///
/// let outcome = DownloadOutcome {
///     path: "/srv/minecraft_server-release-1.20.1.jar".into(),
///     verified: true,
///     version: VersionDescriptor {
///         id: "1.20.1".to_owned(),
///         kind: "release".to_owned(),
///         manifest_url: "https://meta.test/1.20.1.json".to_owned(),
///     },
///     digest: "da39a3ee5e6b4b0d3255bfef95601890afd80709".to_owned(),
///     bytes_written: 0,
/// };
/// assert_eq!(success_line(&outcome), "/srv/minecraft_server-release-1.20.1.jar");
/// ```
#[must_use]
pub fn success_line(outcome: &DownloadOutcome) -> String {
    outcome.path.to_string()
}

/// Format a failure for stderr.
///
/// With `show_causes`, every error in the source chain is listed on its own
/// `caused by:` line.
#[must_use]
pub fn failure_report(err: &PipelineError, show_causes: bool) -> String {
    let mut report = format!("error: {err}");
    if show_causes {
        let mut source = err.source();
        while let Some(cause) = source {
            report.push_str(&format!("\n  caused by: {cause}"));
            source = cause.source();
        }
    }
    report
}
