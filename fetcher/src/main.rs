//! Server fetcher CLI entrypoint.
//!
//! This binary resolves the requested version, downloads its artefact,
//! verifies the SHA-1 checksum, and prints the committed path on stdout.

use clap::Parser;
use log::{Log, debug};
use server_fetcher::artefact::download::{ArtefactDownloader, HttpDownloader};
use server_fetcher::cli::Cli;
use server_fetcher::error::PipelineError;
use server_fetcher::logging::StderrLogger;
use server_fetcher::output::{failure_report, success_line, write_line};
use server_fetcher::pipeline::{DownloadOutcome, DownloadVerifyPipeline};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let logger = StderrLogger::new(cli.log_level());
    let run_result = run(&cli, &HttpDownloader, &logger);
    logger.flush();
    let exit_code = exit_code_for_run_result(
        run_result,
        cli.debug,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(
    cli: &Cli,
    downloader: &dyn ArtefactDownloader,
    logger: &dyn Log,
) -> Result<DownloadOutcome, PipelineError> {
    debug!(logger: logger, "Debug logging enabled");
    let config = cli.pipeline_config();
    let selector = cli.selector();
    debug!(
        logger: logger,
        "Requested {selector} from '{}' into '{}'",
        config.manifest_url,
        config.destination
    );
    DownloadVerifyPipeline::new(&config, downloader, logger).run(&selector)
}

fn exit_code_for_run_result(
    result: Result<DownloadOutcome, PipelineError>,
    show_causes: bool,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> i32 {
    match result {
        Ok(outcome) => {
            write_line(stdout, success_line(&outcome));
            0
        }
        Err(err) => {
            write_line(stderr, failure_report(&err, show_causes));
            err.exit_code()
        }
    }
}
