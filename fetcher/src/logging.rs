//! Stderr logger handed to the pipeline at start-up.
//!
//! The logger is an ordinary value: `main` builds one from the CLI
//! verbosity flags and passes it by reference to every component that logs.
//! It is never registered as the process-wide `log` logger.

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;
use std::sync::Mutex;

/// Writes `HH:MM:SS [LEVEL]: message` lines to a sink, stderr by default.
pub struct StderrLogger {
    level: LevelFilter,
    sink: Mutex<Box<dyn Write + Send>>,
}

impl StderrLogger {
    /// Create a logger that writes records up to `level` to stderr.
    #[must_use]
    pub fn new(level: LevelFilter) -> Self {
        Self::with_sink(level, Box::new(std::io::stderr()))
    }

    /// Create a logger that writes records up to `level` to `sink`.
    #[must_use]
    pub fn with_sink(level: LevelFilter, sink: Box<dyn Write + Send>) -> Self {
        Self {
            level,
            sink: Mutex::new(sink),
        }
    }
}

/// Pick the log level for the CLI verbosity switches.
///
/// `--debug` wins over everything; `--quiet` hides warnings; otherwise
/// each `-v` raises the level one step above the warning default.
#[must_use]
pub fn level_for(debug: bool, quiet: bool, verbosity: u8) -> LevelFilter {
    if debug {
        return LevelFilter::Debug;
    }
    if quiet {
        return LevelFilter::Error;
    }
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Ok(mut sink) = self.sink.lock() else {
            return;
        };
        let timestamp = Local::now().format("%H:%M:%S");
        if writeln!(sink, "{timestamp} [{}]: {}", record.level(), record.args()).is_err() {
            // Best-effort logging; ignore write failures.
        }
    }

    fn flush(&self) {
        if let Ok(mut sink) = self.sink.lock() {
            if sink.flush().is_err() {
                // Best-effort logging; ignore flush failures.
            }
        }
    }
}
