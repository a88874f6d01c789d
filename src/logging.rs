//! Logging setup
//!
//! Every run logs to the console and to its own file in the log directory.

use crate::error::PublishError;
use crate::system::System;
use anyhow::Result;
use chrono::{DateTime, Local};
use std::fs::File;
use std::io::{self, IsTerminal as _};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;
use tracing_subscriber::{EnvFilter, fmt};

/// Timestamp format of log lines
pub const LOG_DATE_FORMAT: &str = "%Y-%m-%d %I:%M:%S %p";

/// Name of the log file for a run of `service_name` started at `started`
#[must_use]
#[inline]
pub fn log_file_name(started: DateTime<Local>, service_name: &str) -> String {
    format!(
        "{}_{service_name}_serviceupdate.log",
        started.format("%Y_%m_%d")
    )
}

/// Install the console and file subscribers
///
/// The log directory is created if missing and the run's log file is
/// truncated. Returns the log file path.
///
/// # Errors
///
/// Returns an error if:
/// - The log directory or file cannot be created
/// - A global subscriber is already installed
#[inline]
pub fn init(
    system: &dyn System,
    log_dir: &Path,
    service_name: &str,
    started: DateTime<Local>,
    verbose: bool,
) -> Result<PathBuf> {
    system.create_dir_all(log_dir).map_err(|err| {
        PublishError::filesystem(format!(
            "Failed to create log directory '{}': {err}",
            log_dir.display()
        ))
    })?;

    let log_path = log_dir.join(log_file_name(started, service_name));
    // The file layer keeps this handle open for the rest of the run
    let file = File::create(&log_path).map_err(|err| {
        PublishError::filesystem(format!(
            "Failed to create log file '{}': {err}",
            log_path.display()
        ))
    })?;

    let log_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let console = fmt::layer()
        .with_target(false)
        .with_ansi(io::stdout().is_terminal())
        .with_timer(ChronoLocal::new(LOG_DATE_FORMAT.to_owned()));
    let logfile = fmt::layer()
        .with_target(false)
        .with_ansi(false)
        .with_timer(ChronoLocal::new(LOG_DATE_FORMAT.to_owned()))
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(logfile)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to install log subscriber: {err}"))?;

    Ok(log_path)
}
