//! `svcupdate` - A CLI tool for overwriting hosted feature services
//!
//! This library signs into a GIS portal, turns the map service definition
//! draft generated from a map document into a feature service draft that
//! replaces the existing service, then stages and uploads it.

pub mod cli;
pub mod config;
pub mod draft;
pub mod error;
pub mod logging;
pub mod operations;
pub mod portal;
pub mod system;

use anyhow::Result;
use chrono::{DateTime, Local};
use cli::Args;
use config::PublishConfig;
use operations::{PublishOperation, PublishReport, format_elapsed};
use portal::{ArcpyPortal, Portal};
use system::{RealSystem, System};
use tracing::info;

/// Main entry point for the svcupdate library
///
/// # Errors
///
/// Returns an error if:
/// - The configuration is invalid or the credentials are missing
/// - Any publish step fails
#[inline]
pub fn run(args: &Args, started: DateTime<Local>) -> Result<()> {
    let system = RealSystem::new();
    let config = PublishConfig::from_args(args, &system)?;
    let mut portal = ArcpyPortal::new(&config.python);
    publish(&config, &system, &mut portal, started).map(|_| ())
}

/// Run the publish pipeline and log the elapsed time, whatever the outcome
///
/// # Errors
///
/// Returns an error if:
/// - Any publish step fails
#[inline]
pub fn publish(
    config: &PublishConfig,
    system: &dyn System,
    portal: &mut dyn Portal,
    started: DateTime<Local>,
) -> Result<PublishReport> {
    let result = PublishOperation::new(config, system, portal).execute();

    let elapsed = (Local::now() - started).to_std().unwrap_or_default();
    info!("Finished. Elapsed time: {}", format_elapsed(elapsed));

    result
}
