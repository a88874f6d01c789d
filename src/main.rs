//! # `svcupdate`
//!
//! `svcupdate` overwrites a hosted feature service on ArcGIS Online (or
//! another portal) from a desktop map document. It signs in, generates a
//! service definition draft, rewrites it from a map service into a feature
//! service that replaces the existing one, analyzes, stages and uploads it,
//! then removes its temporary files.
//!
//! ## Usage
//!
//! ```sh
//! export ARCGIS_ONLINE_USER=gis_admin
//! export ARCGIS_ONLINE_PASSWORD=...
//! svcupdate parcels ./maps/parcels.mxd
//! ```
//!
//! Each run logs to the console and to `Logs/<date>_<service>_serviceupdate.log`.
//! The process exits with 0 on success and 1 on any failure.
//!
//! See `svcupdate --help` for more options.

use anyhow::Result;
use chrono::Local;
use clap::Parser as _;
use svcupdate::cli::Args;
use svcupdate::config::validation::validate_service_name;
use svcupdate::error::PublishError;
use svcupdate::system::RealSystem;
use tracing::error;

fn main() -> Result<()> {
    // Usage errors exit 1; --help and --version exit 0
    let args = Args::try_parse().unwrap_or_else(|err| {
        let code = if err.use_stderr() { 1 } else { 0 };
        let _ = err.print();
        std::process::exit(code);
    });

    // The service name is part of the log file name
    if let Err(err) = validate_service_name(&args.service_name) {
        eprintln!("{err}");
        std::process::exit(1);
    }

    let started = Local::now();

    if let Err(err) = svcupdate::logging::init(
        &RealSystem::new(),
        &args.log_dir,
        &args.service_name,
        started,
        args.verbose,
    ) {
        eprintln!("{err}");
        std::process::exit(1);
    }

    match svcupdate::run(&args, started) {
        Ok(()) => std::process::exit(0),
        Err(err) => {
            error!("{:#}", err);
            std::process::exit(
                err.downcast_ref::<PublishError>()
                    .map_or(1, PublishError::exit_code),
            );
        }
    }
}
