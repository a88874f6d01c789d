//! Configuration management module
//!
//! Builds the validated run configuration from CLI arguments, the optional
//! YAML publish profile and the credential environment variables.

pub mod credentials;
pub mod profile;
pub mod schema;
pub mod validation;

pub use credentials::Credentials;
pub use profile::PublishProfile;

use crate::cli::Args;
use crate::portal::Sharing;
use crate::system::System;
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

/// Portal signed into when neither the CLI nor the profile names one
pub const DEFAULT_PORTAL_URL: &str = "http://www.arcgis.com/";

/// Everything a publish run needs, validated up front
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct PublishConfig {
    /// Hosted service to overwrite
    pub service_name: String,

    /// Map document the service is published from, made absolute
    pub map_document: PathBuf,

    /// Portal credentials
    pub credentials: Credentials,

    /// Portal to sign into
    pub portal_url: String,

    /// Directory temporary artifacts are written to, made absolute
    pub work_dir: PathBuf,

    /// Sharing level of the uploaded service
    pub sharing: Sharing,

    /// Groups the uploaded service is shared with
    pub groups: Vec<String>,

    /// Summary written into the draft
    pub summary: Option<String>,

    /// Comma-separated tags written into the draft
    pub tags: Option<String>,

    /// Keep temporary artifacts after the run
    pub keep_temp: bool,

    /// ArcGIS Python interpreter
    pub python: PathBuf,
}

impl PublishConfig {
    /// Build the run configuration; CLI values win over the profile
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The service name is invalid
    /// - The profile cannot be loaded or is invalid
    /// - The credentials are missing from the environment
    /// - A merged value is invalid
    #[inline]
    pub fn from_args(args: &Args, system: &dyn System) -> Result<Self> {
        validation::validate_service_name(&args.service_name)?;

        let profile = match args.config.as_ref() {
            Some(path) => PublishProfile::load(system, path)?,
            None => PublishProfile::default(),
        };

        let credentials = Credentials::from_env(system)?;

        let portal_url = args
            .portal_url
            .clone()
            .or(profile.portal_url)
            .unwrap_or_else(|| DEFAULT_PORTAL_URL.to_owned());
        validation::validate_portal_url(&portal_url)?;

        let current_dir = system
            .current_dir()
            .context("Failed to determine the current directory")?;
        let work_dir = match args.work_dir.as_ref().or(profile.work_dir.as_ref()) {
            Some(dir) => absolute(&current_dir, dir),
            None => current_dir.clone(),
        };

        let groups = if args.groups.is_empty() {
            profile.groups
        } else {
            args.groups.clone()
        };
        validation::validate_groups(&groups)?;

        let tags = args.tags.clone().or(profile.tags);
        if let Some(tags) = tags.as_ref() {
            validation::validate_tags(tags)?;
        }

        Ok(Self {
            service_name: args.service_name.clone(),
            map_document: absolute(&current_dir, &args.map_document),
            credentials,
            portal_url,
            work_dir,
            sharing: args.sharing.or(profile.sharing).unwrap_or_default(),
            groups,
            summary: args.summary.clone().or(profile.summary),
            tags,
            keep_temp: args.keep_temp,
            python: args.python.clone(),
        })
    }
}

/// `path` as is when absolute, otherwise joined onto `base`
fn absolute(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
