//! YAML publish profile loading and parsing

use crate::error::PublishError;
use crate::portal::Sharing;
use crate::system::System;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Publish defaults read from a YAML file
///
/// ```yaml
/// portal_url: "https://gis.example.org/portal/"
/// sharing: organization
/// groups: ["Planning"]
/// summary: "Parcel boundaries"
/// tags: "parcels,cadastre"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
#[non_exhaustive]
pub struct PublishProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sharing: Option<Sharing>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub work_dir: Option<PathBuf>,
}

impl PublishProfile {
    /// Load and validate a profile from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist or cannot be read
    /// - The YAML cannot be parsed
    /// - The profile fails schema or logic validation
    #[inline]
    pub fn load(system: &dyn System, path: &Path) -> Result<Self> {
        if !system.exists(path)? {
            return Err(PublishError::configuration(format!(
                "Profile file not found: {}",
                path.display()
            ))
            .into());
        }

        let content = system
            .read_to_string(path)
            .with_context(|| format!("Failed to read profile file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Invalid profile file: {}", path.display()))
    }

    /// Parse and validate a profile from YAML text
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The YAML cannot be parsed
    /// - The profile fails schema or logic validation
    #[inline]
    pub fn parse(content: &str) -> Result<Self> {
        let profile: Self = serde_yaml::from_str(content).map_err(|err| {
            PublishError::configuration(format!(
                "Failed to parse YAML profile: {err}\n\
                Please check the syntax and structure of your profile"
            ))
        })?;

        let profile_value = serde_json::to_value(&profile)
            .context("Failed to convert profile to JSON for validation")?;

        crate::config::schema::validate_against_schema(&profile_value)
            .map_err(|err| PublishError::configuration(err.to_string()))?;

        crate::config::validation::validate_profile(&profile)?;

        Ok(profile)
    }
}
