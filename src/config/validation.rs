//! Configuration validation logic

use crate::config::profile::PublishProfile;
use crate::error::PublishError;
use anyhow::Result;
use regex::Regex;

/// Validate a publish profile's values
///
/// # Errors
///
/// Returns an error if:
/// - The portal URL is invalid
/// - The tags or groups are blank
/// - A directory entry is blank
#[inline]
pub fn validate_profile(profile: &PublishProfile) -> Result<()> {
    if let Some(url) = profile.portal_url.as_ref() {
        validate_portal_url(url)?;
    }

    if let Some(tags) = profile.tags.as_ref() {
        validate_tags(tags)?;
    }

    validate_groups(&profile.groups)?;

    if let Some(summary) = profile.summary.as_ref()
        && summary.trim().is_empty()
    {
        return Err(PublishError::configuration("Summary cannot be empty".to_owned()).into());
    }

    if let Some(dir) = profile.work_dir.as_ref()
        && dir.as_os_str().is_empty()
    {
        return Err(PublishError::configuration("work_dir cannot be empty".to_owned()).into());
    }

    Ok(())
}

/// Validate a hosted service name
///
/// Hosted service names may only contain letters, digits and underscores;
/// the name also becomes part of the service definition and log file names.
///
/// # Errors
///
/// Returns an error if:
/// - The name is empty or contains other characters
#[inline]
pub fn validate_service_name(name: &str) -> Result<()> {
    let regex = Regex::new(r"^[A-Za-z0-9_]+$")?;
    if regex.is_match(name) {
        return Ok(());
    }

    Err(PublishError::argument(format!(
        "Invalid service name: '{name}'\n\
        Service names may only contain letters, digits and underscores"
    ))
    .into())
}

/// Validate a portal URL
///
/// # Errors
///
/// Returns an error if:
/// - The URL is not an http(s) URL with a host
#[inline]
pub fn validate_portal_url(url: &str) -> Result<()> {
    let regex = Regex::new(r"^https?://[^\s/]+(/\S*)?$")?;
    if regex.is_match(url) {
        return Ok(());
    }

    Err(PublishError::configuration(format!(
        "Invalid portal URL: '{url}'\n\
        Expected an http or https URL, for example http://www.arcgis.com/"
    ))
    .into())
}

/// Validate a comma-separated tag list
///
/// # Errors
///
/// Returns an error if:
/// - The list is blank or contains a blank tag
#[inline]
pub fn validate_tags(tags: &str) -> Result<()> {
    if tags.trim().is_empty() {
        return Err(PublishError::configuration("Tags cannot be empty".to_owned()).into());
    }

    if let Some(position) = tags.split(',').position(|tag| tag.trim().is_empty()) {
        return Err(PublishError::configuration(format!(
            "Tag #{} in '{tags}' is empty",
            position + 1
        ))
        .into());
    }

    Ok(())
}

/// Validate sharing group names
///
/// # Errors
///
/// Returns an error if:
/// - A group name is blank
#[inline]
pub fn validate_groups(groups: &[String]) -> Result<()> {
    for (index, group) in groups.iter().enumerate() {
        if group.trim().is_empty() {
            return Err(PublishError::configuration(format!(
                "Group #{} cannot be empty",
                index + 1
            ))
            .into());
        }
    }
    Ok(())
}
