//! Configuration parsing and validation tests

use clap::Parser as _;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use svcupdate::cli::Args;
use svcupdate::config::credentials::{PASSWORD_ENV, USER_ENV};
use svcupdate::config::{DEFAULT_PORTAL_URL, PublishConfig, PublishProfile};
use svcupdate::error::PublishError;
use svcupdate::portal::Sharing;
use svcupdate::system::{MockSystem, RealSystem};

fn system_with_credentials() -> MockSystem {
    MockSystem::new()
        .with_current_dir("/work")
        .unwrap()
        .with_env(USER_ENV, "gis_admin")
        .unwrap()
        .with_env(PASSWORD_ENV, "hunter2")
        .unwrap()
}

fn args(extra: &[&str]) -> Args {
    let mut argv = vec!["svcupdate", "parcels", "parcels.mxd"];
    argv.extend_from_slice(extra);
    Args::try_parse_from(argv).unwrap()
}

#[test]
fn test_defaults_without_profile() {
    let system = system_with_credentials();
    let config = PublishConfig::from_args(&args(&[]), &system).unwrap();

    assert_eq!(config.service_name, "parcels");
    assert_eq!(config.map_document, PathBuf::from("/work/parcels.mxd"));
    assert_eq!(config.portal_url, DEFAULT_PORTAL_URL);
    assert_eq!(config.work_dir, PathBuf::from("/work"));
    assert_eq!(config.sharing, Sharing::Organization);
    assert!(config.groups.is_empty());
    assert!(config.summary.is_none());
    assert!(!config.keep_temp);
    assert_eq!(config.credentials.user(), "gis_admin");
}

#[test]
fn test_missing_credentials_fail() {
    let system = MockSystem::new().with_env(USER_ENV, "gis_admin").unwrap();

    let err = PublishConfig::from_args(&args(&[]), &system).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PublishError>(),
        Some(PublishError::Configuration { .. })
    ));
    assert!(err.to_string().contains(PASSWORD_ENV));
}

#[test]
fn test_invalid_service_name_fails() {
    let system = system_with_credentials();
    let args = Args::try_parse_from(["svcupdate", "../parcels", "parcels.mxd"]).unwrap();

    let err = PublishConfig::from_args(&args, &system).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<PublishError>(),
        Some(PublishError::Argument { .. })
    ));
}

#[test]
fn test_relative_paths_resolve_against_current_dir() {
    let system = system_with_credentials();
    let args = Args::try_parse_from([
        "svcupdate",
        "parcels",
        "maps/parcels.mxd",
        "--work-dir",
        "out",
    ])
    .unwrap();

    let config = PublishConfig::from_args(&args, &system).unwrap();

    assert_eq!(config.map_document, PathBuf::from("/work/maps/parcels.mxd"));
    assert_eq!(config.work_dir, PathBuf::from("/work/out"));
}

#[test]
fn test_absolute_paths_are_kept() {
    let system = system_with_credentials();
    let args = Args::try_parse_from([
        "svcupdate",
        "parcels",
        "/maps/parcels.mxd",
        "--work-dir",
        "/staging",
    ])
    .unwrap();

    let config = PublishConfig::from_args(&args, &system).unwrap();

    assert_eq!(config.map_document, PathBuf::from("/maps/parcels.mxd"));
    assert_eq!(config.work_dir, PathBuf::from("/staging"));
}

#[test]
fn test_profile_work_dir_resolves_against_current_dir() {
    let system = system_with_credentials()
        .with_file("/work/profile.yaml", b"work_dir: \"scratch\"\n")
        .unwrap();

    let config =
        PublishConfig::from_args(&args(&["--config", "/work/profile.yaml"]), &system).unwrap();

    assert_eq!(config.work_dir, PathBuf::from("/work/scratch"));
}

#[test]
fn test_invalid_portal_url_fails() {
    let system = system_with_credentials();
    let err = PublishConfig::from_args(&args(&["--portal-url", "ftp://gis.example.org"]), &system)
        .unwrap_err();
    assert!(err.to_string().contains("Invalid portal URL"));
}

#[test]
fn test_profile_supplies_defaults() {
    let profile = r#"
portal_url: "https://gis.example.org/portal/"
sharing: public
groups: ["Planning", "Assessor"]
summary: "Parcel boundaries"
tags: "parcels,cadastre"
work_dir: "/staging"
"#;
    let system = system_with_credentials()
        .with_file("/work/profile.yaml", profile.as_bytes())
        .unwrap();

    let config =
        PublishConfig::from_args(&args(&["--config", "/work/profile.yaml"]), &system).unwrap();

    assert_eq!(config.portal_url, "https://gis.example.org/portal/");
    assert_eq!(config.sharing, Sharing::Public);
    assert_eq!(config.groups, vec!["Planning".to_owned(), "Assessor".to_owned()]);
    assert_eq!(config.summary.as_deref(), Some("Parcel boundaries"));
    assert_eq!(config.tags.as_deref(), Some("parcels,cadastre"));
    assert_eq!(config.work_dir, PathBuf::from("/staging"));
}

#[test]
fn test_cli_overrides_profile() {
    let profile = r#"
sharing: public
groups: ["Planning"]
tags: "parcels"
"#;
    let system = system_with_credentials()
        .with_file("/work/profile.yaml", profile.as_bytes())
        .unwrap();

    let config = PublishConfig::from_args(
        &args(&[
            "--config",
            "/work/profile.yaml",
            "--sharing",
            "private",
            "--group",
            "GIS",
            "--tags",
            "zoning",
        ]),
        &system,
    )
    .unwrap();

    assert_eq!(config.sharing, Sharing::Private);
    assert_eq!(config.groups, vec!["GIS".to_owned()]);
    assert_eq!(config.tags.as_deref(), Some("zoning"));
}

#[test]
fn test_missing_profile_fails() {
    let system = system_with_credentials();
    let err = PublishConfig::from_args(&args(&["--config", "/work/nope.yaml"]), &system)
        .unwrap_err();
    assert!(err.to_string().contains("Profile file not found"));
}

#[test]
fn test_profile_unknown_key_fails() {
    let err = PublishProfile::parse("portal: \"http://www.arcgis.com/\"\n").unwrap_err();
    assert!(err.to_string().contains("Failed to parse YAML profile"));
}

#[test]
fn test_profile_invalid_sharing_fails() {
    assert!(PublishProfile::parse("sharing: everyone\n").is_err());
}

#[test]
fn test_profile_blank_tag_fails() {
    let err = PublishProfile::parse("tags: \"parcels,,zoning\"\n").unwrap_err();
    assert!(err.to_string().contains("Tag #2"));
}

#[test]
fn test_empty_profile_is_valid() {
    let profile = PublishProfile::parse("{}\n").unwrap();
    assert_eq!(profile, PublishProfile::default());
}

#[test]
fn test_profile_from_real_file() {
    let temp_dir = TempDir::new().unwrap();
    let profile_path = temp_dir.path().join("profile.yaml");
    fs::write(&profile_path, "sharing: private\n").unwrap();

    let profile = PublishProfile::load(&RealSystem, Path::new(&profile_path)).unwrap();

    assert_eq!(profile.sharing, Some(Sharing::Private));
}
