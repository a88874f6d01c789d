use crate::portal::Sharing;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for svcupdate
#[derive(Parser, Debug, Clone)]
#[command(name = "svcupdate")]
#[command(about = "A CLI tool for overwriting hosted feature services from map documents")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Name of the hosted feature service to overwrite
    #[arg(value_name = "SERVICE_NAME")]
    pub service_name: String,

    /// Path to the map document (.mxd) the service is published from
    #[arg(value_name = "MAP_DOCUMENT")]
    pub map_document: PathBuf,

    /// Portal to sign into [default: http://www.arcgis.com/]
    #[arg(long, value_name = "URL")]
    pub portal_url: Option<String>,

    /// Directory for temporary draft and service definition files [default: current directory]
    #[arg(long, value_name = "DIR")]
    pub work_dir: Option<PathBuf>,

    /// Directory the per-run log file is written to
    #[arg(long, value_name = "DIR", default_value = "Logs")]
    pub log_dir: PathBuf,

    /// ArcGIS Python interpreter used to run the publishing tools
    #[arg(long, value_name = "PATH", env = "ARCGIS_PYTHON", default_value = "python")]
    pub python: PathBuf,

    /// Who the uploaded service is shared with [default: organization]
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub sharing: Option<Sharing>,

    /// Group to share the service with (can be specified multiple times)
    #[arg(long = "group", value_name = "NAME")]
    pub groups: Vec<String>,

    /// Summary written into the service definition draft
    #[arg(long, value_name = "TEXT")]
    pub summary: Option<String>,

    /// Comma-separated tags written into the service definition draft
    #[arg(long, value_name = "TAGS")]
    pub tags: Option<String>,

    /// YAML publish profile with defaults for the options above
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Keep temporary draft and service definition files after the run
    #[arg(long)]
    pub keep_temp: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}
