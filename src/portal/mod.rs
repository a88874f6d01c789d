//! Portal abstraction for the publishing service calls
//!
//! Every step that talks to the GIS portal or its desktop tooling goes
//! through the [`Portal`] trait, so the publish pipeline can run against a
//! scripted [`MockPortal`] in tests and the [`ArcpyPortal`] bridge in
//! production.

use crate::config::Credentials;
use crate::error::PublishError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

pub mod arcpy;
pub mod mock;
mod scripts;

pub use arcpy::ArcpyPortal;
pub use mock::{MockPortal, PortalCall, PortalStep};

/// Result of a portal call; failures always carry their publish error kind
pub type PortalResult<T> = Result<T, PublishError>;

/// Server name hosted services are uploaded to
pub const HOSTED_SERVICES_SERVER: &str = "My Hosted Services";

/// Server type hosted service drafts are generated for
pub const HOSTED_SERVICES_SERVER_TYPE: &str = "MY_HOSTED_SERVICES";

/// External publishing operations
///
/// Each method is a single blocking call with no retries.
pub trait Portal {
    /// Sign into the portal
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Authentication`] if the portal rejects the credentials
    fn sign_in(&mut self, credentials: &Credentials, portal_url: &str) -> PortalResult<()>;

    /// Open a map document, checking that it is valid
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::InvalidInput`] if the path is not a valid map document
    fn load_map_document(&mut self, path: &Path) -> PortalResult<MapDocument>;

    /// Generate a map service definition draft from a map document
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Draft`] if the draft cannot be generated
    fn create_draft(&mut self, request: &DraftRequest<'_>) -> PortalResult<()>;

    /// Analyze a draft for problems that prevent staging
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Analysis`] if the analysis itself cannot run
    fn analyze(&mut self, draft: &Path) -> PortalResult<AnalysisReport>;

    /// Compile a draft into a service definition
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Staging`] if staging fails
    fn stage(&mut self, draft: &Path, service_definition: &Path) -> PortalResult<()>;

    /// Upload a service definition, overwriting the existing service
    ///
    /// # Errors
    ///
    /// Returns [`PublishError::Upload`] if the upload fails
    fn upload(&mut self, service_definition: &Path, request: &UploadRequest) -> PortalResult<()>;
}

/// Handle to a map document that opened successfully
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct MapDocument {
    pub path: PathBuf,
}

impl MapDocument {
    /// Create a handle for a validated map document
    #[must_use]
    #[inline]
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

/// Parameters for draft generation
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct DraftRequest<'req> {
    pub map: &'req MapDocument,
    pub draft_path: &'req Path,
    pub service_name: &'req str,
    pub server_type: &'req str,
    pub summary: Option<&'req str>,
    pub tags: Option<&'req str>,
}

impl<'req> DraftRequest<'req> {
    /// Request a hosted-services draft with no summary or tags
    #[must_use]
    #[inline]
    pub const fn new(map: &'req MapDocument, draft_path: &'req Path, service_name: &'req str) -> Self {
        Self {
            map,
            draft_path,
            service_name,
            server_type: HOSTED_SERVICES_SERVER_TYPE,
            summary: None,
            tags: None,
        }
    }

    /// Set the draft summary and tags
    #[must_use]
    #[inline]
    pub const fn with_description(mut self, summary: Option<&'req str>, tags: Option<&'req str>) -> Self {
        self.summary = summary;
        self.tags = tags;
        self
    }
}

/// One issue reported by draft analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct AnalysisIssue {
    pub message: String,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub layers: Vec<String>,
}

impl AnalysisIssue {
    /// Create an issue
    #[must_use]
    #[inline]
    pub fn new<S: Into<String>>(message: S, code: i64, layers: Vec<String>) -> Self {
        Self {
            message: message.into(),
            code,
            layers,
        }
    }
}

impl fmt::Display for AnalysisIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)?;
        if !self.layers.is_empty() {
            write!(f, " [{}]", self.layers.join(", "))?;
        }
        Ok(())
    }
}

/// Draft analysis result
///
/// Only `errors` block staging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[non_exhaustive]
pub struct AnalysisReport {
    #[serde(default)]
    pub errors: Vec<AnalysisIssue>,
    #[serde(default)]
    pub warnings: Vec<AnalysisIssue>,
    #[serde(default)]
    pub messages: Vec<AnalysisIssue>,
}

impl AnalysisReport {
    /// Report with the given error set and nothing else
    #[must_use]
    #[inline]
    pub fn with_errors(errors: Vec<AnalysisIssue>) -> Self {
        Self {
            errors,
            ..Self::default()
        }
    }

    /// Whether the draft can be staged
    #[must_use]
    #[inline]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// All errors joined into one line
    #[must_use]
    #[inline]
    pub fn describe_errors(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Who the uploaded service is shared with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Sharing {
    /// Owner only
    Private,
    /// Everyone in the owner's organization
    #[default]
    Organization,
    /// Everyone, including anonymous users
    Public,
}

impl Sharing {
    /// Value of the upload tool's public sharing parameter
    #[must_use]
    #[inline]
    pub const fn public_flag(self) -> &'static str {
        match self {
            Self::Public => "PUBLIC",
            Self::Private | Self::Organization => "PRIVATE",
        }
    }

    /// Value of the upload tool's organization sharing parameter
    #[must_use]
    #[inline]
    pub const fn organization_flag(self) -> &'static str {
        match self {
            Self::Organization | Self::Public => "SHARE_ORGANIZATION",
            Self::Private => "NO_SHARE_ORGANIZATION",
        }
    }
}

impl fmt::Display for Sharing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match *self {
            Self::Private => "private",
            Self::Organization => "organization",
            Self::Public => "public",
        };
        f.write_str(name)
    }
}

/// Parameters for the upload step
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct UploadRequest {
    pub server: String,
    pub service_name: String,
    pub sharing: Sharing,
    pub groups: Vec<String>,
}

impl UploadRequest {
    /// Upload to the hosted services server
    #[must_use]
    #[inline]
    pub fn hosted<S: Into<String>>(service_name: S, sharing: Sharing, groups: Vec<String>) -> Self {
        Self {
            server: HOSTED_SERVICES_SERVER.to_owned(),
            service_name: service_name.into(),
            sharing,
            groups,
        }
    }
}
