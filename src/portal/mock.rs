//! Mock portal implementation for testing

#![expect(clippy::module_name_repetitions)]

use super::{AnalysisReport, DraftRequest, MapDocument, Portal, PortalResult, UploadRequest};
use crate::config::Credentials;
use crate::error::PublishError;
use crate::system::{MockSystem, System as _};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Map document extension the mock accepts
const MAP_DOCUMENT_EXTENSION: &str = "mxd";

/// A draft the generator would produce for a small map service
pub const SAMPLE_DRAFT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<SVCManifest xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:type="typens:SVCManifest">
<Type>esriServiceDefinitionType_New</Type>
<State>esriSDState_Draft</State>
<Name>parcels</Name>
<Configurations xsi:type="typens:ArrayOfSVCConfiguration">
<SVCConfiguration xsi:type="typens:SVCConfiguration">
<Definition xsi:type="typens:ServiceConfigurationInfo">
<TypeName>MapServer</TypeName>
<Extensions xsi:type="typens:ArrayOfSVCExtension">
<SVCExtension xsi:type="typens:SVCExtension"><TypeName>KmlServer</TypeName><Enabled>false</Enabled></SVCExtension>
<SVCExtension xsi:type="typens:SVCExtension"><TypeName>FeatureServer</TypeName><Enabled>true</Enabled></SVCExtension>
</Extensions>
</Definition>
</SVCConfiguration>
</Configurations>
</SVCManifest>
"#;

/// Portal operations, used to script failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PortalStep {
    SignIn,
    LoadMapDocument,
    CreateDraft,
    Analyze,
    Stage,
    Upload,
}

/// A call the mock received
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PortalCall {
    SignIn { user: String, portal_url: String },
    LoadMapDocument { path: PathBuf },
    CreateDraft { draft_path: PathBuf, service_name: String },
    Analyze { draft_path: PathBuf },
    Stage { draft_path: PathBuf, service_definition: PathBuf },
    Upload { service_definition: PathBuf, request: UploadRequest },
}

impl PortalCall {
    /// The step this call belongs to
    #[must_use]
    #[inline]
    pub const fn step(&self) -> PortalStep {
        match *self {
            Self::SignIn { .. } => PortalStep::SignIn,
            Self::LoadMapDocument { .. } => PortalStep::LoadMapDocument,
            Self::CreateDraft { .. } => PortalStep::CreateDraft,
            Self::Analyze { .. } => PortalStep::Analyze,
            Self::Stage { .. } => PortalStep::Stage,
            Self::Upload { .. } => PortalStep::Upload,
        }
    }
}

/// In-memory portal that records calls and writes its artifacts to a
/// [`MockSystem`]
///
/// # Example
/// ```
/// use svcupdate::portal::mock::{MockPortal, PortalStep};
/// use svcupdate::system::MockSystem;
///
/// let portal = MockPortal::new(MockSystem::new()).failing_at(PortalStep::Stage);
/// assert!(portal.calls().is_empty());
/// ```
#[derive(Clone)]
pub struct MockPortal {
    system: MockSystem,
    account: Option<(String, String)>,
    draft_xml: String,
    analysis: AnalysisReport,
    failures: HashSet<PortalStep>,
    calls: Vec<PortalCall>,
    analyzed_drafts: Vec<String>,
}

impl MockPortal {
    /// Create a portal that accepts any credentials and generates [`SAMPLE_DRAFT`]
    #[must_use]
    #[inline]
    pub fn new(system: MockSystem) -> Self {
        Self {
            system,
            account: None,
            draft_xml: SAMPLE_DRAFT.to_owned(),
            analysis: AnalysisReport::default(),
            failures: HashSet::new(),
            calls: Vec::new(),
            analyzed_drafts: Vec::new(),
        }
    }

    /// Only accept this user and password (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_account(mut self, user: &str, password: &str) -> Self {
        self.account = Some((user.to_owned(), password.to_owned()));
        self
    }

    /// Generate this draft instead of the sample (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_draft(mut self, xml: &str) -> Self {
        xml.clone_into(&mut self.draft_xml);
        self
    }

    /// Return this analysis report (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_analysis(mut self, report: AnalysisReport) -> Self {
        self.analysis = report;
        self
    }

    /// Fail the given step (builder pattern)
    #[must_use]
    #[inline]
    pub fn failing_at(mut self, step: PortalStep) -> Self {
        self.failures.insert(step);
        self
    }

    /// Every call received, in order
    #[must_use]
    #[inline]
    pub fn calls(&self) -> &[PortalCall] {
        &self.calls
    }

    /// The steps called, in order
    #[must_use]
    #[inline]
    pub fn steps(&self) -> Vec<PortalStep> {
        self.calls.iter().map(PortalCall::step).collect()
    }

    /// Contents of each draft at the time it was analyzed
    #[must_use]
    #[inline]
    pub fn analyzed_drafts(&self) -> &[String] {
        &self.analyzed_drafts
    }

    fn fails(&self, step: PortalStep) -> bool {
        self.failures.contains(&step)
    }

    fn write_artifact(&self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
        self.system.write(path, contents)
    }
}

impl Portal for MockPortal {
    fn sign_in(&mut self, credentials: &Credentials, portal_url: &str) -> PortalResult<()> {
        self.calls.push(PortalCall::SignIn {
            user: credentials.user().to_owned(),
            portal_url: portal_url.to_owned(),
        });

        let rejected = self.account.as_ref().is_some_and(|(user, password)| {
            user != credentials.user() || password != credentials.password()
        });
        if rejected || self.fails(PortalStep::SignIn) {
            return Err(PublishError::authentication(
                "Could not log into ArcGIS Online, check credential env variables!".to_owned(),
            ));
        }
        Ok(())
    }

    fn load_map_document(&mut self, path: &Path) -> PortalResult<MapDocument> {
        self.calls.push(PortalCall::LoadMapDocument {
            path: path.to_path_buf(),
        });

        let is_map_document = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(MAP_DOCUMENT_EXTENSION));
        let is_file = self.system.is_file(path).unwrap_or(false);
        if !is_map_document || !is_file || self.fails(PortalStep::LoadMapDocument) {
            return Err(PublishError::invalid_input(format!(
                "Invalid mxd path! '{}'",
                path.display()
            )));
        }
        Ok(MapDocument::new(path))
    }

    fn create_draft(&mut self, request: &DraftRequest<'_>) -> PortalResult<()> {
        self.calls.push(PortalCall::CreateDraft {
            draft_path: request.draft_path.to_path_buf(),
            service_name: request.service_name.to_owned(),
        });

        if self.fails(PortalStep::CreateDraft) {
            return Err(PublishError::draft("Failed to create SD draft".to_owned()));
        }
        self.write_artifact(request.draft_path, self.draft_xml.as_bytes())
            .map_err(|err| PublishError::draft(format!("Failed to create SD draft: {err}")))
    }

    fn analyze(&mut self, draft: &Path) -> PortalResult<AnalysisReport> {
        self.calls.push(PortalCall::Analyze {
            draft_path: draft.to_path_buf(),
        });

        if self.fails(PortalStep::Analyze) {
            return Err(PublishError::analysis("Failed to analyze draft".to_owned()));
        }
        let contents = self
            .system
            .read_to_string(draft)
            .map_err(|err| PublishError::analysis(format!("Failed to read draft: {err}")))?;
        self.analyzed_drafts.push(contents);
        Ok(self.analysis.clone())
    }

    fn stage(&mut self, draft: &Path, service_definition: &Path) -> PortalResult<()> {
        self.calls.push(PortalCall::Stage {
            draft_path: draft.to_path_buf(),
            service_definition: service_definition.to_path_buf(),
        });

        if self.fails(PortalStep::Stage) {
            return Err(PublishError::staging("Staging failed!".to_owned()));
        }
        self.write_artifact(service_definition, b"service definition")
            .map_err(|err| PublishError::staging(format!("Staging failed! {err}")))
    }

    fn upload(&mut self, service_definition: &Path, request: &UploadRequest) -> PortalResult<()> {
        self.calls.push(PortalCall::Upload {
            service_definition: service_definition.to_path_buf(),
            request: request.clone(),
        });

        if self.fails(PortalStep::Upload) {
            return Err(PublishError::upload(
                "Upload of service definition failed!".to_owned(),
            ));
        }
        Ok(())
    }
}
