//! Publish operation coordination

use crate::config::PublishConfig;
use crate::draft::{RewriteSummary, ServiceDraft, to_feature_service};
use crate::error::PublishError;
use crate::operations::artifacts::{ArtifactPaths, TempArtifacts};
use crate::portal::{AnalysisReport, DraftRequest, Portal, UploadRequest};
use crate::system::System;
use anyhow::Result;
use std::fmt;
use tracing::{debug, info, info_span, warn};

/// Where a publish run is in its sequence of steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum PublishState {
    Start,
    SignedIn,
    MapLoaded,
    DraftCreated,
    DraftRewritten,
    DraftAnalyzed,
    Staged,
    Uploaded,
    AnalysisFailed,
    Failed,
    Done,
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// What a successful run did
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct PublishReport {
    /// Changes made to the generated draft
    pub rewrite: RewriteSummary,
    /// Analysis of the rewritten draft
    pub analysis: AnalysisReport,
}

/// Coordinates the complete publish operation
#[non_exhaustive]
#[expect(clippy::module_name_repetitions, reason = "PublishOperation")]
pub struct PublishOperation<'src> {
    config: &'src PublishConfig,
    system: &'src dyn System,
    portal: &'src mut dyn Portal,
    transitions: Vec<PublishState>,
}

impl<'src> PublishOperation<'src> {
    /// Create a publish operation for a validated configuration
    #[inline]
    pub fn new(
        config: &'src PublishConfig,
        system: &'src dyn System,
        portal: &'src mut dyn Portal,
    ) -> Self {
        PublishOperation {
            config,
            system,
            portal,
            transitions: Vec::new(),
        }
    }

    /// States the run passed through, in order
    #[must_use]
    #[inline]
    pub fn transitions(&self) -> &[PublishState] {
        &self.transitions
    }

    /// Execute the publish operation
    ///
    /// Temporary artifacts are removed before this returns, whatever the
    /// outcome, unless the configuration keeps them.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Any portal step fails
    /// - The draft cannot be read, parsed or written
    /// - The analysis reports errors
    #[inline]
    pub fn execute(&mut self) -> Result<PublishReport> {
        let span = info_span!("update_service", service = %self.config.service_name);
        let _entered = span.enter();

        self.transition(PublishState::Start);
        info!("Start");

        let result = {
            let artifacts = TempArtifacts::new(
                self.system,
                ArtifactPaths::new(&self.config.work_dir, &self.config.service_name),
                self.config.keep_temp,
            );
            let result = self.run_steps(artifacts.paths());
            if result.is_err() && self.state() != PublishState::AnalysisFailed {
                self.transition(PublishState::Failed);
            }
            result
        };

        self.transition(PublishState::Done);
        result
    }

    fn state(&self) -> PublishState {
        self.transitions
            .last()
            .copied()
            .unwrap_or(PublishState::Start)
    }

    fn transition(&mut self, next: PublishState) {
        debug!("{} -> {}", self.state(), next);
        self.transitions.push(next);
    }

    fn run_steps(&mut self, paths: &ArtifactPaths) -> Result<PublishReport> {
        let config = self.config;

        // Sign in
        info!("Logging into ArcGIS Online");
        info!(
            "User: {}, Password: {}",
            config.credentials.user(),
            config.credentials.masked_password()
        );
        self.portal
            .sign_in(&config.credentials, &config.portal_url)?;
        info!("Login successful");
        self.transition(PublishState::SignedIn);

        // Open the map document
        let map = self.portal.load_map_document(&config.map_document)?;
        info!("Mxd path '{}' is valid", config.map_document.display());
        self.transition(PublishState::MapLoaded);

        // Generate the map service draft
        info!("Creating SD draft file");
        let request = DraftRequest::new(&map, &paths.generated_draft, &config.service_name)
            .with_description(config.summary.as_deref(), config.tags.as_deref());
        self.portal.create_draft(&request)?;
        info!("'{}' created", paths.generated_draft.display());
        self.transition(PublishState::DraftCreated);

        // Rewrite it into a feature service draft
        info!("Parsing XML");
        let mut draft = ServiceDraft::load(self.system, &paths.generated_draft)?;
        info!("XML parsed");

        let rewrite = to_feature_service(&mut draft);
        debug!(
            "Draft rewrite: {} manifest type, {} manifest state, {} type names retyped",
            rewrite.service_type_fields, rewrite.state_fields, rewrite.retyped
        );
        if rewrite.service_type_fields == 0 || rewrite.state_fields == 0 {
            warn!("Draft has no SVCManifest Type or State; the service may not be replaced");
        }

        info!("Creating new SD file");
        draft.save(self.system, &paths.feature_draft)?;
        info!("'{}' created", paths.feature_draft.display());
        self.transition(PublishState::DraftRewritten);

        // Analyze
        info!("Analyzing SD file");
        let analysis = self.portal.analyze(&paths.feature_draft)?;
        info!("SD file analysis complete");
        self.transition(PublishState::DraftAnalyzed);

        for issue in &analysis.warnings {
            warn!("Analysis warning: {issue}");
        }
        for issue in &analysis.messages {
            debug!("Analysis message: {issue}");
        }

        if !analysis.is_clean() {
            self.transition(PublishState::AnalysisFailed);
            return Err(PublishError::analysis(format!(
                "Following errors detected: {}",
                analysis.describe_errors()
            ))
            .into());
        }

        // Stage
        info!("Staging service server");
        self.portal
            .stage(&paths.feature_draft, &paths.service_definition)?;
        info!("Staging complete");
        self.transition(PublishState::Staged);

        // Upload
        info!("Uploading service definition");
        let upload = UploadRequest::hosted(
            config.service_name.clone(),
            config.sharing,
            config.groups.clone(),
        );
        self.portal.upload(&paths.service_definition, &upload)?;
        info!("Uploaded and overwrote service");
        self.transition(PublishState::Uploaded);

        Ok(PublishReport { rewrite, analysis })
    }
}
