//! Temporary publishing artifacts and their cleanup

use crate::system::System;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the draft produced by the generator
pub const GENERATED_DRAFT_FILE: &str = "tempdraft.sddraft";

/// File name of the rewritten feature service draft
pub const FEATURE_DRAFT_FILE: &str = "updatedDraft.sddraft";

/// Where a run writes its temporary files
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct ArtifactPaths {
    /// Draft produced by the generator
    pub generated_draft: PathBuf,
    /// Draft after the feature service rewrite
    pub feature_draft: PathBuf,
    /// Staged service definition
    pub service_definition: PathBuf,
}

impl ArtifactPaths {
    /// Artifact paths for `service_name` inside `work_dir`
    #[must_use]
    #[inline]
    pub fn new(work_dir: &Path, service_name: &str) -> Self {
        Self {
            generated_draft: work_dir.join(GENERATED_DRAFT_FILE),
            feature_draft: work_dir.join(FEATURE_DRAFT_FILE),
            service_definition: work_dir.join(format!("{service_name}.sd")),
        }
    }

    /// All artifact paths, in creation order
    #[must_use]
    #[inline]
    pub fn all(&self) -> [&Path; 3] {
        [
            self.generated_draft.as_path(),
            self.feature_draft.as_path(),
            self.service_definition.as_path(),
        ]
    }
}

/// Guard that removes the run's artifacts when dropped
///
/// Cleanup happens on every exit path of the pipeline. With `keep` set the
/// guard only reports where the artifacts were left.
pub struct TempArtifacts<'src> {
    system: &'src dyn System,
    paths: ArtifactPaths,
    keep: bool,
}

impl<'src> TempArtifacts<'src> {
    /// Take ownership of the artifacts at `paths`
    #[must_use]
    #[inline]
    pub const fn new(system: &'src dyn System, paths: ArtifactPaths, keep: bool) -> Self {
        Self { system, paths, keep }
    }

    /// The guarded paths
    #[must_use]
    #[inline]
    pub const fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    fn cleanup(&self) {
        for path in self.paths.all() {
            match self.system.exists(path) {
                Ok(true) if self.keep => info!("Keeping '{}'", path.display()),
                Ok(true) => match self.system.remove_file(path) {
                    Ok(()) => info!("'{}' removed", path.display()),
                    Err(err) => warn!("Failed to remove '{}': {err}", path.display()),
                },
                Ok(false) => debug!("'{}' was never created", path.display()),
                Err(err) => warn!("Could not check '{}': {err}", path.display()),
            }
        }
    }
}

impl Drop for TempArtifacts<'_> {
    #[inline]
    fn drop(&mut self) {
        self.cleanup();
    }
}
