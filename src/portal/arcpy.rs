//! Portal implementation backed by the ArcGIS Desktop Python tooling

use super::scripts::{EXIT_INVALID_INPUT, EXIT_NO_ARCPY, EXIT_TOOL_FAILED, PASSWORD_ENV, Script};
use super::{AnalysisReport, DraftRequest, MapDocument, Portal, PortalResult, UploadRequest};
use crate::config::Credentials;
use crate::error::PublishError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tracing::debug;

/// Signed-in portal session
#[derive(Debug, Clone)]
struct Session {
    credentials: Credentials,
    portal_url: String,
}

/// Runs every portal operation as a short-lived child of the ArcGIS Python
/// interpreter
///
/// Children inherit this process's working directory, so relative paths
/// on their command line resolve the same way they do for [`System`].
/// Sign-in state does not outlive a child process, so the session captured
/// by [`Portal::sign_in`] is replayed by the upload step.
///
/// [`System`]: crate::system::System
#[derive(Debug)]
#[non_exhaustive]
pub struct ArcpyPortal {
    python: PathBuf,
    session: Option<Session>,
}

/// How a bridge child process ended
#[derive(Debug)]
enum ScriptFailure {
    /// The interpreter could not be started
    Spawn(String),
    /// arcpy is unavailable in the interpreter
    NoArcpy(String),
    /// The tooling rejected an input
    InvalidInput(String),
    /// The tool ran and failed
    Failed(String),
}

impl ScriptFailure {
    fn into_message(self) -> String {
        match self {
            Self::Spawn(msg) | Self::NoArcpy(msg) | Self::InvalidInput(msg) | Self::Failed(msg) => {
                msg
            }
        }
    }
}

impl ArcpyPortal {
    /// Create a bridge that runs the `python` interpreter
    #[must_use]
    #[inline]
    pub fn new<P: Into<PathBuf>>(python: P) -> Self {
        Self {
            python: python.into(),
            session: None,
        }
    }

    fn run(&self, script: Script, args: &[OsString], password: Option<&str>) -> Result<String, ScriptFailure> {
        debug!("Running arcpy step '{}' with {}", script.name(), self.python.display());

        let mut command = Command::new(&self.python);
        command
            .arg("-c")
            .arg(script.source())
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(password) = password {
            command.env(PASSWORD_ENV, password);
        }

        let output = command.output().map_err(|err| {
            ScriptFailure::Spawn(format!(
                "Failed to start Python interpreter '{}': {err}",
                self.python.display()
            ))
        })?;

        interpret_output(script, &output)
    }

    fn session(&self) -> PortalResult<&Session> {
        self.session.as_ref().ok_or_else(|| {
            PublishError::authentication("Not signed into a portal; sign in before uploading".to_owned())
        })
    }
}

/// Turn a finished child process into its stdout or a classified failure
fn interpret_output(script: Script, output: &Output) -> Result<String, ScriptFailure> {
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    if output.status.success() {
        return Ok(stdout);
    }

    let code = output.status.code();
    let stderr = String::from_utf8_lossy(&output.stderr);
    let detail = if stderr.trim().is_empty() {
        format!(
            "'{}' exited with code {}",
            script.name(),
            code.map_or_else(|| "none".to_owned(), |c| c.to_string())
        )
    } else {
        stderr.trim().to_owned()
    };

    Err(match code {
        Some(EXIT_NO_ARCPY) => ScriptFailure::NoArcpy(detail),
        Some(EXIT_INVALID_INPUT) => ScriptFailure::InvalidInput(detail),
        Some(EXIT_TOOL_FAILED) => ScriptFailure::Failed(detail),
        _ => ScriptFailure::Failed(format!("'{}' crashed: {detail}", script.name())),
    })
}

/// Parse the analysis report the analyze snippet prints
fn parse_analysis(stdout: &str) -> PortalResult<AnalysisReport> {
    serde_json::from_str(stdout.trim()).map_err(|err| {
        PublishError::analysis(format!("Could not read draft analysis output: {err}"))
    })
}

fn path_arg(path: &Path) -> OsString {
    path.as_os_str().to_owned()
}

impl Portal for ArcpyPortal {
    fn sign_in(&mut self, credentials: &Credentials, portal_url: &str) -> PortalResult<()> {
        let args = [OsString::from(credentials.user()), OsString::from(portal_url)];
        self.run(Script::SignIn, &args, Some(credentials.password()))
            .map_err(|failure| {
                PublishError::authentication(format!(
                    "Could not log into ArcGIS Online, check credential env variables! ({})",
                    failure.into_message()
                ))
            })?;

        self.session = Some(Session {
            credentials: credentials.clone(),
            portal_url: portal_url.to_owned(),
        });
        Ok(())
    }

    fn load_map_document(&mut self, path: &Path) -> PortalResult<MapDocument> {
        self.run(Script::LoadMapDocument, &[path_arg(path)], None)
            .map_err(|failure| match failure {
                ScriptFailure::InvalidInput(msg) => PublishError::invalid_input(format!(
                    "Invalid mxd path! '{}': {msg}",
                    path.display()
                )),
                other => PublishError::invalid_input(format!(
                    "Invalid mxd path! '{}' could not be checked: {}",
                    path.display(),
                    other.into_message()
                )),
            })?;
        Ok(MapDocument::new(path))
    }

    fn create_draft(&mut self, request: &DraftRequest<'_>) -> PortalResult<()> {
        let args = [
            path_arg(&request.map.path),
            path_arg(request.draft_path),
            OsString::from(request.service_name),
            OsString::from(request.server_type),
            OsString::from(request.summary.unwrap_or_default()),
            OsString::from(request.tags.unwrap_or_default()),
        ];
        self.run(Script::CreateDraft, &args, None)
            .map(|_| ())
            .map_err(|failure| {
                PublishError::draft(format!(
                    "Failed to create SD draft '{}': {}",
                    request.draft_path.display(),
                    failure.into_message()
                ))
            })
    }

    fn analyze(&mut self, draft: &Path) -> PortalResult<AnalysisReport> {
        let stdout = self
            .run(Script::Analyze, &[path_arg(draft)], None)
            .map_err(|failure| {
                PublishError::analysis(format!(
                    "Failed to analyze '{}': {}",
                    draft.display(),
                    failure.into_message()
                ))
            })?;
        parse_analysis(&stdout)
    }

    fn stage(&mut self, draft: &Path, service_definition: &Path) -> PortalResult<()> {
        self.run(Script::Stage, &[path_arg(draft), path_arg(service_definition)], None)
            .map(|_| ())
            .map_err(|failure| {
                PublishError::staging(format!("Staging failed! {}", failure.into_message()))
            })
    }

    fn upload(&mut self, service_definition: &Path, request: &UploadRequest) -> PortalResult<()> {
        let session = self.session()?;
        let mut args = vec![
            OsString::from(session.credentials.user()),
            OsString::from(&session.portal_url),
            path_arg(service_definition),
            OsString::from(&request.server),
            OsString::from(&request.service_name),
            OsString::from(request.sharing.public_flag()),
            OsString::from(request.sharing.organization_flag()),
        ];
        args.extend(request.groups.iter().map(OsString::from));

        self.run(Script::Upload, &args, Some(session.credentials.password()))
            .map(|_| ())
            .map_err(|failure| {
                PublishError::upload(format!(
                    "Upload of service definition failed! {}",
                    failure.into_message()
                ))
            })
    }
}
