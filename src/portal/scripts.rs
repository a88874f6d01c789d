//! Python snippets run by the arcpy bridge
//!
//! The snippets target the ArcGIS Desktop interpreter, so they stay within
//! syntax shared by Python 2.7 and 3. Each one reads its inputs from
//! `sys.argv`, writes results as JSON to stdout, and reports failures on
//! stderr with one of the exit codes below.

/// Exit code for a failed geoprocessing tool
pub const EXIT_TOOL_FAILED: i32 = 2;

/// Exit code for an input the tooling rejected
pub const EXIT_INVALID_INPUT: i32 = 3;

/// Exit code when arcpy cannot be imported
pub const EXIT_NO_ARCPY: i32 = 4;

/// Environment variable the password is handed over in
pub const PASSWORD_ENV: &str = "SVCUPDATE_PORTAL_PASSWORD";

const PRELUDE: &str = r#"
import json
import os
import sys


def fail(code, message):
    sys.stderr.write(str(message).strip() + "\n")
    sys.exit(code)


try:
    import arcpy
    import arcpy.mapping
except ImportError as err:
    fail(4, "arcpy is not available in this interpreter: %s" % err)


def sign_in(user, portal):
    password = os.environ.get("SVCUPDATE_PORTAL_PASSWORD", "")
    try:
        arcpy.SignInToPortal_server(user, password, portal)
    except arcpy.ExecuteError as err:
        fail(2, err)
"#;

const SIGN_IN: &str = r#"
sign_in(sys.argv[1], sys.argv[2])
"#;

const LOAD_MAP_DOCUMENT: &str = r#"
try:
    document = arcpy.mapping.MapDocument(sys.argv[1])
except (AssertionError, IOError, ValueError) as err:
    fail(3, err)
del document
"#;

const CREATE_DRAFT: &str = r#"
mxd_path, draft_path, service_name, server_type, summary, tags = sys.argv[1:7]
try:
    document = arcpy.mapping.MapDocument(mxd_path)
except (AssertionError, IOError, ValueError) as err:
    fail(3, err)
try:
    arcpy.mapping.CreateMapSDDraft(
        document,
        draft_path,
        service_name,
        server_type,
        summary=summary or None,
        tags=tags or None,
    )
except (arcpy.ExecuteError, ValueError) as err:
    fail(2, err)
"#;

const ANALYZE: &str = r#"
def issues(group):
    found = []
    for key, layers in group.items():
        message, code = key
        found.append({
            "message": message,
            "code": code,
            "layers": [getattr(layer, "name", str(layer)) for layer in layers],
        })
    return found


try:
    analysis = arcpy.mapping.AnalyzeForSD(sys.argv[1])
except (arcpy.ExecuteError, ValueError) as err:
    fail(2, err)
sys.stdout.write(json.dumps({
    "errors": issues(analysis["errors"]),
    "warnings": issues(analysis["warnings"]),
    "messages": issues(analysis["messages"]),
}))
"#;

const STAGE: &str = r#"
try:
    arcpy.StageService_server(sys.argv[1], sys.argv[2])
except arcpy.ExecuteError as err:
    fail(2, err)
"#;

const UPLOAD: &str = r#"
user, portal, sd_path, server, service_name, public, organization = sys.argv[1:8]
groups = sys.argv[8:]
sign_in(user, portal)
try:
    arcpy.UploadServiceDefinition_server(
        sd_path,
        server,
        service_name,
        "",
        "",
        "",
        "",
        "OVERRIDE_DEFINITION",
        "SHARE_ONLINE",
        public,
        organization,
        groups,
    )
except arcpy.ExecuteError as err:
    fail(2, err)
"#;

/// One bridge operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Script {
    SignIn,
    LoadMapDocument,
    CreateDraft,
    Analyze,
    Stage,
    Upload,
}

impl Script {
    /// Full program text for the operation
    #[must_use]
    pub fn source(self) -> String {
        let body = match self {
            Self::SignIn => SIGN_IN,
            Self::LoadMapDocument => LOAD_MAP_DOCUMENT,
            Self::CreateDraft => CREATE_DRAFT,
            Self::Analyze => ANALYZE,
            Self::Stage => STAGE,
            Self::Upload => UPLOAD,
        };
        format!("{PRELUDE}{body}")
    }

    /// Short name used in log lines
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SignIn => "sign-in",
            Self::LoadMapDocument => "load map document",
            Self::CreateDraft => "create draft",
            Self::Analyze => "analyze draft",
            Self::Stage => "stage service",
            Self::Upload => "upload service definition",
        }
    }
}
