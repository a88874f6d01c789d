//! Unit tests for the publish pipeline

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "This is a test module")]
mod tests {
    use chrono::Local;
    use clap::Parser as _;
    use std::path::PathBuf;
    use svcupdate::cli::Args;
    use svcupdate::config::PublishConfig;
    use svcupdate::config::credentials::{PASSWORD_ENV, USER_ENV};
    use svcupdate::error::PublishError;
    use svcupdate::operations::{PublishOperation, PublishState};
    use svcupdate::portal::mock::{MockPortal, PortalCall, PortalStep};
    use svcupdate::portal::{AnalysisIssue, AnalysisReport, Sharing};
    use svcupdate::system::mock::MockSystem;

    const MAP_DOCUMENT: &str = "/work/parcels.mxd";

    fn mock_system() -> MockSystem {
        MockSystem::new()
            .with_current_dir("/work")
            .unwrap()
            .with_env(USER_ENV, "gis_admin")
            .unwrap()
            .with_env(PASSWORD_ENV, "hunter2")
            .unwrap()
            .with_file(MAP_DOCUMENT, b"map document")
            .unwrap()
    }

    fn publish_config(system: &MockSystem, map_document: &str, extra: &[&str]) -> PublishConfig {
        let mut argv = vec!["svcupdate", "parcels", map_document];
        argv.extend_from_slice(extra);
        let args = Args::try_parse_from(argv).unwrap();
        PublishConfig::from_args(&args, system).unwrap()
    }

    fn parse_error(err: &anyhow::Error) -> &PublishError {
        err.downcast_ref::<PublishError>().unwrap()
    }

    #[test]
    fn successful_run_visits_every_state() {
        let system = mock_system();
        let config = publish_config(&system, MAP_DOCUMENT, &[]);
        let mut portal = MockPortal::new(system.clone());

        let mut operation = PublishOperation::new(&config, &system, &mut portal);
        let report = operation.execute().unwrap();
        let transitions = operation.transitions().to_vec();

        assert_eq!(
            transitions,
            vec![
                PublishState::Start,
                PublishState::SignedIn,
                PublishState::MapLoaded,
                PublishState::DraftCreated,
                PublishState::DraftRewritten,
                PublishState::DraftAnalyzed,
                PublishState::Staged,
                PublishState::Uploaded,
                PublishState::Done,
            ]
        );
        assert_eq!(report.rewrite.retyped, 1);
        assert_eq!(
            portal.steps(),
            vec![
                PortalStep::SignIn,
                PortalStep::LoadMapDocument,
                PortalStep::CreateDraft,
                PortalStep::Analyze,
                PortalStep::Stage,
                PortalStep::Upload,
            ]
        );
    }

    #[test]
    fn analyzed_draft_is_the_feature_service_draft() {
        let system = mock_system();
        let config = publish_config(&system, MAP_DOCUMENT, &[]);
        let mut portal = MockPortal::new(system.clone());

        PublishOperation::new(&config, &system, &mut portal)
            .execute()
            .unwrap();

        let analyzed = portal.analyzed_drafts();
        assert_eq!(analyzed.len(), 1);
        assert!(analyzed[0].contains("<Type>esriServiceDefinitionType_Replacement</Type>"));
        assert!(analyzed[0].contains("<State>esriSDState_Published</State>"));
        assert!(analyzed[0].contains("<TypeName>FeatureServer</TypeName>"));
        assert!(!analyzed[0].contains("<TypeName>MapServer</TypeName>"));

        let analyze_call = portal
            .calls()
            .iter()
            .find_map(|call| match call {
                PortalCall::Analyze { draft_path } => Some(draft_path.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(analyze_call, PathBuf::from("/work/updatedDraft.sddraft"));
    }

    #[test]
    fn successful_run_removes_artifacts() {
        let system = mock_system();
        let config = publish_config(&system, MAP_DOCUMENT, &[]);
        let mut portal = MockPortal::new(system.clone());

        PublishOperation::new(&config, &system, &mut portal)
            .execute()
            .unwrap();

        assert_eq!(system.file_paths().unwrap(), vec![PathBuf::from(MAP_DOCUMENT)]);
    }

    #[test]
    fn upload_uses_sharing_options() {
        let system = mock_system();
        let config = publish_config(
            &system,
            MAP_DOCUMENT,
            &["--sharing", "public", "--group", "Planning"],
        );
        let mut portal = MockPortal::new(system.clone());

        PublishOperation::new(&config, &system, &mut portal)
            .execute()
            .unwrap();

        let Some(PortalCall::Upload {
            service_definition,
            request,
        }) = portal.calls().last()
        else {
            panic!("last call should be the upload");
        };
        assert_eq!(service_definition, &PathBuf::from("/work/parcels.sd"));
        assert_eq!(request.server, "My Hosted Services");
        assert_eq!(request.service_name, "parcels");
        assert_eq!(request.sharing, Sharing::Public);
        assert_eq!(request.groups, vec!["Planning".to_owned()]);
    }

    #[test]
    fn rejected_credentials_stop_after_sign_in() {
        let system = mock_system();
        let config = publish_config(&system, MAP_DOCUMENT, &[]);
        let mut portal = MockPortal::new(system.clone()).with_account("gis_admin", "other");

        let mut operation = PublishOperation::new(&config, &system, &mut portal);
        let err = operation.execute().unwrap_err();
        let transitions = operation.transitions().to_vec();

        assert!(matches!(parse_error(&err), PublishError::Authentication { .. }));
        assert_eq!(
            transitions,
            vec![PublishState::Start, PublishState::Failed, PublishState::Done]
        );
        assert_eq!(portal.steps(), vec![PortalStep::SignIn]);
    }

    #[test]
    fn invalid_map_document_stops_the_pipeline() {
        let system = mock_system();
        let config = publish_config(&system, "/work/missing.mxd", &[]);
        let mut portal = MockPortal::new(system.clone());

        let mut operation = PublishOperation::new(&config, &system, &mut portal);
        let err = operation.execute().unwrap_err();
        let transitions = operation.transitions().to_vec();

        assert!(matches!(parse_error(&err), PublishError::InvalidInput { .. }));
        assert!(err.to_string().contains("Invalid mxd path"));
        assert_eq!(
            transitions,
            vec![
                PublishState::Start,
                PublishState::SignedIn,
                PublishState::Failed,
                PublishState::Done,
            ]
        );
        assert_eq!(
            portal.steps(),
            vec![PortalStep::SignIn, PortalStep::LoadMapDocument]
        );
        assert_eq!(system.file_paths().unwrap(), vec![PathBuf::from(MAP_DOCUMENT)]);
    }

    #[test]
    fn non_map_document_is_invalid_input() {
        let system = mock_system().with_file("/work/notes.txt", b"notes").unwrap();
        let config = publish_config(&system, "/work/notes.txt", &[]);
        let mut portal = MockPortal::new(system.clone());

        let err = PublishOperation::new(&config, &system, &mut portal)
            .execute()
            .unwrap_err();

        assert!(matches!(parse_error(&err), PublishError::InvalidInput { .. }));
    }

    #[test]
    fn analysis_errors_skip_staging_and_still_clean_up() {
        let system = mock_system();
        let config = publish_config(&system, MAP_DOCUMENT, &[]);
        let report = AnalysisReport::with_errors(vec![AnalysisIssue::new(
            "Layer's data source is not supported",
            24011,
            vec!["Parcels".to_owned()],
        )]);
        let mut portal = MockPortal::new(system.clone()).with_analysis(report);

        let mut operation = PublishOperation::new(&config, &system, &mut portal);
        let err = operation.execute().unwrap_err();
        let transitions = operation.transitions().to_vec();

        assert!(matches!(parse_error(&err), PublishError::Analysis { .. }));
        assert!(err.to_string().contains("Following errors detected"));
        assert!(err.to_string().contains("24011"));
        assert_eq!(
            transitions[transitions.len() - 3..],
            [
                PublishState::DraftAnalyzed,
                PublishState::AnalysisFailed,
                PublishState::Done,
            ]
        );
        assert!(!portal.steps().contains(&PortalStep::Stage));
        assert!(!portal.steps().contains(&PortalStep::Upload));
        assert_eq!(system.file_paths().unwrap(), vec![PathBuf::from(MAP_DOCUMENT)]);
    }

    #[test]
    fn analysis_warnings_do_not_block() {
        let system = mock_system();
        let config = publish_config(&system, MAP_DOCUMENT, &[]);
        let mut report = AnalysisReport::default();
        report.warnings.push(AnalysisIssue::new(
            "Layer draws at all scale ranges",
            10045,
            vec!["Parcels".to_owned()],
        ));
        let mut portal = MockPortal::new(system.clone()).with_analysis(report);

        let published = PublishOperation::new(&config, &system, &mut portal)
            .execute()
            .unwrap();

        assert_eq!(published.analysis.warnings.len(), 1);
        assert!(portal.steps().contains(&PortalStep::Upload));
    }

    #[test]
    fn staging_failure_cleans_up_drafts() {
        let system = mock_system();
        let config = publish_config(&system, MAP_DOCUMENT, &[]);
        let mut portal = MockPortal::new(system.clone()).failing_at(PortalStep::Stage);

        let mut operation = PublishOperation::new(&config, &system, &mut portal);
        let err = operation.execute().unwrap_err();
        let transitions = operation.transitions().to_vec();

        assert!(matches!(parse_error(&err), PublishError::Staging { .. }));
        assert_eq!(
            transitions[transitions.len() - 2..],
            [PublishState::Failed, PublishState::Done]
        );
        assert!(!portal.steps().contains(&PortalStep::Upload));
        assert_eq!(system.file_paths().unwrap(), vec![PathBuf::from(MAP_DOCUMENT)]);
    }

    #[test]
    fn upload_failure_cleans_up_service_definition() {
        let system = mock_system();
        let config = publish_config(&system, MAP_DOCUMENT, &[]);
        let mut portal = MockPortal::new(system.clone()).failing_at(PortalStep::Upload);

        let err = PublishOperation::new(&config, &system, &mut portal)
            .execute()
            .unwrap_err();

        assert!(matches!(parse_error(&err), PublishError::Upload { .. }));
        assert_eq!(system.file_paths().unwrap(), vec![PathBuf::from(MAP_DOCUMENT)]);
    }

    #[test]
    fn keep_temp_leaves_artifacts() {
        let system = mock_system();
        let config = publish_config(&system, MAP_DOCUMENT, &["--keep-temp"]);
        let mut portal = MockPortal::new(system.clone()).failing_at(PortalStep::Upload);

        PublishOperation::new(&config, &system, &mut portal)
            .execute()
            .unwrap_err();

        assert_eq!(
            system.file_paths().unwrap(),
            vec![
                PathBuf::from("/work/parcels.mxd"),
                PathBuf::from("/work/parcels.sd"),
                PathBuf::from("/work/tempdraft.sddraft"),
                PathBuf::from("/work/updatedDraft.sddraft"),
            ]
        );
    }

    #[test]
    fn malformed_generated_draft_fails_before_analysis() {
        let system = mock_system();
        let config = publish_config(&system, MAP_DOCUMENT, &[]);
        let mut portal =
            MockPortal::new(system.clone()).with_draft("<SVCManifest><Type>broken</SVCManifest>");

        let err = PublishOperation::new(&config, &system, &mut portal)
            .execute()
            .unwrap_err();

        assert!(matches!(parse_error(&err), PublishError::Draft { .. }));
        assert!(!portal.steps().contains(&PortalStep::Analyze));
        assert_eq!(system.file_paths().unwrap(), vec![PathBuf::from(MAP_DOCUMENT)]);
    }

    #[test]
    fn draft_request_carries_work_dir_and_service_name() {
        let system = mock_system();
        let config = publish_config(&system, MAP_DOCUMENT, &["--work-dir", "/staging"]);
        let system = system.with_dir("/staging").unwrap();
        let mut portal = MockPortal::new(system.clone());

        PublishOperation::new(&config, &system, &mut portal)
            .execute()
            .unwrap();

        assert!(portal.calls().contains(&PortalCall::CreateDraft {
            draft_path: PathBuf::from("/staging/tempdraft.sddraft"),
            service_name: "parcels".to_owned(),
        }));
    }

    #[test]
    fn relative_paths_reach_the_portal_absolute() {
        let system = mock_system().with_dir("/work/out").unwrap();
        let config = publish_config(&system, "parcels.mxd", &["--work-dir", "out"]);
        let mut portal = MockPortal::new(system.clone());

        PublishOperation::new(&config, &system, &mut portal)
            .execute()
            .unwrap();

        assert!(portal.calls().contains(&PortalCall::LoadMapDocument {
            path: PathBuf::from(MAP_DOCUMENT),
        }));
        assert!(portal.calls().contains(&PortalCall::CreateDraft {
            draft_path: PathBuf::from("/work/out/tempdraft.sddraft"),
            service_name: "parcels".to_owned(),
        }));
        assert_eq!(system.file_paths().unwrap(), vec![PathBuf::from(MAP_DOCUMENT)]);
    }

    #[test]
    fn publish_reports_outcome_after_timing() {
        let system = mock_system();
        let config = publish_config(&system, MAP_DOCUMENT, &[]);
        let mut portal = MockPortal::new(system.clone()).failing_at(PortalStep::Analyze);

        let err = svcupdate::publish(&config, &system, &mut portal, Local::now()).unwrap_err();

        assert!(matches!(parse_error(&err), PublishError::Analysis { .. }));
    }
}
