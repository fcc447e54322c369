use falcon_core::{
    Dashboard, DocumentType, FalconConfig, FalconError, InputDocument, StartRequest, TrafficLight,
};
use falcon_pipeline::{
    FixedCue, ManualClock, PipelineError, PipelineEvent, PipelineMode, StageStatus,
};
use falcon_test_utils::{
    full_coverage_documents, quiet_config, sample_documents, STARTUP_SPAN, TEST_CUE, TEST_STAGE,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn dashboard(config: FalconConfig) -> (Dashboard, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let dash = Dashboard::new(config)
        .with_clock(clock.clone())
        .with_audio(Arc::new(FixedCue(TEST_CUE)));
    (dash, clock)
}

#[test]
fn test_partial_upload_warns_then_runs() {
    let (mut dash, clock) = dashboard(quiet_config());
    for doc in sample_documents() {
        dash.add_document(doc);
    }

    let report = dash.coverage();
    assert_eq!(report.coverage_percentage(), 82);
    assert_eq!(report.traffic_light(), TrafficLight::Green);
    assert_eq!(
        report.missing,
        vec!["Functional specification (FSA)", "SME meeting recordings"]
    );

    let StartRequest::NeedsAcknowledgment { missing } = dash.request_start().unwrap() else {
        panic!("missing documents should need acknowledgment");
    };
    assert_eq!(missing, report.missing);
    assert!(!dash.pipeline().is_starting());

    dash.start_anyway().unwrap();
    clock.advance(STARTUP_SPAN);
    let events = dash.tick();
    assert!(events.contains(&PipelineEvent::EnginesStarted));

    clock.advance(TEST_STAGE);
    dash.tick();
    let snapshot = dash.snapshot();
    assert_eq!(snapshot.project.progress(), 3);
    assert_eq!(snapshot.stages[1].status, StageStatus::Completed);
    assert_eq!(snapshot.stages[2].status, StageStatus::Active);
    assert_eq!(snapshot.stages[3].status, StageStatus::Pending);
}

#[test]
fn test_full_coverage_with_certain_prompt() {
    let config = quiet_config().with_warning_odds(1.0);
    let (dash, _clock) = dashboard(config);
    let mut dash = dash.with_documents(full_coverage_documents());

    assert!(dash.coverage().is_complete());
    assert_eq!(
        dash.request_start().unwrap(),
        StartRequest::NeedsAcknowledgment {
            missing: Vec::new()
        }
    );
}

#[test]
fn test_locked_stages_before_start() {
    let (dash, _clock) = dashboard(quiet_config());
    let snapshot = dash.snapshot();
    assert_eq!(snapshot.stages[0].status, StageStatus::Active);
    assert!(snapshot.stages[1..]
        .iter()
        .all(|s| s.status == StageStatus::Locked));
}

#[test]
fn test_manual_dashboard_trigger() {
    let (mut dash, clock) = dashboard(quiet_config().with_mode(PipelineMode::Manual));
    dash.add_document(InputDocument::new("notes.txt", DocumentType::Other, "walkthrough"));

    assert!(matches!(
        dash.trigger_stage(),
        Err(FalconError::Pipeline(PipelineError::EnginesNotStarted))
    ));

    dash.start_anyway().unwrap();
    assert!(matches!(
        dash.request_start(),
        Err(FalconError::Pipeline(PipelineError::StartupInProgress))
    ));
    clock.advance(STARTUP_SPAN);
    dash.tick();

    dash.trigger_stage().unwrap();
    clock.advance(TEST_STAGE);
    dash.tick();
    assert_eq!(dash.pipeline().progress(), 3);

    assert_eq!(dash.toggle_mode(), PipelineMode::Automation);
    dash.trigger_stage().unwrap();
    clock.advance(TEST_STAGE);
    dash.tick();
    assert_eq!(dash.pipeline().progress(), 4);
    assert!(dash.pipeline().timer().is_running());
}

#[test]
fn test_notifications_can_be_marked_read() {
    let (mut dash, clock) = dashboard(quiet_config());
    dash.start_anyway().unwrap();
    clock.advance(STARTUP_SPAN);
    dash.tick();
    clock.advance(TEST_STAGE);
    dash.tick();

    let unread = dash.pipeline().notifications().unread_count();
    assert_eq!(unread, 3);

    let latest = dash.pipeline().notifications().latest().unwrap().id;
    assert!(dash.pipeline_mut().notifications_mut().mark_read(latest));
    assert_eq!(dash.pipeline().notifications().unread_count(), 2);
}

#[test]
fn test_open_and_question_document() {
    let (mut dash, _clock) = dashboard(quiet_config());
    for doc in sample_documents() {
        dash.add_document(doc);
    }

    let mut editor = dash
        .open_document("operator-guide.pdf", "Chapter 1: Nightly batch")
        .unwrap();
    let answer = editor.ask("What are the inputs and outputs?").unwrap();
    assert!(answer.contains("CUSTOMER-MASTER"));

    let chat = dash.ask("What database tables does the system use?").unwrap();
    assert!(chat.contains("TRANSACTION-HISTORY"));
    assert_eq!(dash.chat().messages().len(), 2);
}

#[test]
fn test_archived_runs_stack_on_mock_history() {
    let (mut dash, clock) = dashboard(quiet_config().with_mock_sessions(3));
    assert_eq!(dash.pipeline().sessions().len(), 3);

    dash.start_anyway().unwrap();
    clock.advance(STARTUP_SPAN);
    dash.tick();
    clock.advance(TEST_STAGE);
    dash.tick();
    dash.start_anyway().unwrap();

    let sessions = dash.pipeline().sessions().to_vec();
    let ids: Vec<u64> = sessions.iter().map(|s| s.id.0).collect();
    assert_eq!(ids, vec![4, 3, 2, 1]);
    assert_eq!(sessions[0].final_stage, 3);
    for pair in sessions.windows(2) {
        assert!(pair[0].start_time > pair[1].start_time);
        assert!(pair[1].end_time <= pair[0].start_time);
    }
}

#[test]
fn test_mock_history_follows_seed() {
    let history = |seed| {
        let (dash, _clock) = dashboard(quiet_config().with_seed(seed));
        dash.pipeline().sessions().to_vec()
    };
    assert_eq!(history(11), history(11));
    assert_eq!(history(11).len(), 5);
}
