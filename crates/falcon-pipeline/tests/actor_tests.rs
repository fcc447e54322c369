use falcon_pipeline::{
    FixedCue, PipelineActor, PipelineController, PipelineError, PipelineEvent, PipelineMode,
    Project, SessionStatus, TokioClock, STAGE_COUNT,
};
use falcon_test_utils::{test_pipeline_config, TEST_CUE};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::timeout;

// Generous upper bound in virtual time; paused tests auto-advance.
const RUN_LIMIT: Duration = Duration::from_secs(600);

fn actor_controller(mode: PipelineMode) -> PipelineController {
    PipelineController::new(Project::new("Ford Falcon", "ops"), test_pipeline_config(mode))
        .with_clock(Arc::new(TokioClock::new()))
        .with_audio(Arc::new(FixedCue(TEST_CUE)))
}

async fn wait_for(
    events: &mut broadcast::Receiver<PipelineEvent>,
    wanted: &PipelineEvent,
) -> Vec<PipelineEvent> {
    let mut seen = Vec::new();
    timeout(RUN_LIMIT, async {
        loop {
            match events.recv().await {
                Ok(event) => {
                    let done = &event == wanted;
                    seen.push(event);
                    if done {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(_)) => continue,
                Err(broadcast::error::RecvError::Closed) => panic!("actor stopped early"),
            }
        }
    })
    .await
    .expect("event not observed in time");
    seen
}

#[tokio::test(start_paused = true)]
async fn test_actor_runs_pipeline_to_completion() {
    let (handle, join) = PipelineActor::spawn(actor_controller(PipelineMode::Automation)).unwrap();
    let mut events = handle.subscribe();

    handle.start_engines().await.unwrap();
    let seen = wait_for(&mut events, &PipelineEvent::PipelineFinished).await;

    assert!(seen.contains(&PipelineEvent::EnginesStarted));
    let completed = seen
        .iter()
        .filter(|e| matches!(e, PipelineEvent::StageCompleted { .. }))
        .count();
    assert_eq!(completed, STAGE_COUNT - 2);

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.project.progress(), STAGE_COUNT);
    assert!(snapshot.engines_started);

    handle.shutdown().await.unwrap();
    let controller = join.await.unwrap();
    assert_eq!(controller.progress(), STAGE_COUNT);
}

#[tokio::test(start_paused = true)]
async fn test_actor_rejects_trigger_before_start() {
    let (handle, _join) = PipelineActor::spawn(actor_controller(PipelineMode::Manual)).unwrap();
    assert_eq!(
        handle.trigger_stage().await,
        Err(PipelineError::EnginesNotStarted)
    );
}

#[tokio::test(start_paused = true)]
async fn test_actor_manual_trigger() {
    let (handle, _join) = PipelineActor::spawn(actor_controller(PipelineMode::Manual)).unwrap();
    let mut events = handle.subscribe();

    handle.start_engines().await.unwrap();
    wait_for(&mut events, &PipelineEvent::StageStarted { stage: 2 }).await;

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(handle.snapshot().await.unwrap().project.progress(), 2);

    handle.trigger_stage().await.unwrap();
    wait_for(&mut events, &PipelineEvent::StageStarted { stage: 3 }).await;
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.project.progress(), 3);
    assert_eq!(snapshot.current_stage_progress, 0);
}

#[tokio::test(start_paused = true)]
async fn test_actor_restart_archives_session() {
    let (handle, _join) = PipelineActor::spawn(actor_controller(PipelineMode::Automation)).unwrap();
    let mut events = handle.subscribe();

    handle.start_engines().await.unwrap();
    wait_for(&mut events, &PipelineEvent::StageStarted { stage: 4 }).await;

    let restart = handle.start_engines().await.unwrap();
    assert_eq!(
        restart[0],
        PipelineEvent::SessionArchived {
            session: "SES-0001".to_string(),
            final_stage: 4,
        }
    );

    let sessions = handle.sessions().await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].status, SessionStatus::Incomplete);
    assert_eq!(handle.snapshot().await.unwrap().project.progress(), 1);

    wait_for(&mut events, &PipelineEvent::EnginesStarted).await;
    assert_eq!(handle.snapshot().await.unwrap().project.progress(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_actor_mode_and_notifications() {
    let (handle, _join) = PipelineActor::spawn(actor_controller(PipelineMode::Automation)).unwrap();
    let mut events = handle.subscribe();

    assert_eq!(
        handle.set_mode(PipelineMode::Manual).await.unwrap(),
        Some(PipelineEvent::ModeChanged {
            mode: PipelineMode::Manual
        })
    );
    assert_eq!(handle.set_mode(PipelineMode::Manual).await.unwrap(), None);

    handle.start_engines().await.unwrap();
    wait_for(&mut events, &PipelineEvent::EnginesStarted).await;

    let notifications = handle.notifications().await.unwrap();
    assert_eq!(notifications[0].title, "AI Engines Started");
    assert_eq!(handle.snapshot().await.unwrap().unread_notifications, 1);

    handle.mark_all_read().await.unwrap();
    assert_eq!(handle.snapshot().await.unwrap().unread_notifications, 0);
}

#[tokio::test(start_paused = true)]
async fn test_actor_stops_when_handles_drop() {
    let (handle, join) = PipelineActor::spawn(actor_controller(PipelineMode::Automation)).unwrap();
    drop(handle);
    let controller = timeout(RUN_LIMIT, join).await.unwrap().unwrap();
    assert!(!controller.engines_started());

    // a fresh handle to a stopped actor reports closure
    let (handle, join) = PipelineActor::spawn(actor_controller(PipelineMode::Automation)).unwrap();
    handle.shutdown().await.unwrap();
    join.await.unwrap();
    assert!(matches!(
        handle.snapshot().await,
        Err(PipelineError::ActorClosed)
    ));
}

#[tokio::test(start_paused = true)]
async fn test_actor_rejects_zero_tick_interval() {
    let config = test_pipeline_config(PipelineMode::Automation).with_tick_interval(Duration::ZERO);
    let controller = PipelineController::new(Project::new("Ford Falcon", "ops"), config)
        .with_clock(Arc::new(TokioClock::new()));

    assert!(matches!(
        PipelineActor::spawn(controller),
        Err(PipelineError::InvalidConfig(_))
    ));
}
