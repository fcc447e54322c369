//! Testing utilities for the Falcon workspace
//!
//! Shared fixtures for controller and dashboard tests.

#![allow(missing_docs)]

use falcon_core::{DocumentType, FalconConfig, InputDocument};
use falcon_pipeline::{
    AudioCue, AudioError, FixedCue, ManualClock, PipelineConfig, PipelineController,
    PipelineEvent, PipelineMode, Project,
};
use std::sync::Arc;
use std::time::Duration;

/// Countdown length used by the fixtures
pub const TEST_STAGE: Duration = Duration::from_secs(10);

/// Length of the fixture audio cue
pub const TEST_CUE: Duration = Duration::from_secs(2);

/// Time that always covers the fixture startup sequence
pub const STARTUP_SPAN: Duration = Duration::from_secs(3);

/// Audio cue that refuses to play, like a browser blocking autoplay
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingCue;

impl AudioCue for FailingCue {
    fn play(&self) -> Result<Duration, AudioError> {
        Err(AudioError::Blocked)
    }
}

pub fn test_pipeline_config(mode: PipelineMode) -> PipelineConfig {
    PipelineConfig::new()
        .with_stage_duration(TEST_STAGE)
        .with_tick_interval(Duration::from_millis(100))
        .with_startup_message_interval(Duration::from_millis(500))
        .with_mode(mode)
}

/// Controller on a manual clock with a 2s audio cue
pub fn controller_with_clock(mode: PipelineMode) -> (PipelineController, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let controller = PipelineController::new(
        Project::new("Ford Falcon", "Legacy Modernization Team"),
        test_pipeline_config(mode),
    )
    .with_clock(clock.clone())
    .with_audio(Arc::new(FixedCue(TEST_CUE)));
    (controller, clock)
}

/// Start the engines and play the whole startup sequence
pub fn start_and_finish_startup(
    controller: &mut PipelineController,
    clock: &ManualClock,
) -> Vec<PipelineEvent> {
    let mut events = controller.start_engines().unwrap();
    clock.advance(STARTUP_SPAN);
    events.extend(controller.tick());
    assert!(controller.engines_started(), "startup did not finish");
    events
}

/// Let the live countdown run out
pub fn run_stage(controller: &mut PipelineController, clock: &ManualClock) -> Vec<PipelineEvent> {
    clock.advance(TEST_STAGE);
    controller.tick()
}

/// Drive an automation-mode pipeline until `stage` is active
pub fn advance_to_stage(controller: &mut PipelineController, clock: &ManualClock, stage: usize) {
    while controller.progress() < stage {
        let before = controller.progress();
        run_stage(controller, clock);
        assert!(controller.progress() > before, "pipeline stalled at {before}");
    }
}

/// Config without random warnings and with a fixed seed
pub fn quiet_config() -> FalconConfig {
    FalconConfig::new()
        .with_pipeline(test_pipeline_config(PipelineMode::Automation))
        .with_warning_odds(0.0)
        .with_seed(7)
}

/// A realistic partial upload: source code and a user manual
pub fn sample_documents() -> Vec<InputDocument> {
    vec![
        InputDocument::new(
            "falcon-cobol-src.zip",
            DocumentType::Codebase,
            "COBOL and JCL sources for the billing batch",
        )
        .with_version("2.3")
        .with_date("2024-03-12"),
        InputDocument::new(
            "operator-guide.pdf",
            DocumentType::UserManual,
            "Operator user manual",
        ),
    ]
}

/// One document of each required type
pub fn full_coverage_documents() -> Vec<InputDocument> {
    [
        DocumentType::Codebase,
        DocumentType::UserManual,
        DocumentType::MeetingRecording,
        DocumentType::Fsa,
    ]
    .into_iter()
    .map(|t| InputDocument::new(format!("{}.bin", t.label()), t, "supplied"))
    .collect()
}
