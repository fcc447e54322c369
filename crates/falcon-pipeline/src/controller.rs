//! Pipeline controller
//!
//! The single writer of pipeline state. Every transition goes through a
//! `&mut self` method:
//! - Start engines (archive previous run, play startup sequence)
//! - Tick (advance startup and the stage countdown)
//! - Manually trigger the active stage's countdown
//! - Switch between automation and manual mode
//!
//! The controller owns exactly one [`StageTimer`], so at most one countdown
//! can ever be live.

use crate::catalog::{self, STAGE_COUNT};
use crate::clock::{Clock, SystemClock};
use crate::error::PipelineError;
use crate::notification::{NotificationCenter, NotificationKind};
use crate::session::SessionHistory;
use crate::startup::{AudioCue, NoAudio, StartupSequence};
use crate::status::{self, StageStatus};
use crate::timer::{StageTimer, TimerState};
use crate::types::{
    PipelineConfig, PipelineEvent, PipelineMode, PipelineSnapshot, Project, StageView,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Owner of the project's pipeline state
#[derive(Debug)]
pub struct PipelineController {
    config: PipelineConfig,
    clock: Arc<dyn Clock>,
    audio: Arc<dyn AudioCue>,
    project: Project,
    engines_started: bool,
    mode: PipelineMode,
    timer: StageTimer,
    startup: Option<StartupSequence>,
    run_started_at: Option<DateTime<Utc>>,
    notifications: NotificationCenter,
    sessions: SessionHistory,
}

impl PipelineController {
    /// Create a controller on the system clock with no audio output
    #[must_use]
    pub fn new(project: Project, config: PipelineConfig) -> Self {
        Self {
            timer: StageTimer::new(config.stage_duration()),
            mode: config.default_mode,
            config,
            clock: Arc::new(SystemClock::new()),
            audio: Arc::new(NoAudio),
            project,
            engines_started: false,
            startup: None,
            run_started_at: None,
            notifications: NotificationCenter::new(),
            sessions: SessionHistory::new(),
        }
    }

    /// With time source
    #[inline]
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// With startup audio cue
    #[inline]
    #[must_use]
    pub fn with_audio(mut self, audio: Arc<dyn AudioCue>) -> Self {
        self.audio = audio;
        self
    }

    /// With pre-existing session history
    #[inline]
    #[must_use]
    pub fn with_sessions(mut self, sessions: SessionHistory) -> Self {
        self.sessions = sessions;
        self
    }

    /// Start (or restart) the engines.
    ///
    /// Clears any live countdown, archives the running session, resets
    /// progress to stage 1 and begins the startup sequence. The engines are
    /// marked started once [`tick`](Self::tick) observes the end of the
    /// sequence.
    ///
    /// # Errors
    /// - `PipelineError::StartupInProgress` if a startup sequence is playing
    pub fn start_engines(&mut self) -> Result<Vec<PipelineEvent>, PipelineError> {
        if self.startup.is_some() {
            return Err(PipelineError::StartupInProgress);
        }

        let now = self.clock.now_mono();
        let now_utc = self.clock.now_utc();
        let mut events = Vec::new();

        self.timer.clear();
        if self.engines_started {
            events.push(self.archive_run(now_utc));
        }

        self.project.reset();
        self.engines_started = false;
        self.run_started_at = Some(now_utc);
        self.startup = Some(StartupSequence::begin(
            self.audio.as_ref(),
            self.config.startup_message_interval(),
            self.config.audio_fallback(),
            now,
        ));
        tracing::info!(project = %self.project.name, "starting engines");

        events.extend(self.advance_startup(now));
        Ok(events)
    }

    /// Advance startup and the live countdown to the clock's current time
    pub fn tick(&mut self) -> Vec<PipelineEvent> {
        let now = self.clock.now_mono();
        let mut events = self.advance_startup(now);

        if let TimerState::Completed { stage } = self.timer.advance(now) {
            events.extend(self.complete_stage(stage, now));
        }
        events
    }

    /// Start the countdown for the active stage.
    ///
    /// # Errors
    /// - `PipelineError::EnginesNotStarted` before startup has finished
    /// - `PipelineError::TimerAlreadyRunning` if a countdown is live
    /// - `PipelineError::TerminalStage` at the last stage
    pub fn trigger_stage(&mut self) -> Result<Vec<PipelineEvent>, PipelineError> {
        if !self.engines_started {
            return Err(PipelineError::EnginesNotStarted);
        }
        if let Some(stage) = self.timer.stage() {
            if self.timer.is_running() {
                return Err(PipelineError::TimerAlreadyRunning { stage });
            }
        }
        let stage = self.project.progress();
        if catalog::is_terminal(stage) {
            return Err(PipelineError::TerminalStage { stage });
        }

        let now = self.clock.now_mono();
        Ok(vec![self.start_timer(stage, now)])
    }

    /// Switch mode. A running countdown is left untouched; the mode only
    /// decides whether the next stage starts on its own.
    pub fn set_mode(&mut self, mode: PipelineMode) -> Option<PipelineEvent> {
        if self.mode == mode {
            return None;
        }
        tracing::info!(?mode, "pipeline mode changed");
        self.mode = mode;
        Some(PipelineEvent::ModeChanged { mode })
    }

    /// Flip between automation and manual mode
    pub fn toggle_mode(&mut self) -> PipelineEvent {
        let mode = self.mode.toggled();
        self.mode = mode;
        tracing::info!(?mode, "pipeline mode changed");
        PipelineEvent::ModeChanged { mode }
    }

    /// Status of the stage at 1-based `index`
    #[must_use]
    pub fn stage_status(&self, index: usize) -> StageStatus {
        status::stage_status(index, self.project.progress(), self.engines_started)
    }

    /// Countdown percentage of the active stage
    #[inline]
    #[must_use]
    pub fn current_stage_progress(&self) -> u8 {
        self.timer.percent()
    }

    #[inline]
    #[must_use]
    pub fn project(&self) -> &Project {
        &self.project
    }

    #[inline]
    #[must_use]
    pub fn progress(&self) -> usize {
        self.project.progress()
    }

    #[inline]
    #[must_use]
    pub fn engines_started(&self) -> bool {
        self.engines_started
    }

    /// Whether the startup sequence is playing
    #[inline]
    #[must_use]
    pub fn is_starting(&self) -> bool {
        self.startup.is_some()
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> PipelineMode {
        self.mode
    }

    #[inline]
    #[must_use]
    pub fn timer(&self) -> &StageTimer {
        &self.timer
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    #[inline]
    #[must_use]
    pub fn notifications(&self) -> &NotificationCenter {
        &self.notifications
    }

    /// Mutable access for read-flag updates
    #[inline]
    pub fn notifications_mut(&mut self) -> &mut NotificationCenter {
        &mut self.notifications
    }

    #[inline]
    #[must_use]
    pub fn sessions(&self) -> &SessionHistory {
        &self.sessions
    }

    /// Time left on the live countdown
    #[must_use]
    pub fn time_remaining(&self) -> Option<Duration> {
        match self.timer.state() {
            TimerState::Running { elapsed, .. } => {
                Some(self.timer.duration().saturating_sub(elapsed))
            }
            _ => None,
        }
    }

    /// Serializable view of the pipeline
    #[must_use]
    pub fn snapshot(&self) -> PipelineSnapshot {
        let stages = catalog::stages()
            .iter()
            .enumerate()
            .map(|(i, s)| StageView {
                index: i + 1,
                key: s.key,
                name: s.name,
                status: self.stage_status(i + 1),
            })
            .collect();

        PipelineSnapshot {
            project: self.project.clone(),
            engines_started: self.engines_started,
            starting: self.is_starting(),
            mode: self.mode,
            current_stage_progress: self.current_stage_progress(),
            timer: self.timer.state(),
            stages,
            unread_notifications: self.notifications.unread_count(),
            archived_sessions: self.sessions.len(),
        }
    }

    fn advance_startup(&mut self, now: Duration) -> Vec<PipelineEvent> {
        let Some(sequence) = self.startup.as_mut() else {
            return Vec::new();
        };

        let step = sequence.advance(now);
        let mut events: Vec<_> = step
            .messages
            .into_iter()
            .map(|text| PipelineEvent::StartupMessage {
                text: text.to_string(),
            })
            .collect();

        if step.finished {
            self.startup = None;
            events.extend(self.finish_startup(now));
        }
        events
    }

    fn finish_startup(&mut self, now: Duration) -> Vec<PipelineEvent> {
        let before = self.statuses();
        self.engines_started = true;
        self.project.advance();
        self.check_progression(&before);
        let stage = self.project.progress();
        tracing::info!(project = %self.project.name, stage, "engines started");

        self.notify(
            NotificationKind::Success,
            "AI Engines Started",
            format!(
                "Modernization pipeline is running for {}; now at {}",
                self.project.name,
                catalog::stage_name(stage)
            ),
        );

        let mut events = vec![
            PipelineEvent::EnginesStarted,
            PipelineEvent::StageStarted { stage },
        ];
        if self.mode == PipelineMode::Automation && !catalog::is_terminal(stage) {
            events.push(self.start_timer(stage, now));
        }
        events
    }

    fn complete_stage(&mut self, stage: usize, now: Duration) -> Vec<PipelineEvent> {
        debug_assert_eq!(stage, self.project.progress());
        self.timer.clear();

        let name = catalog::stage_name(stage);
        tracing::info!(stage, %name, "stage completed");
        self.notify(
            NotificationKind::Success,
            "Stage Completed",
            format!("{name} completed for {}", self.project.name),
        );
        let mut events = vec![PipelineEvent::StageCompleted { stage }];

        let before = self.statuses();
        let advanced = self.project.advance();
        self.check_progression(&before);
        if !advanced {
            return events;
        }
        let next = self.project.progress();
        self.notify(
            NotificationKind::Info,
            "Stage Started",
            format!("{} started for {}", catalog::stage_name(next), self.project.name),
        );
        events.push(PipelineEvent::StageStarted { stage: next });

        if catalog::is_terminal(next) {
            tracing::info!(project = %self.project.name, "pipeline reached final stage");
            events.push(PipelineEvent::PipelineFinished);
        } else if self.mode == PipelineMode::Automation {
            events.push(self.start_timer(next, now));
        }
        events
    }

    fn statuses(&self) -> Vec<StageStatus> {
        (1..=STAGE_COUNT).map(|i| self.stage_status(i)).collect()
    }

    // Within a run, stage statuses only move forward.
    fn check_progression(&self, before: &[StageStatus]) {
        for (i, from) in before.iter().enumerate() {
            let result = status::validate_transition(*from, self.stage_status(i + 1));
            debug_assert!(result.is_ok(), "stage {}: {result:?}", i + 1);
            if let Err(e) = result {
                tracing::error!(stage = i + 1, error = %e, "stage status moved backwards");
            }
        }
    }

    fn start_timer(&mut self, stage: usize, now: Duration) -> PipelineEvent {
        debug_assert!(stage <= STAGE_COUNT);
        self.timer.start(stage, now);
        tracing::debug!(stage, duration = ?self.timer.duration(), "stage timer started");
        PipelineEvent::StageTimerStarted { stage }
    }

    fn archive_run(&mut self, now_utc: DateTime<Utc>) -> PipelineEvent {
        let start = self.run_started_at.unwrap_or(now_utc);
        let final_stage = self.project.progress();
        let session = self.sessions.archive(start, now_utc, final_stage, STAGE_COUNT);
        PipelineEvent::SessionArchived {
            session: session.id.to_string(),
            final_stage,
        }
    }

    fn notify(&mut self, kind: NotificationKind, title: &str, message: String) {
        let now = self.clock.now_utc();
        self.notifications
            .push(kind, title, message, self.project.name.clone(), now);
    }
}
