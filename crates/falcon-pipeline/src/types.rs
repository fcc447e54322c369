//! Core pipeline types
//!
//! - Project record (progress is owned by the controller)
//! - Automation vs manual mode
//! - Pipeline configuration
//! - Events and snapshots handed to presentation code

use crate::catalog::STAGE_COUNT;
use crate::error::PipelineError;
use crate::status::StageStatus;
use crate::timer::TimerState;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Project risk rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    #[default]
    Medium,
    High,
}

/// Modernization project being tracked
///
/// `progress` is the 1-based index of the active stage. Only the controller
/// moves it, and only forward by one or back to 1 on restart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub owner: String,
    pub risk: RiskLevel,
    progress: usize,
}

impl Project {
    /// Create a project at stage 1
    #[must_use]
    pub fn new(name: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            risk: RiskLevel::default(),
            progress: 1,
        }
    }

    /// With risk rating
    #[inline]
    #[must_use]
    pub fn with_risk(mut self, risk: RiskLevel) -> Self {
        self.risk = risk;
        self
    }

    /// 1-based index of the active stage
    #[inline]
    #[must_use]
    pub fn progress(&self) -> usize {
        self.progress
    }

    /// Move forward one stage; returns false at the terminal stage
    pub(crate) fn advance(&mut self) -> bool {
        if self.progress >= STAGE_COUNT {
            return false;
        }
        self.progress += 1;
        true
    }

    pub(crate) fn reset(&mut self) {
        self.progress = 1;
    }
}

/// Whether the next stage countdown starts on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineMode {
    #[default]
    Automation,
    Manual,
}

impl PipelineMode {
    /// The other mode
    #[inline]
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Automation => Self::Manual,
            Self::Manual => Self::Automation,
        }
    }
}

/// Pipeline timing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Demo countdown length for every stage
    pub stage_duration_ms: u64,
    /// Actor tick period
    pub tick_interval_ms: u64,
    /// Cadence of scripted startup messages
    pub startup_message_interval_ms: u64,
    /// Startup length when the audio cue fails
    pub audio_fallback_ms: u64,
    /// Mode a new controller starts in
    pub default_mode: PipelineMode,
}

impl PipelineConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With stage countdown length
    #[inline]
    #[must_use]
    pub fn with_stage_duration(mut self, duration: Duration) -> Self {
        self.stage_duration_ms = millis(duration);
        self
    }

    /// With tick period
    #[inline]
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval_ms = millis(interval);
        self
    }

    /// With startup message cadence
    #[inline]
    #[must_use]
    pub fn with_startup_message_interval(mut self, interval: Duration) -> Self {
        self.startup_message_interval_ms = millis(interval);
        self
    }

    /// With audio fallback length
    #[inline]
    #[must_use]
    pub fn with_audio_fallback(mut self, fallback: Duration) -> Self {
        self.audio_fallback_ms = millis(fallback);
        self
    }

    /// With starting mode
    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: PipelineMode) -> Self {
        self.default_mode = mode;
        self
    }

    #[inline]
    #[must_use]
    pub fn stage_duration(&self) -> Duration {
        Duration::from_millis(self.stage_duration_ms)
    }

    #[inline]
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    #[inline]
    #[must_use]
    pub fn startup_message_interval(&self) -> Duration {
        Duration::from_millis(self.startup_message_interval_ms)
    }

    #[inline]
    #[must_use]
    pub fn audio_fallback(&self) -> Duration {
        Duration::from_millis(self.audio_fallback_ms)
    }

    /// Reject zero-length countdowns and ticks
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.stage_duration_ms == 0 {
            return Err(PipelineError::InvalidConfig(
                "stage_duration_ms must be positive".to_string(),
            ));
        }
        if self.tick_interval_ms == 0 {
            return Err(PipelineError::InvalidConfig(
                "tick_interval_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            stage_duration_ms: 10_000,
            tick_interval_ms: 100,
            startup_message_interval_ms: 1_500,
            audio_fallback_ms: 6_000,
            default_mode: PipelineMode::Automation,
        }
    }
}

fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Observable transition produced by the controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PipelineEvent {
    /// Previous run archived on restart
    SessionArchived { session: String, final_stage: usize },
    /// Scripted startup message became visible
    StartupMessage { text: String },
    /// Startup finished; engines are running
    EnginesStarted,
    /// Countdown began for a stage
    StageTimerStarted { stage: usize },
    /// Countdown reached 100%
    StageCompleted { stage: usize },
    /// Progress moved to a new active stage
    StageStarted { stage: usize },
    /// Progress reached the terminal stage
    PipelineFinished,
    /// Mode switched
    ModeChanged { mode: PipelineMode },
}

/// One row of the stage overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageView {
    pub index: usize,
    pub key: &'static str,
    pub name: &'static str,
    pub status: StageStatus,
}

/// Read-only view of the whole pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineSnapshot {
    pub project: Project,
    pub engines_started: bool,
    pub starting: bool,
    pub mode: PipelineMode,
    pub current_stage_progress: u8,
    pub timer: TimerState,
    pub stages: Vec<StageView>,
    pub unread_notifications: usize,
    pub archived_sessions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn project_progress_is_capped() {
        let mut project = Project::new("Falcon", "ops");
        assert_eq!(project.progress(), 1);
        for _ in 0..20 {
            project.advance();
        }
        assert_eq!(project.progress(), STAGE_COUNT);
        assert!(!project.advance());
        project.reset();
        assert_eq!(project.progress(), 1);
    }

    #[test]
    fn mode_toggle() {
        assert_eq!(PipelineMode::Automation.toggled(), PipelineMode::Manual);
        assert_eq!(PipelineMode::Manual.toggled(), PipelineMode::Automation);
    }

    #[test]
    fn config_defaults_and_builders() {
        let config = PipelineConfig::new()
            .with_stage_duration(Duration::from_secs(2))
            .with_mode(PipelineMode::Manual);
        assert_eq!(config.stage_duration_ms, 2_000);
        assert_eq!(config.tick_interval(), Duration::from_millis(100));
        assert_eq!(config.default_mode, PipelineMode::Manual);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_rejects_zero_durations() {
        let config = PipelineConfig::new().with_stage_duration(Duration::ZERO);
        assert!(matches!(config.validate(), Err(PipelineError::InvalidConfig(_))));

        let config = PipelineConfig::new().with_tick_interval(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn event_serializes_with_tag() {
        let json = serde_json::to_value(PipelineEvent::StageCompleted { stage: 4 }).unwrap();
        assert_eq!(json["event"], "stage_completed");
        assert_eq!(json["stage"], 4);
    }
}
