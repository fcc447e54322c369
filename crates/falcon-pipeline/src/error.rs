//! Error types for the pipeline simulator
//!
//! The simulator has no real failure domain. These errors describe
//! operation preconditions that were not met:
//! - Engine start requested while a startup sequence is still playing
//! - Manual stage trigger before engines are running
//! - A second timer requested while one is live
//! - Countdown requested for the terminal stage

use crate::status::StageStatus;

/// Main pipeline error type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PipelineError {
    /// Engine start sequence is already playing
    #[error("engine startup already in progress")]
    StartupInProgress,

    /// Engines have not been started for the current run
    #[error("engines have not been started")]
    EnginesNotStarted,

    /// A stage countdown is already live
    #[error("stage {stage} timer already running")]
    TimerAlreadyRunning { stage: usize },

    /// The terminal stage never gets a countdown
    #[error("stage {stage} is the terminal stage")]
    TerminalStage { stage: usize },

    /// Stage status moved backwards or skipped
    #[error("illegal stage transition {from:?} -> {to:?}")]
    IllegalTransition { from: StageStatus, to: StageStatus },

    /// Configuration rejected by validation
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    /// The owning actor task has stopped
    #[error("pipeline actor is no longer running")]
    ActorClosed,
}

impl PipelineError {
    /// Check if the error is a rejected user action rather than a host problem
    #[inline]
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::StartupInProgress
                | Self::EnginesNotStarted
                | Self::TimerAlreadyRunning { .. }
                | Self::TerminalStage { .. }
        )
    }
}

/// Audio cue playback errors
///
/// Never surfaced to the user: the startup sequence falls back to a
/// fixed-duration timer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AudioError {
    /// Cue file missing or no output device
    #[error("audio cue unavailable: {0}")]
    Unavailable(String),

    /// Host refused playback (autoplay policy and similar)
    #[error("audio playback blocked by host policy")]
    Blocked,
}
