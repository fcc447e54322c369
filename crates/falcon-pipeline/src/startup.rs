//! Engine startup sequence
//!
//! Starting the engines plays an audio cue and shows a scripted list of
//! status messages on a fixed cadence. The sequence finishes when every
//! message has been shown and the cue (or its fallback) has run out.

use crate::error::AudioError;
use std::time::Duration;

/// Scripted status messages, shown in order
pub const STARTUP_MESSAGES: &[&str] = &[
    "Initializing AI conversion engines...",
    "Loading COBOL and JCL parsers...",
    "Indexing supplied input documents...",
    "Calibrating code translation models...",
    "Connecting SME review workflow...",
    "All engines online. Pipeline ready.",
];

/// Audio cue played while engines start
pub trait AudioCue: Send + Sync + std::fmt::Debug {
    /// Start playback and return the cue length
    fn play(&self) -> Result<Duration, AudioError>;
}

/// Host without audio output; always falls back to the timer
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAudio;

impl AudioCue for NoAudio {
    fn play(&self) -> Result<Duration, AudioError> {
        Err(AudioError::Unavailable("no audio output configured".to_string()))
    }
}

/// Cue of a known length that always plays
#[derive(Debug, Clone, Copy)]
pub struct FixedCue(pub Duration);

impl AudioCue for FixedCue {
    fn play(&self) -> Result<Duration, AudioError> {
        Ok(self.0)
    }
}

/// What paces the end of the sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CuePacing {
    /// Cue played; sequence lasts at least the cue length
    Audio(Duration),
    /// Cue failed; fixed fallback length
    Fallback(Duration),
}

impl CuePacing {
    fn length(self) -> Duration {
        match self {
            Self::Audio(d) | Self::Fallback(d) => d,
        }
    }
}

/// Output of one [`StartupSequence::advance`] call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupStep {
    /// Messages that became visible on this tick
    pub messages: Vec<&'static str>,
    /// Whether the sequence is over
    pub finished: bool,
}

/// Running startup sequence
#[derive(Debug, Clone)]
pub struct StartupSequence {
    pacing: CuePacing,
    message_interval: Duration,
    elapsed: Duration,
    last_tick: Duration,
    shown: usize,
}

impl StartupSequence {
    /// Play the cue and begin the sequence at monotonic time `now`
    pub fn begin(
        cue: &dyn AudioCue,
        message_interval: Duration,
        fallback: Duration,
        now: Duration,
    ) -> Self {
        let pacing = match cue.play() {
            Ok(length) => {
                tracing::debug!(?length, "startup cue playing");
                CuePacing::Audio(length)
            }
            Err(e) => {
                tracing::warn!(error = %e, ?fallback, "startup cue failed, using fallback timer");
                CuePacing::Fallback(fallback)
            }
        };

        Self {
            pacing,
            message_interval,
            elapsed: Duration::ZERO,
            last_tick: now,
            shown: 0,
        }
    }

    /// Feed the current monotonic time
    pub fn advance(&mut self, now: Duration) -> StartupStep {
        self.elapsed = self
            .elapsed
            .saturating_add(now.saturating_sub(self.last_tick));
        self.last_tick = now;

        let mut step = StartupStep::default();
        while self.shown < STARTUP_MESSAGES.len() && self.elapsed >= self.due_at(self.shown) {
            step.messages.push(STARTUP_MESSAGES[self.shown]);
            self.shown += 1;
        }
        step.finished = self.is_finished();
        step
    }

    /// Total time the sequence takes
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        let last_message = self.due_at(STARTUP_MESSAGES.len().saturating_sub(1));
        self.pacing.length().max(last_message)
    }

    /// How the end of the sequence is paced
    #[inline]
    #[must_use]
    pub fn pacing(&self) -> CuePacing {
        self.pacing
    }

    /// Number of messages shown so far
    #[inline]
    #[must_use]
    pub fn shown(&self) -> usize {
        self.shown
    }

    fn is_finished(&self) -> bool {
        self.shown == STARTUP_MESSAGES.len() && self.elapsed >= self.total_duration()
    }

    fn due_at(&self, index: usize) -> Duration {
        self.message_interval
            .saturating_mul(u32::try_from(index).unwrap_or(u32::MAX))
    }
}
