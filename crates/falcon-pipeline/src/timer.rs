//! Stage countdown timer
//!
//! Explicit state machine: `Idle -> Running -> Completed`. Elapsed time is
//! accumulated from tick deltas, so progress never drifts when ticks arrive
//! late or in bursts.

use serde::Serialize;
use std::time::Duration;

/// Countdown state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TimerState {
    /// No live countdown
    Idle,
    /// Counting towards completion of `stage`
    Running {
        /// 1-based stage index
        stage: usize,
        /// Time accumulated so far
        elapsed: Duration,
    },
    /// Reached 100% for `stage`; waiting to be cleared
    Completed {
        /// 1-based stage index
        stage: usize,
    },
}

/// Single stage countdown with linear 0..=100 progress
#[derive(Debug, Clone)]
pub struct StageTimer {
    state: TimerState,
    duration: Duration,
    last_tick: Duration,
}

impl StageTimer {
    /// Create an idle timer that runs for `duration` once started
    #[inline]
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            state: TimerState::Idle,
            duration,
            last_tick: Duration::ZERO,
        }
    }

    /// Start counting for `stage` at monotonic time `now`.
    ///
    /// Any live countdown is discarded.
    pub fn start(&mut self, stage: usize, now: Duration) {
        if let TimerState::Running { stage: previous, .. } = self.state {
            tracing::debug!(previous, stage, "replacing live stage timer");
        }
        self.state = TimerState::Running {
            stage,
            elapsed: Duration::ZERO,
        };
        self.last_tick = now;
    }

    /// Feed the current monotonic time and return the new state
    pub fn advance(&mut self, now: Duration) -> TimerState {
        if let TimerState::Running { stage, elapsed } = self.state {
            let delta = now.saturating_sub(self.last_tick);
            self.last_tick = now;
            let elapsed = elapsed.saturating_add(delta);
            self.state = if elapsed >= self.duration {
                TimerState::Completed { stage }
            } else {
                TimerState::Running { stage, elapsed }
            };
        }
        self.state
    }

    /// Drop the countdown, whatever its state
    #[inline]
    pub fn clear(&mut self) {
        self.state = TimerState::Idle;
    }

    /// Current percentage in `0..=100`
    #[must_use]
    pub fn percent(&self) -> u8 {
        match self.state {
            TimerState::Idle => 0,
            TimerState::Completed { .. } => 100,
            TimerState::Running { elapsed, .. } => {
                let total = self.duration.as_millis();
                if total == 0 {
                    return 100;
                }
                let pct = (elapsed.as_millis() * 100 / total).min(100);
                u8::try_from(pct).unwrap_or(100)
            }
        }
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Stage the timer is bound to, if any
    #[must_use]
    pub fn stage(&self) -> Option<usize> {
        match self.state {
            TimerState::Idle => None,
            TimerState::Running { stage, .. } | TimerState::Completed { stage } => Some(stage),
        }
    }

    /// Whether a countdown is live
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self.state, TimerState::Running { .. })
    }

    /// Configured countdown length
    #[inline]
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}
