//! Time sources for the simulator
//!
//! The controller never reads wall-clock time directly. It asks an injected
//! [`Clock`] for a monotonic offset (drives countdowns) and a UTC timestamp
//! (stamps notifications and sessions).

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Source of monotonic and calendar time
pub trait Clock: Send + Sync + std::fmt::Debug {
    /// Monotonic time since the clock's origin
    fn now_mono(&self) -> Duration;

    /// Calendar time for record stamps
    fn now_utc(&self) -> DateTime<Utc>;
}

/// Real clock backed by `std::time::Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is now
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock backed by `tokio::time::Instant`.
///
/// Follows tokio's paused/advanced time, so actor tests can run a whole
/// pipeline without sleeping.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: tokio::time::Instant,
    epoch: DateTime<Utc>,
}

impl TokioClock {
    /// Create a clock whose origin is the current tokio instant
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
            epoch: Utc::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now_mono(&self) -> Duration {
        self.origin.elapsed()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        offset(self.epoch, self.now_mono())
    }
}

/// Manually advanced clock for deterministic tests and replays
#[derive(Debug)]
pub struct ManualClock {
    epoch: DateTime<Utc>,
    now: Mutex<Duration>,
}

impl ManualClock {
    /// Create a clock at offset zero, anchored at 2024-01-01T00:00:00Z
    #[must_use]
    pub fn new() -> Self {
        Self::starting_at(DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default())
    }

    /// Create a clock at offset zero anchored at `epoch`
    #[must_use]
    pub fn starting_at(epoch: DateTime<Utc>) -> Self {
        Self {
            epoch,
            now: Mutex::new(Duration::ZERO),
        }
    }

    /// Advance monotonic time by `dt`
    pub fn advance(&self, dt: Duration) {
        let mut now = self.now.lock();
        *now = now.saturating_add(dt);
    }

    /// Set monotonic time
    pub fn set(&self, now: Duration) {
        *self.now.lock() = now;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now_mono(&self) -> Duration {
        *self.now.lock()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        offset(self.epoch, self.now_mono())
    }
}

fn offset(epoch: DateTime<Utc>, elapsed: Duration) -> DateTime<Utc> {
    epoch + chrono::Duration::from_std(elapsed).unwrap_or_else(|_| chrono::Duration::zero())
}
