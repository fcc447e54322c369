//! Falcon Pipeline - modernization stage simulator
//!
//! Owns the stateful core of the Falcon dashboard:
//! - The fixed 11-stage modernization catalog
//! - Derived stage status (locked / pending / active / completed)
//! - A countdown timer per stage, driven by an injected clock
//! - The scripted engine startup sequence with audio fallback
//! - Notifications and archived sessions
//!
//! All mutation goes through [`PipelineController`]. On multi-threaded
//! hosts, [`PipelineActor`] gives the controller a single owning task.
//!
//! # Example
//!
//! ```rust
//! use falcon_pipeline::{ManualClock, PipelineConfig, PipelineController, Project};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let clock = Arc::new(ManualClock::new());
//! let mut pipeline = PipelineController::new(Project::new("Payroll", "ops"), PipelineConfig::new())
//!     .with_clock(clock.clone());
//!
//! pipeline.start_engines().unwrap();
//! clock.advance(Duration::from_secs(10));
//! pipeline.tick();
//! assert!(pipeline.engines_started());
//! assert_eq!(pipeline.progress(), 2);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod actor;
pub mod catalog;
pub mod clock;
pub mod controller;
pub mod error;
pub mod notification;
pub mod session;
pub mod startup;
pub mod status;
pub mod timer;
pub mod types;

// Re-exports for convenience
pub use actor::{PipelineActor, PipelineCommand, PipelineHandle};
pub use catalog::{Stage, STAGE_COUNT, TERMINAL_STAGE};
pub use clock::{Clock, ManualClock, SystemClock, TokioClock};
pub use controller::PipelineController;
pub use error::{AudioError, PipelineError};
pub use notification::{Notification, NotificationCenter, NotificationId, NotificationKind};
pub use session::{Session, SessionHistory, SessionId, SessionStatus};
pub use startup::{AudioCue, CuePacing, FixedCue, NoAudio, StartupSequence, STARTUP_MESSAGES};
pub use status::StageStatus;
pub use timer::{StageTimer, TimerState};
pub use types::{
    PipelineConfig, PipelineEvent, PipelineMode, PipelineSnapshot, Project, RiskLevel, StageView,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for driving a pipeline
    pub use crate::{
        Clock, ManualClock, PipelineConfig, PipelineController, PipelineError, PipelineEvent,
        PipelineHandle, PipelineMode, Project, StageStatus,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
