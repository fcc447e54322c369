//! Derived stage status
//!
//! Status is never stored. It is computed from the project's progress, the
//! engines-started flag and the stage position.

use crate::catalog::STAGE_COUNT;
use crate::error::PipelineError;
use serde::{Deserialize, Serialize};

/// Display status of one stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    /// Unreachable until engines start
    Locked,
    /// Reachable, not yet reached
    Pending,
    /// The stage at the current progress index
    Active,
    /// Already passed
    Completed,
}

/// Compute the status of the stage at 1-based `index`.
///
/// Indices outside the catalog are clamped to `Pending`.
#[must_use]
pub fn stage_status(index: usize, progress: usize, engines_started: bool) -> StageStatus {
    if index == 0 || index > STAGE_COUNT {
        return StageStatus::Pending;
    }
    if index >= 2 && !engines_started {
        return StageStatus::Locked;
    }
    match index.cmp(&progress) {
        std::cmp::Ordering::Less => StageStatus::Completed,
        std::cmp::Ordering::Equal => StageStatus::Active,
        std::cmp::Ordering::Greater => StageStatus::Pending,
    }
}

/// Statuses a stage may move to from `from` within one run.
///
/// A restart resets every stage, so this only covers forward movement.
#[must_use]
pub fn allowed_transitions(from: StageStatus) -> &'static [StageStatus] {
    use StageStatus::{Active, Completed, Locked, Pending};
    match from {
        Locked => &[Pending, Active],
        Pending => &[Active],
        Active => &[Completed],
        Completed => &[],
    }
}

/// Validate a forward status transition.
pub fn validate_transition(from: StageStatus, to: StageStatus) -> Result<(), PipelineError> {
    if from == to || allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(PipelineError::IllegalTransition { from, to })
    }
}
