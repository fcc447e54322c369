//! Session archival
//!
//! A session is one pipeline run, from engine start to the next restart.
//! Archived sessions are immutable; the history hands out shared references
//! only.

use crate::catalog::STAGE_COUNT;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Sequential session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SES-{:04}", self.0)
    }
}

/// How far a session got
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Incomplete,
    Completed,
}

/// Archived pipeline run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Progress value at the moment the run ended
    pub final_stage: usize,
    pub status: SessionStatus,
    pub total_stages: usize,
    /// Placeholder artifact filenames
    pub artifacts: Vec<String>,
}

impl Session {
    /// Build a session record for a finished run
    #[must_use]
    pub fn archive(
        id: SessionId,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        final_stage: usize,
        total_stages: usize,
    ) -> Self {
        let status = if final_stage >= total_stages {
            SessionStatus::Completed
        } else {
            SessionStatus::Incomplete
        };
        Self {
            id,
            start_time,
            end_time,
            final_stage,
            status,
            total_stages,
            artifacts: artifact_names(id),
        }
    }

    /// Wall time the run lasted
    #[must_use]
    pub fn duration(&self) -> chrono::Duration {
        self.end_time - self.start_time
    }

    /// Share of stages reached, in `0..=100`
    #[must_use]
    pub fn completion_percent(&self) -> u8 {
        if self.total_stages == 0 {
            return 0;
        }
        let pct = (self.final_stage.min(self.total_stages) * 100) / self.total_stages;
        u8::try_from(pct).unwrap_or(100)
    }
}

fn artifact_names(id: SessionId) -> Vec<String> {
    ["analysis-report.pdf", "conversion-log.txt", "stage-summary.json"]
        .iter()
        .map(|suffix| format!("{id}-{suffix}").to_lowercase())
        .collect()
}

/// Most-recent-first list of archived sessions
#[derive(Debug, Clone)]
pub struct SessionHistory {
    sessions: VecDeque<Session>,
    next_id: u64,
}

impl SessionHistory {
    /// Create an empty history
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: VecDeque::new(),
            next_id: 1,
        }
    }

    /// Generate `count` plausible past sessions ending before `now`.
    ///
    /// Sessions are spaced roughly a day apart and reach a random stage.
    pub fn mock<R: Rng>(rng: &mut R, count: usize, now: DateTime<Utc>) -> Self {
        let mut history = Self::new();
        let mut cursor = now - chrono::Duration::days(i64::try_from(count).unwrap_or(0) + 1);
        for _ in 0..count {
            let minutes = rng.random_range(20..=240);
            let final_stage = rng.random_range(1..=STAGE_COUNT);
            let start = cursor;
            let end = start + chrono::Duration::minutes(minutes);
            history.archive(start, end, final_stage, STAGE_COUNT);
            cursor += chrono::Duration::hours(rng.random_range(18..=23));
        }
        history
    }

    /// Prepend a new session and return it
    pub fn archive(
        &mut self,
        start_time: DateTime<Utc>,
        end_time: DateTime<Utc>,
        final_stage: usize,
        total_stages: usize,
    ) -> &Session {
        let id = SessionId(self.next_id);
        self.next_id += 1;
        let session = Session::archive(id, start_time, end_time, final_stage, total_stages);
        tracing::info!(session = %id, final_stage, status = ?session.status, "session archived");
        self.sessions.push_front(session);
        &self.sessions[0]
    }

    /// Sessions, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &Session> {
        self.sessions.iter()
    }

    #[must_use]
    pub fn latest(&self) -> Option<&Session> {
        self.sessions.front()
    }

    #[must_use]
    pub fn get(&self, id: SessionId) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == id)
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Owned copy, most recent first
    #[must_use]
    pub fn to_vec(&self) -> Vec<Session> {
        self.sessions.iter().cloned().collect()
    }
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new()
    }
}
