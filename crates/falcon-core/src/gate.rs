//! Missing-documents warning gate
//!
//! Before the engines start, the dashboard may ask the user to acknowledge
//! that required documents are missing. The warning is a soft gate: it never
//! blocks, it only demands an explicit "proceed anyway". It fires when the
//! coverage report lists missing documents, and also on a fixed-odds roll
//! so the confirmation step shows up even for well-covered projects.

use crate::documents::CoverageReport;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Outcome of a gate check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Start without confirmation
    Clear,
    /// Ask the user to acknowledge before starting
    Warn { missing: Vec<String> },
}

impl GateDecision {
    #[inline]
    #[must_use]
    pub fn needs_acknowledgment(&self) -> bool {
        matches!(self, Self::Warn { .. })
    }
}

/// Fixed-odds warning gate
#[derive(Debug, Clone)]
pub struct DocumentGate {
    odds: f64,
    rng: StdRng,
}

impl DocumentGate {
    /// Gate with `odds` in `[0, 1]`, seeded when `seed` is given
    #[must_use]
    pub fn new(odds: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            odds: odds.clamp(0.0, 1.0),
            rng,
        }
    }

    /// Decide whether the user must acknowledge missing documents
    pub fn evaluate(&mut self, report: &CoverageReport) -> GateDecision {
        if !report.missing.is_empty() {
            tracing::warn!(missing = report.missing.len(), "required documents missing");
            return GateDecision::Warn {
                missing: report.missing.clone(),
            };
        }
        if self.odds > 0.0 && self.rng.random::<f64>() < self.odds {
            tracing::info!("document review prompt triggered");
            return GateDecision::Warn { missing: Vec::new() };
        }
        GateDecision::Clear
    }

    #[inline]
    #[must_use]
    pub fn odds(&self) -> f64 {
        self.odds
    }
}
