//! Dashboard configuration
//!
//! One TOML document configures the whole dashboard. Every field has a
//! default, so an empty file is valid.
//!
//! ```toml
//! missing_docs_warning_odds = 0.3
//! rng_seed = 7
//! mock_sessions = 5
//!
//! [pipeline]
//! stage_duration_ms = 10000
//! default_mode = "manual"
//!
//! [project]
//! name = "Payroll Modernization"
//! owner = "Legacy Ops"
//! risk = "high"
//! ```

use crate::error::ConfigError;
use falcon_pipeline::{PipelineConfig, PipelineMode, Project, RiskLevel};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Falcon configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FalconConfig {
    /// Pipeline timing
    pub pipeline: PipelineConfig,
    /// Chance in `[0, 1]` that the missing-documents warning fires even
    /// when every required document is provided
    pub missing_docs_warning_odds: f64,
    /// Seed for the warning gate and mock data; random when absent
    pub rng_seed: Option<u64>,
    /// Past sessions generated into a fresh dashboard's history
    pub mock_sessions: usize,
    /// Project shown on the dashboard
    pub project: ProjectDefaults,
}

impl FalconConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&input)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if !(0.0..=1.0).contains(&self.missing_docs_warning_odds) {
            return Err(ConfigError::Invalid(format!(
                "missing_docs_warning_odds must be within [0, 1], got {}",
                self.missing_docs_warning_odds
            )));
        }
        if self.project.name.trim().is_empty() {
            return Err(ConfigError::Invalid("project name must not be empty".to_string()));
        }
        Ok(())
    }

    /// With pipeline configuration
    #[inline]
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// With warning odds
    #[inline]
    #[must_use]
    pub fn with_warning_odds(mut self, odds: f64) -> Self {
        self.missing_docs_warning_odds = odds;
        self
    }

    /// With RNG seed
    #[inline]
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// With number of generated past sessions
    #[inline]
    #[must_use]
    pub fn with_mock_sessions(mut self, count: usize) -> Self {
        self.mock_sessions = count;
        self
    }

    /// With pipeline mode
    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: PipelineMode) -> Self {
        self.pipeline.default_mode = mode;
        self
    }
}

impl Default for FalconConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            missing_docs_warning_odds: 0.3,
            rng_seed: None,
            mock_sessions: 5,
            project: ProjectDefaults::default(),
        }
    }
}

/// Project record defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectDefaults {
    pub name: String,
    pub owner: String,
    pub risk: RiskLevel,
}

impl ProjectDefaults {
    /// Build the project record at stage 1
    #[must_use]
    pub fn to_project(&self) -> Project {
        Project::new(self.name.clone(), self.owner.clone()).with_risk(self.risk)
    }
}

impl Default for ProjectDefaults {
    fn default() -> Self {
        Self {
            name: "Ford Falcon".to_string(),
            owner: "Legacy Modernization Team".to_string(),
            risk: RiskLevel::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_default() {
        let config = FalconConfig::from_toml_str("").unwrap();
        assert_eq!(config, FalconConfig::default());
    }

    #[test]
    fn partial_document_overrides() {
        let config = FalconConfig::from_toml_str(
            r#"
            rng_seed = 7

            [pipeline]
            stage_duration_ms = 2500
            default_mode = "manual"

            [project]
            name = "Payroll"
            risk = "high"
            "#,
        )
        .unwrap();

        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.mock_sessions, 5);
        assert_eq!(config.pipeline.stage_duration_ms, 2500);
        assert_eq!(config.pipeline.tick_interval_ms, 100);
        assert_eq!(config.pipeline.default_mode, PipelineMode::Manual);
        assert_eq!(config.project.name, "Payroll");
        assert_eq!(config.project.owner, "Legacy Modernization Team");
        assert_eq!(config.project.to_project().risk, RiskLevel::High);
    }

    #[test]
    fn rejects_bad_odds() {
        let err = FalconConfig::from_toml_str("missing_docs_warning_odds = 1.5").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_zero_stage_duration() {
        let err = FalconConfig::from_toml_str("[pipeline]\nstage_duration_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            FalconConfig::from_toml_str("pipeline = ["),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = FalconConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
