//! Error types for Falcon Core
//!
//! Provides error handling for:
//! - Pipeline precondition failures (re-wrapped from `falcon-pipeline`)
//! - Configuration loading and validation
//! - Document export

use falcon_pipeline::PipelineError;
use std::path::PathBuf;

/// Main dashboard error type
#[derive(Debug, thiserror::Error)]
pub enum FalconError {
    /// Pipeline rejected an operation
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Configuration could not be loaded
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Document export failed
    #[error("export failed: {0}")]
    Export(#[from] ExportError),

    /// Named input document is not in the project
    #[error("document not found: {0}")]
    DocumentNotFound(String),
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("cannot parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// Values out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Document export errors
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Source document has no usable name
    #[error("cannot derive export filename from empty document name")]
    EmptyName,

    /// Writing the file failed
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
