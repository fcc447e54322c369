//! Falcon Core - dashboard services
//!
//! Everything the Falcon dashboard needs around the pipeline simulator:
//! - Input documents and the coverage analyzer
//! - The missing-documents warning gate
//! - Assistant responses behind a pluggable strategy
//! - Document editing and plain-text export
//! - Configuration loading
//! - The [`Dashboard`] facade tying them to a `PipelineController`
//!
//! # Example
//!
//! ```rust
//! use falcon_core::{Dashboard, DocumentType, FalconConfig, InputDocument, StartRequest};
//!
//! let config = FalconConfig::new().with_warning_odds(0.0).with_seed(7);
//! let mut dashboard = Dashboard::new(config);
//! dashboard.add_document(InputDocument::new("billing.cbl", DocumentType::Codebase, "COBOL sources"));
//!
//! match dashboard.request_start().unwrap() {
//!     StartRequest::Started(_) => unreachable!("some documents are missing"),
//!     StartRequest::NeedsAcknowledgment { missing } => {
//!         assert!(!missing.is_empty());
//!         dashboard.start_anyway().unwrap();
//!     }
//! }
//! assert!(dashboard.pipeline().is_starting());
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod chat;
pub mod config;
pub mod dashboard;
pub mod documents;
pub mod editor;
pub mod error;
pub mod gate;
pub mod responses;

// Re-exports for convenience
pub use chat::{ChatMessage, ChatRole, ChatSession};
pub use config::{FalconConfig, ProjectDefaults};
pub use dashboard::{Dashboard, StartRequest};
pub use documents::{
    analyze_coverage, CoverageReport, DocumentType, InputDocument, RequiredCategory,
    TrafficLight, REQUIRED_DOCUMENTS,
};
pub use editor::{export_filename, DocumentEditor, ExportedFile, EXPORT_CONTENT_TYPE};
pub use error::{ConfigError, ExportError, FalconError};
pub use gate::{DocumentGate, GateDecision};
pub use responses::{ResponseStrategy, ResponseTable, StaticResponses};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with the dashboard
    pub use crate::{
        Dashboard, DocumentType, FalconConfig, FalconError, InputDocument, ResponseStrategy,
        StartRequest, StaticResponses,
    };
    pub use falcon_pipeline::prelude::*;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
