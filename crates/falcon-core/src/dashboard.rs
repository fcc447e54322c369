//! Project dashboard
//!
//! The facade a UI talks to. Owns:
//! - The pipeline controller for the viewed project
//! - The project's input documents
//! - The missing-documents gate
//! - The assistant chat
//!
//! Starting the engines goes through the gate first; the UI either starts
//! straight away or shows the warning and calls [`Dashboard::start_anyway`].
//!
//! A new dashboard's session history is pre-filled with generated past runs
//! (seeded by `rng_seed`), so archived runs appear on top of them.

use crate::chat::ChatSession;
use crate::config::FalconConfig;
use crate::documents::{analyze_coverage, CoverageReport, InputDocument};
use crate::editor::DocumentEditor;
use crate::error::FalconError;
use crate::gate::{DocumentGate, GateDecision};
use chrono::{DateTime, Utc};
use falcon_pipeline::{
    AudioCue, Clock, PipelineController, PipelineEvent, PipelineMode, PipelineSnapshot,
    SessionHistory,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

/// Result of asking to start the engines
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartRequest {
    /// Engines are starting
    Started(Vec<PipelineEvent>),
    /// User must confirm before starting
    NeedsAcknowledgment { missing: Vec<String> },
}

/// Dashboard for one project
#[derive(Debug)]
pub struct Dashboard {
    config: FalconConfig,
    pipeline: PipelineController,
    documents: Vec<InputDocument>,
    gate: DocumentGate,
    chat: ChatSession,
}

impl Dashboard {
    /// Build a dashboard from configuration
    #[must_use]
    pub fn new(config: FalconConfig) -> Self {
        let pipeline =
            PipelineController::new(config.project.to_project(), config.pipeline.clone())
                .with_sessions(seeded_history(&config, Utc::now()));
        let gate = DocumentGate::new(config.missing_docs_warning_odds, config.rng_seed);
        Self {
            config,
            pipeline,
            documents: Vec::new(),
            gate,
            chat: ChatSession::default(),
        }
    }

    /// With time source for the pipeline.
    ///
    /// The generated session history is re-anchored to the new clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        let history = seeded_history(&self.config, clock.now_utc());
        self.pipeline = self.pipeline.with_clock(clock).with_sessions(history);
        self
    }

    /// With startup audio cue
    #[must_use]
    pub fn with_audio(mut self, audio: Arc<dyn AudioCue>) -> Self {
        self.pipeline = self.pipeline.with_audio(audio);
        self
    }

    /// With initial documents
    #[must_use]
    pub fn with_documents(mut self, documents: Vec<InputDocument>) -> Self {
        self.documents = documents;
        self
    }

    /// With assistant chat
    #[must_use]
    pub fn with_chat(mut self, chat: ChatSession) -> Self {
        self.chat = chat;
        self
    }

    /// Append a document to the project
    pub fn add_document(&mut self, document: InputDocument) {
        tracing::info!(name = %document.name, doc_type = ?document.doc_type, "document added");
        self.documents.push(document);
    }

    #[inline]
    #[must_use]
    pub fn documents(&self) -> &[InputDocument] {
        &self.documents
    }

    /// Coverage of the current documents
    #[must_use]
    pub fn coverage(&self) -> CoverageReport {
        analyze_coverage(&self.documents)
    }

    /// Ask to start the engines, passing through the warning gate
    pub fn request_start(&mut self) -> Result<StartRequest, FalconError> {
        if self.pipeline.is_starting() {
            return Err(falcon_pipeline::PipelineError::StartupInProgress.into());
        }
        let report = self.coverage();
        match self.gate.evaluate(&report) {
            GateDecision::Clear => Ok(StartRequest::Started(self.pipeline.start_engines()?)),
            GateDecision::Warn { missing } => Ok(StartRequest::NeedsAcknowledgment { missing }),
        }
    }

    /// Start after the user acknowledged the warning
    pub fn start_anyway(&mut self) -> Result<Vec<PipelineEvent>, FalconError> {
        tracing::info!("starting engines despite document warning");
        Ok(self.pipeline.start_engines()?)
    }

    /// Advance the pipeline to the current time
    pub fn tick(&mut self) -> Vec<PipelineEvent> {
        self.pipeline.tick()
    }

    /// Start the active stage's countdown
    pub fn trigger_stage(&mut self) -> Result<Vec<PipelineEvent>, FalconError> {
        Ok(self.pipeline.trigger_stage()?)
    }

    /// Flip automation/manual mode
    pub fn toggle_mode(&mut self) -> PipelineMode {
        self.pipeline.toggle_mode();
        self.pipeline.mode()
    }

    /// Open a document by name in the editor
    pub fn open_document(
        &self,
        name: &str,
        content: impl Into<String>,
    ) -> Result<DocumentEditor, FalconError> {
        let document = self
            .documents
            .iter()
            .find(|d| d.name == name)
            .cloned()
            .ok_or_else(|| FalconError::DocumentNotFound(name.to_string()))?;
        Ok(DocumentEditor::open(document, content))
    }

    /// Ask the project assistant
    pub fn ask(&mut self, question: &str) -> Option<String> {
        self.chat.ask(question).map(|m| m.text.clone())
    }

    #[inline]
    #[must_use]
    pub fn chat(&self) -> &ChatSession {
        &self.chat
    }

    #[inline]
    #[must_use]
    pub fn pipeline(&self) -> &PipelineController {
        &self.pipeline
    }

    /// Mutable pipeline access for notification read flags
    #[inline]
    pub fn pipeline_mut(&mut self) -> &mut PipelineController {
        &mut self.pipeline
    }

    #[must_use]
    pub fn snapshot(&self) -> PipelineSnapshot {
        self.pipeline.snapshot()
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &FalconConfig {
        &self.config
    }

    /// Hand the controller over, e.g. to a `PipelineActor`
    #[must_use]
    pub fn into_pipeline(self) -> PipelineController {
        self.pipeline
    }
}

fn seeded_history(config: &FalconConfig, now: DateTime<Utc>) -> SessionHistory {
    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    SessionHistory::mock(&mut rng, config.mock_sessions, now)
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new(FalconConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::DocumentType;

    fn quiet_config() -> FalconConfig {
        FalconConfig::new().with_warning_odds(0.0).with_seed(1)
    }

    fn full_documents() -> Vec<InputDocument> {
        [
            DocumentType::Codebase,
            DocumentType::UserManual,
            DocumentType::MeetingRecording,
            DocumentType::Fsa,
        ]
        .into_iter()
        .map(|t| InputDocument::new(t.label(), t, "supplied"))
        .collect()
    }

    #[test]
    fn missing_documents_need_acknowledgment() {
        let mut dash = Dashboard::new(quiet_config());
        let request = dash.request_start().unwrap();
        let StartRequest::NeedsAcknowledgment { missing } = request else {
            panic!("expected warning");
        };
        assert_eq!(missing.len(), 11);
        assert!(!dash.pipeline().is_starting());

        dash.start_anyway().unwrap();
        assert!(dash.pipeline().is_starting());
    }

    #[test]
    fn full_coverage_starts_directly() {
        let mut dash = Dashboard::new(quiet_config()).with_documents(full_documents());
        assert!(matches!(dash.request_start().unwrap(), StartRequest::Started(_)));
        assert!(dash.request_start().is_err());
    }

    #[test]
    fn add_document_updates_coverage() {
        let mut dash = Dashboard::new(quiet_config());
        assert_eq!(dash.coverage().coverage_percentage(), 0);
        dash.add_document(InputDocument::new("src.zip", DocumentType::Codebase, "COBOL"));
        assert_eq!(dash.coverage().coverage_percentage(), 73);
    }

    #[test]
    fn open_unknown_document() {
        let dash = Dashboard::new(quiet_config());
        assert!(matches!(
            dash.open_document("nope.pdf", ""),
            Err(FalconError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn fresh_dashboard_has_mock_history() {
        let dash = Dashboard::new(quiet_config().with_mock_sessions(4));
        let sessions = dash.pipeline().sessions();
        assert_eq!(sessions.len(), 4);
        assert!(sessions.iter().all(|s| s.end_time <= Utc::now()));

        let empty = Dashboard::new(quiet_config().with_mock_sessions(0));
        assert!(empty.pipeline().sessions().is_empty());
    }

    #[test]
    fn assistant_answers() {
        let mut dash = Dashboard::default();
        let answer = dash.ask("foo bar baz").unwrap();
        assert!(answer.contains("foo bar baz"));
    }
}
