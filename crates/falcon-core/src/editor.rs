//! Document editing and export
//!
//! The editor holds a working copy of a document's text, answers questions
//! about it from the document response table, and exports the edited text
//! as a plain-text file named after the source document.

use crate::chat::ChatSession;
use crate::documents::InputDocument;
use crate::error::ExportError;
use crate::responses::{ResponseStrategy, StaticResponses};
use std::path::{Path, PathBuf};

/// Content type of exported documents
pub const EXPORT_CONTENT_TYPE: &str = "text/plain";

/// File ready to be written or downloaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub filename: String,
    pub content_type: &'static str,
    pub contents: String,
}

impl ExportedFile {
    /// Write the file into `dir`, returning the full path
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
        let path = dir.as_ref().join(&self.filename);
        std::fs::write(&path, self.contents.as_bytes()).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = self.contents.len(), "document exported");
        Ok(path)
    }
}

/// Export filename: the source name with its extension replaced by `.txt`
pub fn export_filename(source_name: &str) -> Result<String, ExportError> {
    let stem = Path::new(source_name.trim())
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or(ExportError::EmptyName)?;
    Ok(format!("{stem}.txt"))
}

/// Working copy of one document
#[derive(Debug)]
pub struct DocumentEditor {
    source: InputDocument,
    content: String,
    dirty: bool,
    assistant: ChatSession,
}

impl DocumentEditor {
    /// Open `source` with `content` as the initial text
    #[must_use]
    pub fn open(source: InputDocument, content: impl Into<String>) -> Self {
        Self::with_strategy(source, content, Box::new(StaticResponses::document()))
    }

    /// Open with a custom answering strategy
    #[must_use]
    pub fn with_strategy(
        source: InputDocument,
        content: impl Into<String>,
        strategy: Box<dyn ResponseStrategy>,
    ) -> Self {
        Self {
            source,
            content: content.into(),
            dirty: false,
            assistant: ChatSession::new(strategy),
        }
    }

    /// Replace the whole text
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.dirty = true;
    }

    /// Append a paragraph
    pub fn append(&mut self, text: &str) {
        if !self.content.is_empty() && !self.content.ends_with('\n') {
            self.content.push('\n');
        }
        self.content.push_str(text);
        self.dirty = true;
    }

    /// Ask about the document; returns the answer text
    pub fn ask(&mut self, question: &str) -> Option<String> {
        self.assistant.ask(question).map(|m| m.text.clone())
    }

    /// Snapshot the current text as a plain-text file
    pub fn export(&self) -> Result<ExportedFile, ExportError> {
        Ok(ExportedFile {
            filename: export_filename(&self.source.name)?,
            content_type: EXPORT_CONTENT_TYPE,
            contents: self.content.clone(),
        })
    }

    #[inline]
    #[must_use]
    pub fn source(&self) -> &InputDocument {
        &self.source
    }

    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether the text changed since opening
    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Questions and answers asked in this editor
    #[inline]
    #[must_use]
    pub fn conversation(&self) -> &ChatSession {
        &self.assistant
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::DocumentType;

    fn editor(name: &str) -> DocumentEditor {
        DocumentEditor::open(
            InputDocument::new(name, DocumentType::Fsa, "spec"),
            "Nightly batch cycle",
        )
    }

    #[test]
    fn filename_replaces_extension() {
        assert_eq!(export_filename("payroll-spec.docx").unwrap(), "payroll-spec.txt");
        assert_eq!(export_filename("archive.tar.gz").unwrap(), "archive.tar.txt");
        assert_eq!(export_filename("README").unwrap(), "README.txt");
        assert!(matches!(export_filename("  "), Err(ExportError::EmptyName)));
    }

    #[test]
    fn edits_mark_dirty() {
        let mut ed = editor("spec.pdf");
        assert!(!ed.is_dirty());
        ed.append("Restart procedure: rerun from last checkpoint.");
        assert!(ed.is_dirty());
        assert_eq!(
            ed.content(),
            "Nightly batch cycle\nRestart procedure: rerun from last checkpoint."
        );
    }

    #[test]
    fn export_uses_plain_text() {
        let mut ed = editor("spec.pdf");
        ed.set_content("edited");
        let file = ed.export().unwrap();
        assert_eq!(file.filename, "spec.txt");
        assert_eq!(file.content_type, "text/plain");
        assert_eq!(file.contents, "edited");
    }

    #[test]
    fn document_questions_use_document_table() {
        let mut ed = editor("spec.pdf");
        let answer = ed.ask("Summarize this document").unwrap();
        assert!(answer.contains("nightly batch cycle"));
        assert_eq!(ed.conversation().messages().len(), 2);
    }
}
