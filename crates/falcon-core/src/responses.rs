//! Assistant responses
//!
//! Callers ask questions through [`ResponseStrategy`]. The default
//! implementation, [`StaticResponses`], looks the question up verbatim in a
//! fixed table: no trimming, no case folding, no partial matches. Unknown
//! questions get a fallback that echoes the question back.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Answers free-text questions
pub trait ResponseStrategy: Send + Sync + std::fmt::Debug {
    /// Produce an answer for `question`
    fn answer(&self, question: &str) -> String;
}

/// Which table a [`StaticResponses`] reads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseTable {
    /// Project assistant chat
    Chat,
    /// Questions asked from the document editor
    Document,
}

static CHAT_RESPONSES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "What database tables does the system use?",
            "The legacy system reads and writes three primary VSAM/DB2 tables: \
             CUSTOMER-MASTER (customer accounts and profile data), \
             TRANSACTION-HISTORY (posted transactions, retained for seven years) and \
             SYSTEM-LOG (batch run audit trail). CUSTOMER-MASTER is keyed by \
             CUST-ID and is updated by the nightly posting job.",
        ),
        (
            "What is the current status of the project?",
            "The project is progressing through the modernization pipeline. \
             Legacy code analysis is complete and business rules extraction is \
             underway. No blocking issues have been reported by the SME team.",
        ),
        (
            "How many COBOL programs are in scope?",
            "The inventory lists 142 COBOL programs, 38 copybooks and 27 JCL job \
             streams. 18 programs are flagged as high complexity and will need \
             additional SME review.",
        ),
        (
            "What are the main business rules?",
            "Key rules extracted so far: interest accrues daily on positive \
             balances; accounts inactive for 24 months are flagged dormant; \
             transactions above the daily limit require supervisor override; \
             month-end statements are generated after the final batch cycle.",
        ),
        (
            "What are the risks for this migration?",
            "Main risks: undocumented batch dependencies between JCL streams, \
             packed-decimal arithmetic differences in the target language, and \
             limited SME availability during user acceptance.",
        ),
        (
            "When will code conversion start?",
            "Code conversion starts once the target architecture has been \
             approved. At the current pace that is expected after the SME \
             review and architecture stages complete.",
        ),
    ])
});

static DOCUMENT_RESPONSES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        (
            "What database tables does the system use?",
            "This document references CUSTOMER-MASTER, TRANSACTION-HISTORY and \
             SYSTEM-LOG. CUSTOMER-MASTER holds account records, \
             TRANSACTION-HISTORY stores posted activity and SYSTEM-LOG captures \
             batch audit entries.",
        ),
        (
            "Summarize this document",
            "The document describes the nightly batch cycle: transactions are \
             validated, posted to customer accounts, and summarized into \
             statements. Exceptions are written to the error report for \
             operator review.",
        ),
        (
            "What are the inputs and outputs?",
            "Inputs: the daily transaction file and CUSTOMER-MASTER. Outputs: \
             updated CUSTOMER-MASTER records, TRANSACTION-HISTORY entries, the \
             exception report and SYSTEM-LOG audit records.",
        ),
        (
            "Are there any missing sections?",
            "The document has no error-handling section and does not describe \
             restart procedures for failed batch steps. Consider adding both \
             before SME review.",
        ),
    ])
});

/// Exact-match lookup against a static table
#[derive(Debug, Clone, Copy)]
pub struct StaticResponses {
    table: ResponseTable,
}

impl StaticResponses {
    /// Project assistant table
    #[inline]
    #[must_use]
    pub fn chat() -> Self {
        Self {
            table: ResponseTable::Chat,
        }
    }

    /// Document editor table
    #[inline]
    #[must_use]
    pub fn document() -> Self {
        Self {
            table: ResponseTable::Document,
        }
    }

    #[inline]
    #[must_use]
    pub fn table(&self) -> ResponseTable {
        self.table
    }

    /// Questions with a canned answer, sorted
    #[must_use]
    pub fn known_questions(&self) -> Vec<&'static str> {
        let mut questions: Vec<_> = self.entries().keys().copied().collect();
        questions.sort_unstable();
        questions
    }

    fn entries(&self) -> &'static HashMap<&'static str, &'static str> {
        match self.table {
            ResponseTable::Chat => &CHAT_RESPONSES,
            ResponseTable::Document => &DOCUMENT_RESPONSES,
        }
    }
}

impl Default for StaticResponses {
    fn default() -> Self {
        Self::chat()
    }
}

impl ResponseStrategy for StaticResponses {
    fn answer(&self, question: &str) -> String {
        match self.entries().get(question) {
            Some(answer) => {
                tracing::debug!(table = ?self.table, "canned response");
                (*answer).to_string()
            }
            None => {
                tracing::debug!(table = ?self.table, "fallback response");
                fallback(question)
            }
        }
    }
}

/// Fallback answer embedding the literal question
#[must_use]
pub fn fallback(question: &str) -> String {
    format!(
        "I understand you're asking about \"{question}\". Based on the analyzed \
         legacy codebase and documentation, I don't have a specific answer for that \
         yet. Try rephrasing, or ask about database tables, business rules, or \
         project status."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_question_lists_tables() {
        for strategy in [StaticResponses::chat(), StaticResponses::document()] {
            let answer = strategy.answer("What database tables does the system use?");
            assert!(answer.contains("CUSTOMER-MASTER"));
            assert!(answer.contains("TRANSACTION-HISTORY"));
            assert!(answer.contains("SYSTEM-LOG"));
        }
    }

    #[test]
    fn unknown_question_echoes_input() {
        let answer = StaticResponses::chat().answer("foo bar baz");
        assert!(answer.contains("foo bar baz"));
        assert_eq!(answer, fallback("foo bar baz"));
    }

    #[test]
    fn matching_is_exact() {
        let chat = StaticResponses::chat();
        let canned = chat.answer("What database tables does the system use?");
        for variant in [
            "what database tables does the system use?",
            "What database tables does the system use? ",
            "What database tables does the system use",
        ] {
            let answer = chat.answer(variant);
            assert_ne!(answer, canned, "{variant}");
            assert!(answer.contains(variant));
        }
    }

    #[test]
    fn tables_are_distinct() {
        let chat = StaticResponses::chat();
        let doc = StaticResponses::document();
        assert!(chat.known_questions().contains(&"What is the current status of the project?"));
        assert!(!doc.known_questions().contains(&"What is the current status of the project?"));
        assert_eq!(
            doc.answer("What is the current status of the project?"),
            fallback("What is the current status of the project?")
        );
    }
}
