//! Input documents and coverage analysis
//!
//! A project lists the documents supplied for the legacy system. Coverage is
//! measured against a fixed checklist of required documents using a coarse
//! keyword heuristic: four keyword families need a matching document type,
//! everything else counts as provided once any document exists.

use serde::{Deserialize, Serialize};

/// Kind of supplied document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Codebase,
    UserManual,
    MeetingRecording,
    Fsa,
    Other,
}

impl DocumentType {
    /// Display label
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Codebase => "Codebase",
            Self::UserManual => "User Manual",
            Self::MeetingRecording => "Meeting Recording",
            Self::Fsa => "Functional Specification",
            Self::Other => "Other",
        }
    }
}

/// Document supplied by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDocument {
    pub name: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    pub description: String,
    pub version: String,
    pub date: String,
}

impl InputDocument {
    /// Create a document at version 1.0 with no date
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        doc_type: DocumentType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            doc_type,
            description: description.into(),
            version: "1.0".to_string(),
            date: String::new(),
        }
    }

    /// With version label
    #[inline]
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// With date label
    #[inline]
    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }
}

/// Group of required documents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredCategory {
    pub name: &'static str,
    pub documents: &'static [&'static str],
}

/// Required-document checklist
pub static REQUIRED_DOCUMENTS: &[RequiredCategory] = &[
    RequiredCategory {
        name: "Source Code",
        documents: &[
            "COBOL source code modules",
            "JCL job streams",
            "Copybooks and data definitions",
        ],
    },
    RequiredCategory {
        name: "Documentation",
        documents: &[
            "User manual and operating guides",
            "Functional specification (FSA)",
            "System architecture diagrams",
        ],
    },
    RequiredCategory {
        name: "Knowledge Transfer",
        documents: &["SME meeting recordings", "Process walkthrough notes"],
    },
    RequiredCategory {
        name: "Operations",
        documents: &["Database schemas", "Batch schedules", "Test data sets"],
    },
];

/// Keyword family that ties a required document to a document type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct KeywordFamily {
    keywords: &'static [&'static str],
    doc_type: DocumentType,
}

// Checked in order; the first family with a matching keyword decides.
const FAMILIES: &[KeywordFamily] = &[
    KeywordFamily {
        keywords: &["source code", "cobol", "jcl"],
        doc_type: DocumentType::Codebase,
    },
    KeywordFamily {
        keywords: &["user manual", "user guide"],
        doc_type: DocumentType::UserManual,
    },
    KeywordFamily {
        keywords: &["meeting", "recording"],
        doc_type: DocumentType::MeetingRecording,
    },
    KeywordFamily {
        keywords: &["functional spec", "fsa"],
        doc_type: DocumentType::Fsa,
    },
];

/// Document type a required description demands, if it falls in a keyword
/// family
#[must_use]
pub fn required_type(description: &str) -> Option<DocumentType> {
    let lowered = description.to_lowercase();
    FAMILIES
        .iter()
        .find(|f| f.keywords.iter().any(|k| lowered.contains(k)))
        .map(|f| f.doc_type)
}

/// Whether `required` counts as provided by `documents`
#[must_use]
pub fn is_provided(required: &str, documents: &[InputDocument]) -> bool {
    match required_type(required) {
        Some(doc_type) => documents.iter().any(|d| d.doc_type == doc_type),
        None => !documents.is_empty(),
    }
}

/// Result of a coverage analysis
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoverageReport {
    pub provided: Vec<String>,
    pub missing: Vec<String>,
    pub total_required: usize,
    pub total_provided: usize,
}

impl CoverageReport {
    /// `round(100 * provided / required)`, 0 for an empty checklist
    #[must_use]
    pub fn coverage_percentage(&self) -> u8 {
        if self.total_required == 0 {
            return 0;
        }
        let provided = self.total_provided.min(self.total_required) as f64;
        let pct = (100.0 * provided / self.total_required as f64).round();
        // provided <= required keeps pct within [0, 100]
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let pct = pct as u8;
        pct
    }

    /// Traffic-light rating of the percentage
    #[must_use]
    pub fn traffic_light(&self) -> TrafficLight {
        TrafficLight::for_percentage(self.coverage_percentage())
    }

    #[inline]
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Coverage rating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficLight {
    Green,
    Yellow,
    Red,
}

impl TrafficLight {
    /// `>= 80` green, `>= 60` yellow, else red
    #[must_use]
    pub fn for_percentage(pct: u8) -> Self {
        match pct {
            80.. => Self::Green,
            60..=79 => Self::Yellow,
            _ => Self::Red,
        }
    }
}

/// Analyze `documents` against the built-in checklist
#[must_use]
pub fn analyze_coverage(documents: &[InputDocument]) -> CoverageReport {
    analyze_against(REQUIRED_DOCUMENTS, documents)
}

/// Analyze `documents` against a custom checklist
#[must_use]
pub fn analyze_against(
    checklist: &[RequiredCategory],
    documents: &[InputDocument],
) -> CoverageReport {
    let (provided, missing): (Vec<_>, Vec<_>) = checklist
        .iter()
        .flat_map(|c| c.documents.iter())
        .map(|d| ((*d).to_string(), is_provided(d, documents)))
        .partition(|(_, ok)| *ok);

    let provided: Vec<String> = provided.into_iter().map(|(d, _)| d).collect();
    let missing: Vec<String> = missing.into_iter().map(|(d, _)| d).collect();
    let report = CoverageReport {
        total_required: provided.len() + missing.len(),
        total_provided: provided.len(),
        provided,
        missing,
    };
    tracing::debug!(
        provided = report.total_provided,
        required = report.total_required,
        "coverage analyzed"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn doc(doc_type: DocumentType) -> InputDocument {
        InputDocument::new("doc", doc_type, "anything")
    }

    #[test]
    fn empty_list_provides_nothing() {
        let report = analyze_coverage(&[]);
        assert_eq!(report.total_required, 11);
        assert_eq!(report.total_provided, 0);
        assert_eq!(report.coverage_percentage(), 0);
        assert_eq!(report.traffic_light(), TrafficLight::Red);
    }

    #[test]
    fn any_document_covers_soft_entries() {
        let report = analyze_coverage(&[doc(DocumentType::Other)]);
        // six entries match no keyword family
        assert_eq!(report.total_provided, 6);
        assert!(report.provided.contains(&"Copybooks and data definitions".to_string()));
        assert!(report.missing.contains(&"JCL job streams".to_string()));
        assert_eq!(report.coverage_percentage(), 55);
    }

    #[test]
    fn codebase_covers_source_family() {
        let report = analyze_coverage(&[doc(DocumentType::Codebase)]);
        assert!(report.provided.contains(&"COBOL source code modules".to_string()));
        assert!(report.provided.contains(&"JCL job streams".to_string()));
        assert_eq!(report.total_provided, 8);
        assert_eq!(report.coverage_percentage(), 73);
        assert_eq!(report.traffic_light(), TrafficLight::Yellow);
    }

    #[test]
    fn all_types_give_full_coverage() {
        let docs = [
            doc(DocumentType::Codebase),
            doc(DocumentType::UserManual),
            doc(DocumentType::MeetingRecording),
            doc(DocumentType::Fsa),
        ];
        let report = analyze_coverage(&docs);
        assert!(report.is_complete());
        assert_eq!(report.coverage_percentage(), 100);
        assert_eq!(report.traffic_light(), TrafficLight::Green);
    }

    #[test]
    fn keyword_matching_is_case_insensitive() {
        assert_eq!(required_type("Legacy COBOL programs"), Some(DocumentType::Codebase));
        assert_eq!(required_type("the USER GUIDE"), Some(DocumentType::UserManual));
        assert_eq!(required_type("Kickoff Recording"), Some(DocumentType::MeetingRecording));
        assert_eq!(required_type("fsa v2"), Some(DocumentType::Fsa));
        assert_eq!(required_type("Batch schedules"), None);
    }

    #[test]
    fn first_family_wins() {
        // mentions both jcl and meeting; codebase family is checked first
        assert_eq!(required_type("JCL meeting notes"), Some(DocumentType::Codebase));
    }

    #[test]
    fn traffic_light_thresholds() {
        assert_eq!(TrafficLight::for_percentage(100), TrafficLight::Green);
        assert_eq!(TrafficLight::for_percentage(80), TrafficLight::Green);
        assert_eq!(TrafficLight::for_percentage(79), TrafficLight::Yellow);
        assert_eq!(TrafficLight::for_percentage(60), TrafficLight::Yellow);
        assert_eq!(TrafficLight::for_percentage(59), TrafficLight::Red);
    }

    #[test]
    fn custom_empty_checklist() {
        let report = analyze_against(&[], &[doc(DocumentType::Codebase)]);
        assert_eq!(report.total_required, 0);
        assert_eq!(report.coverage_percentage(), 0);
    }

    #[test]
    fn document_type_serializes_as_type() {
        let json = serde_json::to_value(doc(DocumentType::MeetingRecording)).unwrap();
        assert_eq!(json["type"], "meeting_recording");
    }

    fn doc_type_strategy() -> impl Strategy<Value = DocumentType> {
        prop_oneof![
            Just(DocumentType::Codebase),
            Just(DocumentType::UserManual),
            Just(DocumentType::MeetingRecording),
            Just(DocumentType::Fsa),
            Just(DocumentType::Other),
        ]
    }

    proptest! {
        #[test]
        fn percentage_matches_formula(types in proptest::collection::vec(doc_type_strategy(), 0..8)) {
            let docs: Vec<_> = types.into_iter().map(doc).collect();
            let report = analyze_coverage(&docs);
            let expected = (100.0 * report.total_provided as f64 / report.total_required as f64).round();
            prop_assert_eq!(f64::from(report.coverage_percentage()), expected);
            prop_assert!(report.coverage_percentage() <= 100);
            prop_assert_eq!(report.provided.len() + report.missing.len(), report.total_required);
        }

        #[test]
        fn family_pairings_hold(types in proptest::collection::vec(doc_type_strategy(), 0..8)) {
            let docs: Vec<_> = types.iter().copied().map(doc).collect();
            let report = analyze_coverage(&docs);
            for required in REQUIRED_DOCUMENTS.iter().flat_map(|c| c.documents.iter()) {
                let provided = report.provided.iter().any(|p| p == required);
                let expected = match required_type(required) {
                    Some(t) => types.contains(&t),
                    None => !types.is_empty(),
                };
                prop_assert_eq!(provided, expected, "{}", required);
            }
        }
    }
}
