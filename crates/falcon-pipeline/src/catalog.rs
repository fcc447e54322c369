//! Fixed catalog of modernization pipeline stages
//!
//! Eleven ordered stages, addressed by 1-based index. The catalog is static
//! data and is never mutated.

use serde::Serialize;

/// Number of stages in the pipeline
pub const STAGE_COUNT: usize = 11;

/// Index of the terminal stage (no countdown is ever started for it)
pub const TERMINAL_STAGE: usize = STAGE_COUNT;

/// One step of the modernization pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    /// Stable identifier
    pub key: &'static str,
    /// Display name
    pub name: &'static str,
    /// What happens during the stage
    pub description: &'static str,
    /// Planned duration label (display only)
    pub duration: &'static str,
    /// Outputs handed to the next stage
    pub deliverables: &'static [&'static str],
    /// Roles involved
    pub team: &'static [&'static str],
    /// Tooling used
    pub tools: &'static [&'static str],
}

static STAGES: [Stage; STAGE_COUNT] = [
    Stage {
        key: "input-documents",
        name: "Input Documents",
        description: "Collect source code, manuals, recordings and functional specifications for the legacy system.",
        duration: "1-2 days",
        deliverables: &["Document inventory", "Coverage checklist"],
        team: &["Project Manager", "SME"],
        tools: &["Document Portal"],
    },
    Stage {
        key: "code-analysis",
        name: "Legacy Code Analysis",
        description: "Parse COBOL programs, copybooks and JCL to build a dependency map of the application.",
        duration: "3-5 days",
        deliverables: &["Program inventory", "Dependency graph", "Complexity report"],
        team: &["AI Engine", "Legacy Architect"],
        tools: &["COBOL Parser", "JCL Analyzer"],
    },
    Stage {
        key: "business-rules",
        name: "Business Rules Extraction",
        description: "Extract business rules embedded in procedural code and cross-check them against manuals.",
        duration: "5-7 days",
        deliverables: &["Business rules catalog", "Rule traceability matrix"],
        team: &["AI Engine", "Business Analyst", "SME"],
        tools: &["Rules Extractor"],
    },
    Stage {
        key: "functional-spec",
        name: "Functional Specification",
        description: "Generate a functional specification of the system from extracted rules and meeting recordings.",
        duration: "4-6 days",
        deliverables: &["Functional specification", "Data dictionary"],
        team: &["AI Engine", "Business Analyst"],
        tools: &["Spec Generator", "Transcription Service"],
    },
    Stage {
        key: "sme-review",
        name: "SME Review",
        description: "Subject-matter experts validate the generated specification and resolve open questions.",
        duration: "3-5 days",
        deliverables: &["Reviewed specification", "Issue log"],
        team: &["SME", "Business Analyst"],
        tools: &["Review Board"],
    },
    Stage {
        key: "target-architecture",
        name: "Target Architecture",
        description: "Design the target platform, service boundaries and data migration approach.",
        duration: "3-4 days",
        deliverables: &["Architecture blueprint", "Migration plan"],
        team: &["Solution Architect", "AI Engine"],
        tools: &["Architecture Modeler"],
    },
    Stage {
        key: "code-conversion",
        name: "Code Conversion",
        description: "Translate legacy programs into the target language following the approved architecture.",
        duration: "10-15 days",
        deliverables: &["Converted source code", "Conversion log"],
        team: &["AI Engine", "Developers"],
        tools: &["Code Translator", "Refactoring Engine"],
    },
    Stage {
        key: "unit-testing",
        name: "Unit Test Generation",
        description: "Generate and run unit tests that pin converted behavior to the extracted business rules.",
        duration: "5-7 days",
        deliverables: &["Unit test suite", "Coverage report"],
        team: &["AI Engine", "QA Engineer"],
        tools: &["Test Generator"],
    },
    Stage {
        key: "integration-testing",
        name: "Integration Testing",
        description: "Compare converted system outputs with legacy outputs over production-like data sets.",
        duration: "7-10 days",
        deliverables: &["Parallel run report", "Defect log"],
        team: &["QA Engineer", "Developers"],
        tools: &["Parallel Run Harness", "Data Comparator"],
    },
    Stage {
        key: "user-acceptance",
        name: "User Acceptance",
        description: "Business users and SMEs sign off on the converted system.",
        duration: "5-7 days",
        deliverables: &["UAT sign-off", "Training material"],
        team: &["SME", "Business Users", "Project Manager"],
        tools: &["UAT Tracker"],
    },
    Stage {
        key: "deployment",
        name: "Deployment",
        description: "Cut over to the modernized system and decommission the legacy workload.",
        duration: "2-3 days",
        deliverables: &["Deployment runbook", "Go-live report"],
        team: &["DevOps", "Project Manager"],
        tools: &["CI/CD Pipeline"],
    },
];

/// All stages in pipeline order
#[inline]
#[must_use]
pub fn stages() -> &'static [Stage] {
    &STAGES
}

/// Look up a stage by 1-based index
#[inline]
#[must_use]
pub fn stage(index: usize) -> Option<&'static Stage> {
    index.checked_sub(1).and_then(|i| STAGES.get(i))
}

/// Look up a stage by key, returning its 1-based index
#[must_use]
pub fn stage_by_key(key: &str) -> Option<(usize, &'static Stage)> {
    STAGES
        .iter()
        .enumerate()
        .find(|(_, s)| s.key == key)
        .map(|(i, s)| (i + 1, s))
}

/// Display name for a stage index, falling back to the number
#[must_use]
pub fn stage_name(index: usize) -> String {
    stage(index).map_or_else(|| format!("Stage {index}"), |s| s.name.to_string())
}

/// Whether the index is the terminal stage
#[inline]
#[must_use]
pub fn is_terminal(index: usize) -> bool {
    index >= TERMINAL_STAGE
}
