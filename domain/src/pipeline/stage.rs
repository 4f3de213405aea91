//! Pipeline stages

use serde::{Deserialize, Serialize};

/// One step of the question-answering pipeline.
///
/// Used to attribute failures: every caller-visible error names the stage
/// it happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Question validation and decomposition into sub-questions
    Planning,
    /// Evidence search for every sub-question
    Retrieval,
    /// Draft answer synthesis from the context
    Answering,
    /// Draft checking against the context
    Verification,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Planning => "planning",
            Stage::Retrieval => "retrieval",
            Stage::Answering => "answering",
            Stage::Verification => "verification",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Planning => "Planning",
            Stage::Retrieval => "Retrieval",
            Stage::Answering => "Answering",
            Stage::Verification => "Verification",
        }
    }

    /// All stages in execution order.
    pub fn all() -> [Stage; 4] {
        [
            Stage::Planning,
            Stage::Retrieval,
            Stage::Answering,
            Stage::Verification,
        ]
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
