//! Final result of one cycle

use crate::answer::{DraftAnswer, VerificationResult};
use crate::core::question::Question;
use crate::plan::Plan;
use serde::{Deserialize, Serialize};

/// How the final answer came about.
///
/// Kept for auditing; the HTTP response only carries the answer text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    /// Draft approved as-is
    Verified,
    /// Draft replaced by the verifier's correction
    Corrected,
    /// Retrieval found nothing; the answer says so
    NoInformation,
    /// Verifier found no support; the answer says so
    Unsupported,
}

impl AnswerOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerOutcome::Verified => "verified",
            AnswerOutcome::Corrected => "corrected",
            AnswerOutcome::NoInformation => "no_information",
            AnswerOutcome::Unsupported => "unsupported",
        }
    }
}

impl std::fmt::Display for AnswerOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-visible answer for an unsupported draft.
pub fn unsupported_answer(reason: &str) -> String {
    format!(
        "No verified answer could be found in the indexed documents. Reason: {}",
        reason.trim()
    )
}

/// Response object of one cycle. Every field is populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub answer: String,
    /// Rendered context (`[Chunk N]` labelled passages)
    pub context: String,
    /// Rendered plan
    pub plan: String,
    pub sub_questions: Vec<String>,
    #[serde(skip)]
    pub outcome: Option<AnswerOutcome>,
}

impl QueryResult {
    /// Shape the final result from the verifier's verdict on `draft`.
    pub fn assemble(
        question: &Question,
        plan: &Plan,
        draft: &DraftAnswer<'_>,
        verdict: VerificationResult,
    ) -> Self {
        let (answer, outcome) = match verdict {
            VerificationResult::Approved if !draft.is_grounded() => {
                (draft.text().to_string(), AnswerOutcome::NoInformation)
            }
            VerificationResult::Approved => (draft.text().to_string(), AnswerOutcome::Verified),
            VerificationResult::Revised(text) => (text, AnswerOutcome::Corrected),
            VerificationResult::Unsupported(reason) => {
                (unsupported_answer(&reason), AnswerOutcome::Unsupported)
            }
        };

        Self {
            answer,
            context: draft.context().render(),
            plan: plan.render(question),
            sub_questions: plan.sub_question_texts(),
            outcome: Some(outcome),
        }
    }

    pub fn outcome(&self) -> Option<AnswerOutcome> {
        self.outcome
    }

    /// Whether the verifier replaced the draft.
    pub fn is_corrected(&self) -> bool {
        self.outcome == Some(AnswerOutcome::Corrected)
    }
}
