//! Plan entities
//!
//! A [`Plan`] is the Planner's decomposition of one [`Question`]: an optional
//! rephrasing plus an ordered, non-empty list of [`SubQuestion`]s. Order is
//! significant because it drives retrieval priority.

use crate::core::question::Question;
use serde::Serialize;
use std::collections::HashSet;

/// Fragments at or below this length are discarded when parsing a plan.
const MIN_SUB_QUESTION_LEN: usize = 6;

/// One atomic question the Retriever searches for (Value Object)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubQuestion(String);

impl SubQuestion {
    /// Returns `None` when the text is empty after trimming.
    pub fn new(text: impl AsRef<str>) -> Option<Self> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key used to detect redundant sub-questions.
    fn dedup_key(&self) -> String {
        self.0
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .trim_end_matches(['?', '.', '!'])
            .to_lowercase()
    }
}

impl std::fmt::Display for SubQuestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unvalidated planner output, as extracted from the model's completion.
///
/// Produced by [`parse_plan`](super::parser::parse_plan) and turned into a
/// [`Plan`] with [`Plan::from_draft`], which enforces the plan invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanDraft {
    pub rephrased_question: Option<String>,
    pub key_concepts: Vec<String>,
    pub strategy: Option<String>,
    pub sub_questions: Vec<String>,
}

/// Retrieval plan for a single question (Entity)
///
/// Invariant: `sub_questions` is never empty. Plans are only built through
/// [`Plan::fallback`] and [`Plan::from_draft`], so there is no `Deserialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Plan {
    rephrased_question: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    key_concepts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    strategy: Option<String>,
    sub_questions: Vec<SubQuestion>,
}

impl Plan {
    /// Single-step plan that searches for the question itself.
    pub fn fallback(question: &Question) -> Self {
        Self {
            rephrased_question: None,
            key_concepts: Vec::new(),
            strategy: None,
            sub_questions: vec![SubQuestion(question.content().to_string())],
        }
    }

    /// Build a plan from parsed planner output.
    ///
    /// Sub-questions are trimmed, short fragments dropped, redundant entries
    /// removed (case- and punctuation-insensitive) and the list capped at
    /// `max_sub_questions`. If nothing survives, the original question becomes
    /// the only sub-question so decomposition never reduces coverage.
    pub fn from_draft(question: &Question, draft: PlanDraft, max_sub_questions: usize) -> Self {
        let mut seen = HashSet::new();
        let mut sub_questions: Vec<SubQuestion> = draft
            .sub_questions
            .iter()
            .filter_map(SubQuestion::new)
            .filter(|sq| sq.as_str().chars().count() >= MIN_SUB_QUESTION_LEN)
            .filter(|sq| seen.insert(sq.dedup_key()))
            .collect();
        sub_questions.truncate(max_sub_questions.max(1));

        if sub_questions.is_empty() {
            sub_questions.push(SubQuestion(question.content().to_string()));
        }

        Self {
            rephrased_question: non_empty(draft.rephrased_question),
            key_concepts: draft
                .key_concepts
                .into_iter()
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty())
                .collect(),
            strategy: non_empty(draft.strategy),
            sub_questions,
        }
    }

    pub fn rephrased_question(&self) -> Option<&str> {
        self.rephrased_question.as_deref()
    }

    pub fn key_concepts(&self) -> &[String] {
        &self.key_concepts
    }

    pub fn strategy(&self) -> Option<&str> {
        self.strategy.as_deref()
    }

    pub fn sub_questions(&self) -> &[SubQuestion] {
        &self.sub_questions
    }

    pub fn sub_question_texts(&self) -> Vec<String> {
        self.sub_questions.iter().map(|sq| sq.0.clone()).collect()
    }

    /// Human-readable rendering used in the `plan` response field.
    ///
    /// The first lines start with `Original Question:` and
    /// `Rephrased Question:` so a UI can highlight them.
    pub fn render(&self, question: &Question) -> String {
        let mut out = format!("Original Question: {}\n", question.content());
        if let Some(rephrased) = &self.rephrased_question {
            out.push_str(&format!("Rephrased Question: {}\n", rephrased));
        }
        if !self.key_concepts.is_empty() {
            out.push_str(&format!("Key Concepts: {}\n", self.key_concepts.join(", ")));
        }
        if let Some(strategy) = &self.strategy {
            out.push_str(&format!("Search Strategy: {}\n", strategy));
        }
        out.push_str("Sub-Questions:\n");
        for (i, sq) in self.sub_questions.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, sq));
        }
        out.trim_end().to_string()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
