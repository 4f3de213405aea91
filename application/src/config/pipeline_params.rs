//! Pipeline parameters: retrieval sizing and cycle limits.
//!
//! [`PipelineParams`] groups the static parameters that shape one cycle in
//! [`AnswerQuestionUseCase`](crate::use_cases::answer_question::AnswerQuestionUseCase).
//! They are read-only after startup and shared by every cycle.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cycle shaping parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineParams {
    /// Passages requested per sub-question (K).
    pub top_k: usize,
    /// Upper bound on merged context size; `None` keeps every passage.
    pub max_context_passages: Option<usize>,
    /// Sub-question searches allowed in flight at once.
    pub max_concurrent_queries: usize,
    /// Upper bound on sub-questions kept from a plan.
    pub max_sub_questions: usize,
    /// Global deadline for one cycle.
    pub cycle_deadline: Option<Duration>,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            top_k: 4,
            max_context_passages: Some(12),
            max_concurrent_queries: 4,
            max_sub_questions: 5,
            cycle_deadline: Some(Duration::from_secs(120)),
        }
    }
}

impl PipelineParams {
    // ==================== Builder Methods ====================

    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    pub fn with_max_context_passages(mut self, max: Option<usize>) -> Self {
        self.max_context_passages = max;
        self
    }

    pub fn with_max_concurrent_queries(mut self, max: usize) -> Self {
        self.max_concurrent_queries = max;
        self
    }

    pub fn with_max_sub_questions(mut self, max: usize) -> Self {
        self.max_sub_questions = max;
        self
    }

    pub fn with_cycle_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.cycle_deadline = deadline;
        self
    }
}
