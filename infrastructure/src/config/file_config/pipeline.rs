//! Pipeline configuration from TOML (`[retrieval]` and `[resilience]` sections)

use planqa_application::{CallPolicy, PipelineParams};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retrieval sizing (`[retrieval]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetrievalConfig {
    /// Passages requested per sub-question.
    pub top_k: usize,
    /// Merged context size limit (0 = unlimited).
    pub max_context_passages: usize,
    /// Sub-question searches in flight at once.
    pub max_concurrent_queries: usize,
    /// Sub-questions kept from a plan.
    pub max_sub_questions: usize,
}

impl Default for FileRetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 4,
            max_context_passages: 12,
            max_concurrent_queries: 4,
            max_sub_questions: 5,
        }
    }
}

/// Timeouts and retries (`[resilience]`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResilienceConfig {
    /// Timeout for one external call attempt.
    pub call_timeout_secs: u64,
    /// Retries for transient failures.
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
    /// Global deadline for one cycle (0 = none).
    pub cycle_deadline_secs: u64,
}

impl Default for FileResilienceConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: 30,
            max_retries: 2,
            initial_backoff_ms: 250,
            max_backoff_ms: 4000,
            cycle_deadline_secs: 120,
        }
    }
}

impl FileResilienceConfig {
    pub fn to_call_policy(&self) -> CallPolicy {
        CallPolicy::default()
            .with_timeout(Duration::from_secs(self.call_timeout_secs))
            .with_max_retries(self.max_retries)
            .with_backoff(
                Duration::from_millis(self.initial_backoff_ms),
                Duration::from_millis(self.max_backoff_ms),
            )
    }
}

/// Combine `[retrieval]` and the cycle deadline into [`PipelineParams`].
pub(super) fn pipeline_params(
    retrieval: &FileRetrievalConfig,
    resilience: &FileResilienceConfig,
) -> PipelineParams {
    PipelineParams::default()
        .with_top_k(retrieval.top_k)
        .with_max_context_passages(
            (retrieval.max_context_passages > 0).then_some(retrieval.max_context_passages),
        )
        .with_max_concurrent_queries(retrieval.max_concurrent_queries)
        .with_max_sub_questions(retrieval.max_sub_questions)
        .with_cycle_deadline(
            (resilience.cycle_deadline_secs > 0)
                .then(|| Duration::from_secs(resilience.cycle_deadline_secs)),
        )
}
