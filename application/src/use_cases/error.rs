//! Errors surfaced by the pipeline stages and the orchestrator.

use crate::ports::llm_gateway::GatewayError;
use planqa_domain::Stage;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Failure of a single stage.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StageError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("language model unavailable: {0}")]
    Upstream(#[from] GatewayError),

    #[error("all {attempted} sub-question searches failed (last error: {last_error})")]
    RetrievalExhausted { attempted: usize, last_error: String },

    #[error("cancelled")]
    Cancelled,

    #[error("cancelled: cycle deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),
}

impl StageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StageError::InvalidInput(_) => ErrorKind::InvalidInput,
            StageError::Upstream(_) => ErrorKind::UpstreamUnavailable,
            StageError::RetrievalExhausted { .. } => ErrorKind::RetrievalExhausted,
            StageError::Cancelled | StageError::DeadlineExceeded(_) => ErrorKind::Cancelled,
        }
    }
}

/// Caller-visible classification of a failed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Empty or whitespace-only question
    InvalidInput,
    /// Language model failed after retries
    UpstreamUnavailable,
    /// Every sub-question's search failed
    RetrievalExhausted,
    /// Caller went away or the cycle deadline passed
    Cancelled,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::UpstreamUnavailable => "upstream_unavailable",
            ErrorKind::RetrievalExhausted => "retrieval_exhausted",
            ErrorKind::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cycle-fatal error, tagged with the stage it happened in.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{stage} stage failed: {source}")]
pub struct QueryError {
    pub stage: Stage,
    #[source]
    pub source: StageError,
}

impl QueryError {
    pub fn new(stage: Stage, source: StageError) -> Self {
        Self { stage, source }
    }

    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    pub fn is_cancelled(&self) -> bool {
        self.kind() == ErrorKind::Cancelled
    }
}
