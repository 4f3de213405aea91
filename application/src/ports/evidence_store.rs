//! Evidence Store port
//!
//! Similarity search over the indexed document corpus.

use super::external_call::ExternalCallError;
use super::llm_gateway::GatewayError;
use async_trait::async_trait;
use planqa_domain::Passage;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during evidence store searches
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvidenceStoreError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Query embedding failed: {0}")]
    Embedding(#[source] GatewayError),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl ExternalCallError for EvidenceStoreError {
    fn is_transient(&self) -> bool {
        match self {
            EvidenceStoreError::ConnectionError(_) | EvidenceStoreError::Timeout(_) => true,
            EvidenceStoreError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            EvidenceStoreError::Embedding(inner) => inner.is_transient(),
            EvidenceStoreError::Authentication(_) | EvidenceStoreError::InvalidResponse(_) => false,
        }
    }

    fn timed_out(after: Duration) -> Self {
        EvidenceStoreError::Timeout(after)
    }
}

/// Similarity search over an external index
///
/// Must be safe to call concurrently from many sub-questions and cycles.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Top `k` passages for `query`, most relevant first.
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>, EvidenceStoreError>;
}
