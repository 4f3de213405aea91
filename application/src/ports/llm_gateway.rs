//! LLM Gateway port
//!
//! Defines the interface for communicating with the language model.

use super::external_call::ExternalCallError;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Other error: {0}")]
    Other(String),
}

impl ExternalCallError for GatewayError {
    fn is_transient(&self) -> bool {
        match self {
            GatewayError::ConnectionError(_) | GatewayError::Timeout(_) => true,
            GatewayError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            GatewayError::Authentication(_)
            | GatewayError::InvalidResponse(_)
            | GatewayError::Other(_) => false,
        }
    }

    fn timed_out(after: Duration) -> Self {
        GatewayError::Timeout(after)
    }
}

/// Gateway for language model completions
///
/// Each call is stateless: no conversation is kept between calls, so one
/// gateway can serve many concurrent cycles. Implementations (adapters) live
/// in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Complete `prompt` under the given system prompt.
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, GatewayError>;

    /// Model identifier, for logging.
    fn model_name(&self) -> &str;
}
