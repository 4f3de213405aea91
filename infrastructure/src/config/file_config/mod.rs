//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! once validated.

mod pipeline;
mod providers;
mod server;

pub use pipeline::{FileResilienceConfig, FileRetrievalConfig};
pub use providers::{FileEmbeddingsConfig, FileLlmConfig, FilePineconeConfig};
pub use server::{FileLoggingConfig, FileServerConfig};

use planqa_application::{CallPolicy, PipelineParams};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A configuration value that would make the pipeline unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigValidationError {
    #[error("{field}: must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("{field}: must not be empty")]
    EmptyValue { field: &'static str },

    #[error("resilience.max_backoff_ms ({max}) is smaller than resilience.initial_backoff_ms ({initial})")]
    BackoffOrder { initial: u64, max: u64 },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Chat completion model
    pub llm: FileLlmConfig,
    /// Query embedding model
    pub embeddings: FileEmbeddingsConfig,
    /// Evidence store index
    pub pinecone: FilePineconeConfig,
    /// Retrieval sizing
    pub retrieval: FileRetrievalConfig,
    /// Timeouts, retries, deadline
    pub resilience: FileResilienceConfig,
    /// HTTP server bind address
    pub server: FileServerConfig,
    /// Audit log
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected problems.
    ///
    /// Credentials are not checked here; they are resolved lazily when the
    /// adapters are built so that `--show-config` works without them.
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();

        let non_zero = [
            ("retrieval.top_k", self.retrieval.top_k as u64),
            (
                "retrieval.max_concurrent_queries",
                self.retrieval.max_concurrent_queries as u64,
            ),
            (
                "retrieval.max_sub_questions",
                self.retrieval.max_sub_questions as u64,
            ),
            (
                "resilience.call_timeout_secs",
                self.resilience.call_timeout_secs,
            ),
        ];
        errors.extend(
            non_zero
                .into_iter()
                .filter(|(_, value)| *value == 0)
                .map(|(field, _)| ConfigValidationError::ZeroValue { field }),
        );

        let non_empty = [
            ("llm.model", &self.llm.model),
            ("llm.base_url", &self.llm.base_url),
            ("embeddings.model", &self.embeddings.model),
            ("pinecone.text_field", &self.pinecone.text_field),
        ];
        errors.extend(
            non_empty
                .into_iter()
                .filter(|(_, value)| value.trim().is_empty())
                .map(|(field, _)| ConfigValidationError::EmptyValue { field }),
        );

        if self.resilience.max_backoff_ms < self.resilience.initial_backoff_ms {
            errors.push(ConfigValidationError::BackoffOrder {
                initial: self.resilience.initial_backoff_ms,
                max: self.resilience.max_backoff_ms,
            });
        }

        errors
    }

    pub fn pipeline_params(&self) -> PipelineParams {
        pipeline::pipeline_params(&self.retrieval, &self.resilience)
    }

    pub fn call_policy(&self) -> CallPolicy {
        self.resilience.to_call_policy()
    }
}
