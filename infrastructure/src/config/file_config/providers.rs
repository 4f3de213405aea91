//! Provider configuration from TOML (`[llm]`, `[embeddings]`, `[pinecone]` sections)

use serde::{Deserialize, Serialize};

/// Chat completion model configuration (`[llm]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    /// Model name (default: "gpt-4o-mini").
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Max tokens per completion; provider default when unset.
    pub max_tokens: Option<u32>,
    /// Base URL of an OpenAI-compatible API.
    pub base_url: String,
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (prefer the env var).
    pub api_key: Option<String>,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.0,
            max_tokens: None,
            base_url: "https://api.openai.com/v1".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
        }
    }
}

/// Query embedding configuration (`[embeddings]`).
///
/// Uses the `[llm]` base URL and API key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileEmbeddingsConfig {
    /// Embedding model; must match the model the index was built with.
    pub model: String,
    /// Output dimensions, for models that support shortening.
    pub dimensions: Option<usize>,
}

impl Default for FileEmbeddingsConfig {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-large".to_string(),
            dimensions: None,
        }
    }
}

/// Pinecone index configuration (`[pinecone]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePineconeConfig {
    /// Index data-plane host, e.g. `my-index-abc123.svc.us-east-1.pinecone.io`.
    pub index_host: Option<String>,
    /// Environment variable consulted when `index_host` is unset.
    pub index_host_env: String,
    /// Environment variable name for the API key (default: "PINECONE_API_KEY").
    pub api_key_env: String,
    /// Direct API key (prefer the env var).
    pub api_key: Option<String>,
    pub namespace: Option<String>,
    /// Metadata field holding the passage text.
    pub text_field: String,
    /// Metadata field holding the source document.
    pub source_field: String,
    /// Metadata field holding the page number.
    pub page_field: String,
    /// `X-Pinecone-API-Version` header value.
    pub api_version: String,
}

impl Default for FilePineconeConfig {
    fn default() -> Self {
        Self {
            index_host: None,
            index_host_env: "PINECONE_INDEX_HOST".to_string(),
            api_key_env: "PINECONE_API_KEY".to_string(),
            api_key: None,
            namespace: None,
            text_field: "text".to_string(),
            source_field: "source".to_string(),
            page_field: "page".to_string(),
            api_version: "2024-07".to_string(),
        }
    }
}
