//! Credential resolution for the OpenAI and Pinecone adapters

use super::file_config::FileConfig;
use thiserror::Error;

/// One or more required credentials could not be found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Missing required credentials: {}. Set these in the config file or environment variables.",
    .0.join(", ")
)]
pub struct MissingCredentials(pub Vec<String>);

/// Secrets and endpoints needed to build the adapters.
#[derive(Clone)]
pub struct Credentials {
    pub openai_api_key: String,
    pub pinecone_api_key: String,
    pub pinecone_index_host: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("openai_api_key", &"<redacted>")
            .field("pinecone_api_key", &"<redacted>")
            .field("pinecone_index_host", &self.pinecone_index_host)
            .finish()
    }
}

impl Credentials {
    /// Resolve credentials from the config, falling back to the process environment.
    pub fn resolve(config: &FileConfig) -> Result<Self, MissingCredentials> {
        Self::resolve_with(config, |name| std::env::var(name).ok())
    }

    /// Resolve credentials using `lookup` for environment variables.
    ///
    /// Direct values in the config win over environment variables. Every
    /// missing variable is reported, not just the first.
    pub fn resolve_with(
        config: &FileConfig,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, MissingCredentials> {
        let mut missing = Vec::new();
        let mut pick = |direct: &Option<String>, env_name: &str| {
            let value = direct
                .clone()
                .or_else(|| lookup(env_name))
                .filter(|v| !v.trim().is_empty());
            if value.is_none() {
                missing.push(env_name.to_string());
            }
            value.unwrap_or_default()
        };

        let openai_api_key = pick(&config.llm.api_key, &config.llm.api_key_env);
        let pinecone_api_key = pick(&config.pinecone.api_key, &config.pinecone.api_key_env);
        let pinecone_index_host = pick(
            &config.pinecone.index_host,
            &config.pinecone.index_host_env,
        );

        if !missing.is_empty() {
            return Err(MissingCredentials(missing));
        }

        Ok(Self {
            openai_api_key,
            pinecone_api_key,
            pinecone_index_host,
        })
    }
}
