//! Construction of the external adapters from configuration

use crate::config::{Credentials, FileConfig};
use crate::openai::{OpenAiChatGateway, OpenAiEmbeddings};
use crate::pinecone::{MetadataFields, PineconeEvidenceStore};
use planqa_application::{EvidenceStore, LlmGateway};
use std::sync::Arc;

const USER_AGENT: &str = concat!("planqa/", env!("CARGO_PKG_VERSION"));

/// The language model and evidence store a pipeline runs against.
pub struct Adapters {
    pub gateway: Arc<dyn LlmGateway>,
    pub store: Arc<dyn EvidenceStore>,
}

impl Adapters {
    /// Build both adapters over one shared HTTP client.
    ///
    /// Per-call timeouts are enforced by the pipeline, not the client.
    pub fn build(config: &FileConfig, credentials: &Credentials) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        let gateway = OpenAiChatGateway::new(
            client.clone(),
            &config.llm.base_url,
            credentials.openai_api_key.clone(),
            config.llm.model.clone(),
        )
        .with_temperature(config.llm.temperature)
        .with_max_tokens(config.llm.max_tokens);

        let embeddings = OpenAiEmbeddings::new(
            client.clone(),
            &config.llm.base_url,
            credentials.openai_api_key.clone(),
            config.embeddings.model.clone(),
        )
        .with_dimensions(config.embeddings.dimensions);

        let store = PineconeEvidenceStore::new(
            client,
            &credentials.pinecone_index_host,
            credentials.pinecone_api_key.clone(),
            embeddings,
        )
        .with_namespace(config.pinecone.namespace.clone())
        .with_api_version(config.pinecone.api_version.clone())
        .with_metadata_fields(MetadataFields {
            text: config.pinecone.text_field.clone(),
            source: config.pinecone.source_field.clone(),
            page: config.pinecone.page_field.clone(),
        });

        Ok(Self {
            gateway: Arc::new(gateway),
            store: Arc::new(store),
        })
    }
}
