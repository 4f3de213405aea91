//! Pinecone-backed evidence store

use super::types::{MetadataFields, QueryRequest, QueryResponse};
use crate::openai::OpenAiEmbeddings;
use async_trait::async_trait;
use planqa_application::{EvidenceStore, EvidenceStoreError};
use planqa_domain::Passage;
use planqa_domain::core::string::truncate;
use tracing::debug;

/// [`EvidenceStore`] that embeds each query and searches a Pinecone index.
///
/// The index must have been built with the same embedding model.
pub struct PineconeEvidenceStore {
    client: reqwest::Client,
    query_url: String,
    api_key: String,
    api_version: String,
    namespace: Option<String>,
    fields: MetadataFields,
    embeddings: OpenAiEmbeddings,
}

impl PineconeEvidenceStore {
    /// `index_host` may be given with or without a scheme.
    pub fn new(
        client: reqwest::Client,
        index_host: &str,
        api_key: impl Into<String>,
        embeddings: OpenAiEmbeddings,
    ) -> Self {
        Self {
            client,
            query_url: format!("{}/query", normalize_host(index_host)),
            api_key: api_key.into(),
            api_version: "2024-07".to_string(),
            namespace: None,
            fields: MetadataFields::default(),
            embeddings,
        }
    }

    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace.filter(|ns| !ns.is_empty());
        self
    }

    pub fn with_metadata_fields(mut self, fields: MetadataFields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    async fn query(&self, vector: Vec<f32>, k: usize) -> Result<QueryResponse, EvidenceStoreError> {
        let request = QueryRequest {
            vector,
            top_k: k,
            include_metadata: true,
            namespace: self.namespace.as_deref(),
        };

        let response = self
            .client
            .post(&self.query_url)
            .header("Api-Key", &self.api_key)
            .header("X-Pinecone-API-Version", &self.api_version)
            .json(&request)
            .send()
            .await
            .map_err(|e| EvidenceStoreError::ConnectionError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| EvidenceStoreError::ConnectionError(e.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        serde_json::from_str(&body).map_err(|e| EvidenceStoreError::InvalidResponse(e.to_string()))
    }
}

fn normalize_host(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

fn status_error(status: u16, body: &str) -> EvidenceStoreError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
        .unwrap_or_else(|| truncate(body.trim(), 500));
    match status {
        401 | 403 => EvidenceStoreError::Authentication(message),
        _ => EvidenceStoreError::HttpStatus { status, message },
    }
}

#[async_trait]
impl EvidenceStore for PineconeEvidenceStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>, EvidenceStoreError> {
        let vector = self
            .embeddings
            .embed(query)
            .await
            .map_err(EvidenceStoreError::Embedding)?;

        let response = self.query(vector, k).await?;
        let total = response.matches.len();
        let passages: Vec<Passage> = response
            .matches
            .into_iter()
            .filter_map(|m| m.into_passage(&self.fields))
            .collect();

        debug!(
            matches = total,
            passages = passages.len(),
            top_k = k,
            embedding_model = self.embeddings.model_name(),
            "Pinecone query complete"
        );
        Ok(passages)
    }
}
