//! Pinecone query wire types

use planqa_domain::Passage;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct QueryRequest<'a> {
    pub vector: Vec<f32>,
    pub top_k: usize,
    pub include_metadata: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<&'a str>,
}

#[derive(Deserialize)]
pub(super) struct QueryResponse {
    #[serde(default)]
    pub matches: Vec<Match>,
}

#[derive(Deserialize)]
pub(super) struct Match {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

/// Metadata keys read from each match.
#[derive(Debug, Clone)]
pub struct MetadataFields {
    pub text: String,
    pub source: String,
    pub page: String,
}

impl Default for MetadataFields {
    fn default() -> Self {
        Self {
            text: "text".to_string(),
            source: "source".to_string(),
            page: "page".to_string(),
        }
    }
}

impl Match {
    /// Convert to a passage; matches without text metadata are dropped.
    pub fn into_passage(self, fields: &MetadataFields) -> Option<Passage> {
        let metadata = self.metadata?;
        let text = metadata
            .get(&fields.text)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|t| !t.is_empty())?;

        let mut passage = Passage::new(self.id, text, self.score);
        if let Some(source) = metadata.get(&fields.source).and_then(Value::as_str) {
            passage = passage.with_document(document_name(source));
        }
        if let Some(page) = metadata.get(&fields.page).and_then(page_number) {
            passage = passage.with_page(page);
        }
        Some(passage)
    }
}

/// Last path component of a source path or URL.
fn document_name(source: &str) -> &str {
    source
        .rsplit(['/', '\\'])
        .find(|part| !part.is_empty())
        .unwrap_or(source)
}

/// Pages are stored as integers, floats, or strings depending on the loader.
fn page_number(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
