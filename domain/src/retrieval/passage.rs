//! Evidence passages returned by the evidence store.

use serde::{Deserialize, Serialize};

/// One ranked search hit from the evidence store (Value Object)
///
/// `relevance_score` is higher-is-better and only comparable with other
/// passages returned by the same search call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passage {
    pub source_id: String,
    pub text: String,
    pub relevance_score: f32,
    /// Source document name, when the index stores one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document: Option<String>,
    /// Page number within the source document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl Passage {
    pub fn new(source_id: impl Into<String>, text: impl Into<String>, relevance_score: f32) -> Self {
        Self {
            source_id: source_id.into(),
            text: text.into(),
            relevance_score,
            document: None,
            page: None,
        }
    }

    pub fn with_document(mut self, document: impl Into<String>) -> Self {
        self.document = Some(document.into());
        self
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }
}

/// A passage tagged with the sub-question that retrieved it.
///
/// `origin_sub_question` is the zero-based position of the sub-question in
/// its plan: a back-reference, not ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedPassage {
    #[serde(flatten)]
    pub passage: Passage,
    pub origin_sub_question: usize,
}

impl RetrievedPassage {
    pub fn new(passage: Passage, origin_sub_question: usize) -> Self {
        Self {
            passage,
            origin_sub_question,
        }
    }

    pub fn source_id(&self) -> &str {
        &self.passage.source_id
    }

    pub fn text(&self) -> &str {
        &self.passage.text
    }

    pub fn relevance_score(&self) -> f32 {
        self.passage.relevance_score
    }
}
