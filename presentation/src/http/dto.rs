//! Request and response bodies of the HTTP surface

use planqa_domain::QueryResult;
use serde::{Deserialize, Serialize};

/// `POST /qa` request body
#[derive(Debug, Clone, Deserialize)]
pub struct QaRequest {
    pub question: String,
}

/// `POST /qa` success body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaResponse {
    pub answer: String,
    /// `[Chunk N]` labelled passages
    pub context: String,
    pub plan: String,
    pub sub_questions: Vec<String>,
}

impl From<QueryResult> for QaResponse {
    fn from(result: QueryResult) -> Self {
        Self {
            answer: result.answer,
            context: result.context,
            plan: result.plan,
            sub_questions: result.sub_questions,
        }
    }
}

/// Body of every non-200 response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
