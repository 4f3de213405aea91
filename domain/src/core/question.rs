//! Question value object

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// A question submitted by a caller (Value Object)
///
/// Holds the trimmed question text. Immutable once accepted: there is no
/// way to mutate the content after construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    content: String,
}

impl Question {
    /// Create a new question
    ///
    /// # Panics
    /// Panics if the content is empty or only whitespace
    pub fn new(content: impl Into<String>) -> Self {
        Self::try_new(content).expect("Question cannot be empty")
    }

    /// Try to create a new question, returning None if invalid
    pub fn try_new(content: impl Into<String>) -> Option<Self> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            None
        } else if trimmed.len() == content.len() {
            Some(Self { content })
        } else {
            Some(Self {
                content: trimmed.to_string(),
            })
        }
    }

    /// Validate raw caller input into a question.
    ///
    /// Rejects empty and whitespace-only input with [`DomainError::InvalidQuestion`].
    pub fn parse(content: impl Into<String>) -> Result<Self, DomainError> {
        Self::try_new(content).ok_or_else(|| {
            DomainError::InvalidQuestion("`question` must be a non-empty string.".to_string())
        })
    }

    /// Get the question content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the inner content
    pub fn into_content(self) -> String {
        self.content
    }
}

impl std::fmt::Display for Question {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}
