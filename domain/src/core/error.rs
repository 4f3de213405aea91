//! Domain error types

use crate::pipeline::state::CycleState;
use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid question: {0}")]
    InvalidQuestion(String),

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

impl DomainError {
    pub(crate) fn invalid_transition(from: &CycleState, to: &CycleState) -> Self {
        DomainError::InvalidTransition {
            from: from.name().to_string(),
            to: to.name().to_string(),
        }
    }
}
