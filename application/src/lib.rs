//! Application layer for planqa
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{CallPolicy, PipelineParams};
pub use ports::{
    audit::{CycleAuditLogger, CycleRecord, NoAuditLog},
    evidence_store::{EvidenceStore, EvidenceStoreError},
    external_call::ExternalCallError,
    llm_gateway::{GatewayError, LlmGateway},
    progress::{NoProgress, PipelineProgressNotifier},
};
pub use use_cases::answer_question::AnswerQuestionUseCase;
pub use use_cases::draft_answer::DraftAnswerUseCase;
pub use use_cases::error::{ErrorKind, QueryError, StageError};
pub use use_cases::plan_question::PlanQuestionUseCase;
pub use use_cases::retrieve_context::RetrieveContextUseCase;
pub use use_cases::shared::call_with_policy;
pub use use_cases::verify_answer::VerifyAnswerUseCase;
