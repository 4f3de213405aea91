//! Domain layer for planqa
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Cycle
//!
//! One end-to-end run of the pipeline for a single question:
//!
//! - **Planning**: the question is decomposed into ordered sub-questions
//! - **Retrieval**: evidence is searched per sub-question and merged into a [`Context`]
//! - **Answering**: a [`DraftAnswer`] is synthesized from the context
//! - **Verification**: the draft is approved, revised or rejected
//!
//! Every entity is request-scoped. Nothing here outlives a cycle.

pub mod answer;
pub mod core;
pub mod pipeline;
pub mod plan;
pub mod prompt;
pub mod retrieval;

// Re-export commonly used types
pub use answer::{DraftAnswer, NO_INFORMATION_ANSWER, VerificationResult, parse_verdict};
pub use core::{error::DomainError, question::Question};
pub use pipeline::{AnswerOutcome, CycleState, PipelineRun, QueryResult, Stage, unsupported_answer};
pub use plan::{Plan, PlanDraft, SubQuestion, parse_plan, parse_plan_json};
pub use prompt::PromptTemplate;
pub use retrieval::{Context, Passage, RetrievedPassage};
