//! Use cases (application services)
//!
//! One use case per pipeline stage, plus [`answer_question`] which sequences
//! them into a full cycle.

pub mod answer_question;
pub mod draft_answer;
pub mod error;
pub mod plan_question;
pub mod retrieve_context;
pub mod shared;
pub mod verify_answer;

#[cfg(test)]
pub(crate) mod testing;
