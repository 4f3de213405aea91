//! Planning domain
//!
//! Decomposition of a question into an ordered list of sub-questions.

pub mod entities;
pub mod parser;

pub use entities::{Plan, PlanDraft, SubQuestion};
pub use parser::{parse_plan, parse_plan_json};
