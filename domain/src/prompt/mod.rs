//! Prompt domain
//!
//! Templates for the planning, answering and verification prompts.

mod template;

pub use template::PromptTemplate;
