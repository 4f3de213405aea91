//! Core domain concepts shared across all subdomains.
//!
//! - [`question::Question`]: a validated, trimmed caller question
//! - [`error::DomainError`]: domain-level errors
//! - [`string`]: text helpers used when rendering prompts and previews

pub mod error;
pub mod question;
pub mod string;
