//! Answer domain
//!
//! Draft answers and the verdicts that approve, revise or reject them.

pub mod draft;
pub mod verification;

pub use draft::{DraftAnswer, NO_INFORMATION_ANSWER};
pub use verification::{VerificationResult, parse_verdict};
