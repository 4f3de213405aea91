//! Pipeline domain
//!
//! The stages of one question-answering cycle, the state machine that
//! sequences them, and the result a cycle produces.

pub mod result;
pub mod stage;
pub mod state;

pub use result::{AnswerOutcome, QueryResult, unsupported_answer};
pub use stage::Stage;
pub use state::{CycleState, PipelineRun};
