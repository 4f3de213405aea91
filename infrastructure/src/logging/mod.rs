//! Logging infrastructure for per-cycle audit records.
//!
//! Provides [`JsonlCycleAuditLogger`], a JSONL file writer that implements
//! the [`CycleAuditLogger`](planqa_application::CycleAuditLogger) port.

mod jsonl_audit;

pub use jsonl_audit::JsonlCycleAuditLogger;
