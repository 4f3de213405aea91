//! Port for per-cycle audit records.
//!
//! Separate from `tracing`-based operation logs: tracing carries diagnostic
//! messages, while this port captures one machine-readable summary per cycle,
//! including the internal `corrected` flag that the caller never sees.

use chrono::{DateTime, Utc};
use planqa_domain::{AnswerOutcome, Stage};
use serde::{Deserialize, Serialize};

/// Summary of one finished cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub cycle_id: String,
    pub started_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub question: String,
    pub sub_questions: usize,
    pub passages: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<AnswerOutcome>,
    pub corrected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failed_stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Port for recording cycle summaries.
///
/// `record` is synchronous and non-fallible: an audit failure must never
/// change the outcome of a cycle, so implementations swallow their own errors.
pub trait CycleAuditLogger: Send + Sync {
    fn record(&self, record: &CycleRecord);
}

/// No-op implementation for tests and when auditing is disabled.
pub struct NoAuditLog;

impl CycleAuditLogger for NoAuditLog {
    fn record(&self, _record: &CycleRecord) {}
}
