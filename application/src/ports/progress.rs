//! Progress notification port
//!
//! Defines the interface for reporting progress during a cycle.

use planqa_domain::Stage;

/// Callback for progress updates during a cycle
///
/// Implementations live in the presentation layer and can display
/// progress in various ways (console progress bars, logs, etc.)
pub trait PipelineProgressNotifier: Send + Sync {
    /// Called when a stage starts
    fn on_stage_start(&self, stage: Stage);

    /// Called when a stage completes successfully
    fn on_stage_complete(&self, stage: Stage);

    /// Called when the retrieval fan-out is sized
    fn on_retrieval_start(&self, _sub_questions: usize) {}

    /// Called when one sub-question's search finishes
    fn on_sub_question_complete(&self, _index: usize, _sub_question: &str, _success: bool) {}

    /// Called when a stage fails and the cycle ends
    fn on_stage_failed(&self, _stage: Stage, _reason: &str) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl PipelineProgressNotifier for NoProgress {
    fn on_stage_start(&self, _stage: Stage) {}
    fn on_stage_complete(&self, _stage: Stage) {}
}
