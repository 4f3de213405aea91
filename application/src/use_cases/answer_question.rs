//! Answer Question use case
//!
//! Orchestrates one full cycle: Planning → Retrieval → Answering →
//! Verification, tracked by a [`PipelineRun`] state machine.
//!
//! # Failure attribution
//!
//! Every error leaves the run in `Failed { stage, reason }` where `stage` is
//! the stage that was running. Cancellation and the cycle deadline are raced
//! against the stages with `tokio::select!`; the losing stage future is
//! dropped, which aborts any outstanding external call.

use super::draft_answer::DraftAnswerUseCase;
use super::error::{QueryError, StageError};
use super::plan_question::PlanQuestionUseCase;
use super::retrieve_context::RetrieveContextUseCase;
use super::verify_answer::VerifyAnswerUseCase;
use crate::config::{CallPolicy, PipelineParams};
use crate::ports::audit::{CycleAuditLogger, CycleRecord, NoAuditLog};
use crate::ports::evidence_store::EvidenceStore;
use crate::ports::llm_gateway::LlmGateway;
use crate::ports::progress::{NoProgress, PipelineProgressNotifier};
use chrono::{DateTime, Utc};
use planqa_domain::{AnswerOutcome, PipelineRun, QueryResult, Question, Stage};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Counters collected while the stages run, for the audit record.
#[derive(Debug, Default)]
struct CycleTrace {
    question: String,
    sub_questions: usize,
    passages: usize,
}

/// Use case for answering one question end to end (the orchestrator)
///
/// Holds no per-request state: every call to [`execute`](Self::execute)
/// builds its own [`PipelineRun`], so cycles can run fully in parallel on a
/// shared instance.
pub struct AnswerQuestionUseCase {
    planner: PlanQuestionUseCase,
    retriever: RetrieveContextUseCase,
    answerer: DraftAnswerUseCase,
    verifier: VerifyAnswerUseCase,
    audit: Arc<dyn CycleAuditLogger>,
    cycle_deadline: Option<Duration>,
}

impl AnswerQuestionUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        store: Arc<dyn EvidenceStore>,
        params: &PipelineParams,
        policy: CallPolicy,
    ) -> Self {
        Self {
            planner: PlanQuestionUseCase::new(
                Arc::clone(&gateway),
                policy.clone(),
                params.max_sub_questions,
            ),
            retriever: RetrieveContextUseCase::new(
                store,
                policy.clone(),
                params.top_k,
                params.max_context_passages,
                params.max_concurrent_queries,
            ),
            answerer: DraftAnswerUseCase::new(Arc::clone(&gateway), policy.clone()),
            verifier: VerifyAnswerUseCase::new(gateway, policy),
            audit: Arc::new(NoAuditLog),
            cycle_deadline: params.cycle_deadline,
        }
    }

    pub fn with_audit_logger(mut self, audit: Arc<dyn CycleAuditLogger>) -> Self {
        self.audit = audit;
        self
    }

    /// Execute the use case with default (no-op) progress and no cancellation
    pub async fn execute(&self, raw_question: &str) -> Result<QueryResult, QueryError> {
        self.execute_with_progress(raw_question, &NoProgress, &CancellationToken::new())
            .await
    }

    /// Execute the use case with progress callbacks and cancellation
    pub async fn execute_with_progress(
        &self,
        raw_question: &str,
        progress: &dyn PipelineProgressNotifier,
        cancellation: &CancellationToken,
    ) -> Result<QueryResult, QueryError> {
        let started_at = Utc::now();
        let clock = Instant::now();
        let mut run = PipelineRun::new(new_cycle_id(started_at));
        let mut trace = CycleTrace {
            question: raw_question.trim().to_string(),
            ..Default::default()
        };
        info!(cycle_id = run.id(), "Cycle started");

        let outcome = tokio::select! {
            biased;
            _ = cancellation.cancelled() => Err(StageError::Cancelled),
            limit = wait_for_deadline(self.cycle_deadline) => Err(StageError::DeadlineExceeded(limit)),
            result = self.run_stages(raw_question, &mut run, &mut trace, progress) => result,
        };

        match outcome {
            Ok(result) => {
                run.advance();
                info!(
                    cycle_id = run.id(),
                    outcome = ?result.outcome(),
                    corrected = result.is_corrected(),
                    "Cycle completed"
                );
                self.audit.record(&CycleRecord {
                    cycle_id: run.id().to_string(),
                    started_at,
                    duration_ms: elapsed_ms(clock),
                    question: trace.question,
                    sub_questions: trace.sub_questions,
                    passages: trace.passages,
                    outcome: result.outcome(),
                    corrected: result.is_corrected(),
                    failed_stage: None,
                    error: None,
                });
                Ok(result)
            }
            Err(source) => {
                let reason = source.to_string();
                let stage = run.fail(reason.clone()).unwrap_or(Stage::Verification);
                warn!(
                    cycle_id = run.id(),
                    stage = %stage,
                    kind = %source.kind(),
                    "Cycle failed: {}",
                    reason
                );
                progress.on_stage_failed(stage, &reason);
                self.audit.record(&CycleRecord {
                    cycle_id: run.id().to_string(),
                    started_at,
                    duration_ms: elapsed_ms(clock),
                    question: trace.question,
                    sub_questions: trace.sub_questions,
                    passages: trace.passages,
                    outcome: None,
                    corrected: false,
                    failed_stage: Some(stage),
                    error: Some(reason),
                });
                Err(QueryError::new(stage, source))
            }
        }
    }

    /// Run the four stages, advancing `run` after each one.
    ///
    /// Each stage consumes only the previous stage's output. The run is left
    /// in `Verified` on success; the caller completes or fails it.
    async fn run_stages(
        &self,
        raw_question: &str,
        run: &mut PipelineRun,
        trace: &mut CycleTrace,
        progress: &dyn PipelineProgressNotifier,
    ) -> Result<QueryResult, StageError> {
        // Rejected before any external call
        let question =
            Question::parse(raw_question).map_err(|e| StageError::InvalidInput(e.to_string()))?;

        // Planning
        progress.on_stage_start(Stage::Planning);
        let plan = self.planner.execute(&question).await?;
        trace.sub_questions = plan.sub_questions().len();
        progress.on_stage_complete(Stage::Planning);
        run.advance();

        // Retrieval
        progress.on_stage_start(Stage::Retrieval);
        let context = self.retriever.execute(&plan, progress).await?;
        trace.passages = context.len();
        progress.on_stage_complete(Stage::Retrieval);
        run.advance();

        // Answering
        progress.on_stage_start(Stage::Answering);
        let draft = self.answerer.execute(&question, &context).await?;
        progress.on_stage_complete(Stage::Answering);
        run.advance();

        // Verification
        progress.on_stage_start(Stage::Verification);
        let verdict = self.verifier.execute(&draft).await?;
        run.advance();
        let result = QueryResult::assemble(&question, &plan, &draft, verdict);
        progress.on_stage_complete(Stage::Verification);

        Ok(result)
    }
}

/// Resolves when the cycle deadline passes; never resolves without one.
async fn wait_for_deadline(deadline: Option<Duration>) -> Duration {
    match deadline {
        Some(limit) => {
            tokio::time::sleep(limit).await;
            limit
        }
        None => std::future::pending().await,
    }
}

fn new_cycle_id(started_at: DateTime<Utc>) -> String {
    format!("cycle-{}", started_at.format("%Y%m%dT%H%M%S%.6f"))
}

fn elapsed_ms(clock: Instant) -> u64 {
    u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::evidence_store::EvidenceStoreError;
    use crate::ports::llm_gateway::GatewayError;
    use crate::use_cases::error::ErrorKind;
    use crate::use_cases::testing::{
        ScriptedGateway, ScriptedResponse, ScriptedStore, StoreScript, plan_response, text,
    };
    use planqa_domain::{NO_INFORMATION_ANSWER, Passage, PromptTemplate};
    use std::sync::Mutex;

    const QUESTION: &str = "What are the advantages of vector databases?";

    fn vector_db_passages() -> Vec<Passage> {
        vec![
            Passage::new("vdb-1", "Vector databases enable fast similarity search over embeddings.", 0.92),
            Passage::new("vdb-2", "They scale horizontally to billions of vectors.", 0.85),
            Passage::new("vdb-3", "They support metadata filtering alongside vector search.", 0.71),
        ]
    }

    fn supported() -> ScriptedResponse {
        text(r#"{"verdict": "supported", "reason": "every claim appears in the context"}"#)
    }

    fn use_case(gateway: Arc<ScriptedGateway>, store: Arc<ScriptedStore>) -> AnswerQuestionUseCase {
        use_case_with(gateway, store, PipelineParams::default())
    }

    fn use_case_with(
        gateway: Arc<ScriptedGateway>,
        store: Arc<ScriptedStore>,
        params: PipelineParams,
    ) -> AnswerQuestionUseCase {
        let policy = CallPolicy::default()
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(1);
        AnswerQuestionUseCase::new(gateway, store, &params, policy)
    }

    /// Records every stage event in order
    #[derive(Default)]
    struct TrackingProgress {
        events: Mutex<Vec<String>>,
    }

    impl TrackingProgress {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl PipelineProgressNotifier for TrackingProgress {
        fn on_stage_start(&self, stage: Stage) {
            self.events.lock().unwrap().push(format!("start:{}", stage));
        }

        fn on_stage_complete(&self, stage: Stage) {
            self.events.lock().unwrap().push(format!("done:{}", stage));
        }

        fn on_stage_failed(&self, stage: Stage, _reason: &str) {
            self.events.lock().unwrap().push(format!("failed:{}", stage));
        }
    }

    #[derive(Default)]
    struct RecordingAudit {
        records: Mutex<Vec<CycleRecord>>,
    }

    impl CycleAuditLogger for RecordingAudit {
        fn record(&self, record: &CycleRecord) {
            self.records.lock().unwrap().push(record.clone());
        }
    }

    #[tokio::test]
    async fn test_vector_database_question_end_to_end() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            plan_response(&[
                "What is a vector database?",
                "What benefits do vector databases provide?",
            ]),
            text("Vector databases enable fast similarity search over embeddings [Chunk 1] and scale horizontally [Chunk 2]."),
            supported(),
        ]));
        let store = Arc::new(ScriptedStore::hits(vector_db_passages()));
        let progress = TrackingProgress::default();

        let result = use_case(gateway.clone(), store.clone())
            .execute_with_progress(QUESTION, &progress, &CancellationToken::new())
            .await
            .unwrap();

        assert!(!result.sub_questions.is_empty());
        assert!(
            vector_db_passages()
                .iter()
                .any(|p| result.answer.contains(p.text.trim_end_matches('.')))
        );
        assert_eq!(result.context.matches("[Chunk").count(), 3);
        assert!(result.plan.contains("Sub-Questions:\n1. What is a vector database?"));
        assert_eq!(result.outcome(), Some(AnswerOutcome::Verified));

        assert_eq!(gateway.calls(), 3);
        assert_eq!(store.calls(), 2);
        assert_eq!(
            progress.events(),
            vec![
                "start:planning",
                "done:planning",
                "start:retrieval",
                "done:retrieval",
                "start:answering",
                "done:answering",
                "start:verification",
                "done:verification",
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_question_fails_before_any_call() {
        for raw in ["", "   \n\t"] {
            let gateway = Arc::new(ScriptedGateway::new(vec![]));
            let store = Arc::new(ScriptedStore::hits(vector_db_passages()));

            let err = use_case(gateway.clone(), store.clone())
                .execute(raw)
                .await
                .unwrap_err();

            assert_eq!(err.kind(), ErrorKind::InvalidInput);
            assert_eq!(err.stage, Stage::Planning);
            assert_eq!(gateway.calls(), 0);
            assert_eq!(store.calls(), 0);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_searches_time_out() {
        let gateway = Arc::new(ScriptedGateway::new(vec![plan_response(&[
            "What is a vector database?",
            "What benefits do vector databases provide?",
        ])]));
        let store = Arc::new(ScriptedStore::new(StoreScript::Hang));

        let err = use_case(gateway.clone(), store)
            .execute(QUESTION)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RetrievalExhausted);
        assert_eq!(err.stage, Stage::Retrieval);
        // Planner only: no answerer or verifier call
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_unsupported_verdict_is_a_successful_response() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            plan_response(&["What benefits do vector databases provide?"]),
            text("Vector databases were invented in 1802."),
            text(r#"{"verdict": "unsupported", "reason": "the context has no history"}"#),
        ]));
        let store = Arc::new(ScriptedStore::hits(vector_db_passages()));

        let result = use_case(gateway, store).execute(QUESTION).await.unwrap();

        assert!(result.answer.starts_with("No verified answer could be found"));
        assert!(result.answer.contains("the context has no history"));
        assert!(result.context.contains("[Chunk 1]"));
        assert!(result.context.contains("fast similarity search"));
        assert_eq!(result.outcome(), Some(AnswerOutcome::Unsupported));
    }

    #[tokio::test]
    async fn test_empty_corpus_answers_no_information() {
        let gateway = Arc::new(ScriptedGateway::new(vec![plan_response(&[
            "What benefits do vector databases provide?",
        ])]));
        let store = Arc::new(ScriptedStore::hits(vec![]));

        let result = use_case(gateway.clone(), store).execute(QUESTION).await.unwrap();

        assert_eq!(result.answer, NO_INFORMATION_ANSWER);
        assert_eq!(result.outcome(), Some(AnswerOutcome::NoInformation));
        // Planner only: answerer and verifier short-circuit on empty context
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_partial_retrieval_failure_still_answers() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            plan_response(&["broken sub-question", "working sub-question"]),
            text("Vector databases enable fast similarity search over embeddings."),
            supported(),
        ]));
        let store = Arc::new(ScriptedStore::hits(vector_db_passages()).on(
            "broken sub-question",
            StoreScript::Fail(EvidenceStoreError::HttpStatus {
                status: 400,
                message: "bad filter".into(),
            }),
        ));

        let result = use_case(gateway, store).execute(QUESTION).await.unwrap();
        assert_eq!(result.sub_questions.len(), 2);
        assert_eq!(result.context.matches("[Chunk").count(), 3);
    }

    #[tokio::test]
    async fn test_planner_failure_is_upstream_unavailable() {
        let gateway = Arc::new(ScriptedGateway::new(vec![ScriptedResponse::Error(
            GatewayError::Authentication("invalid api key".into()),
        )]));
        let store = Arc::new(ScriptedStore::hits(vector_db_passages()));

        let err = use_case(gateway.clone(), store.clone())
            .execute(QUESTION)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
        assert_eq!(err.stage, Stage::Planning);
        assert!(err.to_string().starts_with("planning stage failed:"));
        // Permanent failure: no retry
        assert_eq!(gateway.calls(), 1);
        assert_eq!(store.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_verifier_timeout_is_attributed_to_verification() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            plan_response(&["What benefits do vector databases provide?"]),
            text("They enable fast similarity search."),
            ScriptedResponse::Hang,
            ScriptedResponse::Hang,
        ]));
        let store = Arc::new(ScriptedStore::hits(vector_db_passages()));
        let progress = TrackingProgress::default();

        let err = use_case(gateway.clone(), store)
            .execute_with_progress(QUESTION, &progress, &CancellationToken::new())
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::UpstreamUnavailable);
        assert_eq!(err.stage, Stage::Verification);
        assert_eq!(gateway.calls(), 4);
        assert_eq!(progress.events().last().map(String::as_str), Some("failed:verification"));
    }

    #[tokio::test]
    async fn test_transient_planner_failure_is_retried() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            ScriptedResponse::Error(GatewayError::ConnectionError("reset by peer".into())),
            plan_response(&["What benefits do vector databases provide?"]),
            text("They enable fast similarity search."),
            supported(),
        ]));
        let store = Arc::new(ScriptedStore::hits(vector_db_passages()));

        let result = use_case(gateway.clone(), store).execute(QUESTION).await.unwrap();
        assert_eq!(result.answer, "They enable fast similarity search.");
        assert_eq!(gateway.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_during_retrieval() {
        let gateway = Arc::new(ScriptedGateway::new(vec![plan_response(&[
            "What benefits do vector databases provide?",
        ])]));
        let store = Arc::new(ScriptedStore::new(StoreScript::Hang));
        let token = CancellationToken::new();

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            canceller.cancel();
        });

        let err = use_case(gateway.clone(), store)
            .execute_with_progress(QUESTION, &NoProgress, &token)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(err.stage, Stage::Retrieval);
        assert_eq!(err.to_string(), "retrieval stage failed: cancelled");
        assert_eq!(gateway.calls(), 1);
    }

    #[tokio::test]
    async fn test_already_cancelled_token_makes_no_call() {
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let store = Arc::new(ScriptedStore::hits(vector_db_passages()));
        let token = CancellationToken::new();
        token.cancel();

        let err = use_case(gateway.clone(), store)
            .execute_with_progress(QUESTION, &NoProgress, &token)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(err.stage, Stage::Planning);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cycle_deadline() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            plan_response(&["What benefits do vector databases provide?"]),
            ScriptedResponse::Hang,
        ]));
        let store = Arc::new(ScriptedStore::hits(vector_db_passages()));
        let params = PipelineParams::default().with_cycle_deadline(Some(Duration::from_secs(3)));

        let err = use_case_with(gateway, store, params)
            .execute(QUESTION)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Cancelled);
        assert_eq!(err.stage, Stage::Answering);
        assert!(matches!(err.source, StageError::DeadlineExceeded(_)));
    }

    #[tokio::test]
    async fn test_audit_records_correction() {
        let gateway = Arc::new(ScriptedGateway::new(vec![
            plan_response(&["What benefits do vector databases provide?"]),
            text("They enable fast similarity search and make coffee."),
            text(r#"{"verdict": "revised", "answer": "They enable fast similarity search."}"#),
        ]));
        let store = Arc::new(ScriptedStore::hits(vector_db_passages()));
        let audit = Arc::new(RecordingAudit::default());

        let result = use_case(gateway, store)
            .with_audit_logger(audit.clone())
            .execute(QUESTION)
            .await
            .unwrap();

        assert_eq!(result.answer, "They enable fast similarity search.");
        let records = audit.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].corrected);
        assert_eq!(records[0].outcome, Some(AnswerOutcome::Corrected));
        assert_eq!(records[0].passages, 3);
        assert_eq!(records[0].question, QUESTION);
        assert!(records[0].cycle_id.starts_with("cycle-"));
    }

    #[tokio::test]
    async fn test_audit_records_failure_stage() {
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let store = Arc::new(ScriptedStore::hits(vec![]));
        let audit = Arc::new(RecordingAudit::default());

        let _ = use_case(gateway, store)
            .with_audit_logger(audit.clone())
            .execute("  ")
            .await;

        let records = audit.records.lock().unwrap();
        assert_eq!(records[0].failed_stage, Some(Stage::Planning));
        assert!(!records[0].corrected);
        assert!(records[0].error.is_some());
    }

    /// Answers each stage by its system prompt; the answering call holds
    /// until `barrier` has as many waiters as there are cycles in flight.
    struct RendezvousGateway {
        barrier: tokio::sync::Barrier,
    }

    #[async_trait::async_trait]
    impl LlmGateway for RendezvousGateway {
        async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, GatewayError> {
            if system_prompt == PromptTemplate::planning_system() {
                Ok(r#"{"sub_questions": ["What do vector databases index?"]}"#.to_string())
            } else if system_prompt == PromptTemplate::answer_system() {
                self.barrier.wait().await;
                if prompt.contains("How do vector databases scale?") {
                    Ok("They scale horizontally [Chunk 2].".to_string())
                } else {
                    Ok("They enable fast similarity search [Chunk 1].".to_string())
                }
            } else {
                Ok(r#"{"verdict": "supported", "reason": "stated in the context"}"#.to_string())
            }
        }

        fn model_name(&self) -> &str {
            "rendezvous"
        }
    }

    #[tokio::test]
    async fn test_concurrent_cycles_share_one_instance() {
        let gateway = Arc::new(RendezvousGateway {
            barrier: tokio::sync::Barrier::new(2),
        });
        let store = Arc::new(ScriptedStore::hits(vector_db_passages()));
        let policy = CallPolicy::default()
            .with_timeout(Duration::from_secs(5))
            .with_max_retries(0);
        let shared = Arc::new(AnswerQuestionUseCase::new(
            gateway,
            store,
            &PipelineParams::default(),
            policy,
        ));

        // Neither answering call returns until both cycles reach it
        let a = tokio::spawn({
            let shared = Arc::clone(&shared);
            async move { shared.execute("What makes vector search fast?").await }
        });
        let b = tokio::spawn({
            let shared = Arc::clone(&shared);
            async move { shared.execute("How do vector databases scale?").await }
        });

        let a = a.await.unwrap().unwrap();
        let b = b.await.unwrap().unwrap();
        assert_eq!(a.answer, "They enable fast similarity search [Chunk 1].");
        assert_eq!(b.answer, "They scale horizontally [Chunk 2].");
        assert_eq!(a.outcome, Some(AnswerOutcome::Verified));
        assert_eq!(b.outcome, Some(AnswerOutcome::Verified));
    }
}
