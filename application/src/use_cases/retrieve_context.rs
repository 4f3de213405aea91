//! Retrieve Context use case
//!
//! Fans out one evidence search per sub-question and merges the hits into a
//! single [`Context`].

use super::error::StageError;
use super::shared::call_with_policy;
use crate::config::CallPolicy;
use crate::ports::evidence_store::{EvidenceStore, EvidenceStoreError};
use crate::ports::progress::PipelineProgressNotifier;
use planqa_domain::{Context, Plan, RetrievedPassage};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Use case for the retrieval stage
pub struct RetrieveContextUseCase {
    store: Arc<dyn EvidenceStore>,
    policy: CallPolicy,
    top_k: usize,
    max_context_passages: Option<usize>,
    max_concurrent_queries: usize,
}

impl RetrieveContextUseCase {
    pub fn new(
        store: Arc<dyn EvidenceStore>,
        policy: CallPolicy,
        top_k: usize,
        max_context_passages: Option<usize>,
        max_concurrent_queries: usize,
    ) -> Self {
        Self {
            store,
            policy,
            top_k,
            max_context_passages,
            max_concurrent_queries,
        }
    }

    /// Search every sub-question of `plan` and merge the results.
    ///
    /// A failed sub-question is logged and skipped. The stage fails with
    /// [`StageError::RetrievalExhausted`] only when every search failed. An
    /// empty context (all searches succeeded with no hits) is returned as-is.
    ///
    /// Dropping the returned future aborts every outstanding search.
    pub async fn execute(
        &self,
        plan: &Plan,
        progress: &dyn PipelineProgressNotifier,
    ) -> Result<Context, StageError> {
        let sub_questions = plan.sub_question_texts();
        let total = sub_questions.len();
        progress.on_retrieval_start(total);
        info!(sub_questions = total, top_k = self.top_k, "Retrieving evidence");

        let permits = Arc::new(Semaphore::new(self.max_concurrent_queries.max(1)));
        let mut join_set = JoinSet::new();

        for (index, query) in sub_questions.into_iter().enumerate() {
            let store = Arc::clone(&self.store);
            let permits = Arc::clone(&permits);
            let policy = self.policy.clone();
            let k = self.top_k;

            join_set.spawn(async move {
                let result = match permits.acquire_owned().await {
                    Ok(_permit) => {
                        call_with_policy(&policy, "evidence_store", || store.search(&query, k))
                            .await
                    }
                    Err(_) => Err(EvidenceStoreError::ConnectionError(
                        "search permits closed".to_string(),
                    )),
                };
                (index, query, result)
            });
        }

        let mut hits = Vec::new();
        let mut failures = 0;
        let mut last_error = None;

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, query, Ok(passages))) => {
                    debug!(sub_question = index, passages = passages.len(), "Search complete");
                    progress.on_sub_question_complete(index, &query, true);
                    hits.extend(
                        passages
                            .into_iter()
                            .map(|p| RetrievedPassage::new(p, index)),
                    );
                }
                Ok((index, query, Err(e))) => {
                    warn!(sub_question = index, error = %e, "Search failed, skipping sub-question");
                    progress.on_sub_question_complete(index, &query, false);
                    failures += 1;
                    last_error = Some(e.to_string());
                }
                Err(e) => {
                    warn!("Search task join error: {}", e);
                    failures += 1;
                    last_error = Some(e.to_string());
                }
            }
        }

        if total > 0 && failures == total {
            return Err(StageError::RetrievalExhausted {
                attempted: total,
                last_error: last_error.unwrap_or_default(),
            });
        }

        let context = Context::merge(hits, self.max_context_passages);
        info!(
            passages = context.len(),
            failed_sub_questions = failures,
            "Context assembled"
        );
        Ok(context)
    }
}
