//! Plan Question use case
//!
//! Decomposes a question into a [`Plan`] with one language model call.

use super::error::StageError;
use super::shared::call_with_policy;
use crate::config::CallPolicy;
use crate::ports::llm_gateway::LlmGateway;
use planqa_domain::core::string::truncate;
use planqa_domain::{Plan, PromptTemplate, Question, parse_plan};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Use case for the planning stage
pub struct PlanQuestionUseCase {
    gateway: Arc<dyn LlmGateway>,
    policy: CallPolicy,
    max_sub_questions: usize,
}

impl PlanQuestionUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, policy: CallPolicy, max_sub_questions: usize) -> Self {
        Self {
            gateway,
            policy,
            max_sub_questions,
        }
    }

    /// Produce a plan for `question`.
    ///
    /// A completion that cannot be parsed yields [`Plan::fallback`]; only a
    /// failed language model call is an error.
    pub async fn execute(&self, question: &Question) -> Result<Plan, StageError> {
        let prompt = PromptTemplate::planning_prompt(question.content(), self.max_sub_questions);
        let response = call_with_policy(&self.policy, "planner", || {
            self.gateway
                .complete(PromptTemplate::planning_system(), &prompt)
        })
        .await?;

        let plan = match parse_plan(&response) {
            Some(draft) => Plan::from_draft(question, draft, self.max_sub_questions),
            None => {
                warn!("Planner output malformed, falling back to the original question");
                debug!("Unparsed planner output: {}", truncate(&response, 500));
                Plan::fallback(question)
            }
        };

        info!(
            sub_questions = plan.sub_questions().len(),
            "Plan ready"
        );
        Ok(plan)
    }
}
