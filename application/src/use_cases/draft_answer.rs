//! Draft Answer use case

use super::error::StageError;
use super::shared::call_with_policy;
use crate::config::CallPolicy;
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use planqa_domain::{Context, DraftAnswer, PromptTemplate, Question};
use std::sync::Arc;
use tracing::{debug, info};

/// Use case for the answering stage
pub struct DraftAnswerUseCase {
    gateway: Arc<dyn LlmGateway>,
    policy: CallPolicy,
}

impl DraftAnswerUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, policy: CallPolicy) -> Self {
        Self { gateway, policy }
    }

    /// Synthesize a draft from `context`.
    ///
    /// An empty context yields the no-information draft without calling the
    /// language model.
    pub async fn execute<'c>(
        &self,
        question: &Question,
        context: &'c Context,
    ) -> Result<DraftAnswer<'c>, StageError> {
        if context.is_empty() {
            info!("Context is empty, answering with no-information statement");
            return Ok(DraftAnswer::no_information(context));
        }

        let prompt = PromptTemplate::answer_prompt(question.content(), context);
        let response = call_with_policy(&self.policy, "answerer", || {
            self.gateway.complete(PromptTemplate::answer_system(), &prompt)
        })
        .await?;

        let text = response.trim();
        if text.is_empty() {
            return Err(GatewayError::InvalidResponse("empty answer completion".to_string()).into());
        }

        debug!(chars = text.len(), "Draft answer ready");
        Ok(DraftAnswer::grounded(text, context))
    }
}
