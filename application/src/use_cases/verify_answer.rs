//! Verify Answer use case

use super::error::StageError;
use super::shared::call_with_policy;
use crate::config::CallPolicy;
use crate::ports::llm_gateway::LlmGateway;
use planqa_domain::{DraftAnswer, PromptTemplate, VerificationResult, parse_verdict};
use std::sync::Arc;
use tracing::info;

/// Use case for the verification stage
pub struct VerifyAnswerUseCase {
    gateway: Arc<dyn LlmGateway>,
    policy: CallPolicy,
}

impl VerifyAnswerUseCase {
    pub fn new(gateway: Arc<dyn LlmGateway>, policy: CallPolicy) -> Self {
        Self { gateway, policy }
    }

    /// Check `draft` against the context it was conditioned on.
    ///
    /// The no-information draft makes no factual claims and is approved
    /// without calling the language model.
    pub async fn execute(&self, draft: &DraftAnswer<'_>) -> Result<VerificationResult, StageError> {
        if !draft.is_grounded() {
            info!("No-information draft, approved without verification call");
            return Ok(VerificationResult::Approved);
        }

        let prompt = PromptTemplate::verification_prompt(draft.text(), draft.context());
        let response = call_with_policy(&self.policy, "verifier", || {
            self.gateway
                .complete(PromptTemplate::verification_system(), &prompt)
        })
        .await?;

        let verdict = parse_verdict(&response, draft.text());
        info!(verdict = %verdict, "Verification complete");
        Ok(verdict)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::testing::{ScriptedGateway, text};
    use planqa_domain::{Context, Passage, RetrievedPassage};

    fn context() -> Context {
        Context::merge(
            vec![RetrievedPassage::new(
                Passage::new("p1", "Vector databases support similarity search.", 0.9),
                0,
            )],
            None,
        )
    }

    #[tokio::test]
    async fn test_no_information_draft_is_approved_without_call() {
        let gateway = Arc::new(ScriptedGateway::new(vec![]));
        let use_case = VerifyAnswerUseCase::new(gateway.clone(), CallPolicy::default());
        let context = Context::empty();

        let verdict = use_case
            .execute(&DraftAnswer::no_information(&context))
            .await
            .unwrap();

        assert_eq!(verdict, VerificationResult::Approved);
        assert_eq!(gateway.calls(), 0);
    }

    #[tokio::test]
    async fn test_revised_verdict() {
        let gateway = Arc::new(ScriptedGateway::new(vec![text(
            r#"```verdict
{"verdict": "revised", "answer": "They support similarity search.", "reason": "speed claim unsupported"}
```"#,
        )]));
        let use_case = VerifyAnswerUseCase::new(gateway.clone(), CallPolicy::default());
        let context = context();
        let draft = DraftAnswer::grounded("They support similarity search and are 100x faster.", &context);

        let verdict = use_case.execute(&draft).await.unwrap();
        assert_eq!(
            verdict,
            VerificationResult::Revised("They support similarity search.".to_string())
        );

        let prompt = &gateway.prompts()[0].1;
        assert!(prompt.contains("are 100x faster"));
        assert!(prompt.contains("[Chunk 1]"));
    }

    #[tokio::test]
    async fn test_unsupported_verdict() {
        let gateway = Arc::new(ScriptedGateway::new(vec![text(
            r#"{"verdict": "unsupported", "reason": "context does not mention pricing"}"#,
        )]));
        let use_case = VerifyAnswerUseCase::new(gateway, CallPolicy::default());
        let context = context();
        let draft = DraftAnswer::grounded("They cost $5.", &context);

        assert_eq!(
            use_case.execute(&draft).await.unwrap(),
            VerificationResult::Unsupported("context does not mention pricing".to_string())
        );
    }
}
