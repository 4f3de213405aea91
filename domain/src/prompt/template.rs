//! Prompt templates for the pipeline stages

use crate::retrieval::context::Context;

/// Templates for generating prompts at each stage
pub struct PromptTemplate;

impl PromptTemplate {
    /// System prompt for the planning stage
    pub fn planning_system() -> &'static str {
        r#"You are a Query Planning Agent. Your job is to analyze a user's question and create a structured search strategy.

Instructions:
- Analyze the question for complexity and key concepts
- Rephrase ambiguous parts of the question for clarity
- Identify key entities, topics, time ranges, or themes
- Decompose complex multi-part questions into focused, atomic sub-questions
- Keep the list minimal and non-redundant; a simple question needs a single sub-question
- Explain in one or two sentences how the retrieval should proceed"#
    }

    /// User prompt for the planning stage
    pub fn planning_prompt(question: &str, max_sub_questions: usize) -> String {
        format!(
            r#"Question:
{question}

Respond with a plan in the following format:

```plan
{{
  "rephrased_question": "clarified restatement of the question",
  "key_concepts": ["concept", "..."],
  "strategy": "how the documents should be searched",
  "sub_questions": ["first sub-question", "..."]
}}
```

Use at most {max_sub_questions} sub-questions, ordered by importance."#
        )
    }

    /// System prompt for the answering stage
    pub fn answer_system() -> &'static str {
        r#"You are a Summarization Agent. Your job is to generate a clear, concise answer based ONLY on the provided context.

Instructions:
- Use ONLY the information in the CONTEXT section to answer.
- Cite the chunks you rely on with their labels, e.g. [Chunk 2].
- If the context does not contain enough information, explicitly state that you cannot answer based on the available documents.
- Do not make up information that is not present in the context."#
    }

    /// User prompt for the answering stage
    pub fn answer_prompt(question: &str, context: &Context) -> String {
        format!(
            r#"Question:
{question}

CONTEXT:
{context}

Answer the question using only the CONTEXT above."#,
            context = context.render()
        )
    }

    /// System prompt for the verification stage
    pub fn verification_system() -> &'static str {
        r#"You are a Verification Agent. Your job is to check a draft answer against the original context and eliminate any hallucinations.

Instructions:
- Compare every claim in the draft answer against the provided context.
- If every claim is supported, the verdict is "supported".
- If some claims are unsupported but a correct answer can be built from the context, the verdict is "revised" and you must provide the corrected answer containing only supported claims.
- If the context gives no usable evidence for the answer, the verdict is "unsupported" and you must explain why."#
    }

    /// User prompt for the verification stage
    pub fn verification_prompt(draft: &str, context: &Context) -> String {
        format!(
            r#"CONTEXT:
{context}

DRAFT ANSWER:
{draft}

Respond with a verdict in the following format:

```verdict
{{
  "verdict": "supported | revised | unsupported",
  "answer": "corrected answer, only when the verdict is revised",
  "reason": "short explanation"
}}
```"#,
            context = context.render()
        )
    }
}
