//! Scripted port implementations shared by the use case tests.

use crate::ports::evidence_store::{EvidenceStore, EvidenceStoreError};
use crate::ports::llm_gateway::{GatewayError, LlmGateway};
use async_trait::async_trait;
use planqa_domain::Passage;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// A scripted response for the mock gateway
#[derive(Debug, Clone)]
pub(crate) enum ScriptedResponse {
    Text(String),
    Error(GatewayError),
    /// Never completes
    Hang,
}

pub(crate) fn text(s: &str) -> ScriptedResponse {
    ScriptedResponse::Text(s.to_string())
}

/// Mock gateway that returns scripted responses in call order
pub(crate) struct ScriptedGateway {
    responses: Mutex<VecDeque<ScriptedResponse>>,
    /// (system prompt, prompt) of every call
    prompts: Mutex<Vec<(String, String)>>,
}

impl ScriptedGateway {
    pub(crate) fn new(responses: Vec<ScriptedResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub(crate) fn prompts(&self) -> Vec<(String, String)> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmGateway for ScriptedGateway {
    async fn complete(&self, system_prompt: &str, prompt: &str) -> Result<String, GatewayError> {
        self.prompts
            .lock()
            .unwrap()
            .push((system_prompt.to_string(), prompt.to_string()));
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(ScriptedResponse::Text(t)) => Ok(t),
            Some(ScriptedResponse::Error(e)) => Err(e),
            Some(ScriptedResponse::Hang) => std::future::pending().await,
            None => Err(GatewayError::Other("no scripted response left".to_string())),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

/// Scripted outcome of one search
#[derive(Debug, Clone)]
pub(crate) enum StoreScript {
    Hits(Vec<Passage>),
    Fail(EvidenceStoreError),
    Hang,
}

/// Mock evidence store keyed by query text
pub(crate) struct ScriptedStore {
    by_query: HashMap<String, StoreScript>,
    default: StoreScript,
    delay: Option<Duration>,
    queries: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedStore {
    /// Store that answers every query with `default`.
    pub(crate) fn new(default: StoreScript) -> Self {
        Self {
            by_query: HashMap::new(),
            default,
            delay: None,
            queries: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub(crate) fn hits(passages: Vec<Passage>) -> Self {
        Self::new(StoreScript::Hits(passages))
    }

    pub(crate) fn on(mut self, query: &str, script: StoreScript) -> Self {
        self.by_query.insert(query.to_string(), script);
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub(crate) fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EvidenceStore for ScriptedStore {
    async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>, EvidenceStoreError> {
        self.queries.lock().unwrap().push(query.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let script = self
            .by_query
            .get(query)
            .cloned()
            .unwrap_or_else(|| self.default.clone());
        let result = match script {
            StoreScript::Hits(mut passages) => {
                passages.truncate(k);
                Ok(passages)
            }
            StoreScript::Fail(e) => Err(e),
            StoreScript::Hang => std::future::pending().await,
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Plan completion in the fenced format the planner asks for.
pub(crate) fn plan_response(sub_questions: &[&str]) -> ScriptedResponse {
    let json = serde_json::json!({
        "rephrased_question": "Clarified question",
        "key_concepts": ["concept"],
        "strategy": "search each aspect",
        "sub_questions": sub_questions,
    });
    ScriptedResponse::Text(format!("Here is the plan:\n```plan\n{}\n```", json))
}
