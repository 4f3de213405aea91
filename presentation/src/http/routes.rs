//! Router and handlers

use super::dto::{ErrorResponse, HealthResponse, MessageResponse, QaRequest, QaResponse};
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use planqa_application::{AnswerQuestionUseCase, ErrorKind, NoProgress, QueryError};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Shared state of the HTTP service
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<AnswerQuestionUseCase>,
}

impl AppState {
    pub fn new(pipeline: Arc<AnswerQuestionUseCase>) -> Self {
        Self { pipeline }
    }
}

/// HTTP status for a failed cycle.
pub fn status_for(error: &QueryError) -> StatusCode {
    match error.kind() {
        ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorKind::UpstreamUnavailable => StatusCode::BAD_GATEWAY,
        ErrorKind::RetrievalExhausted => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::Cancelled => StatusCode::GATEWAY_TIMEOUT,
    }
}

/// Build the service router.
///
/// Every route is served both at the root and under `/api`.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(api_root))
        .route("/health", get(health))
        .route("/qa", post(qa));

    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/qa", post(qa))
        .nest("/api", api)
        .with_state(state)
}

/// Serve until `shutdown` is cancelled; in-flight requests are allowed to finish.
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "HTTP service listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Server is running. API available at /api",
    })
}

async fn api_root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Plan-and-verify QA API is running.",
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn qa(
    State(state): State<AppState>,
    payload: Result<Json<QaRequest>, JsonRejection>,
) -> Response {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                format!("invalid request body: {}", rejection.body_text()),
            );
        }
    };

    // Dropping this handler (client disconnect) cancels the cycle.
    let cancellation = CancellationToken::new();
    let _guard = cancellation.clone().drop_guard();

    match state
        .pipeline
        .execute_with_progress(&request.question, &NoProgress, &cancellation)
        .await
    {
        Ok(result) => (StatusCode::OK, Json(QaResponse::from(result))).into_response(),
        Err(error) => {
            let status = status_for(&error);
            warn!(status = status.as_u16(), kind = %error.kind(), error = %error, "QA request failed");
            error_response(status, error.to_string())
        }
    }
}

fn error_response(status: StatusCode, detail: String) -> Response {
    (status, Json(ErrorResponse::new(detail))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use planqa_application::{
        CallPolicy, EvidenceStore, EvidenceStoreError, GatewayError, LlmGateway, PipelineParams,
        StageError,
    };
    use planqa_domain::{Passage, PromptTemplate, Stage};
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    /// Answers each stage by its system prompt.
    struct StageGateway {
        fail_planning: bool,
    }

    #[async_trait]
    impl LlmGateway for StageGateway {
        async fn complete(&self, system_prompt: &str, _prompt: &str) -> Result<String, GatewayError> {
            if system_prompt == PromptTemplate::planning_system() {
                if self.fail_planning {
                    return Err(GatewayError::Authentication("invalid api key".to_string()));
                }
                Ok(r#"{"rephrased_question": "How are passages ranked?", "sub_questions": ["How does ranking work?", "What scores are used?"]}"#.to_string())
            } else if system_prompt == PromptTemplate::answer_system() {
                Ok("Passages are ranked by similarity score [Chunk 1].".to_string())
            } else {
                Ok(r#"{"verdict": "supported", "reason": "stated in Chunk 1"}"#.to_string())
            }
        }

        fn model_name(&self) -> &str {
            "stage-gateway"
        }
    }

    struct FixedStore {
        fail: bool,
    }

    #[async_trait]
    impl EvidenceStore for FixedStore {
        async fn search(&self, query: &str, _k: usize) -> Result<Vec<Passage>, EvidenceStoreError> {
            if self.fail {
                return Err(EvidenceStoreError::HttpStatus {
                    status: 404,
                    message: "index not found".to_string(),
                });
            }
            Ok(vec![Passage::new(
                format!("doc#{}", query.len()),
                "Passages are ranked by similarity score.",
                0.9,
            )])
        }
    }

    fn state(fail_planning: bool, fail_store: bool) -> AppState {
        let policy = CallPolicy::default()
            .with_max_retries(0)
            .with_timeout(Duration::from_secs(5));
        let pipeline = AnswerQuestionUseCase::new(
            Arc::new(StageGateway { fail_planning }),
            Arc::new(FixedStore { fail: fail_store }),
            &PipelineParams::default(),
            policy,
        );
        AppState::new(Arc::new(pipeline))
    }

    async fn post_qa(state: AppState, question: &str) -> (StatusCode, serde_json::Value) {
        let request = QaRequest {
            question: question.to_string(),
        };
        let response = qa(State(state), Ok(Json(request))).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                QueryError::new(Stage::Planning, StageError::InvalidInput("empty".into())),
                StatusCode::BAD_REQUEST,
            ),
            (
                QueryError::new(
                    Stage::Answering,
                    StageError::Upstream(GatewayError::Timeout(Duration::from_secs(30))),
                ),
                StatusCode::BAD_GATEWAY,
            ),
            (
                QueryError::new(
                    Stage::Retrieval,
                    StageError::RetrievalExhausted {
                        attempted: 3,
                        last_error: "timeout".into(),
                    },
                ),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                QueryError::new(
                    Stage::Verification,
                    StageError::DeadlineExceeded(Duration::from_secs(120)),
                ),
                StatusCode::GATEWAY_TIMEOUT,
            ),
        ];
        for (error, expected) in cases {
            assert_eq!(status_for(&error), expected, "{error}");
        }
    }

    #[tokio::test]
    async fn test_qa_success_body() {
        let (status, body) = post_qa(state(false, false), "  How are passages ranked?  ").await;

        assert_eq!(status, StatusCode::OK);
        let object = body.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert_eq!(body["answer"], "Passages are ranked by similarity score [Chunk 1].");
        assert!(body["context"].as_str().unwrap().contains("[Chunk 1]"));
        assert!(body["plan"].as_str().unwrap().contains("Rephrased Question:"));
        assert_eq!(body["sub_questions"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_qa_blank_question_is_bad_request() {
        let (status, body) = post_qa(state(false, false), "   ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"].as_str().unwrap().starts_with("planning stage failed"));
    }

    #[tokio::test]
    async fn test_qa_upstream_failure_is_bad_gateway() {
        let (status, body) = post_qa(state(true, false), "How are passages ranked?").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["detail"].as_str().unwrap().contains("invalid api key"));
    }

    #[tokio::test]
    async fn test_qa_retrieval_exhausted_is_unavailable() {
        let (status, body) = post_qa(state(false, true), "How are passages ranked?").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["detail"].as_str().unwrap().starts_with("retrieval stage failed"));
    }

    async fn raw_get(addr: std::net::SocketAddr, path: &str) -> String {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        response
    }

    #[tokio::test]
    async fn test_routes_are_mounted_at_root_and_under_api() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let shutdown = CancellationToken::new();
        let server = tokio::spawn(serve(listener, state(false, false), shutdown.clone()));

        for path in ["/health", "/api/health"] {
            let response = raw_get(addr, path).await;
            assert!(response.starts_with("HTTP/1.1 200"), "{path}: {response}");
            assert!(response.contains(r#""status":"healthy""#));
        }
        assert!(raw_get(addr, "/").await.contains("API available at /api"));
        assert!(raw_get(addr, "/api").await.contains("QA API is running"));
        assert!(raw_get(addr, "/missing").await.starts_with("HTTP/1.1 404"));

        shutdown.cancel();
        server.await.unwrap().unwrap();
    }
}
