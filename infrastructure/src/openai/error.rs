//! OpenAI API error mapping

use planqa_application::GatewayError;
use planqa_domain::core::string::truncate;
use serde::Deserialize;
use thiserror::Error;

/// Failure talking to an OpenAI-compatible endpoint.
#[derive(Debug, Error)]
pub enum OpenAiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl OpenAiError {
    /// Build a status error, extracting the API's own message from `body`.
    pub fn from_status(status: u16, body: &str) -> Self {
        OpenAiError::Status {
            status,
            message: error_message(body),
        }
    }
}

impl From<OpenAiError> for GatewayError {
    fn from(err: OpenAiError) -> Self {
        match err {
            OpenAiError::Transport(e) if e.is_decode() => GatewayError::InvalidResponse(e.to_string()),
            OpenAiError::Transport(e) => GatewayError::ConnectionError(e.to_string()),
            OpenAiError::Status {
                status: 401 | 403,
                message,
            } => GatewayError::Authentication(message),
            OpenAiError::Status { status, message } => GatewayError::HttpStatus { status, message },
            OpenAiError::Decode(message) => GatewayError::InvalidResponse(message),
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// `error.message` from an OpenAI error body, or the trimmed body itself.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => envelope.error.message,
        Err(_) => {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "empty error body".to_string()
            } else {
                truncate(trimmed, 500)
            }
        }
    }
}

/// Read a response, turning non-success statuses into [`OpenAiError::Status`].
pub(crate) async fn checked_text(response: reqwest::Response) -> Result<String, OpenAiError> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(OpenAiError::from_status(status.as_u16(), &body));
    }
    Ok(body)
}
