//! Completion backend abstraction

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{provider} returned {status}: {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{0} returned an empty completion")]
    EmptyCompletion(&'static str),
}

/// A single-shot completion endpoint
///
/// `instructions` is the fixed task prompt, `input` the per-call payload.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, instructions: &str, input: &str) -> Result<String, LlmError>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Turn a non-2xx response into [`LlmError::Api`]
pub(crate) async fn check_status(
    provider: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, LlmError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(LlmError::Api {
        provider,
        status: status.as_u16(),
        body,
    })
}
