//! Slack adapter errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SlackError {
    #[error("HTTP error calling Slack: {0}")]
    Http(#[from] reqwest::Error),

    /// Slack answered `ok: false`
    #[error("{method} failed: {error}")]
    Api { method: String, error: String },

    #[error("Socket Mode error: {0}")]
    Socket(#[from] tokio_tungstenite::tungstenite::Error),

    /// Response or envelope did not have the expected shape
    #[error("Unexpected payload from {context}: {message}")]
    Protocol { context: String, message: String },
}

impl SlackError {
    /// Slack error code for API failures (e.g. `message_not_found`)
    pub fn api_code(&self) -> Option<&str> {
        match self {
            SlackError::Api { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<SlackError> for slack_translator_core::Error {
    fn from(err: SlackError) -> Self {
        slack_translator_core::Error::Destination(err.to_string())
    }
}
