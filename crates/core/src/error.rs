//! Error types for the translation bot

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type
///
/// Every variant is scoped to the single event being processed; none of them
/// should take the process down.
#[derive(Error, Debug)]
pub enum Error {
    /// Language detection backend failed or returned something unusable
    #[error("Language detection error: {0}")]
    Detection(String),

    /// Translation backend failed
    #[error("Translation error: {0}")]
    Translation(String),

    /// Post/update/delete against the chat platform failed
    #[error("Destination operation error: {0}")]
    Destination(String),

    /// Mapping store unavailable or returned invalid data
    #[error("Mapping store error: {0}")]
    Store(String),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// An external call exceeded its time limit
    #[error("{operation} timed out after {after_ms}ms")]
    Timeout { operation: String, after_ms: u64 },

    /// A collaborator broke its contract (e.g. wrong number of translations)
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Detection(_) => "detection",
            Error::Translation(_) => "translation",
            Error::Destination(_) => "destination",
            Error::Store(_) => "store",
            Error::Config(_) => "config",
            Error::Timeout { .. } => "timeout",
            Error::ContractViolation(_) => "contract",
            Error::Other(_) => "other",
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display() {
        let err = Error::Timeout {
            operation: "translate".to_string(),
            after_ms: 1500,
        };
        assert_eq!(err.to_string(), "translate timed out after 1500ms");
        assert_eq!(err.kind(), "timeout");
    }

    #[test]
    fn test_from_str() {
        let err: Error = "boom".into();
        assert!(matches!(err, Error::Other(ref m) if m == "boom"));
    }
}
