//! Centralized constants for the translation bot
//!
//! Single source of truth for default values used across crates.

/// Service endpoints (defaults for local development)
pub mod endpoints {
    /// Ollama LLM endpoint
    pub const OLLAMA_DEFAULT: &str = "http://localhost:11434";

    /// OpenAI API endpoint
    pub const OPENAI_DEFAULT: &str = "https://api.openai.com/v1";

    /// Slack Web API base URL
    pub const SLACK_API_DEFAULT: &str = "https://slack.com/api";
}

/// Default model names
pub mod models {
    pub const OLLAMA_DEFAULT: &str = "llama3.2";

    pub const OPENAI_DEFAULT: &str = "gpt-4o-mini";
}

/// Timeouts (in seconds)
pub mod timeouts {
    /// LLM HTTP request timeout
    pub const LLM_REQUEST_SECS: u64 = 60;

    /// Slack Web API request timeout
    pub const SLACK_REQUEST_SECS: u64 = 10;

    /// Upper bound for any single external call made while handling an event
    pub const OPERATION_SECS: u64 = 90;

    /// Pause before re-opening a Socket Mode connection
    pub const RECONNECT_DELAY_SECS: u64 = 5;
}

/// Translation defaults
pub mod translation {
    /// Target languages when none are configured
    pub const DEFAULT_TARGETS: &[&str] = &["en", "ko", "th"];
}

/// Storage defaults
pub mod storage {
    /// SQLite database file
    pub const SQLITE_PATH: &str = "translation.db";
}
