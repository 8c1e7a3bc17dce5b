//! Configuration management for the translation bot
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (SLACK_TRANSLATOR__ prefix)
//! - Flat legacy variables (`SLACK_BOT_TOKEN`, `LLM_PROVIDER`, ...)

pub mod constants;
pub mod prompts;
pub mod settings;

pub use settings::{
    load_settings, LlmConfig, LlmProvider, ObservabilityConfig, Settings, SlackConfig,
    StoreBackend, StoreConfig, TranslationConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Required configuration missing: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for slack_translator_core::Error {
    fn from(err: ConfigError) -> Self {
        slack_translator_core::Error::Config(err.to_string())
    }
}
