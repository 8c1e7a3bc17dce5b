//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use slack_translator_core::LanguageCode;

use crate::constants::{endpoints, models, storage, timeouts, translation};
use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Slack credentials and client tuning
    #[serde(default)]
    pub slack: SlackConfig,

    /// Language model backend
    #[serde(default)]
    pub llm: LlmConfig,

    /// Translation policy
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Mapping store backend
    #[serde(default)]
    pub store: StoreConfig,

    /// Logging and metrics
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Create default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the flat environment variables used by earlier deployments
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("SLACK_APP_TOKEN") {
            self.slack.app_token = Some(v);
        }
        if let Some(v) = get("SLACK_BOT_TOKEN") {
            self.slack.bot_token = Some(v);
        }
        if let Some(v) = get("LLM_PROVIDER") {
            match v.trim().to_ascii_lowercase().as_str() {
                "ollama" => self.llm.provider = Some(LlmProvider::Ollama),
                "openai" => self.llm.provider = Some(LlmProvider::OpenAi),
                other => tracing::warn!(provider = %other, "Ignoring unknown LLM_PROVIDER"),
            }
        }
        if let Some(v) = get("OLLAMA_HOST") {
            self.llm.ollama_host = v;
        }
        if let Some(v) = get("OLLAMA_MODEL") {
            self.llm.ollama_model = v;
        }
        if let Some(v) = get("OPENAI_API_KEY") {
            self.llm.openai_api_key = Some(v);
        }
        if let Some(v) = get("OPENAI_MODEL") {
            self.llm.openai_model = v;
        }
        if let Some(v) = get("DB_TYPE") {
            match v.trim().to_ascii_lowercase().as_str() {
                "sqlite" => self.store.backend = StoreBackend::Sqlite,
                "memory" => self.store.backend = StoreBackend::Memory,
                other => tracing::warn!(backend = %other, "Ignoring unknown DB_TYPE"),
            }
        }
        if let Some(v) = get("LOG_LEVEL") {
            self.observability.log_level = v.to_ascii_lowercase();
        }
        if let Some(v) = get("TARGET_LANGUAGES") {
            self.translation.target_languages = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    /// Validate settings
    ///
    /// All missing required values are reported together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();

        if self.slack.app_token.is_none() {
            missing.push("SLACK_APP_TOKEN".to_string());
        }
        if self.slack.bot_token.is_none() {
            missing.push("SLACK_BOT_TOKEN".to_string());
        }
        match self.llm.provider {
            None => missing.push("LLM_PROVIDER".to_string()),
            Some(LlmProvider::OpenAi) if self.llm.openai_api_key.is_none() => {
                missing.push("OPENAI_API_KEY".to_string());
            }
            _ => {}
        }

        if !missing.is_empty() {
            return Err(ConfigError::MissingFields(missing));
        }

        self.translation.target_codes()?;

        let timeouts = [
            ("slack.request_timeout_secs", self.slack.request_timeout_secs),
            ("llm.request_timeout_secs", self.llm.request_timeout_secs),
            ("translation.operation_timeout_secs", self.translation.operation_timeout_secs),
        ];
        for (field, value) in timeouts {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "must be greater than zero".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Human-readable configuration summary with secrets masked
    pub fn summary(&self) -> String {
        let rule = "=".repeat(50);
        let thin = "-".repeat(50);
        let masked = |v: &Option<String>| if v.is_some() { "<masked>" } else { "<unset>" };

        let mut lines = vec![
            rule.clone(),
            format!("{:^50}", "Configuration Summary"),
            rule.clone(),
            format!("{:<20}: {}", "LOG_LEVEL", self.observability.log_level),
            thin.clone(),
            format!("{:<20}: {}", "SLACK_APP_TOKEN", masked(&self.slack.app_token)),
            format!("{:<20}: {}", "SLACK_BOT_TOKEN", masked(&self.slack.bot_token)),
            thin.clone(),
        ];

        match self.llm.provider {
            Some(LlmProvider::Ollama) => {
                lines.push(format!("{:<20}: ollama", "LLM_PROVIDER"));
                lines.push(format!("{:<20}: {}", "MODEL", self.llm.ollama_model));
            }
            Some(LlmProvider::OpenAi) => {
                lines.push(format!("{:<20}: openai", "LLM_PROVIDER"));
                lines.push(format!("{:<20}: {}", "OPENAI_MODEL", self.llm.openai_model));
            }
            None => lines.push(format!("{:<20}: <unset>", "LLM_PROVIDER")),
        }

        lines.push(thin);
        lines.push(format!("{:<20}: {}", "DATABASE", self.store.backend.as_str()));
        lines.push(format!(
            "{:<20}: {}",
            "TARGET_LANGUAGES",
            self.translation.target_languages.join(",")
        ));
        lines.push(rule);

        lines.join("\n")
    }
}

/// Slack configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// App-level token (`xapp-...`) used to open Socket Mode connections
    #[serde(default)]
    pub app_token: Option<String>,

    /// Bot token (`xoxb-...`) used for Web API calls
    #[serde(default)]
    pub bot_token: Option<String>,

    /// Web API base URL
    #[serde(default = "default_slack_api")]
    pub api_base: String,

    /// Web API request timeout in seconds
    #[serde(default = "default_slack_timeout")]
    pub request_timeout_secs: u64,

    /// Delay before reconnecting a dropped socket, in seconds
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_secs: u64,
}

fn default_slack_api() -> String {
    endpoints::SLACK_API_DEFAULT.to_string()
}
fn default_slack_timeout() -> u64 {
    timeouts::SLACK_REQUEST_SECS
}
fn default_reconnect_delay() -> u64 {
    timeouts::RECONNECT_DELAY_SECS
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self {
            app_token: None,
            bot_token: None,
            api_base: default_slack_api(),
            request_timeout_secs: default_slack_timeout(),
            reconnect_delay_secs: default_reconnect_delay(),
        }
    }
}

impl SlackConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_secs(self.reconnect_delay_secs)
    }
}

/// Language model providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Local model served by Ollama
    Ollama,
    /// Hosted OpenAI API
    #[serde(rename = "openai")]
    OpenAi,
}

/// Language model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Which provider to use; required
    #[serde(default)]
    pub provider: Option<LlmProvider>,

    #[serde(default = "default_ollama_host")]
    pub ollama_host: String,

    #[serde(default = "default_ollama_model")]
    pub ollama_model: String,

    #[serde(default)]
    pub openai_api_key: Option<String>,

    #[serde(default = "default_openai_model")]
    pub openai_model: String,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    /// HTTP request timeout in seconds
    #[serde(default = "default_llm_timeout")]
    pub request_timeout_secs: u64,
}

fn default_ollama_host() -> String {
    endpoints::OLLAMA_DEFAULT.to_string()
}
fn default_ollama_model() -> String {
    models::OLLAMA_DEFAULT.to_string()
}
fn default_openai_model() -> String {
    models::OPENAI_DEFAULT.to_string()
}
fn default_openai_base_url() -> String {
    endpoints::OPENAI_DEFAULT.to_string()
}
fn default_llm_timeout() -> u64 {
    timeouts::LLM_REQUEST_SECS
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: None,
            ollama_host: default_ollama_host(),
            ollama_model: default_ollama_model(),
            openai_api_key: None,
            openai_model: default_openai_model(),
            openai_base_url: default_openai_base_url(),
            request_timeout_secs: default_llm_timeout(),
        }
    }
}

impl LlmConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Translation policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    /// Ordered target languages (ISO 639-1)
    #[serde(default = "default_targets")]
    pub target_languages: Vec<String>,

    /// Bound on each external call made while handling one event, in seconds
    #[serde(default = "default_operation_timeout")]
    pub operation_timeout_secs: u64,
}

fn default_targets() -> Vec<String> {
    translation::DEFAULT_TARGETS
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_operation_timeout() -> u64 {
    timeouts::OPERATION_SECS
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            target_languages: default_targets(),
            operation_timeout_secs: default_operation_timeout(),
        }
    }
}

impl TranslationConfig {
    /// Parsed target codes, order preserved, duplicates dropped
    pub fn target_codes(&self) -> Result<Vec<LanguageCode>, ConfigError> {
        let mut codes: Vec<LanguageCode> = Vec::with_capacity(self.target_languages.len());

        for raw in &self.target_languages {
            let code = LanguageCode::parse(raw).map_err(|_| ConfigError::InvalidValue {
                field: "translation.target_languages".to_string(),
                message: format!("{:?} is not an ISO 639-1 code", raw),
            })?;
            if !codes.contains(&code) {
                codes.push(code);
            }
        }

        if codes.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "translation.target_languages".to_string(),
                message: "at least one target language is required".to_string(),
            });
        }

        Ok(codes)
    }

    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.operation_timeout_secs)
    }
}

/// Mapping store backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// File-backed SQLite database
    #[default]
    Sqlite,
    /// Process-local map; mappings are lost on restart
    Memory,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Memory => "memory",
        }
    }
}

/// Mapping store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: String,
}

fn default_sqlite_path() -> String {
    storage::SQLITE_PATH.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            sqlite_path: default_sqlite_path(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Serve Prometheus metrics and health checks
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// Metrics/health port
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_metrics_port() -> u16 {
    9090
}
fn default_true() -> bool {
    true
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
            metrics_port: default_metrics_port(),
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Flat legacy variables (`SLACK_BOT_TOKEN`, `LLM_PROVIDER`, ...)
/// 2. Environment variables (SLACK_TRANSLATOR__ prefix)
/// 3. config/{env}.yaml (if env specified)
/// 4. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    // Load default config
    builder = builder.add_source(File::with_name("config/default").required(false));

    // Load environment-specific config
    if let Some(env_name) = env {
        builder = builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    // Load from environment variables
    builder = builder.add_source(
        Environment::with_prefix("SLACK_TRANSLATOR")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("translation.target_languages"),
    );

    let config = builder.build()?;
    let mut settings: Settings = config.try_deserialize()?;

    settings.apply_overrides(|key| std::env::var(key).ok());

    // Validate
    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn complete() -> Settings {
        let mut settings = Settings::default();
        settings.slack.app_token = Some("xapp-1".to_string());
        settings.slack.bot_token = Some("xoxb-1".to_string());
        settings.llm.provider = Some(LlmProvider::Ollama);
        settings
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.translation.target_languages, vec!["en", "ko", "th"]);
        assert_eq!(settings.store.backend, StoreBackend::Sqlite);
        assert_eq!(settings.store.sqlite_path, "translation.db");
        assert_eq!(settings.observability.metrics_port, 9090);
    }

    #[test]
    fn test_missing_fields_reported_together() {
        let err = Settings::default().validate().unwrap_err();
        match err {
            ConfigError::MissingFields(fields) => {
                assert_eq!(fields, vec!["SLACK_APP_TOKEN", "SLACK_BOT_TOKEN", "LLM_PROVIDER"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_openai_requires_key() {
        let mut settings = complete();
        settings.llm.provider = Some(LlmProvider::OpenAi);
        assert!(matches!(settings.validate(), Err(ConfigError::MissingFields(f)) if f == vec!["OPENAI_API_KEY"]));

        settings.llm.openai_api_key = Some("sk-test".to_string());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_target_codes_dedup_and_validate() {
        let mut config = TranslationConfig::default();
        config.target_languages = vec!["EN".into(), "ko".into(), "en".into()];
        let codes = config.target_codes().unwrap();
        let codes: Vec<&str> = codes.iter().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["en", "ko"]);

        config.target_languages = vec!["english".into()];
        assert!(config.target_codes().is_err());

        config.target_languages.clear();
        assert!(config.target_codes().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut settings = complete();
        settings.translation.operation_timeout_secs = 0;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { ref field, .. }) if field == "translation.operation_timeout_secs"
        ));
    }

    #[test]
    fn test_flat_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("SLACK_APP_TOKEN", "xapp-env"),
            ("SLACK_BOT_TOKEN", "xoxb-env"),
            ("LLM_PROVIDER", "OpenAI"),
            ("OPENAI_API_KEY", "sk-env"),
            ("DB_TYPE", "memory"),
            ("TARGET_LANGUAGES", "ko, th"),
            ("LOG_LEVEL", "DEBUG"),
        ]);

        let mut settings = Settings::default();
        settings.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(settings.slack.app_token.as_deref(), Some("xapp-env"));
        assert_eq!(settings.llm.provider, Some(LlmProvider::OpenAi));
        assert_eq!(settings.store.backend, StoreBackend::Memory);
        assert_eq!(settings.translation.target_languages, vec!["ko", "th"]);
        assert_eq!(settings.observability.log_level, "debug");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_summary_masks_secrets() {
        let summary = complete().summary();
        assert!(summary.contains("<masked>"));
        assert!(!summary.contains("xoxb-1"));
        assert!(summary.contains("ollama"));
    }

    #[test]
    fn test_load_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bot.yaml");
        std::fs::write(
            &path,
            "llm:\n  provider: openai\n  openai_model: gpt-4o\ntranslation:\n  target_languages: [ja, en]\nstore:\n  backend: memory\n",
        )
        .unwrap();

        let settings: Settings = Config::builder()
            .add_source(File::from(path.as_path()))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.llm.provider, Some(LlmProvider::OpenAi));
        assert_eq!(settings.llm.openai_model, "gpt-4o");
        assert_eq!(settings.translation.target_languages, vec!["ja", "en"]);
        assert_eq!(settings.store.backend, StoreBackend::Memory);
        assert_eq!(settings.slack.api_base, "https://slack.com/api");
    }
}
