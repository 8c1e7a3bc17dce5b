//! Language model integration
//!
//! Both providers are plain prompt-in/text-out completion endpoints. The
//! detection and translation logic on top of them lives in [`PromptedModel`].

pub mod backend;
pub mod model;
pub mod ollama;
pub mod openai;

pub use backend::{CompletionBackend, LlmError};
pub use model::{parse_language_code, PromptedModel};
pub use ollama::OllamaBackend;
pub use openai::OpenAiBackend;

use std::sync::Arc;

use slack_translator_config::{LlmConfig, LlmProvider};
use slack_translator_core::{Error, LanguageModel, Result};

/// Create the language model selected by config
pub fn create_language_model(config: &LlmConfig) -> Result<Arc<dyn LanguageModel>> {
    match config.provider {
        Some(LlmProvider::Ollama) => {
            let backend = OllamaBackend::new(
                &config.ollama_host,
                &config.ollama_model,
                config.request_timeout(),
            )?;
            tracing::info!(
                host = %config.ollama_host,
                model = %config.ollama_model,
                "Using Ollama language model"
            );
            Ok(Arc::new(PromptedModel::new(backend)))
        }
        Some(LlmProvider::OpenAi) => {
            let api_key = config
                .openai_api_key
                .as_deref()
                .ok_or_else(|| Error::config("OPENAI_API_KEY is required for the openai provider"))?;
            let backend = OpenAiBackend::new(
                &config.openai_base_url,
                api_key,
                &config.openai_model,
                config.request_timeout(),
            )?;
            tracing::info!(model = %config.openai_model, "Using OpenAI language model");
            Ok(Arc::new(PromptedModel::new(backend)))
        }
        None => Err(Error::config("LLM_PROVIDER is not set")),
    }
}
