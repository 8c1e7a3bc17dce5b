//! Ollama backend (`/api/generate`)

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use slack_translator_core::{Error, Result};

use crate::backend::{check_status, CompletionBackend, LlmError};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

pub struct OllamaBackend {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaBackend {
    pub fn new(host: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/api/generate", host.trim_end_matches('/')),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl CompletionBackend for OllamaBackend {
    async fn complete(&self, instructions: &str, input: &str) -> std::result::Result<String, LlmError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt: format!("{instructions}\n\n{input}"),
            stream: false,
        };

        let response = self.client.post(&self.endpoint).json(&request).send().await?;
        let body: GenerateResponse = check_status(self.name(), response).await?.json().await?;

        let text = body.response.trim();
        if text.is_empty() {
            return Err(LlmError::EmptyCompletion(self.name()));
        }
        Ok(text.to_string())
    }

    fn name(&self) -> &'static str {
        "ollama"
    }
}
