//! Prompt-driven detection and translation over any completion backend

use async_trait::async_trait;
use futures::future::try_join_all;

use slack_translator_config::prompts;
use slack_translator_core::{
    Error, LanguageCode, LanguageModel, Result, TranslationRequest, TranslationResponse,
};

use crate::backend::CompletionBackend;

/// [`LanguageModel`] built from a completion backend and fixed prompts
pub struct PromptedModel<B> {
    backend: B,
}

impl<B: CompletionBackend> PromptedModel<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    async fn translate_one(&self, request: &TranslationRequest, target: &LanguageCode) -> Result<String> {
        let input = prompts::translation_input(request.source.as_str(), target.as_str(), &request.text);
        self.backend
            .complete(prompts::TRANSLATE, &input)
            .await
            .map_err(|e| Error::Translation(format!("{} -> {}: {}", request.source, target, e)))
    }
}

#[async_trait]
impl<B: CompletionBackend> LanguageModel for PromptedModel<B> {
    async fn detect_language(&self, text: &str) -> Result<LanguageCode> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::Detection("empty input".to_string()));
        }

        let answer = self
            .backend
            .complete(prompts::DETECT_LANGUAGE, text)
            .await
            .map_err(|e| Error::Detection(e.to_string()))?;

        let code = parse_language_code(&answer)?;
        tracing::debug!(backend = self.backend.name(), language = %code, "Detected language");
        Ok(code)
    }

    async fn translate(&self, request: &TranslationRequest) -> Result<TranslationResponse> {
        // Targets are independent; run them together and keep request order
        let raw = try_join_all(
            request
                .targets
                .iter()
                .map(|target| self.translate_one(request, target)),
        )
        .await?;

        TranslationResponse::decorated(request, raw)
    }

    fn name(&self) -> &str {
        self.backend.name()
    }
}

/// Extract a language code from a model answer
///
/// Models sometimes wrap the code in quotes, add a trailing period or a
/// leading `Language:` label. After stripping those, exactly one two-letter
/// token must remain; prose answers are rejected.
pub fn parse_language_code(answer: &str) -> Result<LanguageCode> {
    let unrecognized = || {
        Error::Detection(format!(
            "unrecognized language answer: {:?}",
            answer.chars().take(40).collect::<String>()
        ))
    };

    let body = strip_punctuation(answer);
    let body = strip_label(body).unwrap_or(body);
    let code = strip_punctuation(body);

    if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(unrecognized());
    }
    LanguageCode::parse(code).map_err(|_| unrecognized())
}

fn strip_punctuation(s: &str) -> &str {
    s.trim_matches(|c: char| !c.is_alphanumeric())
}

/// `Language: th` / `language th` -> `th`
fn strip_label(s: &str) -> Option<&str> {
    const LABEL: &str = "language";
    let head = s.get(..LABEL.len())?;
    if !head.eq_ignore_ascii_case(LABEL) {
        return None;
    }
    let rest = &s[LABEL.len()..];
    rest.starts_with(|c: char| c == ':' || c.is_whitespace())
        .then(|| rest.trim_start_matches(|c: char| c == ':' || c.is_whitespace()))
}
