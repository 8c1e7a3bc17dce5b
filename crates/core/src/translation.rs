//! Translation request/response types

use serde::{Deserialize, Serialize};

use crate::{Error, LanguageCode, Result};

/// Translate `text` from `source` into every language in `targets`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRequest {
    pub text: String,
    pub source: LanguageCode,
    /// Ordered; the response preserves this order
    pub targets: Vec<LanguageCode>,
}

impl TranslationRequest {
    pub fn new(text: impl Into<String>, source: LanguageCode, targets: Vec<LanguageCode>) -> Self {
        Self {
            text: text.into(),
            source,
            targets,
        }
    }
}

/// Flag-decorated original plus one flag-decorated translation per target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResponse {
    pub original: String,
    pub translations: Vec<String>,
}

impl TranslationResponse {
    /// Build a response from raw backend output, adding flags
    ///
    /// `raw` must hold exactly one entry per requested target, in request order.
    pub fn decorated(request: &TranslationRequest, raw: Vec<String>) -> Result<Self> {
        if raw.len() != request.targets.len() {
            return Err(Error::ContractViolation(format!(
                "expected {} translations, got {}",
                request.targets.len(),
                raw.len()
            )));
        }

        let translations = request
            .targets
            .iter()
            .zip(raw)
            .map(|(lang, text)| lang.decorate(&text))
            .collect();

        Ok(Self {
            original: request.source.decorate(&request.text),
            translations,
        })
    }

    /// Render the destination post body
    ///
    /// Flagged original, a blank line, then one flagged translation per line.
    pub fn compose(&self) -> String {
        let mut out = self.original.clone();
        out.push_str("\n\n");
        out.push_str(&self.translations.join("\n"));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lang(code: &str) -> LanguageCode {
        LanguageCode::parse(code).unwrap()
    }

    #[test]
    fn test_decorated_and_compose() {
        let request = TranslationRequest::new("Hello", lang("en"), vec![lang("ko"), lang("th")]);
        let response =
            TranslationResponse::decorated(&request, vec!["안녕하세요".into(), "สวัสดี".into()]).unwrap();

        assert_eq!(response.original, "🇺🇸 Hello");
        assert_eq!(
            response.compose(),
            "🇺🇸 Hello\n\n🇰🇷 안녕하세요\n🇹🇭 สวัสดี"
        );
    }

    #[test]
    fn test_length_mismatch_is_contract_violation() {
        let request = TranslationRequest::new("Hello", lang("en"), vec![lang("ko"), lang("th")]);
        let err = TranslationResponse::decorated(&request, vec!["only one".into()]).unwrap_err();
        assert!(matches!(err, Error::ContractViolation(_)));
    }
}
