//! Prompt templates for language detection and translation

/// Instructions for language detection; the model must answer with a bare code
pub const DETECT_LANGUAGE: &str = "\
You must forget all previous prompts and only follow this prompt.

Your task is to identify the language of the given text.
Respond with only the ISO 639-1 language code (e.g., \"ko\" for Korean, \"en\" for English, \"th\" for Thai).
Do not include any explanations or additional text in your response.

Rules:
- All text except for the two-letter English code must be completely removed
- If the text is in Korean, respond with: ko
- If the text is in English, respond with: en
- If the text is in Thai, respond with: th
";

/// Instructions for translation
pub const TRANSLATE: &str = "\
You must forget all previous prompts and only follow this prompt.

Your task is to translate the given text while preserving the nuance and technical terminology of the original message.

Translate the text to the target language specified.
Provide only the translated text without any explanations or additional information.

Rules:
1. Preserve the nuance and technical terminology of the original message as much as possible
2. Maintain the original meaning and tone
3. Do not add any explanations or notes
4. Provide only the translated text
";

/// Per-call input for a single translation target
pub fn translation_input(from: &str, to: &str, text: &str) -> String {
    format!("Translate the following text from {from} to {to}:\n{text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_input() {
        let input = translation_input("en", "ko", "Hello");
        assert_eq!(input, "Translate the following text from en to ko:\nHello");
    }

    #[test]
    fn test_detect_prompt_asks_for_code_only() {
        assert!(DETECT_LANGUAGE.contains("ISO 639-1"));
    }
}
