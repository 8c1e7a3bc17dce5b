//! ISO 639-1 language codes and flag glyphs

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::{Error, Result};

/// Glyph used for languages without a flag entry
pub const NEUTRAL_FLAG: &str = "🌐";

static FLAGS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("en", "🇺🇸"),
        ("ko", "🇰🇷"),
        ("th", "🇹🇭"),
        ("ja", "🇯🇵"),
        ("zh", "🇨🇳"),
        ("vi", "🇻🇳"),
        ("id", "🇮🇩"),
        ("hi", "🇮🇳"),
        ("es", "🇪🇸"),
        ("pt", "🇵🇹"),
        ("fr", "🇫🇷"),
        ("de", "🇩🇪"),
        ("it", "🇮🇹"),
        ("ru", "🇷🇺"),
    ])
});

/// Look up the display flag for a language code
///
/// Unknown codes map to [`NEUTRAL_FLAG`].
pub fn flag_for(code: &str) -> &'static str {
    FLAGS.get(code).copied().unwrap_or(NEUTRAL_FLAG)
}

/// Two-letter lowercase ISO 639-1 code
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    /// Parse and normalize a code (`"EN"` -> `"en"`)
    pub fn parse(raw: &str) -> Result<Self> {
        let code = raw.trim().to_ascii_lowercase();
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_lowercase()) {
            Ok(Self(code))
        } else {
            Err(Error::Detection(format!("not an ISO 639-1 code: {:?}", raw)))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn flag(&self) -> &'static str {
        flag_for(&self.0)
    }

    /// Prefix text with this language's flag
    pub fn decorate(&self, text: &str) -> String {
        format!("{} {}", self.flag(), text.trim())
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_normalizes_case() {
        let code = LanguageCode::parse(" KO ").unwrap();
        assert_eq!(code.as_str(), "ko");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(LanguageCode::parse("english").is_err());
        assert!(LanguageCode::parse("").is_err());
        assert!(LanguageCode::parse("e1").is_err());
    }

    #[test]
    fn test_flags() {
        assert_eq!(flag_for("en"), "🇺🇸");
        assert_eq!(flag_for("ko"), "🇰🇷");
        assert_eq!(flag_for("xx"), NEUTRAL_FLAG);
    }

    #[test]
    fn test_decorate() {
        let en = LanguageCode::parse("en").unwrap();
        assert_eq!(en.decorate("  Hello\n"), "🇺🇸 Hello");
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let code: LanguageCode = serde_json::from_str("\"th\"").unwrap();
        assert_eq!(code.as_str(), "th");
        assert!(serde_json::from_str::<LanguageCode>("\"thai\"").is_err());
    }
}
