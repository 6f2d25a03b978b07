//! Language definitions
//!
//! The backend serves farmers in 11 languages. All internal processing
//! (intent classification, retrieval, answer composition) happens in the
//! pivot language (English); user-facing text is translated at the edges.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Language {
    #[default]
    #[serde(rename = "en")]
    English,
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "ta")]
    Tamil,
    #[serde(rename = "te")]
    Telugu,
    #[serde(rename = "kn")]
    Kannada,
    #[serde(rename = "ml")]
    Malayalam,
    #[serde(rename = "mr")]
    Marathi,
    #[serde(rename = "bn")]
    Bengali,
    #[serde(rename = "gu")]
    Gujarati,
    #[serde(rename = "pa")]
    Punjabi,
    #[serde(rename = "ur")]
    Urdu,
}

impl Language {
    /// The pivot language used internally between the user's language
    /// and the document corpus / LLM.
    pub const PIVOT: Language = Language::English;

    /// ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Tamil => "ta",
            Language::Telugu => "te",
            Language::Kannada => "kn",
            Language::Malayalam => "ml",
            Language::Marathi => "mr",
            Language::Bengali => "bn",
            Language::Gujarati => "gu",
            Language::Punjabi => "pa",
            Language::Urdu => "ur",
        }
    }

    /// English name
    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Kannada => "Kannada",
            Language::Malayalam => "Malayalam",
            Language::Marathi => "Marathi",
            Language::Bengali => "Bengali",
            Language::Gujarati => "Gujarati",
            Language::Punjabi => "Punjabi",
            Language::Urdu => "Urdu",
        }
    }

    /// Parse an ISO 639-1 code; `None` for unsupported codes
    pub fn from_code(code: &str) -> Option<Language> {
        match code.trim().to_lowercase().as_str() {
            "en" => Some(Language::English),
            "hi" => Some(Language::Hindi),
            "ta" => Some(Language::Tamil),
            "te" => Some(Language::Telugu),
            "kn" => Some(Language::Kannada),
            "ml" => Some(Language::Malayalam),
            "mr" => Some(Language::Marathi),
            "bn" => Some(Language::Bengali),
            "gu" => Some(Language::Gujarati),
            "pa" => Some(Language::Punjabi),
            "ur" => Some(Language::Urdu),
            _ => None,
        }
    }

    /// All supported languages
    pub fn all() -> &'static [Language] {
        &[
            Language::English,
            Language::Hindi,
            Language::Tamil,
            Language::Telugu,
            Language::Kannada,
            Language::Malayalam,
            Language::Marathi,
            Language::Bengali,
            Language::Gujarati,
            Language::Punjabi,
            Language::Urdu,
        ]
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A request's declared language: either a concrete language or "auto",
/// leaving detection to transcription/translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageHint {
    Auto,
    Declared(Language),
}

impl LanguageHint {
    /// Parse a request-level language string ("auto" or an ISO code).
    /// Unsupported codes return `None` so the caller can reject the request.
    pub fn from_code(code: &str) -> Option<LanguageHint> {
        if code.trim().eq_ignore_ascii_case("auto") {
            Some(LanguageHint::Auto)
        } else {
            Language::from_code(code).map(LanguageHint::Declared)
        }
    }

    /// Resolve the hint to a concrete language, using `default` for "auto"
    pub fn resolve(&self, default: Language) -> Language {
        match self {
            LanguageHint::Auto => default,
            LanguageHint::Declared(lang) => *lang,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, LanguageHint::Auto)
    }
}

impl Default for LanguageHint {
    fn default() -> Self {
        LanguageHint::Declared(Language::English)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for lang in Language::all() {
            assert_eq!(Language::from_code(lang.code()), Some(*lang));
        }
    }

    #[test]
    fn test_unsupported_code() {
        assert_eq!(Language::from_code("xx"), None);
        assert_eq!(LanguageHint::from_code("klingon"), None);
    }

    #[test]
    fn test_hint_parsing() {
        assert_eq!(LanguageHint::from_code("auto"), Some(LanguageHint::Auto));
        assert_eq!(LanguageHint::from_code(" AUTO "), Some(LanguageHint::Auto));
        assert_eq!(
            LanguageHint::from_code("ta"),
            Some(LanguageHint::Declared(Language::Tamil))
        );
    }

    #[test]
    fn test_hint_resolve() {
        assert_eq!(LanguageHint::Auto.resolve(Language::Hindi), Language::Hindi);
        assert_eq!(
            LanguageHint::Declared(Language::Tamil).resolve(Language::Hindi),
            Language::Tamil
        );
    }

    #[test]
    fn test_serde_codes() {
        let json = serde_json::to_string(&Language::Tamil).unwrap();
        assert_eq!(json, "\"ta\"");
        let lang: Language = serde_json::from_str("\"hi\"").unwrap();
        assert_eq!(lang, Language::Hindi);
    }
}
