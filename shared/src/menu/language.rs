//! Supported languages and per-restaurant language settings

use crate::error::{AppError, ErrorCode};
use serde::{Deserialize, Serialize};

/// Language used when a restaurant has not configured one
pub const DEFAULT_LANGUAGE: &str = "en";

/// A language the menu can be translated into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub native_name: &'static str,
}

const fn language(
    code: &'static str,
    name: &'static str,
    native_name: &'static str,
) -> LanguageInfo {
    LanguageInfo {
        code,
        name,
        native_name,
    }
}

pub static SUPPORTED_LANGUAGES: &[LanguageInfo] = &[
    language("en", "English", "English"),
    language("sv", "Swedish", "Svenska"),
    language("no", "Norwegian", "Norsk"),
    language("da", "Danish", "Dansk"),
    language("de", "German", "Deutsch"),
    language("fr", "French", "Français"),
    language("es", "Spanish", "Español"),
    language("it", "Italian", "Italiano"),
    language("zh", "Chinese (Simplified)", "简体中文"),
    language("zh-tw", "Chinese (Traditional)", "繁體中文"),
    language("ja", "Japanese", "日本語"),
    language("ko", "Korean", "한국어"),
    language("ar", "Arabic", "العربية"),
    language("hi", "Hindi", "हिन्दी"),
    language("pt", "Portuguese", "Português"),
    language("ru", "Russian", "Русский"),
    language("pl", "Polish", "Polski"),
    language("nl", "Dutch", "Nederlands"),
    language("fi", "Finnish", "Suomi"),
    language("tr", "Turkish", "Türkçe"),
];

/// Lower-case and trim a language code
pub fn normalize_language(code: &str) -> String {
    code.trim().to_lowercase()
}

pub fn language_info(code: &str) -> Option<&'static LanguageInfo> {
    let code = normalize_language(code);
    SUPPORTED_LANGUAGES.iter().find(|info| info.code == code)
}

pub fn is_supported_language(code: &str) -> bool {
    language_info(code).is_some()
}

/// A restaurant's language configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageSettings {
    pub default_language: String,
    pub supported_languages: Vec<String>,
}

impl Default for LanguageSettings {
    fn default() -> Self {
        Self {
            default_language: DEFAULT_LANGUAGE.to_string(),
            supported_languages: vec![DEFAULT_LANGUAGE.to_string()],
        }
    }
}

impl LanguageSettings {
    /// Normalize codes and check the settings can be stored.
    ///
    /// Every code must be known, the list must be non-empty without
    /// duplicates, and the default must be one of the supported languages.
    pub fn validated(self) -> Result<Self, AppError> {
        let default_language = normalize_language(&self.default_language);
        let mut supported_languages = Vec::with_capacity(self.supported_languages.len());

        if self.supported_languages.is_empty() {
            return Err(AppError::validation(
                "At least one supported language is required",
            ));
        }

        for code in &self.supported_languages {
            let code = normalize_language(code);
            if !is_supported_language(&code) {
                return Err(AppError::new(ErrorCode::LanguageNotSupported)
                    .with_detail("language", code));
            }
            if supported_languages.contains(&code) {
                return Err(AppError::validation(format!("Duplicate language: {code}")));
            }
            supported_languages.push(code);
        }

        if !supported_languages.contains(&default_language) {
            return Err(AppError::new(ErrorCode::DefaultLanguageNotSupported)
                .with_detail("default_language", default_language));
        }

        Ok(Self {
            default_language,
            supported_languages,
        })
    }

    /// The language to render: the requested one when this restaurant
    /// supports it, otherwise the default
    pub fn pick(&self, requested: Option<&str>) -> String {
        requested
            .map(normalize_language)
            .filter(|code| self.supported_languages.contains(code))
            .unwrap_or_else(|| self.default_language.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(default: &str, supported: &[&str]) -> LanguageSettings {
        LanguageSettings {
            default_language: default.to_string(),
            supported_languages: supported.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn known_codes() {
        assert!(is_supported_language("sv"));
        assert!(is_supported_language(" ZH-TW "));
        assert!(!is_supported_language("xx"));
        assert_eq!(language_info("fi").map(|i| i.native_name), Some("Suomi"));
    }

    #[test]
    fn validated_normalizes_codes() {
        let s = settings("SV", &["en", " Sv "]).validated().unwrap();
        assert_eq!(s.default_language, "sv");
        assert_eq!(s.supported_languages, vec!["en", "sv"]);
    }

    #[test]
    fn default_must_be_supported() {
        let err = settings("de", &["en", "sv"]).validated().unwrap_err();
        assert_eq!(err.code, ErrorCode::DefaultLanguageNotSupported);
    }

    #[test]
    fn unknown_and_duplicate_codes_are_rejected() {
        let err = settings("en", &["en", "xx"]).validated().unwrap_err();
        assert_eq!(err.code, ErrorCode::LanguageNotSupported);

        let err = settings("en", &["en", "EN"]).validated().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = settings("en", &[]).validated().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn pick_falls_back_to_default() {
        let s = settings("sv", &["sv", "en"]);
        assert_eq!(s.pick(Some("en")), "en");
        assert_eq!(s.pick(Some("EN")), "en");
        assert_eq!(s.pick(Some("de")), "sv");
        assert_eq!(s.pick(None), "sv");
    }
}
