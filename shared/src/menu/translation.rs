//! Multilingual content and the translation fallback chain
//!
//! Translations are stored per entity as a JSON object keyed by language
//! code. [`Translations::parse`] is the fallible decoder used for request
//! bodies; [`Translations::from_stored`] is the lenient one used when reading
//! rows, which treats anything unreadable as "no translations".
//!
//! Lookup order for every field is: requested language, fallback language,
//! then the entity's own base text. The first non-empty value wins.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::error::{AppError, ErrorCode};

/// Translatable text fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TranslatedField {
    Name,
    Description,
    ModificationNote,
}

/// One language's entry in a translations blob
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        alias = "modificationNote",
        skip_serializing_if = "Option::is_none"
    )]
    pub modification_note: Option<String>,
}

impl LocalizedText {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Read an entry, ignoring fields that are not strings
    fn from_object(map: &Map<String, Value>) -> Self {
        let text = |keys: &[&str]| {
            keys.iter()
                .find_map(|key| map.get(*key).and_then(Value::as_str))
                .map(str::to_string)
        };
        Self {
            name: text(&["name"]),
            description: text(&["description"]),
            modification_note: text(&["modification_note", "modificationNote"]),
        }
    }

    /// The non-empty value of a field
    pub fn get(&self, field: TranslatedField) -> Option<&str> {
        let value = match field {
            TranslatedField::Name => self.name.as_deref(),
            TranslatedField::Description => self.description.as_deref(),
            TranslatedField::ModificationNote => self.modification_note.as_deref(),
        };
        value.filter(|text| !text.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.get(TranslatedField::Name).is_none()
            && self.get(TranslatedField::Description).is_none()
            && self.get(TranslatedField::ModificationNote).is_none()
    }

    /// Overwrite the fields present in `patch`
    pub fn apply(&mut self, patch: LocalizedText) {
        if patch.name.is_some() {
            self.name = patch.name;
        }
        if patch.description.is_some() {
            self.description = patch.description;
        }
        if patch.modification_note.is_some() {
            self.modification_note = patch.modification_note;
        }
    }
}

#[derive(Debug, Error)]
pub enum TranslationError {
    #[error("translations are not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("translations must be an object keyed by language code")]
    NotAnObject,
    #[error("translation for '{0}' must be an object")]
    InvalidEntry(String),
}

impl From<TranslationError> for AppError {
    fn from(e: TranslationError) -> Self {
        let language = match &e {
            TranslationError::InvalidEntry(language) => Some(language.clone()),
            _ => None,
        };
        let err = AppError::with_message(ErrorCode::InvalidTranslations, e.to_string());
        match language {
            Some(language) => err.with_detail("language", language),
            None => err,
        }
    }
}

/// Language code → localized text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Translations(BTreeMap<String, LocalizedText>);

impl Translations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strict decode of a JSON object (or a string holding one).
    ///
    /// Used for request bodies; every entry must itself be an object.
    pub fn from_value(value: Value) -> Result<Self, TranslationError> {
        match value {
            Value::Null => Ok(Self::new()),
            Value::String(text) if text.trim().is_empty() => Ok(Self::new()),
            Value::String(text) => Self::parse(&text),
            Value::Object(map) => {
                let mut entries = BTreeMap::new();
                for (language, entry) in map {
                    let Value::Object(fields) = entry else {
                        return Err(TranslationError::InvalidEntry(language));
                    };
                    entries.insert(
                        language.trim().to_lowercase(),
                        LocalizedText::from_object(&fields),
                    );
                }
                Ok(Self(entries))
            }
            _ => Err(TranslationError::NotAnObject),
        }
    }

    /// Fallible parse of a stored or submitted JSON string
    pub fn parse(raw: &str) -> Result<Self, TranslationError> {
        match serde_json::from_str::<Value>(raw)? {
            value @ Value::Object(_) => Self::from_value(value),
            _ => Err(TranslationError::NotAnObject),
        }
    }

    /// Lenient decode of a TEXT column. Never fails: missing or unreadable
    /// payloads become empty, and entries that are not objects are skipped.
    pub fn from_stored(raw: Option<&str>) -> Self {
        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            return Self::new();
        };
        let value = match serde_json::from_str::<Value>(raw.trim()) {
            Ok(Value::String(inner)) => serde_json::from_str::<Value>(&inner),
            other => other,
        };
        let map = match value {
            Ok(Value::Object(map)) => map,
            Ok(_) => {
                tracing::debug!("Stored translations are not an object, ignoring");
                return Self::new();
            }
            Err(e) => {
                tracing::debug!(error = %e, "Unreadable stored translations, ignoring");
                return Self::new();
            }
        };

        let mut entries = BTreeMap::new();
        for (language, entry) in &map {
            if let Some(fields) = entry.as_object() {
                entries.insert(
                    language.trim().to_lowercase(),
                    LocalizedText::from_object(fields),
                );
            }
        }
        Self(entries)
    }

    pub fn get(&self, language: &str) -> Option<&LocalizedText> {
        self.0.get(language)
    }

    /// The non-empty value of `field` for `language`
    pub fn field(&self, language: &str, field: TranslatedField) -> Option<&str> {
        self.get(language).and_then(|entry| entry.get(field))
    }

    /// Merge `patch` into the entry for `language`
    pub fn merge(&mut self, language: &str, patch: LocalizedText) {
        self.0
            .entry(language.trim().to_lowercase())
            .or_default()
            .apply(patch);
    }

    /// Merge every entry of `other` into this set
    pub fn merge_all(&mut self, other: Translations) {
        for (language, patch) in other.0 {
            self.merge(&language, patch);
        }
    }

    /// Languages with at least one non-empty field
    pub fn languages(&self) -> Vec<String> {
        self.0
            .iter()
            .filter(|(_, entry)| !entry.is_empty())
            .map(|(language, _)| language.clone())
            .collect()
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.get(language).is_some_and(|entry| !entry.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(LocalizedText::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &LocalizedText)> {
        self.0.iter()
    }

    /// Canonical stored form
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl FromIterator<(String, LocalizedText)> for Translations {
    fn from_iter<I: IntoIterator<Item = (String, LocalizedText)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for Translations {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(serde::de::Error::custom)
    }
}

/// An entity with translatable base text
pub trait Translatable {
    /// The untranslated value of `field`
    fn base_text(&self, field: TranslatedField) -> Option<&str>;

    fn translations(&self) -> &Translations;
}

/// Resolve one field through the fallback chain
pub fn resolve<T: Translatable + ?Sized>(
    entity: &T,
    language: &str,
    field: TranslatedField,
    fallback: &str,
) -> String {
    let translations = entity.translations();
    translations
        .field(language, field)
        .or_else(|| translations.field(fallback, field))
        .or_else(|| entity.base_text(field))
        .unwrap_or_default()
        .to_string()
}

/// Name, description and modification note resolved for one language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResolvedText {
    pub name: String,
    pub description: String,
    pub modification_note: String,
}

/// Resolve all text fields at once; both language entries are looked up
/// once and shared by the three fields
pub fn resolve_all<T: Translatable + ?Sized>(
    entity: &T,
    language: &str,
    fallback: &str,
) -> ResolvedText {
    let translations = entity.translations();
    let exact = translations.get(language);
    let fallback = translations.get(fallback);

    let pick = |field: TranslatedField| -> String {
        exact
            .and_then(|entry| entry.get(field))
            .or_else(|| fallback.and_then(|entry| entry.get(field)))
            .or_else(|| entity.base_text(field))
            .unwrap_or_default()
            .to_string()
    };

    ResolvedText {
        name: pick(TranslatedField::Name),
        description: pick(TranslatedField::Description),
        modification_note: pick(TranslatedField::ModificationNote),
    }
}

/// Display name for an allergen key, falling back to the capitalized key
pub fn allergen_display_name(
    key: &str,
    translations: &Translations,
    language: &str,
    fallback: &str,
) -> String {
    translations
        .field(language, TranslatedField::Name)
        .or_else(|| translations.field(fallback, TranslatedField::Name))
        .map(str::to_string)
        .unwrap_or_else(|| capitalize(key))
}

fn capitalize(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        name: String,
        description: Option<String>,
        translations: Translations,
    }

    impl Translatable for Item {
        fn base_text(&self, field: TranslatedField) -> Option<&str> {
            match field {
                TranslatedField::Name => Some(&self.name),
                TranslatedField::Description => self.description.as_deref(),
                TranslatedField::ModificationNote => None,
            }
        }

        fn translations(&self) -> &Translations {
            &self.translations
        }
    }

    fn item(raw: Option<&str>) -> Item {
        Item {
            name: "Mozzarella".to_string(),
            description: None,
            translations: Translations::from_stored(raw),
        }
    }

    #[test]
    fn fallback_chain() {
        let entity = item(Some(r#"{"sv":{"name":"X"}}"#));
        assert_eq!(resolve(&entity, "sv", TranslatedField::Name, "en"), "X");
        assert_eq!(resolve(&entity, "de", TranslatedField::Name, "sv"), "X");
        assert_eq!(
            resolve(&entity, "de", TranslatedField::Name, "en"),
            "Mozzarella"
        );
    }

    #[test]
    fn description_defaults_to_empty() {
        let entity = item(None);
        assert_eq!(resolve(&entity, "sv", TranslatedField::Description, "en"), "");
    }

    #[test]
    fn empty_values_fall_through() {
        let entity = item(Some(r#"{"sv":{"name":"  "},"de":{"name":"Mozzarella-Käse"}}"#));
        assert_eq!(
            resolve(&entity, "sv", TranslatedField::Name, "de"),
            "Mozzarella-Käse"
        );
    }

    #[test]
    fn unreadable_stored_payload_behaves_as_absent() {
        for raw in ["{not json", "[1,2]", "\"sv\"", "", "null"] {
            let entity = item(Some(raw));
            assert!(entity.translations.is_empty(), "raw {raw}");
            assert_eq!(
                resolve(&entity, "sv", TranslatedField::Name, "en"),
                "Mozzarella"
            );
        }
    }

    #[test]
    fn stored_payload_skips_bad_entries() {
        let t = Translations::from_stored(Some(
            r#"{"sv":{"name":"Ost","description":5},"de":"oops"}"#,
        ));
        assert_eq!(t.field("sv", TranslatedField::Name), Some("Ost"));
        assert_eq!(t.field("sv", TranslatedField::Description), None);
        assert!(t.get("de").is_none());
    }

    #[test]
    fn stored_payload_keys_are_lower_cased() {
        let t = Translations::from_stored(Some(r#"{"SV":{"name":"Ost"}," De ":{"name":"Käse"}}"#));
        assert_eq!(t.field("sv", TranslatedField::Name), Some("Ost"));
        assert_eq!(t.field("de", TranslatedField::Name), Some("Käse"));
        assert_eq!(t.languages(), vec!["de", "sv"]);
    }

    #[test]
    fn stored_payload_wrapped_in_a_string_is_unwrapped() {
        let inner = r#"{"sv":{"name":"Ost"}}"#;
        let wrapped = serde_json::to_string(inner).unwrap();
        let t = Translations::from_stored(Some(&wrapped));
        assert_eq!(t.field("sv", TranslatedField::Name), Some("Ost"));
        assert_eq!(t, Translations::from_stored(Some(inner)));
    }

    #[test]
    fn resolve_all_uses_one_chain_per_field() {
        let entity = Item {
            name: "Pizza".into(),
            description: Some("Base".into()),
            translations: Translations::from_stored(Some(
                r#"{
                    "sv": {"name": "Pizza SV"},
                    "en": {"description": "Cheesy", "modificationNote": "No cheese on request"}
                }"#,
            )),
        };
        let text = resolve_all(&entity, "sv", "en");
        assert_eq!(text.name, "Pizza SV");
        assert_eq!(text.description, "Cheesy");
        assert_eq!(text.modification_note, "No cheese on request");
    }

    #[test]
    fn strict_parse_rejects_bad_shapes() {
        assert!(matches!(
            Translations::parse("{oops"),
            Err(TranslationError::Malformed(_))
        ));
        assert!(matches!(
            Translations::parse("[]"),
            Err(TranslationError::NotAnObject)
        ));
        assert!(matches!(
            Translations::parse(r#"{"sv":"Ost"}"#),
            Err(TranslationError::InvalidEntry(lang)) if lang == "sv"
        ));
        let t = Translations::parse(r#"{"SV":{"name":"Ost"}}"#).unwrap();
        assert_eq!(t.languages(), vec!["sv"]);
    }

    #[test]
    fn decode_errors_map_to_invalid_translations() {
        let err: AppError = Translations::parse(r#"{"sv":"Ost"}"#).unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InvalidTranslations);
        assert_eq!(err.details.unwrap().get("language").unwrap(), "sv");

        let err: AppError = Translations::parse("[]").unwrap_err().into();
        assert_eq!(err.code, ErrorCode::InvalidTranslations);
        assert!(err.details.is_none());
    }

    #[test]
    fn deserializes_object_or_string() {
        let a: Translations = serde_json::from_str(r#"{"de":{"name":"Käse"}}"#).unwrap();
        let b: Translations = serde_json::from_str(r#""{\"de\":{\"name\":\"Käse\"}}""#).unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<Translations>("42").is_err());
    }

    #[test]
    fn merge_patches_one_language() {
        let mut t = Translations::parse(r#"{"sv":{"name":"Ost","description":"Gul"}}"#).unwrap();
        t.merge(
            "sv",
            LocalizedText {
                description: Some("Vit".into()),
                ..Default::default()
            },
        );
        t.merge("fi", LocalizedText::named("Juusto"));
        assert_eq!(t.field("sv", TranslatedField::Name), Some("Ost"));
        assert_eq!(t.field("sv", TranslatedField::Description), Some("Vit"));
        assert_eq!(t.languages(), vec!["fi", "sv"]);
        assert_eq!(
            t.to_json(),
            r#"{"fi":{"name":"Juusto"},"sv":{"name":"Ost","description":"Vit"}}"#
        );
    }

    #[test]
    fn allergen_names_fall_back_to_capitalized_key() {
        let t = Translations::parse(r#"{"sv":{"name":"Mjölk"}}"#).unwrap();
        assert_eq!(allergen_display_name("dairy", &t, "sv", "en"), "Mjölk");
        assert_eq!(allergen_display_name("dairy", &t, "de", "sv"), "Mjölk");
        assert_eq!(allergen_display_name("dairy", &t, "de", "en"), "Dairy");
        assert_eq!(allergen_display_name("", &t, "de", "en"), "");
    }
}
