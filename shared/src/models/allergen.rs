//! Allergen Translation Model (global, not tenant scoped)

use serde::Serialize;
use std::collections::BTreeMap;

use crate::menu::translation::{
    TranslatedField, Translatable, Translations, allergen_display_name,
};

/// Localized names for one allergen key
#[derive(Debug, Clone, Serialize)]
pub struct AllergenTranslation {
    pub allergen_key: String,
    pub translations: Translations,
}

impl AllergenTranslation {
    pub fn display_name(&self, language: &str, fallback: &str) -> String {
        allergen_display_name(&self.allergen_key, &self.translations, language, fallback)
    }
}

impl Translatable for AllergenTranslation {
    fn base_text(&self, field: TranslatedField) -> Option<&str> {
        match field {
            TranslatedField::Name => Some(&self.allergen_key),
            TranslatedField::Description | TranslatedField::ModificationNote => None,
        }
    }

    fn translations(&self) -> &Translations {
        &self.translations
    }
}

/// Allergen key → translations, as served to the frontend
pub type AllergenTranslationMap = BTreeMap<String, Translations>;

/// Allergen key → display name in one language
#[derive(Debug, Clone, Serialize)]
pub struct AllergenLabel {
    pub key: String,
    pub name: String,
}
