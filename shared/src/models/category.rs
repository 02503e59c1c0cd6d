//! Category Model

use serde::{Deserialize, Serialize};

use crate::menu::translation::{TranslatedField, Translatable, Translations};

/// Category entity, groups ingredients and dishes
#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub display_order: i32,
    pub translations: Translations,
    pub translated_languages: Vec<String>,
}

impl Translatable for Category {
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

/// Create category payload
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
    #[serde(default)]
    pub translations: Translations,
}

/// Update category payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub display_order: Option<i32>,
    pub translations: Option<Translations>,
}
