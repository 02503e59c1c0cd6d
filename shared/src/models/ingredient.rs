//! Ingredient Model

use serde::{Deserialize, Serialize};

use crate::menu::tags::tag_list;
use crate::menu::translation::{TranslatedField, Translatable, Translations};

/// Ingredient entity
///
/// Ingredients form a hierarchy through `parent_id`; a parent cannot be
/// deleted while children reference it.
#[derive(Debug, Clone, Serialize)]
pub struct Ingredient {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub parent_id: Option<i64>,
    pub allergen_tags: Vec<String>,
    pub translations: Translations,
    pub translated_languages: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Translatable for Ingredient {
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

/// Create ingredient payload
#[derive(Debug, Clone, Deserialize)]
pub struct IngredientCreate {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub parent_id: Option<i64>,
    /// Omitted tags are inferred from the name
    #[serde(default, deserialize_with = "tag_list::optional::deserialize")]
    pub allergen_tags: Option<Vec<String>>,
    #[serde(default)]
    pub translations: Translations,
}

/// Update ingredient payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IngredientUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub parent_id: Option<i64>,
    /// Detach from the current parent
    #[serde(default)]
    pub clear_parent: bool,
    #[serde(default, deserialize_with = "tag_list::optional::deserialize")]
    pub allergen_tags: Option<Vec<String>>,
    pub translations: Option<Translations>,
}
