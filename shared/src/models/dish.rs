//! Dish Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::menu::tags::{RawTags, tag_list};
use crate::menu::translation::{TranslatedField, Translatable, Translations};

/// A component group of a dish (e.g. "Sauce", "Side")
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DishComponent {
    pub name: String,
    #[serde(rename = "type", alias = "kind", default)]
    pub kind: String,
    #[serde(default, alias = "isRequired", alias = "is_required")]
    pub required: bool,
    /// Constituent ingredient names
    #[serde(default, deserialize_with = "tag_list::deserialize")]
    pub ingredients: Vec<String>,
    #[serde(
        default,
        alias = "allergenTags",
        deserialize_with = "tag_list::deserialize"
    )]
    pub allergen_tags: Vec<String>,
}

impl DishComponent {
    /// Read a stored component list. Elements that are not component
    /// objects are dropped; a malformed blob reads as no components.
    pub fn decode_list(raw: Option<&str>) -> Vec<Self> {
        let items = match RawTags::from_column(raw) {
            RawTags::Text(text) => match serde_json::from_str::<Value>(text.trim()) {
                Ok(Value::Array(items)) => items,
                Ok(Value::String(inner)) => match serde_json::from_str::<Value>(&inner) {
                    Ok(Value::Array(items)) => items,
                    _ => Vec::new(),
                },
                _ => Vec::new(),
            },
            _ => Vec::new(),
        };

        items
            .into_iter()
            .filter_map(|item| serde_json::from_value::<DishComponent>(item).ok())
            .filter(|component| !component.name.trim().is_empty())
            .collect()
    }

    pub fn encode_list(components: &[Self]) -> String {
        serde_json::to_string(components).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Link from a dish to one of its ingredients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishIngredientLink {
    pub ingredient_id: i64,
    #[serde(default)]
    pub is_core: bool,
    #[serde(default)]
    pub is_optional: bool,
}

/// Dish entity
#[derive(Debug, Clone, Serialize)]
pub struct Dish {
    pub id: i64,
    pub restaurant_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Option<i64>,
    /// Declared allergen tags
    pub allergen_tags: Vec<String>,
    pub is_modifiable: bool,
    pub modification_note: Option<String>,
    pub components: Vec<DishComponent>,
    pub ingredients: Vec<DishIngredientLink>,
    pub translations: Translations,
    pub translated_languages: Vec<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Translatable for Dish {
    fn base_text(&self, field: TranslatedField) -> Option<&str> {
        match field {
            TranslatedField::Name => Some(&self.name),
            TranslatedField::Description => self.description.as_deref(),
            TranslatedField::ModificationNote => self.modification_note.as_deref(),
        }
    }

    fn translations(&self) -> &Translations {
        &self.translations
    }
}

/// Create dish payload
#[derive(Debug, Clone, Deserialize)]
pub struct DishCreate {
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Option<i64>,
    #[serde(default, deserialize_with = "tag_list::deserialize")]
    pub allergen_tags: Vec<String>,
    #[serde(default)]
    pub is_modifiable: bool,
    pub modification_note: Option<String>,
    #[serde(default)]
    pub components: Vec<DishComponent>,
    #[serde(default)]
    pub ingredients: Vec<DishIngredientLink>,
    #[serde(default)]
    pub translations: Translations,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// Update dish payload
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DishUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub category_id: Option<i64>,
    #[serde(default, deserialize_with = "tag_list::optional::deserialize")]
    pub allergen_tags: Option<Vec<String>>,
    pub is_modifiable: Option<bool>,
    pub modification_note: Option<String>,
    pub components: Option<Vec<DishComponent>>,
    pub ingredients: Option<Vec<DishIngredientLink>>,
    pub translations: Option<Translations>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}
