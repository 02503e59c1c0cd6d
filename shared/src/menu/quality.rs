//! Back-office data quality: untranslated and untagged content
//!
//! These reports read the raw `translated_languages` markers rather than the
//! decoded entities, so they see the same malformed shapes the normalizer
//! tolerates.

use serde::{Deserialize, Serialize};

use super::allergens::infer_allergens;
use super::assembly::{MenuContext, dish_allergens};
use super::tags::RawTags;
use crate::models::{Dish, Ingredient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Dish,
    Ingredient,
    Category,
}

/// An entity's raw translation marker
#[derive(Debug, Clone)]
pub struct ContentMarker {
    pub kind: ContentKind,
    pub id: i64,
    pub name: String,
    pub marker: RawTags,
}

/// Untranslated when the marker is absent, is not a sequence, or is empty
pub fn is_untranslated(marker: &RawTags) -> bool {
    marker
        .strict_sequence()
        .is_none_or(|languages| languages.is_empty())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UntranslatedItem {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UntranslatedReport {
    pub dishes: Vec<UntranslatedItem>,
    pub ingredients: Vec<UntranslatedItem>,
    pub categories: Vec<UntranslatedItem>,
    pub total_checked: usize,
    pub total_untranslated: usize,
}

pub fn untranslated_report<I>(markers: I) -> UntranslatedReport
where
    I: IntoIterator<Item = ContentMarker>,
{
    let mut report = UntranslatedReport::default();
    for marker in markers {
        report.total_checked += 1;
        if !is_untranslated(&marker.marker) {
            continue;
        }
        report.total_untranslated += 1;
        let item = UntranslatedItem {
            id: marker.id,
            name: marker.name,
        };
        match marker.kind {
            ContentKind::Dish => report.dishes.push(item),
            ContentKind::Ingredient => report.ingredients.push(item),
            ContentKind::Category => report.categories.push(item),
        }
    }
    report
}

// ── Translation stats ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KindStats {
    pub total: usize,
    pub translated: usize,
    /// Rounded to the nearest whole percent; 0 when there is nothing
    pub percentage: u32,
}

impl KindStats {
    fn record(&mut self, translated: bool) {
        self.total += 1;
        if translated {
            self.translated += 1;
        }
        self.percentage = if self.total == 0 {
            0
        } else {
            ((self.translated as f64 / self.total as f64) * 100.0).round() as u32
        };
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TranslationStats {
    pub dishes: KindStats,
    pub ingredients: KindStats,
    pub categories: KindStats,
    pub supported_languages: usize,
    pub allergen_translations: usize,
}

pub fn translation_stats<'a, I>(
    markers: I,
    supported_languages: usize,
    allergen_translations: usize,
) -> TranslationStats
where
    I: IntoIterator<Item = &'a ContentMarker>,
{
    let mut stats = TranslationStats {
        supported_languages,
        allergen_translations,
        ..Default::default()
    };
    for marker in markers {
        let translated = !is_untranslated(&marker.marker);
        match marker.kind {
            ContentKind::Dish => stats.dishes.record(translated),
            ContentKind::Ingredient => stats.ingredients.record(translated),
            ContentKind::Category => stats.categories.record(translated),
        }
    }
    stats
}

// ── Untagged content ────────────────────────────────────────────────

/// A dish with no declared allergen tags
#[derive(Debug, Clone, Serialize)]
pub struct UntaggedDish {
    pub id: i64,
    pub name: String,
    /// Union of linked ingredient and component tags
    pub derived_allergen_tags: Vec<String>,
    /// Keyword inference on the dish name
    pub suggested_allergen_tags: Vec<String>,
}

/// An ingredient with no allergen tags whose name suggests some
#[derive(Debug, Clone, Serialize)]
pub struct UntaggedIngredient {
    pub id: i64,
    pub name: String,
    pub suggested_allergen_tags: Vec<String>,
}

pub fn untagged_dishes(dishes: &[Dish], ctx: &MenuContext<'_>) -> Vec<UntaggedDish> {
    dishes
        .iter()
        .filter(|dish| dish.restaurant_id == ctx.restaurant_id && dish.allergen_tags.is_empty())
        .map(|dish| UntaggedDish {
            id: dish.id,
            name: dish.name.clone(),
            derived_allergen_tags: dish_allergens(dish, ctx).derived,
            suggested_allergen_tags: infer_allergens(&dish.name),
        })
        .collect()
}

pub fn untagged_ingredients(
    ingredients: &[Ingredient],
    restaurant_id: i64,
) -> Vec<UntaggedIngredient> {
    ingredients
        .iter()
        .filter(|i| i.restaurant_id == restaurant_id && i.allergen_tags.is_empty())
        .filter_map(|i| {
            let suggested = infer_allergens(&i.name);
            (!suggested.is_empty()).then(|| UntaggedIngredient {
                id: i.id,
                name: i.name.clone(),
                suggested_allergen_tags: suggested,
            })
        })
        .collect()
}

/// Combined back-office report
#[derive(Debug, Clone, Serialize)]
pub struct QualityReport {
    pub untranslated: UntranslatedReport,
    pub untagged_dishes: Vec<UntaggedDish>,
    pub untagged_ingredients: Vec<UntaggedIngredient>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn marker(kind: ContentKind, id: i64, raw: RawTags) -> ContentMarker {
        ContentMarker {
            kind,
            id,
            name: format!("item {id}"),
            marker: raw,
        }
    }

    #[test]
    fn untranslated_classification() {
        assert!(is_untranslated(&RawTags::Missing));
        assert!(is_untranslated(&RawTags::Text(String::new())));
        assert!(is_untranslated(&RawTags::Text("[]".into())));
        assert!(is_untranslated(&RawTags::Text("not json".into())));
        assert!(is_untranslated(&RawTags::Text("{\"sv\":true}".into())));
        assert!(is_untranslated(&RawTags::from_value(json!("sv"))));
        assert!(!is_untranslated(&RawTags::Text(r#"["sv"]"#.into())));
        assert!(!is_untranslated(&RawTags::Text(r#""[\"sv\",\"de\"]""#.into())));
        assert!(!is_untranslated(&RawTags::from_value(json!(["fi"]))));
    }

    #[test]
    fn report_groups_by_kind() {
        let report = untranslated_report(vec![
            marker(ContentKind::Dish, 1, RawTags::Missing),
            marker(ContentKind::Dish, 2, RawTags::Text(r#"["sv"]"#.into())),
            marker(ContentKind::Ingredient, 3, RawTags::Text("oops".into())),
            marker(ContentKind::Category, 4, RawTags::Text("[]".into())),
        ]);
        assert_eq!(report.total_checked, 4);
        assert_eq!(report.total_untranslated, 3);
        assert_eq!(report.dishes.len(), 1);
        assert_eq!(report.dishes[0].id, 1);
        assert_eq!(report.ingredients[0].id, 3);
        assert_eq!(report.categories[0].id, 4);
    }

    #[test]
    fn stats_round_percentages() {
        let markers = vec![
            marker(ContentKind::Dish, 1, RawTags::Text(r#"["sv"]"#.into())),
            marker(ContentKind::Dish, 2, RawTags::Missing),
            marker(ContentKind::Dish, 3, RawTags::Missing),
            marker(ContentKind::Ingredient, 4, RawTags::Text(r#"["sv"]"#.into())),
        ];
        let stats = translation_stats(&markers, 3, 6);
        assert_eq!(stats.dishes.total, 3);
        assert_eq!(stats.dishes.translated, 1);
        assert_eq!(stats.dishes.percentage, 33);
        assert_eq!(stats.ingredients.percentage, 100);
        assert_eq!(stats.categories, KindStats::default());
        assert_eq!(stats.supported_languages, 3);
    }

    #[test]
    fn untagged_ingredients_need_a_suggestion() {
        let base = Ingredient {
            id: 1,
            restaurant_id: 7,
            name: "Butter".into(),
            description: None,
            category_id: None,
            parent_id: None,
            allergen_tags: vec![],
            translations: Default::default(),
            translated_languages: vec![],
            created_at: 0,
            updated_at: 0,
        };
        let tomato = Ingredient {
            id: 2,
            name: "Tomato".into(),
            ..base.clone()
        };
        let tagged = Ingredient {
            id: 3,
            allergen_tags: vec!["dairy".into()],
            ..base.clone()
        };
        let list = untagged_ingredients(&[base, tomato, tagged], 7);
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].suggested_allergen_tags, vec!["dairy"]);
    }
}
