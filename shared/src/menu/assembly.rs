//! Guest and admin menu payloads
//!
//! Assembly joins dishes with their ingredients and categories, resolves
//! translated text and decides which allergen tags to show.
//!
//! Allergen policy: a dish's declared tags are authoritative. Tags derived
//! from linked ingredients and component groups are advisory; they are shown
//! to guests only when the dish declares nothing, and admins always see both
//! sets side by side.
//!
//! Every record whose `restaurant_id` differs from the menu's restaurant is
//! dropped here, even if a query upstream let it through.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use super::allergens::conflicting_allergens;
use super::tags::union_tags;
use super::translation::{
    ResolvedText, TranslatedField, Translations, allergen_display_name, resolve, resolve_all,
};
use crate::models::{
    AllergenLabel, AllergenTranslation, Category, Dish, DishComponent, Ingredient, Restaurant,
};

// ── Context ─────────────────────────────────────────────────────────

/// Everything assembly needs besides the dishes themselves
#[derive(Debug)]
pub struct MenuContext<'a> {
    pub restaurant_id: i64,
    /// Language actually rendered (requested if supported, else default)
    pub language: String,
    /// The restaurant's default language
    pub fallback: String,
    ingredients: HashMap<i64, &'a Ingredient>,
    ingredients_by_name: HashMap<String, &'a Ingredient>,
    categories: HashMap<i64, &'a Category>,
}

impl<'a> MenuContext<'a> {
    pub fn new(
        restaurant: &Restaurant,
        requested_language: Option<&str>,
        categories: &'a [Category],
        ingredients: &'a [Ingredient],
    ) -> Self {
        let restaurant_id = restaurant.id;
        let language = restaurant.language_settings().pick(requested_language);

        let own_ingredients: Vec<&Ingredient> = ingredients
            .iter()
            .filter(|i| i.restaurant_id == restaurant_id)
            .collect();
        let own_categories: Vec<&Category> = categories
            .iter()
            .filter(|c| c.restaurant_id == restaurant_id)
            .collect();

        let dropped = (ingredients.len() - own_ingredients.len())
            + (categories.len() - own_categories.len());
        if dropped > 0 {
            tracing::warn!(
                restaurant_id,
                dropped,
                "Dropped foreign ingredient/category rows during menu assembly"
            );
        }

        Self {
            restaurant_id,
            language,
            fallback: restaurant.default_language.clone(),
            ingredients: own_ingredients.iter().map(|i| (i.id, *i)).collect(),
            ingredients_by_name: own_ingredients
                .iter()
                .map(|i| (i.name.trim().to_lowercase(), *i))
                .collect(),
            categories: own_categories.iter().map(|c| (c.id, *c)).collect(),
        }
    }

    pub fn ingredient(&self, id: i64) -> Option<&'a Ingredient> {
        self.ingredients.get(&id).copied()
    }

    pub fn category(&self, id: i64) -> Option<&'a Category> {
        self.categories.get(&id).copied()
    }

    fn category_name(&self, id: Option<i64>) -> Option<String> {
        let category = self.category(id?)?;
        Some(resolve(
            category,
            &self.language,
            TranslatedField::Name,
            &self.fallback,
        ))
    }

    /// Translate a free-text ingredient name when it matches a known ingredient
    fn ingredient_label(&self, name: &str) -> String {
        match self.ingredients_by_name.get(&name.trim().to_lowercase()) {
            Some(ingredient) => resolve(
                *ingredient,
                &self.language,
                TranslatedField::Name,
                &self.fallback,
            ),
            None => name.to_string(),
        }
    }

    fn owns(&self, dish: &Dish) -> bool {
        if dish.restaurant_id == self.restaurant_id {
            return true;
        }
        tracing::warn!(
            restaurant_id = self.restaurant_id,
            dish_id = dish.id,
            owner = dish.restaurant_id,
            "Dropped foreign dish during menu assembly"
        );
        false
    }
}

// ── Allergen policy ─────────────────────────────────────────────────

/// Where a dish's displayed allergen tags came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllergenSource {
    Declared,
    Derived,
    None,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishAllergens {
    pub declared: Vec<String>,
    pub derived: Vec<String>,
    pub effective: Vec<String>,
    pub source: AllergenSource,
}

/// Split a dish's allergens into declared, derived and effective sets
pub fn dish_allergens(dish: &Dish, ctx: &MenuContext<'_>) -> DishAllergens {
    let declared = dish.allergen_tags.clone();

    let mut derived: BTreeSet<String> = BTreeSet::new();
    for link in &dish.ingredients {
        if let Some(ingredient) = ctx.ingredient(link.ingredient_id) {
            derived.extend(ingredient.allergen_tags.iter().cloned());
        }
    }
    for component in &dish.components {
        derived.extend(component.allergen_tags.iter().cloned());
    }
    let derived: Vec<String> = derived.into_iter().collect();

    let (effective, source) = if !declared.is_empty() {
        (declared.clone(), AllergenSource::Declared)
    } else if !derived.is_empty() {
        (derived.clone(), AllergenSource::Derived)
    } else {
        (Vec::new(), AllergenSource::None)
    };

    DishAllergens {
        declared,
        derived,
        effective,
        source,
    }
}

// ── Guest safety ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SafetyStatus {
    Safe,
    /// Conflicts, but the kitchen can adapt the dish
    Modifiable,
    Unsafe,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DishSafety {
    pub status: SafetyStatus,
    pub conflicts: Vec<String>,
}

/// Classify a dish against a guest's avoid list
pub fn assess_safety(
    tags: &[String],
    avoid: &[String],
    is_modifiable: bool,
    modification_note: Option<&str>,
) -> DishSafety {
    let conflicts = conflicting_allergens(tags, avoid);
    let has_note = modification_note.is_some_and(|note| !note.trim().is_empty());
    let status = if conflicts.is_empty() {
        SafetyStatus::Safe
    } else if is_modifiable && has_note {
        SafetyStatus::Modifiable
    } else {
        SafetyStatus::Unsafe
    };
    DishSafety { status, conflicts }
}

/// Guest-side filtering options
#[derive(Debug, Clone, Default)]
pub struct GuestFilter {
    /// Allergen keys the guest avoids
    pub avoid: Vec<String>,
    /// Drop unsafe dishes instead of flagging them
    pub hide_unsafe: bool,
}

// ── Guest payload ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct GuestComponent {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub required: bool,
    pub ingredients: Vec<String>,
    pub allergen_tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuestDish {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category_id: Option<i64>,
    pub category: Option<String>,
    pub allergen_tags: Vec<String>,
    pub modification_note: Option<String>,
    pub is_modifiable: bool,
    pub components: Vec<GuestComponent>,
    pub ingredients: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub safety: Option<DishSafety>,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuestCategory {
    pub id: i64,
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub display_order: i32,
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}

fn guest_components(components: &[DishComponent], ctx: &MenuContext<'_>) -> Vec<GuestComponent> {
    components
        .iter()
        .map(|component| GuestComponent {
            name: component.name.clone(),
            kind: component.kind.clone(),
            required: component.required,
            ingredients: component
                .ingredients
                .iter()
                .map(|name| ctx.ingredient_label(name))
                .collect(),
            allergen_tags: component.allergen_tags.clone(),
        })
        .collect()
}

/// Flattened, translated ingredient names of a dish
fn ingredient_names(dish: &Dish, ctx: &MenuContext<'_>) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for link in &dish.ingredients {
        if let Some(ingredient) = ctx.ingredient(link.ingredient_id) {
            let name = resolve(ingredient, &ctx.language, TranslatedField::Name, &ctx.fallback);
            union_tags(&mut names, std::slice::from_ref(&name));
        }
    }
    names
}

/// Build one guest entry; `None` when the dish is foreign or inactive
pub fn guest_dish(dish: &Dish, ctx: &MenuContext<'_>, filter: &GuestFilter) -> Option<GuestDish> {
    if !dish.is_active || !ctx.owns(dish) {
        return None;
    }

    let text = resolve_all(dish, &ctx.language, &ctx.fallback);
    let allergens = dish_allergens(dish, ctx);
    let modification_note = non_empty(text.modification_note);

    let safety = (!filter.avoid.is_empty()).then(|| {
        assess_safety(
            &allergens.effective,
            &filter.avoid,
            dish.is_modifiable,
            modification_note.as_deref(),
        )
    });
    if filter.hide_unsafe
        && safety
            .as_ref()
            .is_some_and(|s| s.status == SafetyStatus::Unsafe)
    {
        return None;
    }

    Some(GuestDish {
        id: dish.id,
        name: text.name,
        description: text.description,
        price: dish.price,
        category_id: dish.category_id,
        category: ctx.category_name(dish.category_id),
        allergen_tags: allergens.effective,
        modification_note,
        is_modifiable: dish.is_modifiable,
        components: guest_components(&dish.components, ctx),
        ingredients: ingredient_names(dish, ctx),
        safety,
    })
}

/// The guest menu entries, in input order
pub fn assemble_guest_menu(
    dishes: &[Dish],
    ctx: &MenuContext<'_>,
    filter: &GuestFilter,
) -> Vec<GuestDish> {
    dishes
        .iter()
        .filter_map(|dish| guest_dish(dish, ctx, filter))
        .collect()
}

/// Categories that contain at least one of `dishes`, ordered for display
pub fn guest_categories(dishes: &[GuestDish], ctx: &MenuContext<'_>) -> Vec<GuestCategory> {
    let used: BTreeSet<i64> = dishes.iter().filter_map(|d| d.category_id).collect();
    let mut categories: Vec<GuestCategory> = used
        .into_iter()
        .filter_map(|id| ctx.category(id))
        .map(|category| GuestCategory {
            id: category.id,
            name: resolve(category, &ctx.language, TranslatedField::Name, &ctx.fallback),
            color: category.color.clone(),
            icon: category.icon.clone(),
            display_order: category.display_order,
        })
        .collect();
    categories.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.name.cmp(&b.name))
    });
    categories
}

/// Display names for every allergen tag appearing on `dishes`
pub fn allergen_labels(
    dishes: &[GuestDish],
    translations: &[AllergenTranslation],
    ctx: &MenuContext<'_>,
) -> Vec<AllergenLabel> {
    let by_key: HashMap<&str, &AllergenTranslation> = translations
        .iter()
        .map(|t| (t.allergen_key.as_str(), t))
        .collect();
    let keys: BTreeSet<&str> = dishes
        .iter()
        .flat_map(|d| d.allergen_tags.iter().map(String::as_str))
        .collect();

    keys.into_iter()
        .map(|key| {
            let name = match by_key.get(key) {
                Some(t) => t.display_name(&ctx.language, &ctx.fallback),
                None => {
                    allergen_display_name(key, &Translations::new(), &ctx.language, &ctx.fallback)
                }
            };
            AllergenLabel {
                key: key.to_string(),
                name,
            }
        })
        .collect()
}

// ── Admin payload ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct AdminDishIngredient {
    pub id: i64,
    pub name: String,
    pub is_core: bool,
    pub is_optional: bool,
    pub allergen_tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminDish {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Text as a guest would see it in the requested language
    pub localized: ResolvedText,
    pub price: f64,
    pub category_id: Option<i64>,
    pub category: Option<String>,
    pub allergen_tags: Vec<String>,
    pub declared_allergen_tags: Vec<String>,
    pub derived_allergen_tags: Vec<String>,
    pub allergen_source: AllergenSource,
    pub is_modifiable: bool,
    pub modification_note: Option<String>,
    pub components: Vec<DishComponent>,
    pub ingredients: Vec<AdminDishIngredient>,
    pub translations: Translations,
    pub translated_languages: Vec<String>,
    pub display_order: i32,
    pub is_active: bool,
}

pub fn admin_dish(dish: &Dish, ctx: &MenuContext<'_>) -> Option<AdminDish> {
    if !ctx.owns(dish) {
        return None;
    }
    let allergens = dish_allergens(dish, ctx);

    let ingredients = dish
        .ingredients
        .iter()
        .filter_map(|link| {
            let ingredient = ctx.ingredient(link.ingredient_id)?;
            Some(AdminDishIngredient {
                id: ingredient.id,
                name: ingredient.name.clone(),
                is_core: link.is_core,
                is_optional: link.is_optional,
                allergen_tags: ingredient.allergen_tags.clone(),
            })
        })
        .collect();

    Some(AdminDish {
        id: dish.id,
        name: dish.name.clone(),
        description: dish.description.clone(),
        localized: resolve_all(dish, &ctx.language, &ctx.fallback),
        price: dish.price,
        category_id: dish.category_id,
        category: ctx.category_name(dish.category_id),
        allergen_tags: allergens.effective,
        declared_allergen_tags: allergens.declared,
        derived_allergen_tags: allergens.derived,
        allergen_source: allergens.source,
        is_modifiable: dish.is_modifiable,
        modification_note: dish.modification_note.clone(),
        components: dish.components.clone(),
        ingredients,
        translations: dish.translations.clone(),
        translated_languages: dish.translated_languages.clone(),
        display_order: dish.display_order,
        is_active: dish.is_active,
    })
}

pub fn assemble_admin_menu(dishes: &[Dish], ctx: &MenuContext<'_>) -> Vec<AdminDish> {
    dishes.iter().filter_map(|dish| admin_dish(dish, ctx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DishIngredientLink, SubscriptionTier};

    const OWN: i64 = 1;
    const OTHER: i64 = 2;

    fn restaurant() -> Restaurant {
        Restaurant {
            id: OWN,
            slug: "bistro".into(),
            name: "Bistro".into(),
            description: None,
            default_language: "en".into(),
            supported_languages: vec!["en".into(), "sv".into()],
            is_active: true,
            subscription_tier: SubscriptionTier::Free,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn ingredient(
        id: i64,
        restaurant_id: i64,
        name: &str,
        tags: &[&str],
        sv: Option<&str>,
    ) -> Ingredient {
        let mut translations = Translations::new();
        if let Some(sv) = sv {
            translations.merge("sv", crate::menu::translation::LocalizedText::named(sv));
        }
        Ingredient {
            id,
            restaurant_id,
            name: name.into(),
            description: None,
            category_id: None,
            parent_id: None,
            allergen_tags: tags.iter().map(|t| t.to_string()).collect(),
            translated_languages: translations.languages(),
            translations,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn category(id: i64, restaurant_id: i64, name: &str, order: i32) -> Category {
        Category {
            id,
            restaurant_id,
            name: name.into(),
            description: None,
            color: None,
            icon: None,
            display_order: order,
            translations: Translations::parse(r#"{"sv":{"name":"Huvudrätter"}}"#).unwrap(),
            translated_languages: vec!["sv".into()],
        }
    }

    fn dish(id: i64, restaurant_id: i64, tags: &[&str], links: &[i64]) -> Dish {
        Dish {
            id,
            restaurant_id,
            name: format!("Dish {id}"),
            description: Some("Base description".into()),
            price: 12.5,
            category_id: Some(10),
            allergen_tags: tags.iter().map(|t| t.to_string()).collect(),
            is_modifiable: false,
            modification_note: None,
            components: Vec::new(),
            ingredients: links
                .iter()
                .map(|&ingredient_id| DishIngredientLink {
                    ingredient_id,
                    is_core: true,
                    is_optional: false,
                })
                .collect(),
            translations: Translations::parse(r#"{"sv":{"name":"Rätt"}}"#).unwrap(),
            translated_languages: vec!["sv".into()],
            display_order: 0,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    struct Fixture {
        restaurant: Restaurant,
        categories: Vec<Category>,
        ingredients: Vec<Ingredient>,
    }

    fn fixture() -> Fixture {
        Fixture {
            restaurant: restaurant(),
            categories: vec![category(10, OWN, "Mains", 1), category(11, OTHER, "Foreign", 0)],
            ingredients: vec![
                ingredient(100, OWN, "Mozzarella", &["dairy"], Some("Mozzarellaost")),
                ingredient(101, OWN, "Pasta", &["gluten", "wheat"], None),
                ingredient(200, OTHER, "Secret sauce", &["soy"], None),
            ],
        }
    }

    #[test]
    fn declared_tags_win_over_derived() {
        let f = fixture();
        let ctx = MenuContext::new(&f.restaurant, None, &f.categories, &f.ingredients);
        let a = dish_allergens(&dish(1, OWN, &["fish"], &[100]), &ctx);
        assert_eq!(a.effective, vec!["fish"]);
        assert_eq!(a.derived, vec!["dairy"]);
        assert_eq!(a.source, AllergenSource::Declared);
    }

    #[test]
    fn derived_tags_fill_untagged_dishes() {
        let f = fixture();
        let ctx = MenuContext::new(&f.restaurant, None, &f.categories, &f.ingredients);
        let a = dish_allergens(&dish(1, OWN, &[], &[101, 100]), &ctx);
        assert_eq!(a.effective, vec!["dairy", "gluten", "wheat"]);
        assert_eq!(a.source, AllergenSource::Derived);

        let a = dish_allergens(&dish(2, OWN, &[], &[]), &ctx);
        assert!(a.effective.is_empty());
        assert_eq!(a.source, AllergenSource::None);
    }

    #[test]
    fn foreign_ingredients_never_contribute() {
        let f = fixture();
        let ctx = MenuContext::new(&f.restaurant, None, &f.categories, &f.ingredients);
        let d = dish(1, OWN, &[], &[200]);
        assert!(dish_allergens(&d, &ctx).derived.is_empty());
        let guest = guest_dish(&d, &ctx, &GuestFilter::default()).unwrap();
        assert!(guest.ingredients.is_empty());
    }

    #[test]
    fn foreign_dishes_are_dropped() {
        let f = fixture();
        let ctx = MenuContext::new(&f.restaurant, None, &f.categories, &f.ingredients);
        let dishes = vec![dish(1, OWN, &[], &[]), dish(2, OTHER, &[], &[])];
        let menu = assemble_guest_menu(&dishes, &ctx, &GuestFilter::default());
        assert_eq!(menu.iter().map(|d| d.id).collect::<Vec<_>>(), vec![1]);
        assert_eq!(assemble_admin_menu(&dishes, &ctx).len(), 1);
    }

    #[test]
    fn guest_entry_is_translated() {
        let f = fixture();
        let ctx = MenuContext::new(&f.restaurant, Some("sv"), &f.categories, &f.ingredients);
        let g = guest_dish(&dish(1, OWN, &["dairy"], &[100, 101]), &ctx, &GuestFilter::default())
            .unwrap();
        assert_eq!(g.name, "Rätt");
        assert_eq!(g.description, "Base description");
        assert_eq!(g.category.as_deref(), Some("Huvudrätter"));
        assert_eq!(g.ingredients, vec!["Mozzarellaost", "Pasta"]);
        assert!(g.safety.is_none());
    }

    #[test]
    fn unsupported_language_uses_default() {
        let f = fixture();
        let ctx = MenuContext::new(&f.restaurant, Some("de"), &f.categories, &f.ingredients);
        assert_eq!(ctx.language, "en");
        let g = guest_dish(&dish(1, OWN, &[], &[]), &ctx, &GuestFilter::default()).unwrap();
        assert_eq!(g.name, "Dish 1");
    }

    #[test]
    fn safety_classification() {
        let tags = vec!["dairy".to_string(), "gluten".to_string()];
        let avoid = vec!["milk".to_string()];
        assert_eq!(assess_safety(&tags, &avoid, false, None).status, SafetyStatus::Unsafe);
        assert_eq!(
            assess_safety(&tags, &avoid, true, Some("Ask for vegan cheese")).status,
            SafetyStatus::Modifiable
        );
        assert_eq!(assess_safety(&tags, &avoid, true, Some("  ")).status, SafetyStatus::Unsafe);
        assert_eq!(
            assess_safety(&tags, &["fish".to_string()], false, None).status,
            SafetyStatus::Safe
        );
    }

    #[test]
    fn hide_unsafe_drops_conflicting_dishes() {
        let f = fixture();
        let ctx = MenuContext::new(&f.restaurant, None, &f.categories, &f.ingredients);
        let dishes = vec![dish(1, OWN, &["dairy"], &[]), dish(2, OWN, &["fish"], &[])];
        let filter = GuestFilter {
            avoid: vec!["dairy".into()],
            hide_unsafe: true,
        };
        let menu = assemble_guest_menu(&dishes, &ctx, &filter);
        assert_eq!(menu.len(), 1);
        assert_eq!(menu[0].id, 2);
        assert_eq!(menu[0].safety.as_ref().map(|s| s.status), Some(SafetyStatus::Safe));
    }

    #[test]
    fn inactive_dishes_hidden_from_guests_only() {
        let f = fixture();
        let ctx = MenuContext::new(&f.restaurant, None, &f.categories, &f.ingredients);
        let mut d = dish(1, OWN, &[], &[]);
        d.is_active = false;
        assert!(guest_dish(&d, &ctx, &GuestFilter::default()).is_none());
        assert!(admin_dish(&d, &ctx).is_some());
    }

    #[test]
    fn admin_entry_exposes_both_tag_sets() {
        let f = fixture();
        let ctx = MenuContext::new(&f.restaurant, None, &f.categories, &f.ingredients);
        let a = admin_dish(&dish(1, OWN, &["eggs"], &[100]), &ctx).unwrap();
        assert_eq!(a.declared_allergen_tags, vec!["eggs"]);
        assert_eq!(a.derived_allergen_tags, vec!["dairy"]);
        assert_eq!(a.allergen_source, AllergenSource::Declared);
        assert_eq!(a.ingredients.len(), 1);
    }

    #[test]
    fn categories_and_labels_for_guest_menu() {
        let f = fixture();
        let ctx = MenuContext::new(&f.restaurant, Some("sv"), &f.categories, &f.ingredients);
        let dishes = [dish(1, OWN, &["dairy", "nuts"], &[])];
        let menu = assemble_guest_menu(&dishes, &ctx, &GuestFilter::default());
        let cats = guest_categories(&menu, &ctx);
        assert_eq!(cats.len(), 1);
        assert_eq!(cats[0].name, "Huvudrätter");

        let translations = vec![AllergenTranslation {
            allergen_key: "dairy".into(),
            translations: Translations::parse(r#"{"sv":{"name":"Mjölk"}}"#).unwrap(),
        }];
        let labels = allergen_labels(&menu, &translations, &ctx);
        let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Mjölk", "Nuts"]);
    }
}
