//! Allergen inference from ingredient names
//!
//! Best-effort keyword matching used to seed and repair `allergen_tags`. It is
//! never consulted when serving a menu; stored tags are authoritative there.

use std::collections::BTreeSet;

/// Keyword → allergen tags. Matching is by lower-case substring.
pub static KEYWORD_MAP: &[(&str, &[&str])] = &[
    // Fish
    ("salmon", &["fish"]),
    ("cod", &["fish"]),
    ("tuna", &["fish"]),
    ("mackerel", &["fish"]),
    ("herring", &["fish"]),
    ("trout", &["fish"]),
    ("haddock", &["fish"]),
    ("pike", &["fish"]),
    ("perch", &["fish"]),
    ("flounder", &["fish"]),
    ("halibut", &["fish"]),
    ("swordfish", &["fish"]),
    ("anchovy", &["fish"]),
    ("sardine", &["fish"]),
    ("gravlax", &["fish"]),
    ("fish", &["fish"]),
    // Dairy
    ("milk", &["dairy"]),
    ("butter", &["dairy"]),
    ("cream", &["dairy"]),
    ("cheese", &["dairy"]),
    ("mozzarella", &["dairy"]),
    ("parmesan", &["dairy"]),
    ("cheddar", &["dairy"]),
    ("goat cheese", &["dairy"]),
    ("feta", &["dairy"]),
    ("ricotta", &["dairy"]),
    ("cottage cheese", &["dairy"]),
    ("yogurt", &["dairy"]),
    ("greek yogurt", &["dairy"]),
    ("sour cream", &["dairy"]),
    ("buttermilk", &["dairy"]),
    ("burrata", &["dairy"]),
    ("halloumi", &["dairy"]),
    ("ghee", &["dairy"]),
    // Gluten / wheat
    ("wheat", &["gluten", "wheat"]),
    ("flour", &["gluten", "wheat"]),
    ("bread", &["gluten", "wheat"]),
    ("pasta", &["gluten", "wheat"]),
    ("penne", &["gluten", "wheat"]),
    ("spaghetti", &["gluten", "wheat"]),
    ("noodles", &["gluten", "wheat"]),
    ("seitan", &["gluten", "wheat"]),
    ("barley", &["gluten"]),
    ("rye", &["gluten"]),
    ("oats", &["gluten"]),
    // Eggs
    ("egg", &["eggs"]),
    ("mayonnaise", &["eggs"]),
    // Tree nuts
    ("almond", &["nuts", "tree_nuts"]),
    ("walnut", &["nuts", "tree_nuts"]),
    ("pecan", &["nuts", "tree_nuts"]),
    ("hazelnut", &["nuts", "tree_nuts"]),
    ("cashew", &["nuts", "tree_nuts"]),
    ("pistachio", &["nuts", "tree_nuts"]),
    ("brazil nut", &["nuts", "tree_nuts"]),
    ("pine nut", &["nuts", "tree_nuts"]),
    ("macadamia", &["nuts", "tree_nuts"]),
    // Peanuts, sesame, soy
    ("peanut", &["peanuts"]),
    ("sesame", &["sesame"]),
    ("tahini", &["sesame"]),
    ("soy", &["soy"]),
    ("tofu", &["soy"]),
    ("tempeh", &["soy"]),
    ("soy sauce", &["soy"]),
    ("miso", &["soy"]),
    // Shellfish
    ("shrimp", &["shellfish", "crustaceans"]),
    ("crab", &["shellfish", "crustaceans"]),
    ("lobster", &["shellfish", "crustaceans"]),
    ("crawfish", &["shellfish", "crustaceans"]),
    ("mussel", &["shellfish", "mollusks"]),
    ("oyster", &["shellfish", "mollusks"]),
    ("scallop", &["shellfish", "mollusks"]),
    ("clam", &["shellfish", "mollusks"]),
    ("squid", &["shellfish", "mollusks"]),
    // Sulfites
    ("wine", &["sulfites"]),
    ("glögg", &["sulfites"]),
];

/// Infer allergen tags for an ingredient name.
///
/// Every matching keyword contributes its tags; the result is sorted and
/// deduplicated.
pub fn infer_allergens(name: &str) -> Vec<String> {
    let needle = name.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    KEYWORD_MAP
        .iter()
        .filter(|(keyword, _)| needle.contains(keyword))
        .flat_map(|(_, tags)| tags.iter().copied())
        .collect::<BTreeSet<&str>>()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Fold allergen key aliases onto the key used by the guest filter
pub fn canonical_allergen(key: &str) -> String {
    let key = key.trim().to_lowercase();
    match key.as_str() {
        "milk" => "dairy".to_string(),
        "tree_nuts" | "tree nuts" | "tree-nuts" => "nuts".to_string(),
        "shellfish" => "crustaceans".to_string(),
        "sulphites" => "sulfites".to_string(),
        "egg" => "eggs".to_string(),
        _ => key,
    }
}

/// Tags of `tags` that conflict with any allergen in `avoid`, after aliasing
pub fn conflicting_allergens(tags: &[String], avoid: &[String]) -> Vec<String> {
    let avoid: BTreeSet<String> = avoid.iter().map(|a| canonical_allergen(a)).collect();
    let mut conflicts: Vec<String> = Vec::new();
    for tag in tags {
        if avoid.contains(&canonical_allergen(tag)) && !conflicts.contains(tag) {
            conflicts.push(tag.clone());
        }
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_keyword() {
        assert_eq!(infer_allergens("Fresh Salmon"), vec!["fish"]);
        assert_eq!(infer_allergens("  MOZZARELLA  "), vec!["dairy"]);
    }

    #[test]
    fn multiple_keywords_are_unioned() {
        let tags = infer_allergens("smoked salmon pasta");
        assert_eq!(tags, vec!["fish", "gluten", "wheat"]);
    }

    #[test]
    fn overlapping_keywords_are_deduplicated() {
        // "goat cheese" and "cheese" both map to dairy
        assert_eq!(infer_allergens("goat cheese"), vec!["dairy"]);
        assert_eq!(
            infer_allergens("peanut butter"),
            vec!["dairy", "peanuts"]
        );
    }

    #[test]
    fn result_is_sorted() {
        let tags = infer_allergens("walnut bread with sesame");
        let mut sorted = tags.clone();
        sorted.sort();
        assert_eq!(tags, sorted);
        assert_eq!(tags, vec!["gluten", "nuts", "sesame", "tree_nuts", "wheat"]);
    }

    #[test]
    fn unknown_or_empty_names() {
        assert!(infer_allergens("tomato").is_empty());
        assert!(infer_allergens("").is_empty());
        assert!(infer_allergens("   ").is_empty());
    }

    #[test]
    fn non_ascii_keyword() {
        assert_eq!(infer_allergens("Hot Glögg"), vec!["sulfites"]);
    }

    #[test]
    fn aliases_fold_for_filtering() {
        assert_eq!(canonical_allergen("Milk"), "dairy");
        assert_eq!(canonical_allergen("tree_nuts"), "nuts");
        assert_eq!(canonical_allergen("sulphites"), "sulfites");
        assert_eq!(canonical_allergen("gluten"), "gluten");
    }

    #[test]
    fn conflicts_respect_aliases() {
        let tags = vec!["dairy".to_string(), "gluten".to_string()];
        assert_eq!(
            conflicting_allergens(&tags, &["milk".to_string()]),
            vec!["dairy"]
        );
        assert!(conflicting_allergens(&tags, &["fish".to_string()]).is_empty());
    }
}
