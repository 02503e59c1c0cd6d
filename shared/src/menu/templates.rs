//! Template-based translation suggestions
//!
//! Common dish, ingredient and category names are matched against curated
//! Finnish and Swedish tables. A suggestion is only a starting point for
//! staff; nothing here is written to storage.

use serde::Serialize;

use super::language::normalize_language;
use super::quality::ContentKind;

/// Languages the tables cover
pub const TEMPLATE_LANGUAGES: &[&str] = &["fi", "sv"];

const NAME_SCORE: u32 = 90;
const PATTERN_SCORE: u32 = 70;
const COMPONENT_BONUS: u32 = 15;
const MAX_SCORE: u32 = 100;

/// `(english, finnish, swedish)`
type Entry = (&'static str, &'static str, &'static str);

struct Template {
    name: &'static str,
    /// Words that place a name in this template without naming a known item
    patterns: &'static [&'static str],
    /// Whole names with a fixed translation
    names: &'static [Entry],
    /// Parts translated in place when only a pattern matched
    components: &'static [Entry],
}

static DISH_TEMPLATES: &[Template] = &[
    Template {
        name: "pizza",
        patterns: &["pizza", "pizze", "pizzeria", "stone baked", "wood fired"],
        names: &[
            ("margherita", "Margherita", "Margherita"),
            ("pepperoni", "Pepperoni", "Pepperoni"),
            ("mushroom", "Sieni", "Svamp"),
            ("ham", "Kinkku", "Skinka"),
            ("salami", "Salami", "Salami"),
            ("hawaiian", "Havaiji", "Hawaii"),
            ("quattro stagioni", "Quattro Stagioni", "Quattro Stagioni"),
            ("marinara", "Marinara", "Marinara"),
            ("quattro formaggi", "Neljän juuston", "Quattro Formaggi"),
            ("vegetarian", "Kasvis", "Vegetarisk"),
            ("meat lovers", "Lihanystävän", "Köttalskares"),
            ("bbq chicken", "BBQ-kana", "BBQ-kyckling"),
            ("macaroni and cheese", "Makaroni ja juusto", "Makaroni och ost"),
        ],
        components: &[
            ("tomato sauce", "tomaattikastike", "tomatsås"),
            ("mozzarella", "mozzarella", "mozzarella"),
            ("mushrooms", "sienet", "svamp"),
            ("bell peppers", "paprika", "paprika"),
            ("olives", "oliivit", "oliver"),
            ("onions", "sipuli", "lök"),
            ("basil", "basilika", "basilika"),
            ("oregano", "oregano", "oregano"),
            ("parmesan", "parmesan", "parmesan"),
        ],
    },
    Template {
        name: "pasta",
        patterns: &[
            "pasta",
            "spaghetti",
            "penne",
            "linguine",
            "fettuccine",
            "carbonara",
            "bolognese",
            "arrabiata",
            "macaroni",
        ],
        names: &[
            ("carbonara", "Carbonara", "Carbonara"),
            ("bolognese", "Bolognese", "Bolognese"),
            ("arrabiata", "Arrabiata", "Arrabiata"),
            ("aglio olio", "Aglio e Olio", "Aglio e Olio"),
            ("puttanesca", "Puttanesca", "Puttanesca"),
            ("alfredo", "Alfredo", "Alfredo"),
            ("pesto", "Pesto", "Pesto"),
        ],
        components: &[
            ("spaghetti", "spagetti", "spaghetti"),
            ("bacon", "pekoni", "bacon"),
            ("ground beef", "jauheliha", "köttfärs"),
            ("cream", "kerma", "grädde"),
            ("garlic", "valkosipuli", "vitlök"),
            ("parsley", "persilja", "persilja"),
        ],
    },
    Template {
        name: "fish",
        patterns: &["salmon", "cod", "tuna", "sea bass", "fish", "seafood"],
        names: &[
            ("grilled salmon", "Grillilohi", "Grillad lax"),
            ("pan fried cod", "Pannulla paistettu turska", "Stekt torsk"),
            ("fish and chips", "Fish and chips", "Fish and chips"),
            ("tuna steak", "Tonnikalapihvi", "Tonfiskbiff"),
            ("sea bass", "Meribassi", "Havsabborre"),
            ("smoked salmon", "Savulohi", "Rökt lax"),
        ],
        components: &[
            ("salmon", "lohi", "lax"),
            ("cod", "turska", "torsk"),
            ("tuna", "tonnikala", "tonfisk"),
            ("lemon", "sitruuna", "citron"),
            ("dill", "tilli", "dill"),
            ("capers", "kaprikset", "kapris"),
            ("hollandaise", "hollandaise", "hollandaise"),
        ],
    },
    Template {
        name: "meat",
        patterns: &["beef", "chicken", "pork", "steak", "burger", "schnitzel", "lamb", "veal"],
        names: &[
            ("grilled chicken", "Grillattu kana", "Grillad kyckling"),
            ("beef steak", "Naudanlihapihvi", "Nötbiff"),
            ("pork chop", "Porsaankyljys", "Fläskkotlett"),
            ("chicken schnitzel", "Kanaschnitzel", "Kycklingschnitzel"),
            ("hamburger", "Hampurilainen", "Hamburgare"),
            ("lamb chops", "Lampaankyljykset", "Lammkotletter"),
        ],
        components: &[
            ("beef", "naudanliha", "nötkött"),
            ("chicken", "kana", "kyckling"),
            ("pork", "sianliha", "fläsk"),
            ("lamb", "lammas", "lamm"),
            ("gravy", "kastike", "sås"),
            ("mashed potatoes", "perunamuusi", "potatismos"),
            ("vegetables", "vihannekset", "grönsaker"),
        ],
    },
    Template {
        name: "salad",
        patterns: &["salad", "caesar", "greek", "mixed greens", "lettuce"],
        names: &[
            ("caesar salad", "Caesar-salaatti", "Caesarsallad"),
            ("greek salad", "Kreikkalainen salaatti", "Grekisk sallad"),
            ("garden salad", "Puutarhasalaatti", "Trädgårdssallad"),
            ("chicken salad", "Kanasalaatti", "Kycklingsallad"),
            ("tuna salad", "Tonnikalasalaatti", "Tonfisksallad"),
        ],
        components: &[
            ("lettuce", "salaatti", "sallad"),
            ("tomatoes", "tomaatit", "tomater"),
            ("cucumbers", "kurkku", "gurka"),
            ("croutons", "krutongit", "krutonger"),
            ("parmesan", "parmesan", "parmesan"),
            ("feta cheese", "fetajuusto", "fetaost"),
        ],
    },
    Template {
        name: "soup",
        patterns: &["soup", "broth", "bisque", "chowder", "minestrone"],
        names: &[
            ("tomato soup", "Tomaattikeitto", "Tomatsoppa"),
            ("chicken soup", "Kanakeitto", "Kycklingsoppa"),
            ("mushroom soup", "Sienikeitto", "Svampsoppa"),
            ("fish soup", "Kalakeitto", "Fisksoppa"),
            ("vegetable soup", "Kasviskeitto", "Grönsakssoppa"),
            ("minestrone", "Minestrone", "Minestrone"),
        ],
        components: &[
            ("broth", "liemi", "buljong"),
            ("cream", "kerma", "grädde"),
            ("herbs", "yrtit", "örter"),
            ("bread", "leipä", "bröd"),
        ],
    },
    Template {
        name: "dessert",
        patterns: &[
            "cake", "ice cream", "mousse", "tiramisu", "cheesecake", "chocolate", "vanilla",
        ],
        names: &[
            ("chocolate cake", "Suklaakakku", "Chokladtårta"),
            ("vanilla ice cream", "Vaniljajäätelö", "Vaniljglass"),
            ("tiramisu", "Tiramisu", "Tiramisu"),
            ("cheesecake", "Juustokakku", "Cheesecake"),
            ("apple pie", "Omenapiirakka", "Äppelpaj"),
            ("creme brulee", "Crème brûlée", "Crème brûlée"),
        ],
        components: &[
            ("chocolate", "suklaa", "choklad"),
            ("vanilla", "vanilja", "vanilj"),
            ("cream", "kerma", "grädde"),
            ("berries", "marjat", "bär"),
            ("nuts", "pähkinät", "nötter"),
        ],
    },
    Template {
        name: "beverage",
        patterns: &["coffee", "tea", "juice", "water", "wine", "beer", "soda", "cocktail"],
        names: &[
            ("espresso", "Espresso", "Espresso"),
            ("cappuccino", "Cappuccino", "Cappuccino"),
            ("latte", "Latte", "Latte"),
            ("orange juice", "Appelsiinimehu", "Apelsinjuice"),
            ("sparkling water", "Kivennäisvesi", "Mineralvatten"),
            ("red wine", "Punaviini", "Rödvin"),
            ("white wine", "Valkoviini", "Vitt vin"),
            ("beer", "Olut", "Öl"),
        ],
        components: &[
            ("milk", "maito", "mjölk"),
            ("sugar", "sokeri", "socker"),
            ("lemon", "sitruuna", "citron"),
            ("ice", "jää", "is"),
        ],
    },
];

/// Cooking methods translated inside component-built suggestions
static PREPARATIONS: &[Entry] = &[
    ("grilled", "grillattu", "grillad"),
    ("fried", "paistettu", "stekt"),
    ("baked", "uunissa paistettu", "bakad"),
    ("steamed", "höyrytetty", "ångad"),
    ("boiled", "keitetty", "kokt"),
    ("roasted", "paahdettu", "rostad"),
    ("smoked", "savustettu", "rökt"),
    ("marinated", "marinoitu", "marinerad"),
    ("stuffed", "täytetty", "fylld"),
    ("braised", "haudutettu", "bräserad"),
];

/// Connecting words, longest first so phrases win over their parts
static CONNECTIVES: &[Entry] = &[
    ("served with", "tarjoillaan", "serveras med"),
    ("topped with", "päällä", "toppad med"),
    ("traditional", "perinteinen", "traditionell"),
    ("homemade", "kotitekoinen", "hemlagad"),
    ("seasonal", "kauden", "säsongens"),
    ("organic", "luomu", "ekologisk"),
    ("fresh", "tuore", "färsk"),
    ("local", "paikallinen", "lokal"),
    ("with", "ja", "med"),
];

static INGREDIENT_TEMPLATES: &[Template] = &[
    Template {
        name: "meat",
        patterns: &[
            "beef", "chicken", "pork", "lamb", "veal", "turkey", "duck", "bacon", "sausage",
        ],
        names: &[
            ("beef", "naudanliha", "nötkött"),
            ("chicken", "kana", "kyckling"),
            ("pork", "sianliha", "fläsk"),
            ("lamb", "lammas", "lamm"),
            ("veal", "vasikanliha", "kalv"),
            ("turkey", "kalkkuna", "kalkon"),
            ("duck", "ankka", "anka"),
            ("ham", "kinkku", "skinka"),
            ("bacon", "pekoni", "bacon"),
            ("sausage", "makkara", "korv"),
        ],
        components: &[],
    },
    Template {
        name: "seafood",
        patterns: &["salmon", "cod", "tuna", "shrimp", "lobster", "crab", "mussels", "fish"],
        names: &[
            ("salmon", "lohi", "lax"),
            ("cod", "turska", "torsk"),
            ("tuna", "tonnikala", "tonfisk"),
            ("shrimp", "katkarapu", "räka"),
            ("lobster", "hummeri", "hummer"),
            ("crab", "rapu", "krabba"),
            ("mussels", "sinisimpukat", "musslor"),
            ("oysters", "osterit", "ostron"),
            ("haddock", "kolja", "kolja"),
            ("halibut", "ruijanpallas", "hälleflundra"),
            ("scallops", "kampasimpukat", "kammusslor"),
            ("king prawns", "jättikatkaravut", "kungsräkor"),
            ("fish", "kala", "fisk"),
        ],
        components: &[],
    },
    Template {
        name: "vegetables",
        patterns: &[
            "tomato", "onion", "garlic", "carrot", "potato", "mushroom", "pepper", "cabbage",
        ],
        names: &[
            ("tomatoes", "tomaatit", "tomater"),
            ("tomato", "tomaatti", "tomat"),
            ("onions", "sipulit", "lök"),
            ("onion", "sipuli", "lök"),
            ("garlic", "valkosipuli", "vitlök"),
            ("carrots", "porkkanat", "morötter"),
            ("carrot", "porkkana", "morot"),
            ("potatoes", "perunat", "potatis"),
            ("potato", "peruna", "potatis"),
            ("mushrooms", "sienet", "svamp"),
            ("mushroom", "sieni", "svamp"),
            ("bell pepper", "paprika", "paprika"),
            ("pepper", "pippuri", "peppar"),
            ("spinach", "pinaatti", "spenat"),
            ("lettuce", "salaatti", "sallad"),
            ("leeks", "purjo", "purjolök"),
            ("parsnips", "palsternakka", "palsternacka"),
            ("rutabaga", "lanttu", "kålrot"),
            ("brussels sprouts", "ruusukaali", "brysselkål"),
            ("cabbage", "kaali", "kål"),
            ("eggplant", "munakoiso", "aubergine"),
            ("green beans", "vihreät pavut", "haricots verts"),
            ("beets", "punajuuret", "rödbetor"),
        ],
        components: &[],
    },
    Template {
        name: "dairy",
        patterns: &[
            "milk", "cheese", "butter", "cream", "yogurt", "mozzarella", "parmesan", "feta",
        ],
        names: &[
            ("milk", "maito", "mjölk"),
            ("cheese", "juusto", "ost"),
            ("butter", "voi", "smör"),
            ("cream", "kerma", "grädde"),
            ("yogurt", "jogurtti", "yoghurt"),
            ("mozzarella", "mozzarella", "mozzarella"),
            ("parmesan", "parmesan", "parmesan"),
            ("feta", "feta", "feta"),
            ("mascarpone", "mascarpone", "mascarpone"),
            ("halloumi", "halloumi", "halloumi"),
        ],
        components: &[],
    },
    Template {
        name: "herbs",
        patterns: &["basil", "oregano", "thyme", "rosemary", "parsley", "dill", "cilantro", "mint"],
        names: &[
            ("basil", "basilika", "basilika"),
            ("oregano", "oregano", "oregano"),
            ("thyme", "timjami", "timjan"),
            ("rosemary", "rosmariini", "rosmarin"),
            ("parsley", "persilja", "persilja"),
            ("dill", "tilli", "dill"),
            ("cilantro", "korianteri", "koriander"),
            ("mint", "minttu", "mynta"),
        ],
        components: &[],
    },
    Template {
        name: "fruits",
        patterns: &["apple", "pear", "apricot", "cherry", "berry", "fruit"],
        names: &[
            ("apples", "omenat", "äpplen"),
            ("apple", "omena", "äpple"),
            ("pears", "päärynät", "päron"),
            ("pear", "päärynä", "päron"),
            ("apricots", "aprikoosit", "aprikoser"),
            ("apricot", "aprikoosi", "aprikos"),
            ("cherries", "kirsikat", "körsbär"),
            ("cherry", "kirsikka", "körsbär"),
            ("blackberries", "karhunvatukat", "björnbär"),
            ("elderberries", "seljanmarjat", "fläderbär"),
        ],
        components: &[],
    },
    Template {
        name: "grains",
        patterns: &["rice", "oats", "wheat", "flour", "grain"],
        names: &[
            ("brown rice", "ruskea riisi", "brunt ris"),
            ("rice", "riisi", "ris"),
            ("oats", "kaura", "havre"),
            ("wheat flour", "vehnäjauho", "vetemjöl"),
            ("wheat", "vehnä", "vete"),
            ("flour", "jauho", "mjöl"),
        ],
        components: &[],
    },
];

static CATEGORY_TEMPLATES: &[Template] = &[
    Template {
        name: "courses",
        patterns: &[
            "appetizer",
            "starter",
            "main",
            "dessert",
            "beverage",
            "drink",
            "salad",
            "soup",
            "pasta",
            "pizza",
            "side dish",
        ],
        names: &[
            ("appetizers", "Alkuruoat", "Förrätter"),
            ("appetizer", "Alkuruoka", "Förrätt"),
            ("starters", "Alkuruoat", "Förrätter"),
            ("starter", "Alkuruoka", "Förrätt"),
            ("main courses", "Pääruoat", "Huvudrätter"),
            ("main course", "Pääruoka", "Huvudrätt"),
            ("main dishes", "Pääruoat", "Huvudrätter"),
            ("mains", "Pääruoat", "Huvudrätter"),
            ("desserts", "Jälkiruoat", "Desserter"),
            ("dessert", "Jälkiruoka", "Dessert"),
            ("beverages", "Juomat", "Drycker"),
            ("drinks", "Juomat", "Drycker"),
            ("salads", "Salaatit", "Sallader"),
            ("salad", "Salaatti", "Sallad"),
            ("soups", "Keitot", "Soppor"),
            ("soup", "Keitto", "Soppa"),
            ("pasta", "Pasta", "Pasta"),
            ("pizzas", "Pizzat", "Pizzor"),
            ("pizza", "Pizza", "Pizza"),
            ("side dishes", "Lisukkeet", "Tillbehör"),
        ],
        components: &[],
    },
    Template {
        name: "food_types",
        patterns: &["dairy", "vegetables", "fruits", "grains", "spices", "nuts", "proteins"],
        names: &[
            ("dairy", "Maitotuotteet", "Mejeriprodukter"),
            ("vegetables", "Vihannekset", "Grönsaker"),
            ("fruits", "Hedelmät", "Frukter"),
            ("grains", "Viljat", "Spannmål"),
            ("spices", "Mausteet", "Kryddor"),
            ("nuts", "Pähkinät", "Nötter"),
            ("proteins", "Proteiinit", "Proteiner"),
        ],
        components: &[],
    },
    Template {
        name: "diets",
        patterns: &["meat", "fish", "seafood", "vegetarian", "vegan", "gluten-free", "dairy-free"],
        names: &[
            ("meat dishes", "Liharuoat", "Kötträtter"),
            ("meat", "Liha", "Kött"),
            ("fish dishes", "Kalaruoat", "Fiskrätter"),
            ("fish", "Kala", "Fisk"),
            ("seafood", "Äyriäiset", "Skaldjur"),
            ("vegetarian", "Kasvisruoat", "Vegetariskt"),
            ("vegan", "Vegaaniruoat", "Veganskt"),
            ("gluten-free", "Gluteeniton", "Glutenfritt"),
            ("dairy-free", "Maidoton", "Mjölkfritt"),
        ],
        components: &[],
    },
    Template {
        name: "time_of_day",
        patterns: &["breakfast", "lunch", "dinner", "brunch", "snack"],
        names: &[
            ("breakfast", "Aamiainen", "Frukost"),
            ("lunch", "Lounas", "Lunch"),
            ("dinner", "Illallinen", "Middag"),
            ("brunch", "Brunssi", "Brunch"),
            ("snacks", "Välipalat", "Mellanmål"),
            ("snack", "Välipala", "Mellanmål"),
        ],
        components: &[],
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TargetLanguage {
    Finnish,
    Swedish,
}

impl TargetLanguage {
    fn from_code(code: &str) -> Option<Self> {
        match normalize_language(code).as_str() {
            "fi" => Some(Self::Finnish),
            "sv" => Some(Self::Swedish),
            _ => None,
        }
    }

    fn pick(self, entry: &Entry) -> &'static str {
        match self {
            Self::Finnish => entry.1,
            Self::Swedish => entry.2,
        }
    }
}

/// How a suggestion was reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// A known name occurs in the text
    Name,
    /// Only a template pattern occurs; parts were translated in place
    Pattern,
    None,
}

/// A translation suggestion for one name in one language
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSuggestion {
    pub original: String,
    pub language: String,
    /// The suggested text, or the original when nothing matched
    pub translation: String,
    /// 0..=100
    pub confidence: u32,
    /// Whether the confidence reached the threshold for this kind
    pub matched: bool,
    pub template: Option<&'static str>,
    pub match_kind: MatchKind,
}

/// Minimum confidence for a suggestion to count as a match
pub fn confidence_threshold(kind: ContentKind) -> u32 {
    match kind {
        ContentKind::Dish => 60,
        ContentKind::Ingredient => 70,
        ContentKind::Category => 80,
    }
}

fn templates_for(kind: ContentKind) -> &'static [Template] {
    match kind {
        ContentKind::Dish => DISH_TEMPLATES,
        ContentKind::Ingredient => INGREDIENT_TEMPLATES,
        ContentKind::Category => CATEGORY_TEMPLATES,
    }
}

struct Scored {
    score: u32,
    translation: Option<String>,
    match_kind: MatchKind,
}

/// Suggest a translation of `name` into `language`.
///
/// Every template of the kind is scored and the best one wins; earlier
/// templates win ties. Languages without tables never match.
pub fn suggest_translation(kind: ContentKind, name: &str, language: &str) -> TemplateSuggestion {
    let mut suggestion = TemplateSuggestion {
        original: name.to_string(),
        language: normalize_language(language),
        translation: name.to_string(),
        confidence: 0,
        matched: false,
        template: None,
        match_kind: MatchKind::None,
    };

    let text = name.trim().to_lowercase();
    let Some(target) = TargetLanguage::from_code(language) else {
        return suggestion;
    };
    if text.is_empty() {
        return suggestion;
    }

    let mut best: Option<(&Template, Scored)> = None;
    for template in templates_for(kind) {
        let scored = score_template(&text, template, target);
        if scored.score > best.as_ref().map_or(0, |(_, b)| b.score) {
            best = Some((template, scored));
        }
    }

    if let Some((template, scored)) = best {
        suggestion.confidence = scored.score;
        if scored.score >= confidence_threshold(kind) {
            suggestion.matched = true;
            suggestion.template = Some(template.name);
            suggestion.match_kind = scored.match_kind;
            if let Some(translation) = scored.translation {
                suggestion.translation = translation;
            }
        }
    }
    suggestion
}

fn score_template(text: &str, template: &Template, target: TargetLanguage) -> Scored {
    let known_name = template
        .names
        .iter()
        .filter(|entry| text.contains(entry.0))
        .max_by_key(|entry| entry.0.len());

    let (mut score, mut translation, match_kind) = match known_name {
        Some(entry) => (NAME_SCORE, Some(target.pick(entry).to_string()), MatchKind::Name),
        None if template.patterns.iter().any(|p| text.contains(p)) => {
            (PATTERN_SCORE, None, MatchKind::Pattern)
        }
        None => {
            return Scored {
                score: 0,
                translation: None,
                match_kind: MatchKind::None,
            };
        }
    };

    let components = template
        .components
        .iter()
        .filter(|entry| text.contains(entry.0))
        .count() as u32;
    score += components * COMPONENT_BONUS;

    if match_kind == MatchKind::Pattern && components > 0 {
        let built = translate_parts(text, template, target);
        if built != text {
            translation = Some(built);
        }
    }

    Scored {
        score: score.min(MAX_SCORE),
        translation,
        match_kind,
    }
}

/// Replace every known component, preparation and connective in place
fn translate_parts(text: &str, template: &Template, target: TargetLanguage) -> String {
    let mut out = text.to_string();
    let tables = [template.components, PREPARATIONS, CONNECTIVES];
    for entry in tables.iter().flat_map(|table| table.iter()) {
        if text.contains(entry.0) {
            out = out.replace(entry.0, target.pick(entry));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_dish_name_wins_outright() {
        let s = suggest_translation(ContentKind::Dish, "Grilled Salmon", "sv");
        assert!(s.matched);
        assert_eq!(s.translation, "Grillad lax");
        assert_eq!(s.template, Some("fish"));
        assert_eq!(s.match_kind, MatchKind::Name);
        assert_eq!(s.confidence, 100);
    }

    #[test]
    fn pattern_match_translates_parts() {
        let s = suggest_translation(ContentKind::Dish, "Salmon with dill", "sv");
        assert!(s.matched);
        assert_eq!(s.match_kind, MatchKind::Pattern);
        assert_eq!(s.translation, "lax med dill");
        assert_eq!(s.confidence, 100);

        let s = suggest_translation(ContentKind::Dish, "Salmon with dill", "fi");
        assert_eq!(s.translation, "lohi ja tilli");
    }

    #[test]
    fn pattern_without_components_keeps_original_text() {
        let s = suggest_translation(ContentKind::Dish, "Stone baked special", "sv");
        assert_eq!(s.confidence, PATTERN_SCORE);
        assert!(s.matched);
        assert_eq!(s.translation, "Stone baked special");
    }

    #[test]
    fn unknown_name_is_not_matched() {
        let s = suggest_translation(ContentKind::Dish, "Mystery box", "sv");
        assert!(!s.matched);
        assert_eq!(s.confidence, 0);
        assert_eq!(s.translation, "Mystery box");
        assert_eq!(s.template, None);
    }

    #[test]
    fn longest_known_name_is_preferred() {
        let s = suggest_translation(ContentKind::Ingredient, "Brown rice", "sv");
        assert_eq!(s.translation, "brunt ris");
        let s = suggest_translation(ContentKind::Ingredient, "Rice", "fi");
        assert_eq!(s.translation, "riisi");
    }

    #[test]
    fn thresholds_differ_per_kind() {
        // pattern-only hits score 70: enough for an ingredient, not a category
        let s = suggest_translation(ContentKind::Ingredient, "Strawberry", "sv");
        assert_eq!(s.confidence, PATTERN_SCORE);
        assert!(s.matched);
        let s = suggest_translation(ContentKind::Category, "Drink specials", "sv");
        assert_eq!(s.confidence, PATTERN_SCORE);
        assert!(!s.matched);
        assert_eq!(s.translation, "Drink specials");
    }

    #[test]
    fn category_names_translate() {
        let s = suggest_translation(ContentKind::Category, "Main Courses", "sv");
        assert!(s.matched);
        assert_eq!(s.translation, "Huvudrätter");
        let s = suggest_translation(ContentKind::Category, "Desserts", "fi");
        assert_eq!(s.translation, "Jälkiruoat");
    }

    #[test]
    fn languages_without_tables_never_match() {
        let s = suggest_translation(ContentKind::Dish, "Grilled Salmon", "de");
        assert!(!s.matched);
        assert_eq!(s.confidence, 0);
        assert_eq!(s.language, "de");
        let s = suggest_translation(ContentKind::Dish, "Grilled Salmon", " SV ");
        assert!(s.matched);
        assert_eq!(s.language, "sv");
    }

    #[test]
    fn blank_name_is_not_matched() {
        assert!(!suggest_translation(ContentKind::Dish, "   ", "fi").matched);
    }
}
