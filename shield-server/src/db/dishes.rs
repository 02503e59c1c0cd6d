//! Dish database operations

use std::collections::HashMap;

use shared::error::{AppError, ErrorCode};
use shared::menu::Translations;
use shared::menu::quality::ContentKind;
use shared::menu::tags::{encode_tags, normalize_column};
use shared::models::{Dish, DishComponent, DishCreate, DishIngredientLink, DishUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

use super::{categories, ingredients, merge_translations};
use crate::error::ServiceResult;

#[derive(sqlx::FromRow)]
struct DishRow {
    id: i64,
    restaurant_id: i64,
    name: String,
    description: Option<String>,
    price: f64,
    category_id: Option<i64>,
    allergen_tags: Option<String>,
    is_modifiable: bool,
    modification_note: Option<String>,
    components: Option<String>,
    translations: Option<String>,
    translated_languages: Option<String>,
    display_order: i32,
    is_active: bool,
    created_at: i64,
    updated_at: i64,
}

impl DishRow {
    fn into_dish(self, ingredients: Vec<DishIngredientLink>) -> Dish {
        Dish {
            id: self.id,
            restaurant_id: self.restaurant_id,
            name: self.name,
            description: self.description,
            price: self.price,
            category_id: self.category_id,
            allergen_tags: normalize_column(self.allergen_tags.as_deref()),
            is_modifiable: self.is_modifiable,
            modification_note: self.modification_note,
            components: DishComponent::decode_list(self.components.as_deref()),
            ingredients,
            translations: Translations::from_stored(self.translations.as_deref()),
            translated_languages: normalize_column(self.translated_languages.as_deref()),
            display_order: self.display_order,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    dish_id: i64,
    ingredient_id: i64,
    is_core: bool,
    is_optional: bool,
}

const COLUMNS: &str = "id, restaurant_id, name, description, price, category_id, allergen_tags, \
                       is_modifiable, modification_note, components, translations, \
                       translated_languages, display_order, is_active, created_at, updated_at";

/// All dishes of a restaurant with their ingredient links
pub async fn list(pool: &SqlitePool, restaurant_id: i64) -> ServiceResult<Vec<Dish>> {
    let rows: Vec<DishRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM dishes WHERE restaurant_id = ? ORDER BY display_order, name"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;

    let links: Vec<LinkRow> = sqlx::query_as(
        "SELECT di.dish_id, di.ingredient_id, di.is_core, di.is_optional \
         FROM dish_ingredients di JOIN dishes d ON d.id = di.dish_id \
         WHERE d.restaurant_id = ? ORDER BY di.is_core DESC, di.ingredient_id",
    )
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;

    let mut by_dish: HashMap<i64, Vec<DishIngredientLink>> = HashMap::new();
    for link in links {
        by_dish.entry(link.dish_id).or_default().push(DishIngredientLink {
            ingredient_id: link.ingredient_id,
            is_core: link.is_core,
            is_optional: link.is_optional,
        });
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let links = by_dish.remove(&row.id).unwrap_or_default();
            row.into_dish(links)
        })
        .collect())
}

pub async fn find(pool: &SqlitePool, restaurant_id: i64, id: i64) -> ServiceResult<Option<Dish>> {
    let row: Option<DishRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM dishes WHERE id = ? AND restaurant_id = ?"
    ))
    .bind(id)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await?;
    let Some(row) = row else {
        return Ok(None);
    };

    let links: Vec<LinkRow> = sqlx::query_as(
        "SELECT dish_id, ingredient_id, is_core, is_optional FROM dish_ingredients \
         WHERE dish_id = ? ORDER BY is_core DESC, ingredient_id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;
    let links = links
        .into_iter()
        .map(|link| DishIngredientLink {
            ingredient_id: link.ingredient_id,
            is_core: link.is_core,
            is_optional: link.is_optional,
        })
        .collect();

    Ok(Some(row.into_dish(links)))
}

pub async fn get(pool: &SqlitePool, restaurant_id: i64, id: i64) -> ServiceResult<Dish> {
    find(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| not_found(id).into())
}

pub(crate) fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::DishNotFound).with_detail("dish_id", id)
}

/// Replace a dish's ingredient links; every ingredient must belong to the restaurant
async fn replace_links(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    dish_id: i64,
    links: &[DishIngredientLink],
) -> ServiceResult<()> {
    let mut unique: Vec<DishIngredientLink> = Vec::with_capacity(links.len());
    for link in links {
        if !unique.iter().any(|l| l.ingredient_id == link.ingredient_id) {
            unique.push(*link);
        }
    }

    for link in &unique {
        let owned: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM ingredients WHERE id = ? AND restaurant_id = ?")
                .bind(link.ingredient_id)
                .bind(restaurant_id)
                .fetch_optional(&mut *conn)
                .await?;
        if owned.is_none() {
            return Err(ingredients::not_found(link.ingredient_id).into());
        }
    }

    sqlx::query("DELETE FROM dish_ingredients WHERE dish_id = ?")
        .bind(dish_id)
        .execute(&mut *conn)
        .await?;
    for link in &unique {
        sqlx::query(
            "INSERT INTO dish_ingredients (dish_id, ingredient_id, is_core, is_optional) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(dish_id)
        .bind(link.ingredient_id)
        .bind(link.is_core)
        .bind(link.is_optional)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn create(
    pool: &SqlitePool,
    restaurant_id: i64,
    data: &DishCreate,
) -> ServiceResult<Dish> {
    if let Some(category_id) = data.category_id {
        categories::ensure_owned(pool, restaurant_id, category_id).await?;
    }

    let id = snowflake_id();
    let now = now_millis();
    let mut tx = pool.begin().await?;
    sqlx::query(
        "INSERT INTO dishes (id, restaurant_id, name, description, price, category_id, \
         allergen_tags, is_modifiable, modification_note, components, translations, \
         translated_languages, display_order, is_active, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.price)
    .bind(data.category_id)
    .bind(encode_tags(&data.allergen_tags))
    .bind(data.is_modifiable)
    .bind(&data.modification_note)
    .bind(DishComponent::encode_list(&data.components))
    .bind(data.translations.to_json())
    .bind(encode_tags(&data.translations.languages()))
    .bind(data.display_order.unwrap_or(0))
    .bind(data.is_active.unwrap_or(true))
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    replace_links(&mut *tx, restaurant_id, id, &data.ingredients).await?;
    tx.commit().await?;

    tracing::info!(restaurant_id, dish_id = id, "Dish created");
    get(pool, restaurant_id, id).await
}

pub async fn update(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
    data: &DishUpdate,
) -> ServiceResult<Dish> {
    if let Some(category_id) = data.category_id {
        categories::ensure_owned(pool, restaurant_id, category_id).await?;
    }

    let mut tx = pool.begin().await?;
    let done = sqlx::query(
        "UPDATE dishes SET name = COALESCE(?, name), description = COALESCE(?, description), \
         price = COALESCE(?, price), category_id = COALESCE(?, category_id), \
         allergen_tags = COALESCE(?, allergen_tags), is_modifiable = COALESCE(?, is_modifiable), \
         modification_note = COALESCE(?, modification_note), components = COALESCE(?, components), \
         display_order = COALESCE(?, display_order), is_active = COALESCE(?, is_active), \
         updated_at = ? WHERE id = ? AND restaurant_id = ?",
    )
    .bind(data.name.as_ref().map(|n| n.trim().to_string()))
    .bind(&data.description)
    .bind(data.price)
    .bind(data.category_id)
    .bind(data.allergen_tags.as_deref().map(encode_tags))
    .bind(data.is_modifiable)
    .bind(&data.modification_note)
    .bind(data.components.as_deref().map(DishComponent::encode_list))
    .bind(data.display_order)
    .bind(data.is_active)
    .bind(now_millis())
    .bind(id)
    .bind(restaurant_id)
    .execute(&mut *tx)
    .await?;
    if done.rows_affected() == 0 {
        return Err(not_found(id).into());
    }

    if let Some(links) = &data.ingredients {
        replace_links(&mut *tx, restaurant_id, id, links).await?;
    }
    if let Some(translations) = &data.translations {
        merge_translations(
            &mut *tx,
            ContentKind::Dish,
            restaurant_id,
            id,
            translations.clone(),
        )
        .await?;
    }

    tx.commit().await?;
    get(pool, restaurant_id, id).await
}

/// Merge translations for one dish
pub async fn update_translations(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
    patch: Translations,
) -> ServiceResult<Dish> {
    let mut tx = pool.begin().await?;
    if merge_translations(&mut *tx, ContentKind::Dish, restaurant_id, id, patch)
        .await?
        .is_none()
    {
        return Err(not_found(id).into());
    }
    tx.commit().await?;
    get(pool, restaurant_id, id).await
}

pub async fn delete(pool: &SqlitePool, restaurant_id: i64, id: i64) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;
    let done = sqlx::query("DELETE FROM dishes WHERE id = ? AND restaurant_id = ?")
        .bind(id)
        .bind(restaurant_id)
        .execute(&mut *tx)
        .await?;
    if done.rows_affected() == 0 {
        return Err(not_found(id).into());
    }
    sqlx::query("DELETE FROM dish_ingredients WHERE dish_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(restaurant_id, dish_id = id, "Dish deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::{restaurant, test_pool};
    use crate::error::ServiceError;
    use shared::menu::translation::LocalizedText;
    use shared::models::IngredientCreate;

    fn payload(name: &str) -> DishCreate {
        DishCreate {
            name: name.into(),
            description: Some("House special".into()),
            price: 14.5,
            category_id: None,
            allergen_tags: vec![],
            is_modifiable: false,
            modification_note: None,
            components: vec![],
            ingredients: vec![],
            translations: Translations::new(),
            display_order: None,
            is_active: None,
        }
    }

    fn code(err: ServiceError) -> ErrorCode {
        match err {
            ServiceError::App(e) => e.code,
            ServiceError::Db(e) => panic!("unexpected db error: {e}"),
        }
    }

    async fn ingredient(pool: &SqlitePool, restaurant_id: i64, name: &str) -> i64 {
        ingredients::create(
            pool,
            restaurant_id,
            &IngredientCreate {
                name: name.into(),
                description: None,
                category_id: None,
                parent_id: None,
                allergen_tags: None,
                translations: Translations::new(),
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn create_with_links_and_components() {
        let pool = test_pool().await;
        let own = restaurant(&pool, "Own").await;
        let salmon = ingredient(&pool, own.id, "Salmon").await;

        let dish = create(
            &pool,
            own.id,
            &DishCreate {
                allergen_tags: vec!["fish".into()],
                ingredients: vec![
                    DishIngredientLink {
                        ingredient_id: salmon,
                        is_core: true,
                        is_optional: false,
                    },
                    DishIngredientLink {
                        ingredient_id: salmon,
                        is_core: false,
                        is_optional: true,
                    },
                ],
                components: vec![DishComponent {
                    name: "Sauce".into(),
                    kind: "choice".into(),
                    required: true,
                    ingredients: vec!["cream".into()],
                    allergen_tags: vec!["dairy".into()],
                }],
                ..payload("Salmon plate")
            },
        )
        .await
        .unwrap();

        assert!(dish.is_active);
        assert_eq!(dish.ingredients.len(), 1);
        assert!(dish.ingredients[0].is_core);
        assert_eq!(dish.components[0].allergen_tags, vec!["dairy"]);
        assert_eq!(list(&pool, own.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn foreign_ingredient_link_is_rejected_without_writing() {
        let pool = test_pool().await;
        let own = restaurant(&pool, "Own").await;
        let other = restaurant(&pool, "Other").await;
        let foreign = ingredient(&pool, other.id, "Cod").await;

        let err = create(
            &pool,
            own.id,
            &DishCreate {
                ingredients: vec![DishIngredientLink {
                    ingredient_id: foreign,
                    is_core: true,
                    is_optional: false,
                }],
                ..payload("Fish soup")
            },
        )
        .await
        .unwrap_err();
        assert_eq!(code(err), ErrorCode::IngredientNotFound);
        assert!(list(&pool, own.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_keeps_absent_fields_and_merges_translations() {
        let pool = test_pool().await;
        let own = restaurant(&pool, "Own").await;
        let dish = create(&pool, own.id, &payload("Soup")).await.unwrap();

        let updated = update(
            &pool,
            own.id,
            dish.id,
            &DishUpdate {
                price: Some(9.0),
                allergen_tags: Some(vec!["dairy".into()]),
                translations: Some(
                    [("fi".to_string(), LocalizedText::named("Keitto"))]
                        .into_iter()
                        .collect(),
                ),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Soup");
        assert_eq!(updated.description.as_deref(), Some("House special"));
        assert_eq!(updated.price, 9.0);
        assert_eq!(updated.allergen_tags, vec!["dairy"]);
        assert_eq!(updated.translated_languages, vec!["fi"]);

        let patched = update_translations(
            &pool,
            own.id,
            dish.id,
            [(
                "fi".to_string(),
                LocalizedText {
                    description: Some("Talon erikoinen".into()),
                    ..Default::default()
                },
            )]
            .into_iter()
            .collect(),
        )
        .await
        .unwrap();
        let fi = patched.translations.get("fi").unwrap();
        assert_eq!(fi.name.as_deref(), Some("Keitto"));
        assert_eq!(fi.description.as_deref(), Some("Talon erikoinen"));
    }

    #[tokio::test]
    async fn cross_tenant_access_is_not_found_and_harmless() {
        let pool = test_pool().await;
        let own = restaurant(&pool, "Own").await;
        let other = restaurant(&pool, "Other").await;
        let dish = create(&pool, own.id, &payload("Soup")).await.unwrap();

        assert!(find(&pool, other.id, dish.id).await.unwrap().is_none());
        assert!(list(&pool, other.id).await.unwrap().is_empty());
        let err = update(&pool, other.id, dish.id, &DishUpdate::default())
            .await
            .unwrap_err();
        assert_eq!(code(err), ErrorCode::DishNotFound);
        let err = delete(&pool, other.id, dish.id).await.unwrap_err();
        assert_eq!(code(err), ErrorCode::DishNotFound);

        assert_eq!(get(&pool, own.id, dish.id).await.unwrap().name, "Soup");
        delete(&pool, own.id, dish.id).await.unwrap();
        assert!(find(&pool, own.id, dish.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn double_encoded_components_are_read() {
        let pool = test_pool().await;
        let own = restaurant(&pool, "Own").await;
        let dish = create(&pool, own.id, &payload("Bowl")).await.unwrap();

        let components = r#"[{"name":"Base","type":"rice","allergenTags":"[\"soy\"]"}]"#;
        let stored = serde_json::to_string(components).unwrap();
        sqlx::query("UPDATE dishes SET components = ?, allergen_tags = 'gluten' WHERE id = ?")
            .bind(stored)
            .bind(dish.id)
            .execute(&pool)
            .await
            .unwrap();

        let dish = get(&pool, own.id, dish.id).await.unwrap();
        assert_eq!(dish.components.len(), 1);
        assert_eq!(dish.components[0].allergen_tags, vec!["soy"]);
        assert_eq!(dish.allergen_tags, vec!["gluten"]);
    }
}
