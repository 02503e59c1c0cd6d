//! Ingredient database operations

use serde::Serialize;
use shared::error::{AppError, ErrorCode};
use shared::menu::Translations;
use shared::menu::allergens::infer_allergens;
use shared::menu::quality::ContentKind;
use shared::menu::tags::{encode_tags, normalize_column};
use shared::models::{Ingredient, IngredientCreate, IngredientUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

use super::{categories, merge_translations};
use crate::error::ServiceResult;

#[derive(sqlx::FromRow)]
struct IngredientRow {
    id: i64,
    restaurant_id: i64,
    name: String,
    description: Option<String>,
    category_id: Option<i64>,
    parent_id: Option<i64>,
    allergen_tags: Option<String>,
    translations: Option<String>,
    translated_languages: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<IngredientRow> for Ingredient {
    fn from(row: IngredientRow) -> Self {
        Self {
            id: row.id,
            restaurant_id: row.restaurant_id,
            name: row.name,
            description: row.description,
            category_id: row.category_id,
            parent_id: row.parent_id,
            allergen_tags: normalize_column(row.allergen_tags.as_deref()),
            translations: Translations::from_stored(row.translations.as_deref()),
            translated_languages: normalize_column(row.translated_languages.as_deref()),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str = "id, restaurant_id, name, description, category_id, parent_id, \
                       allergen_tags, translations, translated_languages, created_at, updated_at";

pub async fn list(pool: &SqlitePool, restaurant_id: i64) -> ServiceResult<Vec<Ingredient>> {
    let rows: Vec<IngredientRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM ingredients WHERE restaurant_id = ? ORDER BY name"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Ingredient::from).collect())
}

pub async fn find(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
) -> ServiceResult<Option<Ingredient>> {
    let row: Option<IngredientRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM ingredients WHERE id = ? AND restaurant_id = ?"
    ))
    .bind(id)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Ingredient::from))
}

pub async fn get(pool: &SqlitePool, restaurant_id: i64, id: i64) -> ServiceResult<Ingredient> {
    find(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| not_found(id).into())
}

pub(crate) fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::IngredientNotFound).with_detail("ingredient_id", id)
}

fn invalid_parent(parent_id: i64, reason: &str) -> AppError {
    AppError::with_message(ErrorCode::IngredientParentInvalid, reason)
        .with_detail("parent_id", parent_id)
}

/// Parent of `id` within this restaurant; `None` when `id` is not ours
async fn parent_of(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    id: i64,
) -> ServiceResult<Option<Option<i64>>> {
    let row: Option<(Option<i64>,)> =
        sqlx::query_as("SELECT parent_id FROM ingredients WHERE id = ? AND restaurant_id = ?")
            .bind(id)
            .bind(restaurant_id)
            .fetch_optional(&mut *conn)
            .await?;
    Ok(row.map(|(parent,)| parent))
}

/// A parent must exist in the same restaurant and must not be `child` or
/// one of its descendants
async fn check_parent(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    child: Option<i64>,
    parent_id: i64,
) -> ServiceResult<()> {
    if child == Some(parent_id) {
        return Err(invalid_parent(parent_id, "An ingredient cannot be its own parent").into());
    }

    let mut cursor = Some(parent_id);
    let mut depth = 0;
    while let Some(current) = cursor {
        let Some(next) = parent_of(conn, restaurant_id, current).await? else {
            return Err(invalid_parent(parent_id, "Parent ingredient not found").into());
        };
        if next.is_some() && next == child {
            return Err(invalid_parent(parent_id, "Parent would create a cycle").into());
        }
        depth += 1;
        if depth > 64 {
            return Err(invalid_parent(parent_id, "Ingredient hierarchy is too deep").into());
        }
        cursor = next;
    }
    Ok(())
}

pub async fn create(
    pool: &SqlitePool,
    restaurant_id: i64,
    data: &IngredientCreate,
) -> ServiceResult<Ingredient> {
    if let Some(category_id) = data.category_id {
        categories::ensure_owned(pool, restaurant_id, category_id).await?;
    }

    let mut tx = pool.begin().await?;
    if let Some(parent_id) = data.parent_id {
        check_parent(&mut *tx, restaurant_id, None, parent_id).await?;
    }

    let allergen_tags = match &data.allergen_tags {
        Some(tags) => tags.clone(),
        None => infer_allergens(&data.name),
    };

    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO ingredients (id, restaurant_id, name, description, category_id, parent_id, \
         allergen_tags, translations, translated_languages, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.category_id)
    .bind(data.parent_id)
    .bind(encode_tags(&allergen_tags))
    .bind(data.translations.to_json())
    .bind(encode_tags(&data.translations.languages()))
    .bind(now)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    get(pool, restaurant_id, id).await
}

pub async fn update(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
    data: &IngredientUpdate,
) -> ServiceResult<Ingredient> {
    if let Some(category_id) = data.category_id {
        categories::ensure_owned(pool, restaurant_id, category_id).await?;
    }

    let mut tx = pool.begin().await?;
    let Some(current_parent) = parent_of(&mut *tx, restaurant_id, id).await? else {
        return Err(not_found(id).into());
    };

    let parent_id = if data.clear_parent {
        None
    } else if let Some(parent_id) = data.parent_id {
        check_parent(&mut *tx, restaurant_id, Some(id), parent_id).await?;
        Some(parent_id)
    } else {
        current_parent
    };

    sqlx::query(
        "UPDATE ingredients SET name = COALESCE(?, name), description = COALESCE(?, description), \
         category_id = COALESCE(?, category_id), parent_id = ?, \
         allergen_tags = COALESCE(?, allergen_tags), updated_at = ? \
         WHERE id = ? AND restaurant_id = ?",
    )
    .bind(data.name.as_ref().map(|n| n.trim().to_string()))
    .bind(&data.description)
    .bind(data.category_id)
    .bind(parent_id)
    .bind(data.allergen_tags.as_deref().map(encode_tags))
    .bind(now_millis())
    .bind(id)
    .bind(restaurant_id)
    .execute(&mut *tx)
    .await?;

    if let Some(translations) = &data.translations {
        merge_translations(
            &mut *tx,
            ContentKind::Ingredient,
            restaurant_id,
            id,
            translations.clone(),
        )
        .await?;
    }

    tx.commit().await?;
    get(pool, restaurant_id, id).await
}

/// Merge translations for one ingredient
pub async fn update_translations(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
    patch: Translations,
) -> ServiceResult<Ingredient> {
    let mut tx = pool.begin().await?;
    if merge_translations(&mut *tx, ContentKind::Ingredient, restaurant_id, id, patch)
        .await?
        .is_none()
    {
        return Err(not_found(id).into());
    }
    tx.commit().await?;
    get(pool, restaurant_id, id).await
}

/// Delete an ingredient without children
///
/// Dish links to the ingredient are removed with it. The child check and
/// the delete run in one transaction; a refused delete leaves storage
/// untouched.
pub async fn delete(pool: &SqlitePool, restaurant_id: i64, id: i64) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    if parent_of(&mut *tx, restaurant_id, id).await?.is_none() {
        return Err(not_found(id).into());
    }

    let (children,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM ingredients WHERE parent_id = ? AND restaurant_id = ?",
    )
    .bind(id)
    .bind(restaurant_id)
    .fetch_one(&mut *tx)
    .await?;
    if children > 0 {
        return Err(AppError::with_message(
            ErrorCode::IngredientHasChildren,
            "Cannot delete ingredient that has child ingredients",
        )
        .with_detail("children", children)
        .into());
    }

    let unlinked = sqlx::query("DELETE FROM dish_ingredients WHERE ingredient_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    sqlx::query("DELETE FROM ingredients WHERE id = ? AND restaurant_id = ?")
        .bind(id)
        .bind(restaurant_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(restaurant_id, ingredient_id = id, unlinked, "Ingredient deleted");
    Ok(())
}

/// One ingredient whose tags were filled in by keyword inference
#[derive(Debug, Clone, Serialize)]
pub struct BackfilledIngredient {
    pub id: i64,
    pub name: String,
    pub allergen_tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BackfillReport {
    pub checked: usize,
    pub updated: Vec<BackfilledIngredient>,
}

/// Infer tags for every untagged ingredient of a restaurant
///
/// Ingredients that already carry tags are left alone.
pub async fn backfill_allergens(
    pool: &SqlitePool,
    restaurant_id: i64,
) -> ServiceResult<BackfillReport> {
    let ingredients = list(pool, restaurant_id).await?;
    let checked = ingredients.len();
    let now = now_millis();

    let mut tx = pool.begin().await?;
    let mut updated = Vec::new();
    for ingredient in ingredients.into_iter().filter(|i| i.allergen_tags.is_empty()) {
        let inferred = infer_allergens(&ingredient.name);
        if inferred.is_empty() {
            continue;
        }
        sqlx::query(
            "UPDATE ingredients SET allergen_tags = ?, updated_at = ? \
             WHERE id = ? AND restaurant_id = ?",
        )
        .bind(encode_tags(&inferred))
        .bind(now)
        .bind(ingredient.id)
        .bind(restaurant_id)
        .execute(&mut *tx)
        .await?;
        updated.push(BackfilledIngredient {
            id: ingredient.id,
            name: ingredient.name,
            allergen_tags: inferred,
        });
    }
    tx.commit().await?;

    tracing::info!(
        restaurant_id,
        checked,
        updated = updated.len(),
        "Allergen backfill finished"
    );
    Ok(BackfillReport { checked, updated })
}
