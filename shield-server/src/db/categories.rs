//! Category database operations

use shared::error::{AppError, ErrorCode};
use shared::menu::Translations;
use shared::menu::quality::ContentKind;
use shared::menu::tags::{encode_tags, normalize_column};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use shared::util::{now_millis, snowflake_id};
use sqlx::SqlitePool;

use super::merge_translations;
use crate::error::ServiceResult;

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: i64,
    restaurant_id: i64,
    name: String,
    description: Option<String>,
    color: Option<String>,
    icon: Option<String>,
    display_order: i32,
    translations: Option<String>,
    translated_languages: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            restaurant_id: row.restaurant_id,
            name: row.name,
            description: row.description,
            color: row.color,
            icon: row.icon,
            display_order: row.display_order,
            translations: Translations::from_stored(row.translations.as_deref()),
            translated_languages: normalize_column(row.translated_languages.as_deref()),
        }
    }
}

const COLUMNS: &str = "id, restaurant_id, name, description, color, icon, display_order, \
                       translations, translated_languages";

pub async fn list(pool: &SqlitePool, restaurant_id: i64) -> ServiceResult<Vec<Category>> {
    let rows: Vec<CategoryRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM categories WHERE restaurant_id = ? ORDER BY display_order, name"
    ))
    .bind(restaurant_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Category::from).collect())
}

pub async fn find(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
) -> ServiceResult<Option<Category>> {
    let row: Option<CategoryRow> = sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM categories WHERE id = ? AND restaurant_id = ?"
    ))
    .bind(id)
    .bind(restaurant_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Category::from))
}

pub async fn get(pool: &SqlitePool, restaurant_id: i64, id: i64) -> ServiceResult<Category> {
    find(pool, restaurant_id, id)
        .await?
        .ok_or_else(|| not_found(id).into())
}

fn not_found(id: i64) -> AppError {
    AppError::new(ErrorCode::CategoryNotFound).with_detail("category_id", id)
}

/// Fail with `CategoryNotFound` unless the category belongs to this restaurant
pub async fn ensure_owned(pool: &SqlitePool, restaurant_id: i64, id: i64) -> ServiceResult<()> {
    let row: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM categories WHERE id = ? AND restaurant_id = ?")
            .bind(id)
            .bind(restaurant_id)
            .fetch_optional(pool)
            .await?;
    match row {
        Some(_) => Ok(()),
        None => Err(not_found(id).into()),
    }
}

pub async fn create(
    pool: &SqlitePool,
    restaurant_id: i64,
    data: &CategoryCreate,
) -> ServiceResult<Category> {
    let id = snowflake_id();
    let now = now_millis();
    sqlx::query(
        "INSERT INTO categories (id, restaurant_id, name, description, color, icon, display_order, \
         translations, translated_languages, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(restaurant_id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(&data.color)
    .bind(&data.icon)
    .bind(data.display_order.unwrap_or(0))
    .bind(data.translations.to_json())
    .bind(encode_tags(&data.translations.languages()))
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    get(pool, restaurant_id, id).await
}

pub async fn update(
    pool: &SqlitePool,
    restaurant_id: i64,
    id: i64,
    data: &CategoryUpdate,
) -> ServiceResult<Category> {
    let mut tx = pool.begin().await?;

    let done = sqlx::query(
        "UPDATE categories SET name = COALESCE(?, name), description = COALESCE(?, description), \
         color = COALESCE(?, color), icon = COALESCE(?, icon), \
         display_order = COALESCE(?, display_order), updated_at = ? \
         WHERE id = ? AND restaurant_id = ?",
    )
    .bind(data.name.as_ref().map(|n| n.trim().to_string()))
    .bind(&data.description)
    .bind(&data.color)
    .bind(&data.icon)
    .bind(data.display_order)
    .bind(now_millis())
    .bind(id)
    .bind(restaurant_id)
    .execute(&mut *tx)
    .await?;
    if done.rows_affected() == 0 {
        return Err(not_found(id).into());
    }

    if let Some(translations) = &data.translations {
        merge_translations(
            &mut *tx,
            ContentKind::Category,
            restaurant_id,
            id,
            translations.clone(),
        )
        .await?;
    }

    tx.commit().await?;
    get(pool, restaurant_id, id).await
}

/// Delete a category no ingredient or dish refers to
///
/// The usage check and the delete run in one transaction; a refused delete
/// leaves storage untouched.
pub async fn delete(pool: &SqlitePool, restaurant_id: i64, id: i64) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    let exists: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM categories WHERE id = ? AND restaurant_id = ?")
            .bind(id)
            .bind(restaurant_id)
            .fetch_optional(&mut *tx)
            .await?;
    if exists.is_none() {
        return Err(not_found(id).into());
    }

    let (ingredients,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM ingredients WHERE category_id = ? AND restaurant_id = ?",
    )
    .bind(id)
    .bind(restaurant_id)
    .fetch_one(&mut *tx)
    .await?;
    let (dishes,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM dishes WHERE category_id = ? AND restaurant_id = ?")
            .bind(id)
            .bind(restaurant_id)
            .fetch_one(&mut *tx)
            .await?;

    if ingredients > 0 || dishes > 0 {
        return Err(AppError::with_message(
            ErrorCode::CategoryInUse,
            "Cannot delete category that is in use by ingredients or dishes",
        )
        .with_detail("ingredients", ingredients)
        .with_detail("dishes", dishes)
        .into());
    }

    sqlx::query("DELETE FROM categories WHERE id = ? AND restaurant_id = ?")
        .bind(id)
        .bind(restaurant_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!(restaurant_id, category_id = id, "Category deleted");
    Ok(())
}
