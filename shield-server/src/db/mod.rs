//! SQLite repository functions
//!
//! Every function takes the pool (or a transaction) explicitly and every
//! tenant-owned query is filtered by `restaurant_id`. JSON columns are
//! decoded here, at the storage boundary, through the tag normalizer and the
//! lenient translation reader.

pub mod allergens;
pub mod categories;
pub mod dishes;
pub mod ingredients;
pub mod quality;
pub mod restaurants;
pub mod users;

use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::menu::Translations;
use shared::menu::quality::ContentKind;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::ServiceResult;

fn table(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Dish => "dishes",
        ContentKind::Ingredient => "ingredients",
        ContentKind::Category => "categories",
    }
}

/// Merge `patch` into an entity's stored translations and refresh its
/// `translated_languages` marker.
///
/// Returns `None` when the entity does not exist in this restaurant.
pub async fn merge_translations(
    conn: &mut SqliteConnection,
    kind: ContentKind,
    restaurant_id: i64,
    id: i64,
    patch: Translations,
) -> ServiceResult<Option<Translations>> {
    let table = table(kind);
    let stored: Option<(Option<String>,)> = sqlx::query_as(&format!(
        "SELECT translations FROM {table} WHERE id = ? AND restaurant_id = ?"
    ))
    .bind(id)
    .bind(restaurant_id)
    .fetch_optional(&mut *conn)
    .await?;
    let Some((stored,)) = stored else {
        return Ok(None);
    };

    let mut translations = Translations::from_stored(stored.as_deref());
    translations.merge_all(patch);

    sqlx::query(&format!(
        "UPDATE {table} SET translations = ?, translated_languages = ?, updated_at = ? \
         WHERE id = ? AND restaurant_id = ?"
    ))
    .bind(translations.to_json())
    .bind(shared::menu::tags::encode_tags(&translations.languages()))
    .bind(shared::util::now_millis())
    .bind(id)
    .bind(restaurant_id)
    .execute(&mut *conn)
    .await?;

    Ok(Some(translations))
}

/// One entry of a bulk translation update
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationUpdate {
    pub kind: ContentKind,
    pub id: i64,
    pub translations: Translations,
}

fn not_found(kind: ContentKind, id: i64) -> AppError {
    match kind {
        ContentKind::Dish => AppError::new(ErrorCode::DishNotFound).with_detail("dish_id", id),
        ContentKind::Ingredient => {
            AppError::new(ErrorCode::IngredientNotFound).with_detail("ingredient_id", id)
        }
        ContentKind::Category => {
            AppError::new(ErrorCode::CategoryNotFound).with_detail("category_id", id)
        }
    }
}

/// Apply many translation merges atomically
///
/// Any entity missing from this restaurant fails the whole batch.
pub async fn bulk_merge_translations(
    pool: &SqlitePool,
    restaurant_id: i64,
    updates: Vec<TranslationUpdate>,
) -> ServiceResult<usize> {
    let mut tx = pool.begin().await?;
    let count = updates.len();
    for update in updates {
        let merged = merge_translations(
            &mut *tx,
            update.kind,
            restaurant_id,
            update.id,
            update.translations,
        )
        .await?;
        if merged.is_none() {
            return Err(not_found(update.kind, update.id).into());
        }
    }
    tx.commit().await?;
    Ok(count)
}


#[cfg(test)]
pub(crate) mod testing {
    use shared::models::Restaurant;
    use sqlx::SqlitePool;
    use sqlx::sqlite::SqlitePoolOptions;

    /// In-memory pool with the real migrations applied.
    ///
    /// A single connection that never idles out, so the database lives as
    /// long as the pool.
    pub async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    pub async fn restaurant(pool: &SqlitePool, name: &str) -> Restaurant {
        super::restaurants::create(pool, name, None).await.unwrap()
    }
}
