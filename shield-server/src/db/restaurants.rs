//! Restaurant (tenant root) database operations

use shared::error::{AppError, ErrorCode};
use shared::menu::language::{DEFAULT_LANGUAGE, LanguageSettings};
use shared::menu::tags::{encode_tags, normalize_column};
use shared::models::{Restaurant, RestaurantUpdate, SubscriptionTier};
use shared::util::{now_millis, slugify, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{ServiceResult, is_unique_violation};

#[derive(sqlx::FromRow)]
struct RestaurantRow {
    id: i64,
    slug: String,
    name: String,
    description: Option<String>,
    default_language: String,
    supported_languages: Option<String>,
    is_active: bool,
    subscription_tier: String,
    created_at: i64,
    updated_at: i64,
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        let mut supported_languages = normalize_column(row.supported_languages.as_deref());
        if !supported_languages.contains(&row.default_language) {
            supported_languages.insert(0, row.default_language.clone());
        }
        Self {
            id: row.id,
            slug: row.slug,
            name: row.name,
            description: row.description,
            default_language: row.default_language,
            supported_languages,
            is_active: row.is_active,
            subscription_tier: SubscriptionTier::parse(&row.subscription_tier),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const COLUMNS: &str = "id, slug, name, description, default_language, supported_languages, \
                       is_active, subscription_tier, created_at, updated_at";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> ServiceResult<Option<Restaurant>> {
    let row: Option<RestaurantRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM restaurants WHERE id = ?"))
            .bind(id)
            .fetch_optional(pool)
            .await?;
    Ok(row.map(Restaurant::from))
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> ServiceResult<Option<Restaurant>> {
    let row: Option<RestaurantRow> =
        sqlx::query_as(&format!("SELECT {COLUMNS} FROM restaurants WHERE slug = ?"))
            .bind(slug.trim().to_lowercase())
            .fetch_optional(pool)
            .await?;
    Ok(row.map(Restaurant::from))
}

/// Fetch a restaurant or fail with `RestaurantNotFound`
pub async fn get(pool: &SqlitePool, id: i64) -> ServiceResult<Restaurant> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound).into())
}

/// First free slug derived from `name` ("bistro", "bistro-2", ...)
async fn unique_slug(conn: &mut SqliteConnection, name: &str) -> ServiceResult<String> {
    let base = slugify(name);
    let mut candidate = base.clone();
    for n in 2..100 {
        let taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM restaurants WHERE slug = ?")
            .bind(&candidate)
            .fetch_optional(&mut *conn)
            .await?;
        if taken.is_none() {
            return Ok(candidate);
        }
        candidate = format!("{base}-{n}");
    }
    Ok(format!("{base}-{}", snowflake_id()))
}

/// Insert a restaurant on an open connection (used inside the signup transaction)
pub async fn insert(
    conn: &mut SqliteConnection,
    name: &str,
    default_language: Option<&str>,
) -> ServiceResult<Restaurant> {
    let slug = unique_slug(conn, name).await?;
    let default_language = default_language
        .map(|l| l.trim().to_lowercase())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
    let settings = LanguageSettings {
        default_language: default_language.clone(),
        supported_languages: vec![default_language],
    }
    .validated()?;

    let now = now_millis();
    let restaurant = Restaurant {
        id: snowflake_id(),
        slug,
        name: name.trim().to_string(),
        description: None,
        default_language: settings.default_language,
        supported_languages: settings.supported_languages,
        is_active: true,
        subscription_tier: SubscriptionTier::Free,
        created_at: now,
        updated_at: now,
    };

    sqlx::query(
        "INSERT INTO restaurants (id, slug, name, description, default_language, \
         supported_languages, is_active, subscription_tier, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(restaurant.id)
    .bind(&restaurant.slug)
    .bind(&restaurant.name)
    .bind(&restaurant.description)
    .bind(&restaurant.default_language)
    .bind(encode_tags(&restaurant.supported_languages))
    .bind(restaurant.is_active)
    .bind(restaurant.subscription_tier.as_str())
    .bind(restaurant.created_at)
    .bind(restaurant.updated_at)
    .execute(&mut *conn)
    .await?;

    tracing::info!(restaurant_id = restaurant.id, slug = %restaurant.slug, "Restaurant created");
    Ok(restaurant)
}

pub async fn create(
    pool: &SqlitePool,
    name: &str,
    default_language: Option<&str>,
) -> ServiceResult<Restaurant> {
    let mut tx = pool.begin().await?;
    let restaurant = insert(&mut *tx, name, default_language).await?;
    tx.commit().await?;
    Ok(restaurant)
}

/// Update name, slug and description; absent fields are kept
pub async fn update_profile(
    pool: &SqlitePool,
    id: i64,
    data: &RestaurantUpdate,
) -> ServiceResult<Restaurant> {
    let slug = data.slug.as_ref().map(|s| s.trim().to_lowercase());
    let result = sqlx::query(
        "UPDATE restaurants SET name = COALESCE(?1, name), slug = COALESCE(?2, slug), \
         description = COALESCE(?3, description), updated_at = ?4 WHERE id = ?5",
    )
    .bind(data.name.as_ref().map(|n| n.trim().to_string()))
    .bind(&slug)
    .bind(&data.description)
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await;

    match result {
        Ok(done) if done.rows_affected() == 0 => {
            return Err(AppError::new(ErrorCode::RestaurantNotFound).into());
        }
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::new(ErrorCode::SlugTaken)
                .with_detail("slug", slug.unwrap_or_default())
                .into());
        }
        Err(e) => return Err(e.into()),
    }

    get(pool, id).await
}

/// Store validated language settings
pub async fn update_language_settings(
    pool: &SqlitePool,
    id: i64,
    settings: &LanguageSettings,
) -> ServiceResult<Restaurant> {
    let done = sqlx::query(
        "UPDATE restaurants SET default_language = ?, supported_languages = ?, updated_at = ? \
         WHERE id = ?",
    )
    .bind(&settings.default_language)
    .bind(encode_tags(&settings.supported_languages))
    .bind(now_millis())
    .bind(id)
    .execute(pool)
    .await?;
    if done.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::RestaurantNotFound).into());
    }
    get(pool, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::test_pool;
    use crate::error::ServiceError;

    #[tokio::test]
    async fn slugs_are_unique_per_name() {
        let pool = test_pool().await;
        let a = create(&pool, "Bistro Nord", None).await.unwrap();
        let b = create(&pool, "Bistro Nord", None).await.unwrap();
        assert_eq!(a.slug, "bistro-nord");
        assert_eq!(b.slug, "bistro-nord-2");
        assert_eq!(a.supported_languages, vec!["en"]);

        let found = find_by_slug(&pool, "BISTRO-NORD").await.unwrap().unwrap();
        assert_eq!(found.id, a.id);
    }

    #[tokio::test]
    async fn unknown_default_language_is_rejected() {
        let pool = test_pool().await;
        let err = create(&pool, "Cafe", Some("xx")).await.unwrap_err();
        assert!(matches!(err, ServiceError::App(e) if e.code == ErrorCode::LanguageNotSupported));
    }

    #[tokio::test]
    async fn profile_update_detects_taken_slug() {
        let pool = test_pool().await;
        let a = create(&pool, "Alpha", None).await.unwrap();
        create(&pool, "Beta", None).await.unwrap();

        let renamed = update_profile(
            &pool,
            a.id,
            &RestaurantUpdate {
                description: Some("Nordic food".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(renamed.name, "Alpha");
        assert_eq!(renamed.description.as_deref(), Some("Nordic food"));

        let err = update_profile(
            &pool,
            a.id,
            &RestaurantUpdate {
                slug: Some("beta".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServiceError::App(e) if e.code == ErrorCode::SlugTaken));
    }

    #[tokio::test]
    async fn legacy_language_column_is_normalized() {
        let pool = test_pool().await;
        let r = create(&pool, "Legacy", Some("sv")).await.unwrap();
        sqlx::query("UPDATE restaurants SET supported_languages = ? WHERE id = ?")
            .bind(r#""[\"en\"]""#)
            .bind(r.id)
            .execute(&pool)
            .await
            .unwrap();
        let r = get(&pool, r.id).await.unwrap();
        assert_eq!(r.supported_languages, vec!["sv", "en"]);
    }
}
