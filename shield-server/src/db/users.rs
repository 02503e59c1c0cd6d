//! Staff user database operations

use shared::error::{AppError, ErrorCode};
use shared::models::{Restaurant, User, UserRole};
use shared::util::{now_millis, snowflake_id};
use sqlx::{SqliteConnection, SqlitePool};

use super::restaurants;
use crate::error::{ServiceResult, is_unique_violation};

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    restaurant_id: i64,
    email: String,
    password_hash: String,
    role: String,
    is_active: bool,
    created_at: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        let role = UserRole::parse(&row.role).unwrap_or_else(|| {
            tracing::warn!(
                user_id = row.id,
                role = %row.role,
                "Unknown stored role, treating as STAFF"
            );
            UserRole::Staff
        });
        Self {
            id: row.id,
            restaurant_id: row.restaurant_id,
            email: row.email,
            password_hash: row.password_hash,
            role,
            is_active: row.is_active,
            created_at: row.created_at,
        }
    }
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> ServiceResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, restaurant_id, email, password_hash, role, is_active, created_at \
         FROM users WHERE email = ?",
    )
    .bind(email.trim().to_lowercase())
    .fetch_optional(pool)
    .await?;
    Ok(row.map(User::from))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> ServiceResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as(
        "SELECT id, restaurant_id, email, password_hash, role, is_active, created_at \
         FROM users WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(User::from))
}

/// The token's user; a deleted account no longer authenticates
pub async fn get(pool: &SqlitePool, id: i64) -> ServiceResult<User> {
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::not_authenticated().into())
}

pub async fn insert(
    conn: &mut SqliteConnection,
    restaurant_id: i64,
    email: &str,
    password_hash: &str,
    role: UserRole,
) -> ServiceResult<User> {
    let user = User {
        id: snowflake_id(),
        restaurant_id,
        email: email.trim().to_lowercase(),
        password_hash: password_hash.to_string(),
        role,
        is_active: true,
        created_at: now_millis(),
    };

    let result = sqlx::query(
        "INSERT INTO users (id, restaurant_id, email, password_hash, role, is_active, created_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(user.id)
    .bind(user.restaurant_id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(user.is_active)
    .bind(user.created_at)
    .execute(&mut *conn)
    .await;

    match result {
        Ok(_) => Ok(user),
        Err(e) if is_unique_violation(&e) => Err(AppError::new(ErrorCode::EmailTaken).into()),
        Err(e) => Err(e.into()),
    }
}

/// Create a restaurant and its owner account atomically
pub async fn signup(
    pool: &SqlitePool,
    restaurant_name: &str,
    default_language: Option<&str>,
    email: &str,
    password_hash: &str,
) -> ServiceResult<(Restaurant, User)> {
    let mut tx = pool.begin().await?;
    let restaurant = restaurants::insert(&mut *tx, restaurant_name, default_language).await?;
    let user = insert(&mut *tx, restaurant.id, email, password_hash, UserRole::Owner).await?;
    tx.commit().await?;

    tracing::info!(
        restaurant_id = restaurant.id,
        user_id = user.id,
        "Signup completed"
    );
    Ok((restaurant, user))
}

/// Change a user's email and their restaurant's name in one transaction
pub async fn update_profile(
    pool: &SqlitePool,
    user: &User,
    email: Option<&str>,
    restaurant_name: Option<&str>,
) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;

    if let Some(email) = email {
        let result = sqlx::query("UPDATE users SET email = ? WHERE id = ?")
            .bind(email.trim().to_lowercase())
            .bind(user.id)
            .execute(&mut *tx)
            .await;
        match result {
            Ok(_) => {}
            Err(e) if is_unique_violation(&e) => {
                return Err(AppError::new(ErrorCode::EmailTaken).into());
            }
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(name) = restaurant_name {
        sqlx::query("UPDATE restaurants SET name = ?, updated_at = ? WHERE id = ?")
            .bind(name.trim())
            .bind(now_millis())
            .bind(user.restaurant_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn update_password_hash(
    pool: &SqlitePool,
    user_id: i64,
    password_hash: &str,
) -> ServiceResult<()> {
    sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}
