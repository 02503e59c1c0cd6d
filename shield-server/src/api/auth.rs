//! Staff signup and login

use axum::{Json, extract::State};
use shared::error::{AppError, ErrorCode};
use shared::models::{AuthResponse, LoginRequest, SignupRequest, User};

use crate::auth::create_token;
use crate::db;
use crate::state::AppState;
use crate::util::{hash_password, verify_password};
use crate::validation::{MAX_NAME_LEN, validate_email, validate_password, validate_required_text};

use super::ApiResult;
use super::extract::ApiJson;

fn issue_token(state: &AppState, user: &User) -> Result<String, AppError> {
    create_token(user, &state.jwt_secret, state.jwt_expiry_hours).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })
}

/// POST /api/auth/signup: new restaurant plus its owner account
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SignupRequest>,
) -> ApiResult<AuthResponse> {
    validate_required_text(&req.restaurant_name, "restaurant_name", MAX_NAME_LEN)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let (restaurant, user) = db::users::signup(
        &state.pool,
        &req.restaurant_name,
        req.default_language.as_deref(),
        &req.email,
        &password_hash,
    )
    .await?;

    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse {
        token,
        user,
        restaurant,
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let email = req.email.trim().to_lowercase();
    let user = db::users::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }
    if !user.is_active {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let restaurant = db::restaurants::get(&state.pool, user.restaurant_id).await?;
    if !restaurant.is_active {
        return Err(AppError::new(ErrorCode::RestaurantInactive));
    }

    let token = issue_token(&state, &user)?;
    tracing::info!(user_id = user.id, restaurant_id = restaurant.id, "Staff login");
    Ok(Json(AuthResponse {
        token,
        user,
        restaurant,
    }))
}
