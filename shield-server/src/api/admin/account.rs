//! The signed-in staff member's own account

use axum::{Extension, Json, extract::State};
use shared::error::{AppError, ErrorCode};
use shared::models::{ChangePasswordRequest, ProfileUpdate, StaffProfile};

use crate::api::ApiResult;
use crate::api::extract::ApiJson;
use crate::auth::StaffIdentity;
use crate::db;
use crate::state::AppState;
use crate::util::{hash_password, verify_password};
use crate::validation::{MAX_NAME_LEN, validate_email, validate_password, validate_required_text};

async fn load_profile(state: &AppState, user_id: i64) -> Result<StaffProfile, AppError> {
    let user = db::users::get(&state.pool, user_id).await?;
    let restaurant = db::restaurants::get(&state.pool, user.restaurant_id).await?;
    Ok(StaffProfile { user, restaurant })
}

/// GET /api/admin/profile
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
) -> ApiResult<StaffProfile> {
    Ok(Json(load_profile(&state, identity.user_id).await?))
}

/// PUT /api/admin/profile: renaming the restaurant needs settings access
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    ApiJson(data): ApiJson<ProfileUpdate>,
) -> ApiResult<StaffProfile> {
    if let Some(email) = &data.email {
        validate_email(email.trim())?;
    }
    if let Some(name) = &data.restaurant_name {
        identity.require_settings_access()?;
        validate_required_text(name, "restaurant_name", MAX_NAME_LEN)?;
    }

    let user = db::users::get(&state.pool, identity.user_id).await?;
    db::users::update_profile(
        &state.pool,
        &user,
        data.email.as_deref(),
        data.restaurant_name.as_deref(),
    )
    .await?;

    tracing::info!(
        user_id = user.id,
        restaurant_id = user.restaurant_id,
        "Account profile updated"
    );
    Ok(Json(load_profile(&state, user.id).await?))
}

/// PUT /api/admin/change-password
pub async fn change_password(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    ApiJson(req): ApiJson<ChangePasswordRequest>,
) -> ApiResult<bool> {
    validate_password(&req.new_password)?;

    let user = db::users::get(&state.pool, identity.user_id).await?;
    if !verify_password(&req.current_password, &user.password_hash) {
        return Err(AppError::with_message(
            ErrorCode::InvalidCredentials,
            "Current password is incorrect",
        ));
    }

    let password_hash = hash_password(&req.new_password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;
    db::users::update_password_hash(&state.pool, user.id, &password_hash).await?;

    tracing::info!(user_id = user.id, "Password changed");
    Ok(Json(true))
}
