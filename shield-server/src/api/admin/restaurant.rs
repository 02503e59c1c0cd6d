use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::menu::LanguageSettings;
use shared::models::{Restaurant, RestaurantUpdate};

use crate::api::ApiResult;
use crate::api::extract::ApiJson;
use crate::auth::StaffIdentity;
use crate::db;
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text, validate_slug,
};

use super::verify_restaurant;

pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(rid): Path<i64>,
) -> ApiResult<Restaurant> {
    verify_restaurant(&identity, rid)?;
    Ok(Json(db::restaurants::get(&state.pool, rid).await?))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(rid): Path<i64>,
    ApiJson(data): ApiJson<RestaurantUpdate>,
) -> ApiResult<Restaurant> {
    verify_restaurant(&identity, rid)?;
    identity.require_settings_access()?;

    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(slug) = &data.slug {
        validate_slug(&slug.trim().to_lowercase())?;
    }
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;

    let restaurant = db::restaurants::update_profile(&state.pool, rid, &data).await?;
    tracing::info!(restaurant_id = rid, slug = %restaurant.slug, "Restaurant profile updated");
    Ok(Json(restaurant))
}

pub async fn get_language_settings(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(rid): Path<i64>,
) -> ApiResult<LanguageSettings> {
    verify_restaurant(&identity, rid)?;
    let restaurant = db::restaurants::get(&state.pool, rid).await?;
    Ok(Json(restaurant.language_settings()))
}

pub async fn update_language_settings(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(rid): Path<i64>,
    ApiJson(settings): ApiJson<LanguageSettings>,
) -> ApiResult<LanguageSettings> {
    verify_restaurant(&identity, rid)?;
    identity.require_settings_access()?;

    let settings = settings.validated()?;
    let restaurant = db::restaurants::update_language_settings(&state.pool, rid, &settings).await?;
    tracing::info!(
        restaurant_id = rid,
        default_language = %restaurant.default_language,
        "Language settings updated"
    );
    Ok(Json(restaurant.language_settings()))
}
