use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::AppError;
use shared::models::{Category, CategoryCreate, CategoryUpdate};

use crate::api::ApiResult;
use crate::api::extract::ApiJson;
use crate::auth::StaffIdentity;
use crate::db;
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text, validate_translations,
};

use super::verify_restaurant;

fn validate_create(data: &CategoryCreate) -> Result<(), AppError> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&data.color, "color", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.icon, "icon", MAX_SHORT_TEXT_LEN)?;
    validate_translations(&data.translations)
}

fn validate_update(data: &CategoryUpdate) -> Result<(), AppError> {
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&data.color, "color", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.icon, "icon", MAX_SHORT_TEXT_LEN)?;
    if let Some(translations) = &data.translations {
        validate_translations(translations)?;
    }
    Ok(())
}

pub async fn list_categories(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(rid): Path<i64>,
) -> ApiResult<Vec<Category>> {
    verify_restaurant(&identity, rid)?;
    Ok(Json(db::categories::list(&state.pool, rid).await?))
}

pub async fn create_category(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(rid): Path<i64>,
    ApiJson(data): ApiJson<CategoryCreate>,
) -> ApiResult<Category> {
    verify_restaurant(&identity, rid)?;
    validate_create(&data)?;
    Ok(Json(db::categories::create(&state.pool, rid, &data).await?))
}

pub async fn update_category(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path((rid, category_id)): Path<(i64, i64)>,
    ApiJson(data): ApiJson<CategoryUpdate>,
) -> ApiResult<Category> {
    verify_restaurant(&identity, rid)?;
    validate_update(&data)?;
    Ok(Json(
        db::categories::update(&state.pool, rid, category_id, &data).await?,
    ))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path((rid, category_id)): Path<(i64, i64)>,
) -> ApiResult<bool> {
    verify_restaurant(&identity, rid)?;
    db::categories::delete(&state.pool, rid, category_id).await?;
    Ok(Json(true))
}
