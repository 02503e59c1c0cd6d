use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::AppError;
use shared::menu::Translations;
use shared::models::{Ingredient, IngredientCreate, IngredientUpdate};

use crate::api::ApiResult;
use crate::api::extract::ApiJson;
use crate::auth::StaffIdentity;
use crate::db;
use crate::db::ingredients::BackfillReport;
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
    validate_translations,
};

use super::verify_restaurant;

fn validate_create(data: &IngredientCreate) -> Result<(), AppError> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    validate_translations(&data.translations)
}

fn validate_update(data: &IngredientUpdate) -> Result<(), AppError> {
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    if let Some(translations) = &data.translations {
        validate_translations(translations)?;
    }
    Ok(())
}

pub async fn list_ingredients(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(rid): Path<i64>,
) -> ApiResult<Vec<Ingredient>> {
    verify_restaurant(&identity, rid)?;
    Ok(Json(db::ingredients::list(&state.pool, rid).await?))
}

pub async fn create_ingredient(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(rid): Path<i64>,
    ApiJson(data): ApiJson<IngredientCreate>,
) -> ApiResult<Ingredient> {
    verify_restaurant(&identity, rid)?;
    validate_create(&data)?;
    Ok(Json(db::ingredients::create(&state.pool, rid, &data).await?))
}

pub async fn update_ingredient(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path((rid, ingredient_id)): Path<(i64, i64)>,
    ApiJson(data): ApiJson<IngredientUpdate>,
) -> ApiResult<Ingredient> {
    verify_restaurant(&identity, rid)?;
    validate_update(&data)?;
    Ok(Json(
        db::ingredients::update(&state.pool, rid, ingredient_id, &data).await?,
    ))
}

/// PUT …/ingredients/{id}/translations: merge per language
pub async fn update_translations(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path((rid, ingredient_id)): Path<(i64, i64)>,
    ApiJson(patch): ApiJson<Translations>,
) -> ApiResult<Ingredient> {
    verify_restaurant(&identity, rid)?;
    validate_translations(&patch)?;
    Ok(Json(
        db::ingredients::update_translations(&state.pool, rid, ingredient_id, patch).await?,
    ))
}

pub async fn delete_ingredient(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path((rid, ingredient_id)): Path<(i64, i64)>,
) -> ApiResult<bool> {
    verify_restaurant(&identity, rid)?;
    db::ingredients::delete(&state.pool, rid, ingredient_id).await?;
    Ok(Json(true))
}

/// POST …/ingredients/backfill-allergens: infer tags for untagged ingredients
pub async fn backfill_allergens(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(rid): Path<i64>,
) -> ApiResult<BackfillReport> {
    verify_restaurant(&identity, rid)?;
    let report = db::ingredients::backfill_allergens(&state.pool, rid).await?;
    tracing::info!(
        restaurant_id = rid,
        checked = report.checked,
        updated = report.updated.len(),
        "Allergen backfill finished"
    );
    Ok(Json(report))
}
