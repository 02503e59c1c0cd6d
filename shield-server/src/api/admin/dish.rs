use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::error::AppError;
use shared::menu::assembly::{AdminDish, admin_dish, assemble_admin_menu};
use shared::menu::{MenuContext, Translations};
use shared::models::{Dish, DishComponent, DishCreate, DishUpdate};

use crate::api::ApiResult;
use crate::api::extract::ApiJson;
use crate::auth::StaffIdentity;
use crate::db;
use crate::state::AppState;
use crate::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_price, validate_required_text,
    validate_translations,
};

use super::verify_restaurant;

fn validate_components(components: &[DishComponent]) -> Result<(), AppError> {
    for component in components {
        validate_required_text(&component.name, "component name", MAX_NAME_LEN)?;
    }
    Ok(())
}

fn validate_create(data: &DishCreate) -> Result<(), AppError> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&data.modification_note, "modification_note", MAX_NOTE_LEN)?;
    validate_price(data.price)?;
    validate_components(&data.components)?;
    validate_translations(&data.translations)
}

fn validate_update(data: &DishUpdate) -> Result<(), AppError> {
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    validate_optional_text(&data.modification_note, "modification_note", MAX_NOTE_LEN)?;
    if let Some(price) = data.price {
        validate_price(price)?;
    }
    if let Some(components) = &data.components {
        validate_components(components)?;
    }
    if let Some(translations) = &data.translations {
        validate_translations(translations)?;
    }
    Ok(())
}

pub async fn list_dishes(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(rid): Path<i64>,
) -> ApiResult<Vec<Dish>> {
    verify_restaurant(&identity, rid)?;
    Ok(Json(db::dishes::list(&state.pool, rid).await?))
}

/// GET …/dishes/{id}: one dish with declared and derived allergens
pub async fn get_dish(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path((rid, dish_id)): Path<(i64, i64)>,
) -> ApiResult<AdminDish> {
    verify_restaurant(&identity, rid)?;
    let restaurant = db::restaurants::get(&state.pool, rid).await?;
    let dish = db::dishes::get(&state.pool, rid, dish_id).await?;
    let categories = db::categories::list(&state.pool, rid).await?;
    let ingredients = db::ingredients::list(&state.pool, rid).await?;

    let ctx = MenuContext::new(&restaurant, None, &categories, &ingredients);
    admin_dish(&dish, &ctx)
        .map(Json)
        .ok_or_else(|| db::dishes::not_found(dish_id))
}

pub async fn create_dish(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(rid): Path<i64>,
    ApiJson(data): ApiJson<DishCreate>,
) -> ApiResult<Dish> {
    verify_restaurant(&identity, rid)?;
    validate_create(&data)?;
    Ok(Json(db::dishes::create(&state.pool, rid, &data).await?))
}

pub async fn update_dish(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path((rid, dish_id)): Path<(i64, i64)>,
    ApiJson(data): ApiJson<DishUpdate>,
) -> ApiResult<Dish> {
    verify_restaurant(&identity, rid)?;
    validate_update(&data)?;
    Ok(Json(db::dishes::update(&state.pool, rid, dish_id, &data).await?))
}

/// PUT …/dishes/{id}/translations: merge per language
pub async fn update_translations(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path((rid, dish_id)): Path<(i64, i64)>,
    ApiJson(patch): ApiJson<Translations>,
) -> ApiResult<Dish> {
    verify_restaurant(&identity, rid)?;
    validate_translations(&patch)?;
    Ok(Json(
        db::dishes::update_translations(&state.pool, rid, dish_id, patch).await?,
    ))
}

pub async fn delete_dish(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path((rid, dish_id)): Path<(i64, i64)>,
) -> ApiResult<bool> {
    verify_restaurant(&identity, rid)?;
    db::dishes::delete(&state.pool, rid, dish_id).await?;
    Ok(Json(true))
}

#[derive(Debug, Deserialize)]
pub struct AdminMenuQuery {
    pub lang: Option<String>,
}

/// GET …/menu?lang=: every dish, inactive included, with both allergen sets
pub async fn admin_menu(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(rid): Path<i64>,
    Query(query): Query<AdminMenuQuery>,
) -> ApiResult<Vec<AdminDish>> {
    verify_restaurant(&identity, rid)?;
    let restaurant = db::restaurants::get(&state.pool, rid).await?;
    let categories = db::categories::list(&state.pool, rid).await?;
    let ingredients = db::ingredients::list(&state.pool, rid).await?;
    let dishes = db::dishes::list(&state.pool, rid).await?;

    let ctx = MenuContext::new(
        &restaurant,
        query.lang.as_deref(),
        &categories,
        &ingredients,
    );
    Ok(Json(assemble_admin_menu(&dishes, &ctx)))
}
