//! Back-office API (staff JWT required)
//!
//! Every route under `/api/admin/restaurants/{rid}` first checks the path's
//! restaurant against the caller's token; repository calls are then scoped to
//! that restaurant. `/api/admin/profile` and `/api/admin/change-password` act
//! on the caller's own account.

mod account;
mod allergen;
mod category;
mod dish;
mod ingredient;
mod quality;
mod restaurant;
mod translation;

use axum::routing::{get, post, put};
use axum::{Router, middleware};
use shared::error::AppError;

use crate::auth::{StaffIdentity, tenant_auth_middleware};
use crate::state::AppState;

/// Reject callers whose token belongs to another restaurant
pub(crate) fn verify_restaurant(
    identity: &StaffIdentity,
    restaurant_id: i64,
) -> Result<(), AppError> {
    if identity.restaurant_id == restaurant_id {
        return Ok(());
    }
    tracing::warn!(
        user_id = identity.user_id,
        own_restaurant = identity.restaurant_id,
        requested = restaurant_id,
        "Cross-tenant access denied"
    );
    Err(AppError::tenant_access_denied())
}

pub fn router(state: AppState) -> Router<AppState> {
    const BASE: &str = "/api/admin/restaurants/{rid}";
    let at = |path: &str| format!("{BASE}{path}");

    Router::new()
        .route(
            BASE,
            get(restaurant::get_profile).put(restaurant::update_profile),
        )
        .route(
            &at("/language-settings"),
            get(restaurant::get_language_settings).put(restaurant::update_language_settings),
        )
        // Categories
        .route(
            &at("/categories"),
            get(category::list_categories).post(category::create_category),
        )
        .route(
            &at("/categories/{id}"),
            put(category::update_category).delete(category::delete_category),
        )
        // Ingredients
        .route(
            &at("/ingredients"),
            get(ingredient::list_ingredients).post(ingredient::create_ingredient),
        )
        .route(
            &at("/ingredients/backfill-allergens"),
            post(ingredient::backfill_allergens),
        )
        .route(
            &at("/ingredients/{id}"),
            put(ingredient::update_ingredient).delete(ingredient::delete_ingredient),
        )
        .route(
            &at("/ingredients/{id}/translations"),
            put(ingredient::update_translations),
        )
        // Dishes
        .route(
            &at("/dishes"),
            get(dish::list_dishes).post(dish::create_dish),
        )
        .route(
            &at("/dishes/{id}"),
            get(dish::get_dish)
                .put(dish::update_dish)
                .delete(dish::delete_dish),
        )
        .route(&at("/dishes/{id}/translations"), put(dish::update_translations))
        .route(&at("/menu"), get(dish::admin_menu))
        // Translations and data quality
        .route(
            &at("/translations/bulk-update"),
            post(translation::bulk_update),
        )
        .route(&at("/translations/stats"), get(translation::stats))
        .route(&at("/quality"), get(quality::report))
        // Signed-in account and suggestion helpers
        .route(
            "/api/admin/profile",
            get(account::get_profile).put(account::update_profile),
        )
        .route("/api/admin/change-password", put(account::change_password))
        .route("/api/admin/allergens/suggest", get(allergen::suggest))
        .route("/api/admin/translations/suggest", get(translation::suggest))
        .layer(middleware::from_fn_with_state(state, tenant_auth_middleware))
}
