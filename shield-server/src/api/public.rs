//! Guest-facing endpoints: restaurant info, menu, allergen names, short links
//!
//! Nothing here requires authentication; only active restaurants are served.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::menu::assembly::{
    GuestCategory, GuestDish, allergen_labels, assemble_guest_menu, guest_categories,
};
use shared::menu::{GuestFilter, MenuContext, canonical_allergen};
use shared::models::{AllergenLabel, AllergenTranslationMap, PublicRestaurant, Restaurant};

use crate::db;
use crate::state::AppState;

use super::ApiResult;

async fn active_restaurant(state: &AppState, slug: &str) -> Result<Restaurant, AppError> {
    let restaurant = db::restaurants::find_by_slug(&state.pool, slug)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::RestaurantNotFound).with_detail("slug", slug))?;
    if !restaurant.is_active {
        return Err(AppError::new(ErrorCode::RestaurantInactive));
    }
    Ok(restaurant)
}

/// GET /api/restaurants/{slug}
pub async fn get_restaurant(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<PublicRestaurant> {
    let restaurant = active_restaurant(&state, &slug).await?;
    Ok(Json(restaurant.into()))
}

#[derive(Debug, Default, Deserialize)]
pub struct MenuQuery {
    pub lang: Option<String>,
    /// Comma separated allergen keys
    pub avoid: Option<String>,
    #[serde(default)]
    pub hide_unsafe: bool,
}

impl MenuQuery {
    fn filter(&self) -> GuestFilter {
        let mut avoid: Vec<String> = Vec::new();
        for key in self.avoid.as_deref().unwrap_or_default().split(',') {
            let key = canonical_allergen(key);
            if !key.is_empty() && !avoid.contains(&key) {
                avoid.push(key);
            }
        }
        GuestFilter {
            avoid,
            hide_unsafe: self.hide_unsafe,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GuestMenu {
    pub restaurant: PublicRestaurant,
    /// Language actually rendered
    pub language: String,
    pub categories: Vec<GuestCategory>,
    pub dishes: Vec<GuestDish>,
    pub allergens: Vec<AllergenLabel>,
}

/// GET /api/restaurants/{slug}/menu?lang=&avoid=&hide_unsafe=
pub async fn get_menu(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<MenuQuery>,
) -> ApiResult<GuestMenu> {
    let restaurant = active_restaurant(&state, &slug).await?;

    let categories = db::categories::list(&state.pool, restaurant.id).await?;
    let ingredients = db::ingredients::list(&state.pool, restaurant.id).await?;
    let dishes = db::dishes::list(&state.pool, restaurant.id).await?;
    let allergen_translations = db::allergens::list(&state.pool).await?;

    let ctx = MenuContext::new(
        &restaurant,
        query.lang.as_deref(),
        &categories,
        &ingredients,
    );
    let dishes = assemble_guest_menu(&dishes, &ctx, &query.filter());
    let categories = guest_categories(&dishes, &ctx);
    let allergens = allergen_labels(&dishes, &allergen_translations, &ctx);
    let language = ctx.language.clone();

    Ok(Json(GuestMenu {
        restaurant: restaurant.into(),
        language,
        categories,
        dishes,
        allergens,
    }))
}

/// GET /api/allergens/translations
pub async fn allergen_translations(
    State(state): State<AppState>,
) -> ApiResult<AllergenTranslationMap> {
    Ok(Json(db::allergens::translation_map(&state.pool).await?))
}

/// GET /m/{slug}: short link printed on QR codes
pub async fn short_link(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Redirect, AppError> {
    let restaurant = active_restaurant(&state, &slug).await?;
    Ok(Redirect::temporary(&format!("/menu/{}", restaurant.slug)))
}
