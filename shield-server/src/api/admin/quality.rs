use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::menu::MenuContext;
use shared::menu::quality::{
    QualityReport, untagged_dishes, untagged_ingredients, untranslated_report,
};

use crate::api::ApiResult;
use crate::auth::StaffIdentity;
use crate::db;
use crate::state::AppState;

use super::verify_restaurant;

/// GET …/quality: untranslated and untagged content
pub async fn report(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(rid): Path<i64>,
) -> ApiResult<QualityReport> {
    verify_restaurant(&identity, rid)?;
    let restaurant = db::restaurants::get(&state.pool, rid).await?;
    let markers = db::quality::content_markers(&state.pool, rid).await?;
    let categories = db::categories::list(&state.pool, rid).await?;
    let ingredients = db::ingredients::list(&state.pool, rid).await?;
    let dishes = db::dishes::list(&state.pool, rid).await?;

    let ctx = MenuContext::new(&restaurant, None, &categories, &ingredients);
    Ok(Json(QualityReport {
        untranslated: untranslated_report(markers),
        untagged_dishes: untagged_dishes(&dishes, &ctx),
        untagged_ingredients: untagged_ingredients(&ingredients, rid),
    }))
}
