use axum::{Json, extract::Query};
use serde::{Deserialize, Serialize};
use shared::menu::infer_allergens;

use crate::api::ApiResult;
use crate::validation::{MAX_NAME_LEN, validate_required_text};

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub name: String,
    pub allergen_tags: Vec<String>,
}

/// GET /api/admin/allergens/suggest?name=: keyword inference for a new item
pub async fn suggest(Query(query): Query<SuggestQuery>) -> ApiResult<SuggestResponse> {
    validate_required_text(&query.name, "name", MAX_NAME_LEN)?;
    Ok(Json(SuggestResponse {
        allergen_tags: infer_allergens(&query.name),
        name: query.name,
    }))
}
