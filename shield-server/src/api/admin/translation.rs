use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::error::{AppError, ErrorCode};
use shared::menu::language::is_supported_language;
use shared::menu::quality::{ContentKind, TranslationStats, translation_stats};
use shared::menu::templates::{TEMPLATE_LANGUAGES, TemplateSuggestion, suggest_translation};

use crate::api::ApiResult;
use crate::api::extract::{ApiJson, RequestBody, check_translations};
use crate::auth::StaffIdentity;
use crate::db::{self, TranslationUpdate};
use crate::state::AppState;
use crate::validation::{MAX_NAME_LEN, validate_required_text, validate_translations};

use super::verify_restaurant;

#[derive(Debug, Deserialize)]
pub struct BulkUpdateRequest {
    pub updates: Vec<TranslationUpdate>,
}

impl RequestBody for BulkUpdateRequest {
    fn check_raw(raw: &Value) -> Result<(), AppError> {
        let updates = raw.get("updates").and_then(Value::as_array);
        for update in updates.into_iter().flatten() {
            check_translations(update.get("translations"))?;
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct BulkUpdateResponse {
    pub updated: usize,
}

/// POST …/translations/bulk-update: all entries apply or none do
pub async fn bulk_update(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(rid): Path<i64>,
    ApiJson(req): ApiJson<BulkUpdateRequest>,
) -> ApiResult<BulkUpdateResponse> {
    verify_restaurant(&identity, rid)?;
    for update in &req.updates {
        validate_translations(&update.translations)?;
    }

    let updated = db::bulk_merge_translations(&state.pool, rid, req.updates).await?;
    tracing::info!(restaurant_id = rid, updated, "Bulk translation update applied");
    Ok(Json(BulkUpdateResponse { updated }))
}

/// GET …/translations/stats
pub async fn stats(
    State(state): State<AppState>,
    Extension(identity): Extension<StaffIdentity>,
    Path(rid): Path<i64>,
) -> ApiResult<TranslationStats> {
    verify_restaurant(&identity, rid)?;
    let restaurant = db::restaurants::get(&state.pool, rid).await?;
    let markers = db::quality::content_markers(&state.pool, rid).await?;
    let allergen_count = db::allergens::count(&state.pool).await?;

    Ok(Json(translation_stats(
        &markers,
        restaurant.supported_languages.len(),
        allergen_count,
    )))
}

#[derive(Debug, Deserialize)]
pub struct SuggestQuery {
    pub name: String,
    #[serde(default = "default_kind")]
    pub kind: ContentKind,
    pub lang: Option<String>,
}

fn default_kind() -> ContentKind {
    ContentKind::Dish
}

/// GET /api/admin/translations/suggest?name=&kind=&lang=
///
/// Without `lang`, one suggestion per language the templates cover.
pub async fn suggest(Query(query): Query<SuggestQuery>) -> ApiResult<Vec<TemplateSuggestion>> {
    validate_required_text(&query.name, "name", MAX_NAME_LEN)?;
    let languages: Vec<&str> = match query.lang.as_deref() {
        Some(lang) if !is_supported_language(lang) => {
            return Err(AppError::new(ErrorCode::LanguageNotSupported)
                .with_detail("language", lang.to_string()));
        }
        Some(lang) => vec![lang],
        None => TEMPLATE_LANGUAGES.to_vec(),
    };

    Ok(Json(
        languages
            .into_iter()
            .map(|lang| suggest_translation(query.kind, &query.name, lang))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::extract::tests::extract;

    #[tokio::test]
    async fn bulk_entries_with_malformed_translations_are_rejected() {
        let err = extract::<BulkUpdateRequest>(
            r#"{"updates":[{"kind":"dish","id":1,"translations":{"fi":"x"}}]}"#,
        )
        .await
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTranslations);
    }

    #[tokio::test]
    async fn suggest_covers_template_languages_by_default() {
        let query = SuggestQuery {
            name: "Grilled salmon".to_string(),
            kind: ContentKind::Dish,
            lang: None,
        };
        let Json(suggestions) = suggest(Query(query)).await.unwrap();
        let languages: Vec<_> = suggestions.iter().map(|s| s.language.as_str()).collect();
        assert_eq!(languages, vec!["fi", "sv"]);
        assert!(suggestions.iter().all(|s| s.matched));
    }

    #[tokio::test]
    async fn suggest_rejects_unknown_languages() {
        let query = SuggestQuery {
            name: "Soup".to_string(),
            kind: ContentKind::Dish,
            lang: Some("xx".to_string()),
        };
        let err = suggest(Query(query)).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::LanguageNotSupported);
    }
}
