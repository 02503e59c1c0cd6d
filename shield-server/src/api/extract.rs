//! JSON request bodies that reject with an `AppError` body
//!
//! axum's own `Json` rejects with plain text. [`ApiJson`] decodes to a
//! `serde_json::Value` first so payload problems that have their own error
//! code (malformed translations) are reported with it, then deserializes
//! the target type.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::error::AppError;
use shared::menu::{LanguageSettings, Translations};
use shared::models::{
    CategoryCreate, CategoryUpdate, ChangePasswordRequest, DishCreate, DishUpdate,
    IngredientCreate, IngredientUpdate, LoginRequest, ProfileUpdate, RestaurantUpdate,
    SignupRequest,
};

/// A request body type
pub trait RequestBody: DeserializeOwned {
    /// Reject parts of the raw payload that need a specific error code
    fn check_raw(_raw: &Value) -> Result<(), AppError> {
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: RequestBody,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::validation(rejection.body_text()))?;
        T::check_raw(&raw)?;
        serde_json::from_value(raw)
            .map(ApiJson)
            .map_err(|e| AppError::validation(format!("Invalid request body: {e}")))
    }
}

/// Decode a `translations` value strictly
pub(crate) fn check_translations(raw: Option<&Value>) -> Result<(), AppError> {
    match raw {
        Some(value) => Translations::from_value(value.clone())
            .map(drop)
            .map_err(AppError::from),
        None => Ok(()),
    }
}

/// Bodies whose only translations live in a top-level `translations` field
macro_rules! with_translations_field {
    ($($ty:ty),* $(,)?) => {
        $(
            impl RequestBody for $ty {
                fn check_raw(raw: &Value) -> Result<(), AppError> {
                    check_translations(raw.get("translations"))
                }
            }
        )*
    };
}

with_translations_field!(
    CategoryCreate,
    CategoryUpdate,
    IngredientCreate,
    IngredientUpdate,
    DishCreate,
    DishUpdate,
);

impl RequestBody for Translations {
    fn check_raw(raw: &Value) -> Result<(), AppError> {
        check_translations(Some(raw))
    }
}

impl RequestBody for SignupRequest {}
impl RequestBody for LoginRequest {}
impl RequestBody for RestaurantUpdate {}
impl RequestBody for LanguageSettings {}
impl RequestBody for ChangePasswordRequest {}
impl RequestBody for ProfileUpdate {}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use shared::error::ErrorCode;

    pub(crate) async fn extract<T: RequestBody>(body: &str) -> Result<T, AppError> {
        let req = Request::builder()
            .method("PUT")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        ApiJson::<T>::from_request(req, &()).await.map(|ApiJson(v)| v)
    }

    #[tokio::test]
    async fn malformed_translations_get_their_own_code() {
        let err = extract::<Translations>(r#"{"sv":"Ost"}"#).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTranslations);

        let err = extract::<DishUpdate>(r#"{"translations":[1,2]}"#)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidTranslations);
    }

    #[tokio::test]
    async fn other_body_errors_are_validation_failures() {
        let err = extract::<LoginRequest>("{not json").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);

        let err = extract::<LoginRequest>(r#"{"email":"a@b.se"}"#)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn valid_bodies_decode() {
        let t = extract::<Translations>(r#"{"SV":{"name":"Ost"}}"#).await.unwrap();
        assert_eq!(t.languages(), vec!["sv"]);
        let update = extract::<DishUpdate>(r#"{"translations":null}"#).await.unwrap();
        assert!(update.translations.is_none_or(|t| t.is_empty()));
    }
}
