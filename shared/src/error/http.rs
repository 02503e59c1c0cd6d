//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // 404 Not Found
            Self::RestaurantNotFound
            | Self::DishNotFound
            | Self::CategoryNotFound
            | Self::IngredientNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict (referential guards and uniqueness)
            Self::EmailTaken
            | Self::SlugTaken
            | Self::CategoryInUse
            | Self::IngredientHasChildren => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::RoleRequired
            | Self::RestaurantInactive
            | Self::TenantAccessDenied => StatusCode::FORBIDDEN,

            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request
            Self::ValidationFailed
            | Self::PasswordTooShort
            | Self::InvalidSlug
            | Self::LanguageNotSupported
            | Self::DefaultLanguageNotSupported
            | Self::DishInvalidPrice
            | Self::IngredientParentInvalid
            | Self::InvalidTranslations => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::DishNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ErrorCode::IngredientNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::RestaurantNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_referential_guards_conflict() {
        assert_eq!(
            ErrorCode::IngredientHasChildren.http_status(),
            StatusCode::CONFLICT
        );
        assert_eq!(ErrorCode::CategoryInUse.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::SlugTaken.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_auth_status() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TokenExpired.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TenantAccessDenied.http_status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ErrorCode::RestaurantInactive.http_status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn test_internal_and_bad_request_status() {
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidTranslations.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::DefaultLanguageNotSupported.http_status(),
            StatusCode::BAD_REQUEST
        );
    }
}
