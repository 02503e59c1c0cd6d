//! Numeric error codes returned in every error body
//!
//! The admin and guest frontends switch on these, so a code keeps its number
//! once released. Ranges: 0xxx general, 1xxx auth, 2xxx permission,
//! 3xxx tenant, 6xxx catalog, 9xxx system.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Serialized as a bare `u16`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Validation failed
    ValidationFailed = 2,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Password too short
    PasswordTooShort = 1005,
    /// Email already registered
    EmailTaken = 1006,
    /// Account is disabled
    AccountDisabled = 1007,

    // ==================== 2xxx: Permission ====================
    /// Specific role required
    RoleRequired = 2002,

    // ==================== 3xxx: Tenant ====================
    /// Restaurant not found
    RestaurantNotFound = 3002,
    /// Restaurant is deactivated
    RestaurantInactive = 3003,
    /// Slug is not URL-safe
    InvalidSlug = 3004,
    /// Slug already in use
    SlugTaken = 3005,
    /// Language code is not supported
    LanguageNotSupported = 3006,
    /// Default language missing from supported languages
    DefaultLanguageNotSupported = 3007,
    /// Resource belongs to another restaurant
    TenantAccessDenied = 3008,

    // ==================== 6xxx: Catalog ====================
    /// Dish not found
    DishNotFound = 6001,
    /// Dish has invalid price
    DishInvalidPrice = 6002,
    /// Category not found
    CategoryNotFound = 6101,
    /// Category is referenced by ingredients or dishes
    CategoryInUse = 6102,
    /// Ingredient not found
    IngredientNotFound = 6201,
    /// Ingredient has child ingredients
    IngredientHasChildren = 6202,
    /// Ingredient parent is invalid (self, cycle or foreign)
    IngredientParentInvalid = 6203,
    /// Translations payload is malformed
    InvalidTranslations = 6301,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::ValidationFailed => "Validation failed",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::PasswordTooShort => "Password must be at least 6 characters",
            ErrorCode::EmailTaken => "Email is already registered",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::RoleRequired => "Specific role is required",

            // Tenant
            ErrorCode::RestaurantNotFound => "Restaurant not found",
            ErrorCode::RestaurantInactive => "Restaurant is not active",
            ErrorCode::InvalidSlug => "Restaurant slug is not URL-safe",
            ErrorCode::SlugTaken => "Restaurant slug is already taken",
            ErrorCode::LanguageNotSupported => "Language is not supported",
            ErrorCode::DefaultLanguageNotSupported => {
                "Default language must be one of the supported languages"
            }
            ErrorCode::TenantAccessDenied => "Access to another restaurant's data is denied",

            // Catalog
            ErrorCode::DishNotFound => "Dish not found",
            ErrorCode::DishInvalidPrice => "Dish has invalid price",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::CategoryInUse => "Category is in use",
            ErrorCode::IngredientNotFound => "Ingredient not found",
            ErrorCode::IngredientHasChildren => "Ingredient has child ingredients",
            ErrorCode::IngredientParentInvalid => "Invalid parent ingredient",
            ErrorCode::InvalidTranslations => "Invalid translations format",

            // System
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            2 => Ok(ErrorCode::ValidationFailed),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::PasswordTooShort),
            1006 => Ok(ErrorCode::EmailTaken),
            1007 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2002 => Ok(ErrorCode::RoleRequired),

            // Tenant
            3002 => Ok(ErrorCode::RestaurantNotFound),
            3003 => Ok(ErrorCode::RestaurantInactive),
            3004 => Ok(ErrorCode::InvalidSlug),
            3005 => Ok(ErrorCode::SlugTaken),
            3006 => Ok(ErrorCode::LanguageNotSupported),
            3007 => Ok(ErrorCode::DefaultLanguageNotSupported),
            3008 => Ok(ErrorCode::TenantAccessDenied),

            // Catalog
            6001 => Ok(ErrorCode::DishNotFound),
            6002 => Ok(ErrorCode::DishInvalidPrice),
            6101 => Ok(ErrorCode::CategoryNotFound),
            6102 => Ok(ErrorCode::CategoryInUse),
            6201 => Ok(ErrorCode::IngredientNotFound),
            6202 => Ok(ErrorCode::IngredientHasChildren),
            6203 => Ok(ErrorCode::IngredientParentInvalid),
            6301 => Ok(ErrorCode::InvalidTranslations),

            // System
            9001 => Ok(ErrorCode::InternalError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
