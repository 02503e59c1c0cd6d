//! Input validation helpers
//!
//! Text length limits and payload checks shared by the admin and auth
//! handlers. SQLite TEXT has no built-in length enforcement.

use shared::error::{AppError, ErrorCode};
use shared::menu::language::is_supported_language;
use shared::menu::Translations;
use shared::util::is_valid_slug;

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: restaurant, dish, ingredient, category
pub const MAX_NAME_LEN: usize = 200;

/// Descriptions and modification notes
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: slug, color codes, icon names
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

pub const MIN_PASSWORD_LEN: usize = 6;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty")));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN})"
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    validate_required_text(email, "email", MAX_EMAIL_LEN)?;
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AppError::validation("email is not a valid address"));
    }
    Ok(())
}

pub fn validate_slug(slug: &str) -> Result<(), AppError> {
    if slug.len() > MAX_SHORT_TEXT_LEN || !is_valid_slug(slug) {
        return Err(AppError::new(ErrorCode::InvalidSlug).with_detail("slug", slug));
    }
    Ok(())
}

/// Prices must be finite and non-negative
pub fn validate_price(price: f64) -> Result<(), AppError> {
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::new(ErrorCode::DishInvalidPrice));
    }
    Ok(())
}

/// Every language key must be a known code and every value within limits
pub fn validate_translations(translations: &Translations) -> Result<(), AppError> {
    for (language, entry) in translations.iter() {
        if !is_supported_language(language) {
            return Err(AppError::new(ErrorCode::LanguageNotSupported)
                .with_detail("language", language.as_str()));
        }
        validate_optional_text(&entry.name, "translated name", MAX_NAME_LEN)?;
        validate_optional_text(&entry.description, "translated description", MAX_NOTE_LEN)?;
        validate_optional_text(
            &entry.modification_note,
            "translated modification note",
            MAX_NOTE_LEN,
        )?;
    }
    Ok(())
}
