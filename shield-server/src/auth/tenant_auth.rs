//! Staff JWT authentication for the admin API
//!
//! Tokens carry the user's restaurant, so every admin route can check the
//! restaurant in its path against the caller without a database read.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{User, UserRole};

use crate::state::AppState;

/// JWT claims for staff authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct StaffClaims {
    /// User ID
    pub sub: String,
    /// Restaurant the user belongs to
    pub restaurant_id: i64,
    pub email: String,
    pub role: UserRole,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated staff identity extracted from JWT
#[derive(Debug, Clone)]
pub struct StaffIdentity {
    pub user_id: i64,
    pub restaurant_id: i64,
    pub email: String,
    pub role: UserRole,
}

impl StaffIdentity {
    /// Restaurant-wide settings are owner/manager only
    pub fn require_settings_access(&self) -> Result<(), AppError> {
        if self.role.can_manage_settings() {
            Ok(())
        } else {
            Err(AppError::new(ErrorCode::RoleRequired).with_detail("role", self.role.as_str()))
        }
    }
}

/// Create a JWT token for a staff user
pub fn create_token(
    user: &User,
    secret: &str,
    expiry_hours: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = StaffClaims {
        sub: user.id.to_string(),
        restaurant_id: user.restaurant_id,
        email: user.email.clone(),
        role: user.role,
        exp: (now + chrono::Duration::hours(expiry_hours)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and validate a token
pub fn decode_token(token: &str, secret: &str) -> Result<StaffIdentity, AppError> {
    let token_data = jsonwebtoken::decode::<StaffClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            ErrorKind::ExpiredSignature => AppError::token_expired(),
            _ => AppError::new(ErrorCode::TokenInvalid),
        }
    })?;

    let claims = token_data.claims;
    let user_id = claims
        .sub
        .parse()
        .map_err(|_| AppError::new(ErrorCode::TokenInvalid))?;

    Ok(StaffIdentity {
        user_id,
        restaurant_id: claims.restaurant_id,
        email: claims.email,
        role: claims.role,
    })
}

/// Middleware that extracts and verifies the staff JWT from the Authorization header
pub async fn tenant_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(AppError::not_authenticated)?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::invalid_token("Invalid Authorization format"))?;

    let identity = decode_token(token, &state.jwt_secret)?;
    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}
