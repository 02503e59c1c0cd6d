//! API routes for shield-server

pub mod admin;
pub mod auth;
pub mod extract;
pub mod health;
pub mod public;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use shared::error::AppError;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Requests handled at once; further requests wait for a slot
const MAX_IN_FLIGHT_REQUESTS: usize = 512;

/// Create the combined router
pub fn create_router(state: AppState, cors_origin: &str) -> Router {
    // Guest menu and short links (no auth)
    let public = Router::new()
        .route("/api/restaurants/{slug}", get(public::get_restaurant))
        .route("/api/restaurants/{slug}/menu", get(public::get_menu))
        .route(
            "/api/allergens/translations",
            get(public::allergen_translations),
        )
        .route("/m/{slug}", get(public::short_link));

    // Staff signup/login (no auth)
    let auth = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(public)
        .merge(auth)
        .merge(admin::router(state.clone()))
        .layer(cors_layer(cors_origin))
        .layer(ConcurrencyLimitLayer::new(MAX_IN_FLIGHT_REQUESTS))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = match HeaderValue::from_str(origin) {
        Ok(value) if origin != "*" => AllowOrigin::exact(value),
        _ => AllowOrigin::any(),
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
