//! shield-server: multi-tenant menu and allergen service
//!
//! - Guest menu API: translated dishes with allergen labels and avoid filters
//! - Back-office API (staff JWT): categories, ingredients, dishes, translations
//! - Data-quality reports for untranslated and untagged content

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod state;
pub mod util;
pub mod validation;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
