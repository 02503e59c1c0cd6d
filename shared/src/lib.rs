//! Shared types for MenuShield
//!
//! Error codes, data models and the pure menu pipeline (tag normalization,
//! allergen inference, translation fallback, menu assembly, quality checks)
//! used by the API server and its tests.

pub mod error;
pub mod menu;
pub mod models;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
