//! Data models
//!
//! Shared between shield-server and the frontends (via API).
//! All IDs are `i64` snowflakes. Tag lists, component lists and
//! translations are decoded at the storage boundary, so these types only
//! ever carry normalized values.

pub mod allergen;
pub mod category;
pub mod dish;
pub mod ingredient;
pub mod restaurant;
pub mod user;

// Re-exports
pub use allergen::*;
pub use category::*;
pub use dish::*;
pub use ingredient::*;
pub use restaurant::*;
pub use user::*;
