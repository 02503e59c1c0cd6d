//! Menu content pipeline
//!
//! stored record → [`tags`] → [`translation`] → [`assembly`] → JSON.
//! [`allergens`] feeds repair/backfill, [`templates`] suggests translations
//! and [`quality`] feeds back-office reports. Everything here is pure and
//! safe to call from any handler, job or test without request context.

pub mod allergens;
pub mod assembly;
pub mod language;
pub mod quality;
pub mod tags;
pub mod templates;
pub mod translation;

pub use allergens::{canonical_allergen, infer_allergens};
pub use assembly::{GuestFilter, MenuContext};
pub use language::LanguageSettings;
pub use tags::RawTags;
pub use translation::{TranslatedField, Translatable, Translations, resolve, resolve_all};
