//! Restaurant (tenant root) Model

use serde::{Deserialize, Serialize};

use crate::menu::language::LanguageSettings;

/// Subscription tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    #[default]
    Free,
    Premium,
    Enterprise,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Premium => "premium",
            Self::Enterprise => "enterprise",
        }
    }

    /// Unknown values read back as `Free`
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "premium" => Self::Premium,
            "enterprise" => Self::Enterprise,
            _ => Self::Free,
        }
    }
}

/// Restaurant entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub default_language: String,
    pub supported_languages: Vec<String>,
    pub is_active: bool,
    pub subscription_tier: SubscriptionTier,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Restaurant {
    pub fn language_settings(&self) -> LanguageSettings {
        LanguageSettings {
            default_language: self.default_language.clone(),
            supported_languages: self.supported_languages.clone(),
        }
    }
}

/// Guest-facing restaurant info
#[derive(Debug, Clone, Serialize)]
pub struct PublicRestaurant {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub default_language: String,
    pub supported_languages: Vec<String>,
}

impl From<Restaurant> for PublicRestaurant {
    fn from(r: Restaurant) -> Self {
        Self {
            id: r.id,
            slug: r.slug,
            name: r.name,
            description: r.description,
            default_language: r.default_language,
            supported_languages: r.supported_languages,
        }
    }
}

/// Update restaurant profile payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RestaurantUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
}
