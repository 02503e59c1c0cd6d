//! User Model

use serde::{Deserialize, Serialize};

use super::restaurant::Restaurant;

/// Staff role within a restaurant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    #[default]
    Owner,
    Manager,
    Staff,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "OWNER",
            Self::Manager => "MANAGER",
            Self::Staff => "STAFF",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "OWNER" => Some(Self::Owner),
            "MANAGER" => Some(Self::Manager),
            "STAFF" => Some(Self::Staff),
            _ => None,
        }
    }

    /// Owners and managers may change restaurant settings
    pub fn can_manage_settings(&self) -> bool {
        matches!(self, Self::Owner | Self::Manager)
    }
}

/// User entity (password hash never serialized)
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub restaurant_id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub is_active: bool,
    pub created_at: i64,
}

/// Signup: creates a restaurant and its owner account
#[derive(Debug, Clone, Deserialize)]
pub struct SignupRequest {
    pub restaurant_name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub default_language: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
    pub restaurant: Restaurant,
}

/// The signed-in staff member with their restaurant
#[derive(Debug, Clone, Serialize)]
pub struct StaffProfile {
    pub user: User,
    pub restaurant: Restaurant,
}

/// Account settings edit; absent fields are left unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub email: Option<String>,
    #[serde(alias = "restaurantName")]
    pub restaurant_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(alias = "currentPassword")]
    pub current_password: String,
    #[serde(alias = "newPassword")]
    pub new_password: String,
}
