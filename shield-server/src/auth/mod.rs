//! Staff authentication for the admin API

pub mod tenant_auth;

pub use tenant_auth::{StaffIdentity, create_token, tenant_auth_middleware};
