//! Header-based access control.
//!
//! Callers identify themselves with the `x-username` and `x-password`
//! headers. The order system itself never sees credentials; handlers receive
//! an authenticated [`Principal`] and pass its username along.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::Serialize;

use crate::AppState;
use crate::error::ApiError;

pub const USERNAME_HEADER: &str = "x-username";
pub const PASSWORD_HEADER: &str = "x-password";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => f.write_str("ADMIN"),
            Role::User => f.write_str("USER"),
        }
    }
}

/// Resolves credentials to a role.
pub trait AccessControl: Send + Sync {
    /// Returns the caller's role, or `None` if the credentials are wrong.
    fn authenticate(&self, username: &str, password: &str) -> Option<Role>;
}

/// Fixed set of users held in memory.
#[derive(Debug, Default)]
pub struct InMemoryAccessControl {
    users: HashMap<String, (String, Role)>,
}

impl InMemoryAccessControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a user, replacing any existing user with the same name.
    pub fn with_user(mut self, username: &str, password: &str, role: Role) -> Self {
        self.users
            .insert(username.trim().to_string(), (password.to_string(), role));
        self
    }
}

impl AccessControl for InMemoryAccessControl {
    fn authenticate(&self, username: &str, password: &str) -> Option<Role> {
        self.users
            .get(username.trim())
            .filter(|(expected, _)| expected == password)
            .map(|(_, role)| *role)
    }
}

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub username: String,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

impl FromRequestParts<Arc<AppState>> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(principal.clone());
        }

        let header = |name: &str| parts.headers.get(name).and_then(|v| v.to_str().ok());
        let (Some(username), Some(password)) = (header(USERNAME_HEADER), header(PASSWORD_HEADER))
        else {
            return Err(ApiError::Unauthorized);
        };

        let username = username.trim().to_string();
        let Some(role) = state.access_control.authenticate(&username, password) else {
            metrics::counter!("auth_failures_total").increment(1);
            tracing::warn!(%username, uri = %parts.uri, "authentication failed");
            return Err(ApiError::Unauthorized);
        };

        let principal = Principal { username, role };
        parts.extensions.insert(principal.clone());
        Ok(principal)
    }
}

/// A caller with the admin role.
#[derive(Debug, Clone)]
pub struct Admin(pub Principal);

impl FromRequestParts<Arc<AppState>> for Admin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        if !principal.is_admin() {
            return Err(ApiError::Forbidden(Role::Admin));
        }
        Ok(Admin(principal))
    }
}

/// A caller with the user role, acting as a customer.
#[derive(Debug, Clone)]
pub struct Customer(pub Principal);

impl FromRequestParts<Arc<AppState>> for Customer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_request_parts(parts, state).await?;
        if principal.role != Role::User {
            return Err(ApiError::Forbidden(Role::User));
        }
        Ok(Customer(principal))
    }
}
