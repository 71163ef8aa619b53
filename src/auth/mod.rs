//! Role-gated authorization for admin endpoints.
//!
//! Callers present an opaque role marker in a request header; the marker is
//! normalized case-insensitively against an injected [`RoleConfig`] and
//! resolved once per request into a [`RoleContext`]. Anything absent or
//! unrecognized is `Role::None`, and the gates fail closed.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts, http::HeaderMap};
use std::collections::HashMap;
use std::convert::Infallible;

use crate::errors::ServiceError;
use crate::AppState;

/// Privilege tiers in ascending order. `Admin` and `Owner` are equivalent for
/// order settlement; only catalog management distinguishes them from
/// `OrdersAdmin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    None,
    OrdersAdmin,
    Admin,
    Owner,
}

/// Mapping from lower-cased role markers to roles, plus the header the marker
/// travels in. Lives in `AppState` and is threaded to handlers through the
/// extractor rather than read from any global.
#[derive(Clone, Debug)]
pub struct RoleConfig {
    header_name: String,
    markers: HashMap<String, Role>,
}

impl RoleConfig {
    pub fn new(header_name: impl Into<String>) -> Self {
        let mut markers = HashMap::new();
        markers.insert("owner".to_string(), Role::Owner);
        markers.insert("admin".to_string(), Role::Admin);
        markers.insert("ordersadmin".to_string(), Role::OrdersAdmin);
        Self {
            header_name: header_name.into(),
            markers,
        }
    }

    /// Registers an additional marker, normalized to lower case.
    pub fn with_marker(mut self, marker: impl AsRef<str>, role: Role) -> Self {
        self.markers
            .insert(marker.as_ref().to_ascii_lowercase(), role);
        self
    }

    pub fn header_name(&self) -> &str {
        &self.header_name
    }

    /// Normalizes a raw marker value. Unknown or missing markers resolve to
    /// `Role::None`, never an error.
    pub fn resolve(&self, marker: Option<&str>) -> Role {
        marker
            .map(|m| m.trim().to_ascii_lowercase())
            .and_then(|m| self.markers.get(&m).copied())
            .unwrap_or(Role::None)
    }

    pub fn resolve_headers(&self, headers: &HeaderMap) -> Role {
        let marker = headers
            .get(&self.header_name)
            .and_then(|value| value.to_str().ok());
        self.resolve(marker)
    }
}

impl Default for RoleConfig {
    fn default() -> Self {
        Self::new("x-admin-role")
    }
}

/// Per-request role resolution, extracted before the handler body runs.
#[derive(Debug, Clone, Copy)]
pub struct RoleContext {
    pub role: Role,
}

impl RoleContext {
    pub fn require_orders_admin(&self) -> Result<(), ServiceError> {
        if self.role >= Role::OrdersAdmin {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(
                "Orders admin access required.".to_string(),
            ))
        }
    }

    pub fn require_full_admin(&self) -> Result<(), ServiceError> {
        if self.role >= Role::Admin {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(
                "Full admin access required.".to_string(),
            ))
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for RoleContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let role = state.roles.resolve_headers(&parts.headers);
        Ok(RoleContext { role })
    }
}
