//! Role-based authorization policy.
//!
//! Every request type declares an [`Access`] requirement once at startup; the
//! policy below evaluates that declaration against the caller of a single
//! dispatch call. Evaluation is pure: no IO, no state, no panics.

use serde::Serialize;
use thiserror::Error;

use crate::{Identity, RoleSet};

/// Access requirement declared for a request type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "roles", rename_all = "snake_case")]
pub enum Access {
    /// No identity required; the caller is never consulted.
    Anonymous,
    /// Caller must hold at least one of these roles (inclusive OR).
    Roles(RoleSet),
}

impl Access {
    pub fn roles(roles: impl Into<RoleSet>) -> Self {
        Self::Roles(roles.into())
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Access::Anonymous)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationDecision {
    Allowed,
    Denied,
}

impl AuthorizationDecision {
    pub fn is_allowed(self) -> bool {
        self == AuthorizationDecision::Allowed
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("forbidden: requires one of [{required}]")]
    Forbidden { required: RoleSet },
}

/// `true` iff a caller holding `caller_roles` may issue a request declared as `declared`.
///
/// `None` means "no identity". An empty declared role set admits nobody.
pub fn is_allowed(declared: &Access, caller_roles: Option<&RoleSet>) -> bool {
    match declared {
        Access::Anonymous => true,
        Access::Roles(required) => caller_roles.is_some_and(|held| required.intersects(held)),
    }
}

pub fn decide(declared: &Access, identity: Option<&Identity>) -> AuthorizationDecision {
    if is_allowed(declared, identity.map(Identity::roles)) {
        AuthorizationDecision::Allowed
    } else {
        AuthorizationDecision::Denied
    }
}

/// Like [`decide`], but tells a missing identity apart from missing roles.
pub fn authorize(declared: &Access, identity: Option<&Identity>) -> Result<(), AuthzError> {
    let required = match declared {
        Access::Anonymous => return Ok(()),
        Access::Roles(required) => required,
    };

    let Some(identity) = identity else {
        return Err(AuthzError::Unauthenticated);
    };

    if required.intersects(identity.roles()) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden {
            required: required.clone(),
        })
    }
}
