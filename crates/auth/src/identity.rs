use serde::{Deserialize, Serialize};

use courselib_core::UserId;

use crate::{Role, RoleSet};

/// Authenticated caller for one dispatch call (user id + role set).
///
/// Built by the transport boundary per request and dropped with it. An
/// anonymous caller is represented by the absence of an `Identity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    user_id: UserId,
    roles: RoleSet,
}

impl Identity {
    pub fn new(user_id: UserId, roles: impl Into<RoleSet>) -> Self {
        Self {
            user_id,
            roles: roles.into(),
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn roles(&self) -> &RoleSet {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }
}
