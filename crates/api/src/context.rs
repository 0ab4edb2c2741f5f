use courselib_auth::{Identity, Role};
use courselib_core::UserId;

/// Caller identity for a request, set by the auth middleware.
///
/// `None` means no bearer token was presented; the dispatcher decides whether
/// the request may proceed anonymously.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity(Option<Identity>);

impl CallerIdentity {
    pub fn anonymous() -> Self {
        Self(None)
    }

    pub fn authenticated(identity: Identity) -> Self {
        Self(Some(identity))
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.0.as_ref()
    }

    pub fn user_id(&self) -> Option<UserId> {
        self.0.as_ref().map(Identity::user_id)
    }

    pub fn roles(&self) -> Vec<Role> {
        self.0
            .as_ref()
            .map(|i| i.roles().iter().collect())
            .unwrap_or_default()
    }
}
