//! User account entity and its repository port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use courselib_core::{DomainError, DomainResult, Entity, Repository, RepositoryError, UserId};

use crate::{Identity, PasswordHash, Role, RoleSet};

// ─────────────────────────────────────────────────────────────────────────────
// User Account
// ─────────────────────────────────────────────────────────────────────────────

/// A registered account.
///
/// # Invariants
/// - `email` is trimmed, lowercased and unique across accounts.
/// - An account always holds at least one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: PasswordHash,
    pub roles: RoleSet,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn register(
        id: UserId,
        email: &str,
        password_hash: PasswordHash,
        roles: RoleSet,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let email = normalize_email(email)?;
        if roles.is_empty() {
            return Err(DomainError::validation("roles", "at least one role is required"));
        }

        Ok(Self {
            id,
            email,
            password_hash,
            roles,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(Role::Admin)
    }

    pub fn change_password(&mut self, password_hash: PasswordHash, now: DateTime<Utc>) {
        self.password_hash = password_hash;
        self.updated_at = now;
    }

    /// The identity a session token for this account is bound to.
    pub fn identity(&self) -> Identity {
        Identity::new(self.id, self.roles.clone())
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Trim + lowercase, then apply a basic shape check.
pub fn normalize_email(email: &str) -> DomainResult<String> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(email)
    } else {
        Err(DomainError::validation("email", "invalid email format"))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Repository
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait]
pub trait UserRepository: Repository<User> {
    /// Lookup by normalized email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError>;

    /// Insert a new account; `RepositoryError::Conflict` if the id or email is taken.
    async fn insert(&self, user: User) -> Result<(), RepositoryError>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn hash() -> PasswordHash {
        PasswordHash::from_encoded("pbkdf2-sha256$1$AAAA$AAAA")
    }

    #[test]
    fn register_normalizes_email() {
        let user = User::register(
            UserId::new(),
            "  Alice@Example.COM ",
            hash(),
            RoleSet::single(Role::User),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(user.email, "alice@example.com");
        assert!(!user.is_admin());
    }

    #[test]
    fn register_rejects_malformed_email() {
        for email in ["", "alice", "@example.com", "alice@", "a@b@c", "al ice@example.com"] {
            let result = User::register(UserId::new(), email, hash(), RoleSet::single(Role::User), Utc::now());
            assert!(
                matches!(result, Err(DomainError::Validation(_))),
                "accepted {email:?}"
            );
        }
    }

    #[test]
    fn register_requires_a_role() {
        let result = User::register(UserId::new(), "bob@example.com", hash(), RoleSet::new(), Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn identity_carries_id_and_roles() {
        let user = User::register(
            UserId::new(),
            "carol@example.com",
            hash(),
            RoleSet::from([Role::Admin, Role::User]),
            Utc::now(),
        )
        .unwrap();

        let identity = user.identity();
        assert_eq!(identity.user_id(), user.id);
        assert!(identity.has_role(Role::Admin));
    }
}
