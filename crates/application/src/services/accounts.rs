//! Account service: sign-up, sign-in and password change.
//!
//! Sign-in returns a session token rather than a query payload, so the
//! transport calls it directly instead of going through the dispatcher.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;

use courselib_auth::{
    PasswordHash, PasswordHasher, Role, RoleSet, SessionToken, TokenIssuer, User, UserRepository, normalize_email,
    validate_password,
};
use courselib_core::UserId;

use crate::DispatchError;

#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenIssuer>,
    /// Verified against when the email is unknown, so both failures cost one hash.
    decoy: Option<PasswordHash>,
}

impl AccountService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenIssuer>,
    ) -> Self {
        let decoy = hasher.hash("decoy-password-never-matches").ok();
        Self {
            users,
            hasher,
            tokens,
            decoy,
        }
    }

    /// Create an account with the given roles and return its id.
    ///
    /// Callers decide the roles: anonymous sign-up always passes `{User}`,
    /// the startup admin seed passes `{Admin, User}`.
    pub async fn register(&self, email: &str, password: &str, roles: RoleSet) -> Result<UserId, DispatchError> {
        let email = normalize_email(email)?;
        validate_password("password", password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(DispatchError::Conflict(format!("email '{email}' is already registered")));
        }

        let hash = self.hasher.hash(password)?;
        let user = User::register(UserId::new(), &email, hash, roles, Utc::now())?;
        let id = user.id;
        self.users.insert(user).await?;

        tracing::info!(user_id = %id, "account registered");
        Ok(id)
    }

    /// Verify credentials and issue a session token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    pub async fn sign_in(&self, credentials: Credentials) -> Result<SessionToken, DispatchError> {
        let user = match normalize_email(&credentials.email) {
            Ok(email) => self.users.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            if let Some(decoy) = &self.decoy {
                let _ = self.hasher.verify(&credentials.password, decoy);
            }
            tracing::info!("sign-in rejected");
            return Err(DispatchError::InvalidCredentials);
        };
        if !self.hasher.verify(&credentials.password, &user.password_hash) {
            tracing::info!(user_id = %user.id, "sign-in rejected");
            return Err(DispatchError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user.identity(), Utc::now())?;
        tracing::info!(user_id = %user.id, "signed in");
        Ok(token)
    }

    /// Replace the password of `user_id` after checking the current one.
    ///
    /// Nothing is written unless `current_password` verifies.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), DispatchError> {
        let Some(mut user) = self.users.find(&user_id).await? else {
            return Err(DispatchError::InvalidCredentials);
        };
        if !self.hasher.verify(current_password, &user.password_hash) {
            tracing::info!(user_id = %user_id, "password change rejected");
            return Err(DispatchError::InvalidCredentials);
        }
        validate_password("new_password", new_password)?;

        let hash = self.hasher.hash(new_password)?;
        user.change_password(hash, Utc::now());
        self.users.save(user).await?;

        tracing::info!(user_id = %user_id, "password changed");
        Ok(())
    }

    /// Create the configured administrator unless that email already exists.
    pub async fn ensure_admin(&self, email: &str, password: &str) -> Result<Option<UserId>, DispatchError> {
        let email = normalize_email(email)?;
        if self.users.find_by_email(&email).await?.is_some() {
            return Ok(None);
        }
        let id = self.register(&email, password, RoleSet::from([Role::Admin, Role::User])).await?;
        Ok(Some(id))
    }
}

impl core::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}
