use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use courselib_auth::{Role, RoleSet};
use courselib_core::UserId;

use crate::request::impl_command;
use crate::{AccountService, DispatchError, Handler};

/// Register a new account. Always grants the `user` role.
#[derive(Clone, Deserialize)]
pub struct SignUp {
    pub email: String,
    pub password: String,
}

impl core::fmt::Debug for SignUp {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SignUp").field("email", &self.email).finish_non_exhaustive()
    }
}

impl_command!(SignUp => UserId, "accounts.sign_up");

/// Change the password of `user_id`.
///
/// The transport sets `user_id` from the authenticated caller, never from input.
#[derive(Clone)]
pub struct ChangePassword {
    pub user_id: UserId,
    pub current_password: String,
    pub new_password: String,
}

impl core::fmt::Debug for ChangePassword {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ChangePassword")
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

impl_command!(ChangePassword => (), "accounts.change_password");

pub struct SignUpHandler {
    accounts: Arc<AccountService>,
}

impl SignUpHandler {
    pub fn new(accounts: Arc<AccountService>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl Handler<SignUp> for SignUpHandler {
    async fn handle(&self, command: SignUp) -> Result<UserId, DispatchError> {
        self.accounts
            .register(&command.email, &command.password, RoleSet::single(Role::User))
            .await
    }
}

pub struct ChangePasswordHandler {
    accounts: Arc<AccountService>,
}

impl ChangePasswordHandler {
    pub fn new(accounts: Arc<AccountService>) -> Self {
        Self { accounts }
    }
}

#[async_trait]
impl Handler<ChangePassword> for ChangePasswordHandler {
    async fn handle(&self, command: ChangePassword) -> Result<(), DispatchError> {
        self.accounts
            .change_password(command.user_id, &command.current_password, &command.new_password)
            .await
    }
}
