use std::sync::Arc;

use async_trait::async_trait;

use courselib_auth::UserRepository;
use courselib_core::UserId;

use crate::request::impl_query;
use crate::{DispatchError, Handler, UserDto};

#[derive(Debug, Clone)]
pub struct GetUser {
    pub id: UserId,
}

impl_query!(GetUser => UserDto, "accounts.get_user");

#[derive(Debug, Clone, Default)]
pub struct GetUsers;

impl_query!(GetUsers => Vec<UserDto>, "accounts.get_users");

pub struct GetUserHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUserHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler<GetUser> for GetUserHandler {
    async fn handle(&self, query: GetUser) -> Result<UserDto, DispatchError> {
        match self.users.find(&query.id).await? {
            Some(user) => Ok(UserDto::from(&user)),
            None => Err(DispatchError::not_found("user", query.id)),
        }
    }
}

pub struct GetUsersHandler {
    users: Arc<dyn UserRepository>,
}

impl GetUsersHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }
}

#[async_trait]
impl Handler<GetUsers> for GetUsersHandler {
    async fn handle(&self, _query: GetUsers) -> Result<Vec<UserDto>, DispatchError> {
        let users = self.users.list().await?;
        Ok(users.iter().map(UserDto::from).collect())
    }
}
