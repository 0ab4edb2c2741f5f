//! Startup wiring: the access table, the handlers, and the dispatcher over both.

use std::sync::Arc;

use courselib_auth::{Access, PasswordHasher, Role, TokenIssuer, UserRepository};
use courselib_core::{Course, Repository};

use crate::commands::{
    ChangePassword, ChangePasswordHandler, CreateCourse, CreateCourseHandler, DeleteCourse, DeleteCourseHandler,
    SignUp, SignUpHandler, UpdateCourse, UpdateCourseHandler,
};
use crate::queries::{
    GetCourse, GetCourseHandler, GetCourses, GetCoursesHandler, GetUser, GetUserHandler, GetUsers, GetUsersHandler,
};
use crate::{AccessTable, AccountService, Dispatcher, HandlerRegistry, RegistryError};

/// Storage and security collaborators the handlers are built from.
#[derive(Clone)]
pub struct Collaborators {
    pub users: Arc<dyn UserRepository>,
    pub courses: Arc<dyn Repository<Course>>,
    pub hasher: Arc<dyn PasswordHasher>,
    pub tokens: Arc<dyn TokenIssuer>,
}

fn admin_or_user() -> Access {
    Access::roles([Role::Admin, Role::User])
}

fn admin_only() -> Access {
    Access::roles([Role::Admin])
}

/// Who may issue each request. Every request type the API exposes is listed here.
pub fn access_table() -> Result<AccessTable, RegistryError> {
    Ok(AccessTable::builder()
        .declare::<SignUp>(Access::Anonymous)?
        .declare::<ChangePassword>(admin_or_user())?
        .declare::<GetUser>(admin_or_user())?
        .declare::<GetUsers>(admin_or_user())?
        .declare::<CreateCourse>(admin_only())?
        .declare::<UpdateCourse>(admin_only())?
        .declare::<DeleteCourse>(admin_only())?
        .declare::<GetCourse>(Access::Anonymous)?
        .declare::<GetCourses>(Access::Anonymous)?
        .build())
}

/// Build the dispatcher and the account service it shares with sign-in.
pub fn build_dispatcher(collaborators: Collaborators) -> Result<(Dispatcher, Arc<AccountService>), RegistryError> {
    let Collaborators {
        users,
        courses,
        hasher,
        tokens,
    } = collaborators;

    let accounts = Arc::new(AccountService::new(users.clone(), hasher, tokens));

    let handlers = HandlerRegistry::builder()
        .register::<SignUp, _>(SignUpHandler::new(accounts.clone()))?
        .register::<ChangePassword, _>(ChangePasswordHandler::new(accounts.clone()))?
        .register::<GetUser, _>(GetUserHandler::new(users.clone()))?
        .register::<GetUsers, _>(GetUsersHandler::new(users))?
        .register::<CreateCourse, _>(CreateCourseHandler::new(courses.clone()))?
        .register::<UpdateCourse, _>(UpdateCourseHandler::new(courses.clone()))?
        .register::<DeleteCourse, _>(DeleteCourseHandler::new(courses.clone()))?
        .register::<GetCourse, _>(GetCourseHandler::new(courses.clone()))?
        .register::<GetCourses, _>(GetCoursesHandler::new(courses))?
        .build();

    let dispatcher = Dispatcher::new(access_table()?, handlers)?;
    tracing::info!(requests = dispatcher.access().len(), "dispatcher ready");
    Ok((dispatcher, accounts))
}
