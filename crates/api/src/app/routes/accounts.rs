use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, patch, post},
};

use courselib_application::DispatchError;
use courselib_application::commands::{ChangePassword, SignUp};
use courselib_application::queries::{GetUser, GetUsers};
use courselib_application::services::Credentials;
use courselib_core::UserId;

use crate::app::dto::{ChangePasswordRequest, CreatedResponse, ListResponse};
use crate::app::errors::dispatch_error_to_response;
use crate::app::services::AppServices;
use crate::context::CallerIdentity;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/sign-up", post(sign_up))
        .route("/sign-in", post(sign_in))
        .route("/me/change-password", patch(change_password))
        .route("/:id", get(get_user))
}

pub async fn get_user(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match id.parse::<UserId>() {
        Ok(id) => id,
        Err(e) => return dispatch_error_to_response(e.into()),
    };

    match services.dispatcher.query(GetUser { id }, caller.identity()).await {
        Ok(user) => Json(user).into_response(),
        Err(e) => dispatch_error_to_response(e),
    }
}

pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerIdentity>,
) -> axum::response::Response {
    match services.dispatcher.query(GetUsers, caller.identity()).await {
        Ok(items) => Json(ListResponse { items }).into_response(),
        Err(e) => dispatch_error_to_response(e),
    }
}

pub async fn sign_up(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerIdentity>,
    Json(body): Json<SignUp>,
) -> axum::response::Response {
    match services.dispatcher.send(body, caller.identity()).await {
        Ok(id) => (
            StatusCode::CREATED,
            [(header::LOCATION, format!("/accounts/{id}"))],
            Json(CreatedResponse { id }),
        )
            .into_response(),
        Err(e) => dispatch_error_to_response(e),
    }
}

/// Exchange credentials for a session token. Not a dispatched request.
pub async fn sign_in(
    Extension(services): Extension<Arc<AppServices>>,
    Json(credentials): Json<Credentials>,
) -> axum::response::Response {
    match services.accounts.sign_in(credentials).await {
        Ok(token) => Json(token).into_response(),
        Err(e) => dispatch_error_to_response(e),
    }
}

pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerIdentity>,
    Json(body): Json<ChangePasswordRequest>,
) -> axum::response::Response {
    // The target account is always the caller; the body cannot name another user.
    let Some(user_id) = caller.user_id() else {
        return dispatch_error_to_response(DispatchError::Unauthenticated);
    };

    let command = ChangePassword {
        user_id,
        current_password: body.current_password,
        new_password: body.new_password,
    };

    match services.dispatcher.send(command, caller.identity()).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => dispatch_error_to_response(e),
    }
}
