use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use courselib_application::DispatchError;

use crate::app::errors;
use crate::context::CallerIdentity;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(Extension(caller): Extension<CallerIdentity>) -> axum::response::Response {
    let Some(user_id) = caller.user_id() else {
        return errors::dispatch_error_to_response(DispatchError::Unauthenticated);
    };

    Json(serde_json::json!({
        "user_id": user_id.to_string(),
        "roles": caller.roles().iter().map(|r| r.as_str()).collect::<Vec<_>>(),
    }))
    .into_response()
}
