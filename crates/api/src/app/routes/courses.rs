use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::get,
};

use courselib_application::DispatchError;
use courselib_application::commands::DeleteCourse;
use courselib_application::queries::{GetCourse, GetCourses};
use courselib_core::CourseId;

use crate::app::dto::{CourseRequest, CreatedResponse, ListResponse};
use crate::app::errors::dispatch_error_to_response;
use crate::app::services::AppServices;
use crate::context::CallerIdentity;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_courses).post(create_course))
        .route("/:id", get(get_course).put(update_course).delete(delete_course))
}

fn parse_id(raw: &str) -> Result<CourseId, axum::response::Response> {
    raw.parse::<CourseId>()
        .map_err(|e| dispatch_error_to_response(DispatchError::from(e)))
}

pub async fn list_courses(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerIdentity>,
) -> axum::response::Response {
    match services.dispatcher.query(GetCourses, caller.identity()).await {
        Ok(items) => Json(ListResponse { items }).into_response(),
        Err(e) => dispatch_error_to_response(e),
    }
}

pub async fn get_course(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.dispatcher.query(GetCourse { id }, caller.identity()).await {
        Ok(course) => Json(course).into_response(),
        Err(e) => dispatch_error_to_response(e),
    }
}

pub async fn create_course(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerIdentity>,
    Json(body): Json<CourseRequest>,
) -> axum::response::Response {
    match services.dispatcher.send(body.into_create(), caller.identity()).await {
        Ok(id) => (
            StatusCode::CREATED,
            [(header::LOCATION, format!("/courses/{id}"))],
            Json(CreatedResponse { id }),
        )
            .into_response(),
        Err(e) => dispatch_error_to_response(e),
    }
}

pub async fn update_course(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
    Json(body): Json<CourseRequest>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.dispatcher.send(body.into_update(id), caller.identity()).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => dispatch_error_to_response(e),
    }
}

pub async fn delete_course(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerIdentity>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.dispatcher.send(DeleteCourse { id }, caller.identity()).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => dispatch_error_to_response(e),
    }
}
