use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::{Value, json};

use courselib_application::DispatchError;

pub fn dispatch_error_to_response(err: DispatchError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        DispatchError::Unauthenticated => json_error(StatusCode::UNAUTHORIZED, "unauthenticated", message),
        DispatchError::Forbidden { .. } => json_error(StatusCode::FORBIDDEN, "forbidden", message),
        DispatchError::Validation(errors) => json_error_with_details(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "request validation failed",
            json!(errors),
        ),
        DispatchError::InvalidCredentials => json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", message),
        DispatchError::NotFound { .. } => json_error(StatusCode::NOT_FOUND, "not_found", message),
        DispatchError::Conflict(_) => json_error(StatusCode::CONFLICT, "conflict", message),
        DispatchError::HandlerNotFound { .. } | DispatchError::Internal(_) => {
            tracing::error!(error = %message, "request failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal server error")
        }
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> axum::response::Response {
    json_error_with_details(status, code, message, json!([]))
}

pub fn json_error_with_details(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
    details: Value,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
            "details": details,
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use courselib_auth::{Role, RoleSet};
    use courselib_core::ValidationErrors;

    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (DispatchError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (
                DispatchError::Forbidden {
                    request: "courses.create",
                    required: RoleSet::single(Role::Admin),
                },
                StatusCode::FORBIDDEN,
            ),
            (DispatchError::Validation(ValidationErrors::new()), StatusCode::BAD_REQUEST),
            (DispatchError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (DispatchError::not_found("course", "x"), StatusCode::NOT_FOUND),
            (DispatchError::Conflict("taken".into()), StatusCode::CONFLICT),
            (
                DispatchError::HandlerNotFound { request: "x" },
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (DispatchError::Internal("db down".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(dispatch_error_to_response(err).status(), status);
        }
    }
}
