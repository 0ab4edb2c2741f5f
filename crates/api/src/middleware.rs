use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use chrono::Utc;

use courselib_auth::JwtValidator;

use crate::app::errors::json_error;
use crate::context::CallerIdentity;

#[derive(Clone)]
pub struct AuthState {
    pub jwt: Arc<dyn JwtValidator>,
}

/// Resolve the caller from an optional `Authorization: Bearer` header.
///
/// No header: the request continues as anonymous. A header that is malformed,
/// badly signed, or expired is rejected with 401 before any route runs.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let caller = match extract_bearer(req.headers()) {
        Ok(None) => CallerIdentity::anonymous(),
        Ok(Some(token)) => match state.jwt.validate(token, Utc::now()) {
            Ok(claims) => CallerIdentity::authenticated(claims.identity()),
            Err(e) => {
                tracing::debug!(error = %e, "bearer token rejected");
                return unauthenticated("invalid or expired token");
            }
        },
        Err(reason) => return unauthenticated(reason),
    };

    req.extensions_mut().insert(caller);
    next.run(req).await
}

fn unauthenticated(message: &str) -> Response {
    json_error(StatusCode::UNAUTHORIZED, "unauthenticated", message)
}

fn extract_bearer(headers: &HeaderMap) -> Result<Option<&str>, &'static str> {
    let Some(header) = headers.get(axum::http::header::AUTHORIZATION) else {
        return Ok(None);
    };

    let header = header.to_str().map_err(|_| "malformed authorization header")?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or("authorization scheme must be Bearer")?
        .trim();

    if token.is_empty() {
        return Err("empty bearer token");
    }
    Ok(Some(token))
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(axum::http::header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_anonymous() {
        assert_eq!(extract_bearer(&HeaderMap::new()), Ok(None));
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(extract_bearer(&headers("Bearer abc.def.ghi")), Ok(Some("abc.def.ghi")));
    }

    #[test]
    fn other_schemes_and_empty_tokens_are_rejected() {
        assert!(extract_bearer(&headers("Basic dXNlcjpwYXNz")).is_err());
        assert!(extract_bearer(&headers("Bearer    ")).is_err());
    }
}
