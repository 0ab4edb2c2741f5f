use axum::{Router, routing::get};

pub mod accounts;
pub mod courses;
pub mod system;

/// Router for every endpoint behind the auth middleware.
///
/// Routes do not check roles themselves; the dispatcher does that per request.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/accounts", accounts::router())
        .nest("/courses", courses::router())
}
