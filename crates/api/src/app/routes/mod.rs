use axum::Router;

pub mod admin;
pub mod employees;
pub mod projects;
pub mod system;

/// Router for every admin, employee and project endpoint.
pub fn router() -> Router {
    Router::new()
        .nest("/admin", admin::router())
        .nest("/employees", employees::router())
        .nest("/projects", projects::router())
}
