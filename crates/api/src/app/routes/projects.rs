use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use workforce_projects::NewProject;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_project).get(list_projects))
        .route("/member/:code", get(list_projects_for_member))
        .route("/:id", get(get_project))
}

pub async fn create_project(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateProjectRequest>,
) -> axum::response::Response {
    let project = match NewProject::try_from(body) {
        Ok(p) => p,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.directory.create_project(project).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// `GET /projects?fetch=eager|per-project`
pub async fn list_projects(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListProjectsQuery>,
) -> axum::response::Response {
    let fetch = query.fetch.unwrap_or_default();
    match services.directory.list_projects_with(fetch).await {
        Ok(views) => (StatusCode::OK, Json(serde_json::json!({ "items": views }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_project(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match errors::parse_project_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    match services.directory.get_project(id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_projects_for_member(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
) -> axum::response::Response {
    let code = match errors::parse_code(&code) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match services.directory.list_projects_for_member(&code).await {
        Ok(views) => (StatusCode::OK, Json(serde_json::json!({ "items": views }))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
