use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};

use workforce_auth::AdminCredentials;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/login", post(login))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(credentials): Json<AdminCredentials>,
) -> axum::response::Response {
    match services.admin_login.login(credentials).await {
        Ok(email) => (StatusCode::OK, Json(dto::AdminLoginResponse { email })).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
