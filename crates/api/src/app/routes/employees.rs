use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use workforce_auth::Credentials;
use workforce_employees::{FinanceRecord, ProfessionalRecord};

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_employees))
        .route("/personal", post(create_personal).get(list_personal))
        .route("/personal/:code", get(get_personal))
        .route("/professional", post(create_professional).get(list_professional))
        .route("/professional/:code", get(get_professional))
        .route("/finance", post(create_finance).get(list_finance))
        .route("/finance/:code", get(get_finance))
        .route("/login", post(login))
        .route("/codes", post(allocate_code))
        .route("/:code", get(get_employee))
        .route("/:code/overview", get(employee_overview))
}

fn items<T: serde::Serialize>(items: Vec<T>) -> axum::response::Response {
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

// -------------------------
// Personal
// -------------------------

pub async fn create_personal(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::PersonalIntakeRequest>,
) -> axum::response::Response {
    let supplied = match body.employment_code() {
        Ok(code) => code,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let created = match supplied {
        Some(code) => services.directory.create_personal(body.into_record(code)).await,
        None => {
            // Placeholder key; the directory overwrites it with a freshly allocated one.
            let draft = body.into_record(workforce_core::EmploymentCode::generate());
            services
                .directory
                .create_personal_with_generated_code(draft)
                .await
        }
    };

    match created {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_personal(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.directory.list_personal().await {
        Ok(records) => items(records),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_personal(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
) -> axum::response::Response {
    let code = match errors::parse_code(&code) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match services.directory.get_personal(&code).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

// -------------------------
// Professional
// -------------------------

pub async fn create_professional(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ProfessionalIntakeRequest>,
) -> axum::response::Response {
    let record = match ProfessionalRecord::try_from(body) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.directory.create_professional(record).await {
        Ok(profile) => (StatusCode::CREATED, Json(profile)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_professional(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.directory.list_professional().await {
        Ok(profiles) => items(profiles),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_professional(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
) -> axum::response::Response {
    let code = match errors::parse_code(&code) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match services.directory.get_professional(&code).await {
        Ok(profile) => (StatusCode::OK, Json(profile)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

// -------------------------
// Finance
// -------------------------

pub async fn create_finance(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::FinanceIntakeRequest>,
) -> axum::response::Response {
    let record = match FinanceRecord::try_from(body) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };
    match services.directory.create_finance(record).await {
        Ok(record) => (StatusCode::CREATED, Json(record)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_finance(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.directory.list_finance().await {
        Ok(records) => items(records),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_finance(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
) -> axum::response::Response {
    let code = match errors::parse_code(&code) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match services.directory.get_finance(&code).await {
        Ok(record) => (StatusCode::OK, Json(record)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

// -------------------------
// Identity, login and aggregated views
// -------------------------

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(credentials): Json<Credentials>,
) -> axum::response::Response {
    match services.login.login(credentials).await {
        Ok(employment_code) => (
            StatusCode::OK,
            Json(dto::EmploymentCodeResponse { employment_code }),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn allocate_code(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.directory.allocate_code().await {
        Ok(employment_code) => (
            StatusCode::CREATED,
            Json(dto::EmploymentCodeResponse { employment_code }),
        )
            .into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn list_employees(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.directory.list_employees().await {
        Ok(views) => items(views),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
) -> axum::response::Response {
    let code = match errors::parse_code(&code) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match services.directory.get_full_employee_view(&code).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn employee_overview(
    Extension(services): Extension<Arc<AppServices>>,
    Path(code): Path<String>,
) -> axum::response::Response {
    let code = match errors::parse_code(&code) {
        Ok(c) => c,
        Err(resp) => return resp,
    };
    match services.directory.employee_overview(&code).await {
        Ok(overview) => (StatusCode::OK, Json(overview)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
