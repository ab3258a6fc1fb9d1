//! Storage wiring for the HTTP layer.

use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use workforce_infra::store::{InMemoryWorkforceStore, PostgresWorkforceStore, WorkforceStore};
use workforce_infra::{AdminLogin, EmployeeDirectory, EmployeeLogin, StoreError};

use crate::config::ApiConfig;

/// Services shared by every handler (via `Extension<Arc<AppServices>>`).
#[derive(Debug, Clone)]
pub struct AppServices {
    pub directory: EmployeeDirectory,
    pub login: EmployeeLogin,
    pub admin_login: AdminLogin,
}

impl AppServices {
    /// Wire every service to one backend.
    pub fn from_store<S: WorkforceStore + 'static>(store: Arc<S>) -> Self {
        let directory = EmployeeDirectory::from_store(store.clone());
        let login = EmployeeLogin::new(directory.professional_store());
        Self {
            directory,
            login,
            admin_login: AdminLogin::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryWorkforceStore::new()))
    }
}

#[derive(Debug, Error)]
pub enum ServicesError {
    #[error("failed to connect to database: {0}")]
    Connect(#[from] sqlx::Error),

    #[error("failed to run migrations: {0}")]
    Migrate(#[source] StoreError),

    #[error("failed to seed admin account: {0}")]
    SeedAdmin(#[source] StoreError),
}

/// Build services for the backend the configuration selects, and seed the
/// configured admin account.
pub async fn build_services(config: &ApiConfig) -> Result<AppServices, ServicesError> {
    let services = match config.database_url.as_deref() {
        None => {
            tracing::warn!(
                "DATABASE_URL not set; using in-memory storage (data is lost on restart)"
            );
            AppServices::in_memory()
        }
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(url)
                .await?;
            let store = PostgresWorkforceStore::new(pool);

            if config.run_migrations {
                store.migrate().await.map_err(ServicesError::Migrate)?;
                tracing::info!("database migrations applied");
            }
            AppServices::from_store(Arc::new(store))
        }
    };

    match &config.admin {
        Some(admin) => services
            .admin_login
            .ensure_admin(admin.clone())
            .await
            .map_err(ServicesError::SeedAdmin)?,
        None => tracing::warn!("no admin account configured; admin login will reject everyone"),
    }

    Ok(services)
}
