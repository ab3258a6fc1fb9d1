//! Environment-driven API configuration.

use std::net::SocketAddr;

use thiserror::Error;

use workforce_auth::{AdminAccount, Secret};

pub const BIND_VAR: &str = "WORKFORCE_BIND";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const DB_MAX_CONNECTIONS_VAR: &str = "WORKFORCE_DB_MAX_CONNECTIONS";
pub const RUN_MIGRATIONS_VAR: &str = "WORKFORCE_RUN_MIGRATIONS";
pub const ADMIN_EMAIL_VAR: &str = "WORKFORCE_ADMIN_EMAIL";
pub const ADMIN_SECRET_VAR: &str = "WORKFORCE_ADMIN_SECRET";

const DEFAULT_BIND: &str = "0.0.0.0:8080";
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: invalid value `{value}`: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime configuration for the API binary.
///
/// `database_url` selects the backend: Postgres when set, in-memory otherwise.
/// `admin` is seeded into the admin store at startup when both admin variables
/// are set.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind: SocketAddr,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub run_migrations: bool,
    pub admin: Option<AdminAccount>,
}

impl core::fmt::Debug for ApiConfig {
    // The database URL may carry a password.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind", &self.bind)
            .field("database_url", &self.database_url.as_ref().map(|_| "***"))
            .field("db_max_connections", &self.db_max_connections)
            .field("run_migrations", &self.run_migrations)
            .field("admin", &self.admin.as_ref().map(AdminAccount::email))
            .finish()
    }
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_raw = lookup(BIND_VAR).unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            var: BIND_VAR,
            value: bind_raw.clone(),
            reason: e.to_string(),
        })?;

        let database_url = lookup(DATABASE_URL_VAR).filter(|url| !url.trim().is_empty());

        let db_max_connections = match lookup(DB_MAX_CONNECTIONS_VAR) {
            None => DEFAULT_DB_MAX_CONNECTIONS,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        var: DB_MAX_CONNECTIONS_VAR,
                        value: raw,
                        reason: "must be at least 1".to_string(),
                    });
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        var: DB_MAX_CONNECTIONS_VAR,
                        value: raw,
                        reason: e.to_string(),
                    });
                }
            },
        };

        let run_migrations = match lookup(RUN_MIGRATIONS_VAR) {
            None => true,
            Some(raw) => raw
                .trim()
                .to_ascii_lowercase()
                .parse::<bool>()
                .map_err(|e| ConfigError::Invalid {
                    var: RUN_MIGRATIONS_VAR,
                    value: raw.clone(),
                    reason: e.to_string(),
                })?,
        };

        let admin = match (lookup(ADMIN_EMAIL_VAR), lookup(ADMIN_SECRET_VAR)) {
            (None, None) => None,
            (Some(email), Some(secret)) => Some(
                AdminAccount::new(&email, Secret::new(secret)).map_err(|e| {
                    ConfigError::Invalid {
                        var: ADMIN_EMAIL_VAR,
                        value: email.clone(),
                        reason: e.to_string(),
                    }
                })?,
            ),
            (Some(_), None) => return Err(Self::unpaired(ADMIN_SECRET_VAR, ADMIN_EMAIL_VAR)),
            (None, Some(_)) => return Err(Self::unpaired(ADMIN_EMAIL_VAR, ADMIN_SECRET_VAR)),
        };

        Ok(Self {
            bind,
            database_url,
            db_max_connections,
            run_migrations,
            admin,
        })
    }

    fn unpaired(missing: &'static str, present: &'static str) -> ConfigError {
        ConfigError::Invalid {
            var: missing,
            value: String::new(),
            reason: format!("required when {present} is set"),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        if self.database_url.is_some() {
            "postgres"
        } else {
            "in-memory"
        }
    }
}
