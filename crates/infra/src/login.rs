//! Employee and administrator login.

use std::sync::Arc;

use tracing::{info, warn};

use workforce_auth::{
    AdminAccount, AdminCredentials, CredentialError, Credentials, normalize_login_email,
    verify_credentials,
};
use workforce_core::{DomainError, EmploymentCode};

use crate::error::StoreError;
use crate::store::{AdminStore, ProfessionalStore};

/// Normalize a presented email. A blank email is a validation error; a
/// malformed one is indistinguishable from an unknown one.
fn presented_email(raw: &str) -> Result<String, StoreError> {
    match normalize_login_email(raw) {
        Ok(email) => Ok(email),
        Err(CredentialError::MissingEmail) => {
            Err(DomainError::from(CredentialError::MissingEmail).into())
        }
        Err(_) => {
            warn!("login rejected: malformed email");
            Err(DomainError::InvalidCredentials.into())
        }
    }
}

/// Verifies an email + secret pair and resolves it to an employment code.
///
/// Unknown email, malformed email and wrong secret all produce the same
/// `InvalidCredentials` error.
#[derive(Clone)]
pub struct EmployeeLogin {
    professional: Arc<dyn ProfessionalStore>,
}

impl core::fmt::Debug for EmployeeLogin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EmployeeLogin").finish_non_exhaustive()
    }
}

impl EmployeeLogin {
    pub fn new(professional: Arc<dyn ProfessionalStore>) -> Self {
        Self { professional }
    }

    pub async fn login(&self, credentials: Credentials) -> Result<EmploymentCode, StoreError> {
        let email = presented_email(&credentials.login_email)?;

        let stored = self.professional.find_by_login_email(&email).await?;
        let outcome = verify_credentials(
            stored.as_ref().map(|r| (&r.employment_code, &r.secret)),
            &credentials.secret,
        );

        match outcome {
            Ok(code) => {
                info!(employment_code = %code, "employee logged in");
                Ok(code)
            }
            Err(e) => {
                warn!(error = %e, "login rejected");
                Err(DomainError::from(e).into())
            }
        }
    }
}

/// Admin counterpart of [`EmployeeLogin`]: resolves credentials to the admin's
/// normalized email.
#[derive(Clone)]
pub struct AdminLogin {
    admins: Arc<dyn AdminStore>,
}

impl core::fmt::Debug for AdminLogin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AdminLogin").finish_non_exhaustive()
    }
}

impl AdminLogin {
    pub fn new(admins: Arc<dyn AdminStore>) -> Self {
        Self { admins }
    }

    /// Create or update an admin account (used to seed one from configuration).
    pub async fn ensure_admin(&self, account: AdminAccount) -> Result<(), StoreError> {
        let email = account.email().to_string();
        self.admins.upsert_admin(account).await?;
        info!(admin = %email, "admin account ensured");
        Ok(())
    }

    pub async fn login(&self, credentials: AdminCredentials) -> Result<String, StoreError> {
        let email = presented_email(&credentials.email)?;

        let stored = self.admins.find_admin_by_email(&email).await?;
        let outcome = verify_credentials(
            stored.as_ref().map(|a| (&email, a.secret())),
            &credentials.secret,
        );

        match outcome {
            Ok(email) => {
                info!(admin = %email, "admin logged in");
                Ok(email)
            }
            Err(e) => {
                warn!(error = %e, "admin login rejected");
                Err(DomainError::from(e).into())
            }
        }
    }
}
